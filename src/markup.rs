use crate::{
    align::{AlignPolicy, AlignmentBlock, BlockKind, align_with},
    script::{Classification, classify},
};

/// How a multi-character base shares its reading, as understood by the
/// pxrubrica `\ruby` command.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RubyGrouping {
    /// Whole reading spread over the whole base (`g`).
    #[default]
    Group,
    /// Per-character placement (`m`).
    Mono,
    /// Compound-word placement (`j`).
    Jukugo,
}

impl RubyGrouping {
    pub fn option(self) -> &'static str {
        match self {
            RubyGrouping::Group => "g",
            RubyGrouping::Mono => "m",
            RubyGrouping::Jukugo => "j",
        }
    }
}

/// Syntax of the emitted annotation constructs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupStyle {
    /// Control sequence producing ruby, without the leading backslash.
    pub ruby_command: String,
    pub grouping: RubyGrouping,
    /// Opens a paragraph scope without indentation; closed by `}`.
    pub no_indent: String,
}

impl Default for MarkupStyle {
    fn default() -> Self {
        Self {
            ruby_command: "ruby".to_string(),
            grouping: RubyGrouping::default(),
            no_indent: "{\\noindent ".to_string(),
        }
    }
}

impl MarkupStyle {
    fn ruby_prefix(&self) -> String {
        format!("\\{}[{}]{{", self.ruby_command, self.grouping.option())
    }

    pub fn write_ruby(&self, out: &mut String, base: &str, reading: &str) {
        out.push_str(&self.ruby_prefix());
        out.push_str(base);
        out.push_str("}{");
        out.push_str(reading);
        out.push('}');
    }

    pub fn wrap_no_indent(&self, paragraph: &str) -> String {
        format!("{}{}}}", self.no_indent, paragraph)
    }
}

/// An alignment block tagged with the classifier's verdict on its literal.
/// Matched runs are already spelled as read and always pass through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedSegment {
    pub block: AlignmentBlock,
    pub class: Classification,
}

impl From<AlignmentBlock> for ClassifiedSegment {
    fn from(block: AlignmentBlock) -> Self {
        let class = match block.kind {
            BlockKind::Match => Classification::PassThrough,
            BlockKind::Gap => classify(&block.literal),
        };

        Self { block, class }
    }
}

pub fn classify_blocks(blocks: Vec<AlignmentBlock>) -> Vec<ClassifiedSegment> {
    blocks.into_iter().map(ClassifiedSegment::from).collect()
}

pub fn emit(segments: &[ClassifiedSegment], style: &MarkupStyle) -> String {
    let mut out = String::new();

    for segment in segments {
        let block = &segment.block;

        match segment.class {
            Classification::Annotate if !block.reading.is_empty() => {
                style.write_ruby(&mut out, &block.literal, &block.reading);
            }
            _ => out.push_str(&block.literal),
        }
    }

    out
}

/// Align one word against its reading and render it.
pub fn annotate_word(
    literal: &str,
    reading: &str,
    policy: AlignPolicy,
    style: &MarkupStyle,
) -> String {
    if literal.is_empty() || reading.is_empty() {
        return literal.to_string();
    }

    emit(&classify_blocks(align_with(literal, reading, policy)), style)
}

/// Replace every ruby construct written with `style` by its base text.
pub fn strip_annotations(markup: &str, style: &MarkupStyle) -> String {
    let prefix = style.ruby_prefix();
    let mut out = String::with_capacity(markup.len());
    let mut rest = markup;

    while let Some(start) = rest.find(&prefix) {
        out.push_str(&rest[..start]);

        let after = &rest[start + prefix.len()..];
        let parsed = after.split_once("}{").and_then(|(base, tail)| {
            tail.find('}').map(|end| (base, &tail[end + 1..]))
        });

        match parsed {
            Some((base, tail)) => {
                out.push_str(base);
                rest = tail;
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);

    out
}
