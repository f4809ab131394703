use std::borrow::Cow;

use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::{
    align::AlignPolicy,
    error::{FuriganaError, Result},
    markup::{MarkupStyle, annotate_word},
    tokenizer::Tokenizer,
};

/// Blank line separating paragraphs in the source text.
pub const PARAGRAPH_DELIMITER: &str = "\n\n";

pub fn normalize_line_endings(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}

/// Split on the delimiter. Runs of blank lines yield empty paragraphs, so
/// joining the pieces back with the delimiter restores the spacing.
pub fn split_paragraphs(body: &str) -> Vec<&str> {
    body.split(PARAGRAPH_DELIMITER).collect()
}

pub fn join_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> String {
    paragraphs
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PARAGRAPH_DELIMITER)
}

/// Remove the line breaks inside one paragraph.
pub fn flatten_paragraph(paragraph: &str) -> String {
    paragraph.chars().filter(|c| !matches!(c, '\n' | '\r')).collect()
}

/// Drives tokenization, alignment, and markup over a whole document body.
pub struct Furiganizer<T> {
    tokenizer: T,
    policy: AlignPolicy,
    style: MarkupStyle,
    parallel: bool,
}

impl<T: Tokenizer> Furiganizer<T> {
    pub fn new(tokenizer: T) -> Self {
        Self {
            tokenizer,
            policy: AlignPolicy::default(),
            style: MarkupStyle::default(),
            parallel: false,
        }
    }

    pub fn with_policy(mut self, policy: AlignPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_style(mut self, style: MarkupStyle) -> Self {
        self.style = style;
        self
    }

    /// Process paragraphs on the rayon pool. Output order is unchanged.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn style(&self) -> &MarkupStyle {
        &self.style
    }

    pub fn annotate_body(&self, body: &str) -> Result<String> {
        let body = normalize_line_endings(body);
        let paragraphs = split_paragraphs(&body);

        debug!("Annotating {} paragraphs", paragraphs.len());

        let annotated: Vec<String> = if self.parallel {
            paragraphs
                .par_iter()
                .enumerate()
                .map(|(index, paragraph)| self.annotate_paragraph(index, paragraph))
                .collect::<Result<_>>()?
        } else {
            paragraphs
                .iter()
                .enumerate()
                .map(|(index, paragraph)| self.annotate_paragraph(index, paragraph))
                .collect::<Result<_>>()?
        };

        Ok(join_paragraphs(&annotated))
    }

    pub fn annotate_paragraph(&self, index: usize, paragraph: &str) -> Result<String> {
        let flat = flatten_paragraph(paragraph);

        if flat.is_empty() {
            return Ok(flat);
        }

        let words = self
            .tokenizer
            .tokenize(&flat)
            .map_err(|e| FuriganaError::Tokenizer {
                paragraph: index,
                source: e.into(),
            })?;

        if words.is_empty() {
            warn!("Tokenizer returned no words for paragraph {}", index);
        }

        let mut out = String::with_capacity(flat.len() * 2);

        for (word_index, word) in words.iter().enumerate() {
            if word.literal.is_empty() {
                continue;
            }

            let markup = annotate_word(&word.literal, &word.reading, self.policy, &self.style);

            trace!(
                paragraph = index,
                word = word_index,
                literal = %word.literal,
                reading = %word.reading,
                "{}",
                markup
            );

            out.push_str(&markup);
        }

        Ok(out)
    }
}

/// The unannotated counterpart of [`Furiganizer::annotate_body`], with the
/// same paragraph structure.
pub fn plain_body(body: &str) -> String {
    let body = normalize_line_endings(body);
    let flattened: Vec<String> = split_paragraphs(&body)
        .into_iter()
        .map(flatten_paragraph)
        .collect();

    join_paragraphs(&flattened)
}

#[cfg(test)]
pub(crate) mod tests {
    use std::collections::HashMap;

    use anyhow::{Result, anyhow};
    use proptest::prelude::*;

    use super::*;
    use crate::tokenizer::WordPair;

    /// Splits on a fixed word list and looks readings up in a table; any
    /// other character becomes its own word reading as itself.
    pub(crate) struct FixedTokenizer {
        readings: HashMap<&'static str, &'static str>,
    }

    impl FixedTokenizer {
        pub(crate) fn new(entries: &[(&'static str, &'static str)]) -> Self {
            Self {
                readings: entries.iter().copied().collect(),
            }
        }
    }

    impl Tokenizer for FixedTokenizer {
        fn tokenize(&self, text: &str) -> Result<Vec<WordPair>> {
            if text.contains('\n') {
                return Err(anyhow!("line break reached the tokenizer"));
            }

            let mut words = Vec::new();
            let mut rest = text;

            'outer: while !rest.is_empty() {
                for (literal, reading) in &self.readings {
                    if let Some(tail) = rest.strip_prefix(literal) {
                        words.push(WordPair::new(*literal, *reading));
                        rest = tail;
                        continue 'outer;
                    }
                }

                let ch = rest.chars().next().ok_or_else(|| anyhow!("empty rest"))?;
                words.push(WordPair::new(ch.to_string(), ch.to_string()));
                rest = &rest[ch.len_utf8()..];
            }

            Ok(words)
        }
    }

    struct Failing;

    impl Tokenizer for Failing {
        fn tokenize(&self, _text: &str) -> Result<Vec<WordPair>> {
            Err(anyhow!("dictionary unavailable"))
        }
    }

    struct Silent;

    impl Tokenizer for Silent {
        fn tokenize(&self, _text: &str) -> Result<Vec<WordPair>> {
            Ok(Vec::new())
        }
    }

    fn cat_tokenizer() -> FixedTokenizer {
        FixedTokenizer::new(&[("猫", "ねこ"), ("見た", "みた"), ("犬", "いぬ"), ("です", "です")])
    }

    #[test]
    fn test_split_and_join() {
        let body = "Body line 1\n\nBody para 2";
        let paragraphs = split_paragraphs(body);

        assert_eq!(paragraphs, vec!["Body line 1", "Body para 2"]);
        assert_eq!(join_paragraphs(&paragraphs), body);
    }

    #[test]
    fn test_extra_blank_lines_survive() {
        let body = "一\n\n\n\n二\n\n";
        let paragraphs = split_paragraphs(body);

        assert_eq!(paragraphs, vec!["一", "", "二", ""]);
        assert_eq!(join_paragraphs(&paragraphs), body);
    }

    #[test]
    fn test_normalize_line_endings() {
        assert_eq!(normalize_line_endings("a\r\nb\rc\n"), "a\nb\nc\n");
        assert!(matches!(normalize_line_endings("a\nb"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_flatten_paragraph() {
        assert_eq!(flatten_paragraph("猫を\n見た\r\n"), "猫を見た");
    }

    #[test]
    fn test_annotate_body() -> crate::error::Result<()> {
        let furiganizer = Furiganizer::new(cat_tokenizer());
        let out = furiganizer.annotate_body("猫を\n見た。\n\n犬です")?;

        assert_eq!(
            out,
            "\\ruby[g]{猫}{ねこ}を\\ruby[g]{見}{み}た。\n\n\\ruby[g]{犬}{いぬ}です"
        );

        Ok(())
    }

    #[test]
    fn test_parallel_matches_sequential() -> crate::error::Result<()> {
        let body = "猫\n\n犬\n\n\n\n見た\n\n猫です";
        let sequential = Furiganizer::new(cat_tokenizer()).annotate_body(body)?;
        let parallel = Furiganizer::new(cat_tokenizer())
            .with_parallel(true)
            .annotate_body(body)?;

        assert_eq!(sequential, parallel);

        Ok(())
    }

    #[test]
    fn test_tokenizer_error_names_paragraph() {
        let furiganizer = Furiganizer::new(Failing);
        let err = furiganizer.annotate_body("一\n\n二").unwrap_err();

        assert!(matches!(err, FuriganaError::Tokenizer { paragraph: 0, .. }));
    }

    #[test]
    fn test_empty_paragraph_skips_tokenizer() -> crate::error::Result<()> {
        let furiganizer = Furiganizer::new(Failing);

        assert_eq!(furiganizer.annotate_body("\n\n")?, "\n\n");

        Ok(())
    }

    #[test]
    fn test_no_words_yields_empty_paragraph() -> crate::error::Result<()> {
        let furiganizer = Furiganizer::new(Silent);

        assert_eq!(furiganizer.annotate_body("猫\n\n犬")?, "\n\n");

        Ok(())
    }

    #[test]
    fn test_plain_body() {
        assert_eq!(plain_body("猫を\r\n見た\r\n\r\n犬"), "猫を見た\n\n犬");
    }

    proptest! {
        #[test]
        fn prop_paragraph_count_preserved(
            paragraphs in proptest::collection::vec("[猫犬見たです\n、。]{0,6}", 1..6)
        ) {
            let body = paragraphs.join(PARAGRAPH_DELIMITER);
            let furiganizer = Furiganizer::new(cat_tokenizer());

            let annotated = furiganizer.annotate_body(&body).unwrap();
            let expected = split_paragraphs(&body).len();

            prop_assert_eq!(split_paragraphs(&annotated).len(), expected);
            prop_assert_eq!(split_paragraphs(&plain_body(&body)).len(), expected);
        }
    }
}
