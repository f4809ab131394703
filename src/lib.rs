pub mod align;
pub mod compile;
pub mod document;
pub mod error;
pub mod markup;
pub mod paragraph;
pub mod quote;
pub mod script;
pub mod tokenizer;

use tracing::info;

pub use crate::{
    align::{AlignPolicy, AlignmentBlock, BlockKind, align, align_with},
    compile::Compiler,
    document::{Document, Template},
    error::{FuriganaError, Result},
    markup::{MarkupStyle, RubyGrouping, annotate_word, emit, strip_annotations},
    paragraph::{Furiganizer, plain_body},
    quote::wrap_quoted_paragraphs,
    script::{Classification, Script, classify},
    tokenizer::{Tokenizer, WordPair},
};

/// The two typeset bodies produced from one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    pub annotated: String,
    pub plain: String,
}

/// Annotate a document body and build its plain twin, both with quotation
/// paragraphs un-indented.
pub fn render_document<T: Tokenizer>(
    document: &Document,
    furiganizer: &Furiganizer<T>,
) -> Result<Rendered> {
    info!("Rendering {:?} by {:?}...", document.title, document.author);

    let style = furiganizer.style();
    let annotated = furiganizer.annotate_body(&document.body)?;

    Ok(Rendered {
        annotated: wrap_quoted_paragraphs(&annotated, style),
        plain: wrap_quoted_paragraphs(&plain_body(&document.body), style),
    })
}
