use std::{fs, path::Path};

use tracing::info;

use crate::{
    error::{FuriganaError, Result},
    paragraph::normalize_line_endings,
};

pub const TITLE_PLACEHOLDER: &str = "<<TITLE>>";
pub const AUTHOR_PLACEHOLDER: &str = "<<AUTHOR>>";
pub const CONTENT_PLACEHOLDER: &str = "<<CONTENT>>";

/// Vertical A6 novel layout with a title page.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/tate-a6-title.tex");

/// Source text: the first line is the title, the second the author, and
/// everything after is the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub title: String,
    pub author: String,
    pub body: String,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let text = normalize_line_endings(text);
        let mut parts = text.splitn(3, '\n');

        let mut next = || parts.next().unwrap_or_default().to_string();

        Self {
            title: next(),
            author: next(),
            body: next(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(FuriganaError::io(path))?;

        Ok(Self::parse(&text))
    }
}

/// A document template with literal placeholders for title, author, and
/// content.
#[derive(Debug, Clone)]
pub struct Template {
    source: String,
}

impl Default for Template {
    fn default() -> Self {
        Self::new(DEFAULT_TEMPLATE)
    }
}

impl Template {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn read(path: &Path) -> Result<Self> {
        fs::read_to_string(path)
            .map(Self::new)
            .map_err(FuriganaError::io(path))
    }

    /// Substitute every placeholder, in title, author, content order.
    ///
    /// Values are inserted verbatim, so a title or author that itself
    /// contains a later placeholder gets substituted too.
    pub fn render(&self, title: &str, author: &str, content: &str) -> Result<String> {
        for placeholder in [TITLE_PLACEHOLDER, AUTHOR_PLACEHOLDER, CONTENT_PLACEHOLDER] {
            if !self.source.contains(placeholder) {
                return Err(FuriganaError::MissingPlaceholder { placeholder });
            }
        }

        Ok(self
            .source
            .replace(TITLE_PLACEHOLDER, title)
            .replace(AUTHOR_PLACEHOLDER, author)
            .replace(CONTENT_PLACEHOLDER, content))
    }

    pub fn write(&self, out_path: &Path, title: &str, author: &str, content: &str) -> Result<()> {
        let rendered = self.render(title, author, content)?;

        fs::write(out_path, rendered).map_err(FuriganaError::io(out_path))?;

        info!("Wrote {:?}", out_path);

        Ok(())
    }
}
