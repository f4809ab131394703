use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result, anyhow};
use tracing::{debug, info};

use super::{Tokenizer, WordPair, hiragana_reading};

/// Column of the IPADIC feature string holding the katakana reading.
pub const IPADIC_READING_FIELD: usize = 7;

/// Morphological analysis backed by a compiled vibrato system dictionary.
pub struct VibratoTokenizer {
    inner: ::vibrato::Tokenizer,
    /// index into the comma-separated feature string of the reading column
    reading_field: usize,
}

impl VibratoTokenizer {
    pub fn new(dict: ::vibrato::Dictionary) -> Self {
        Self {
            inner: ::vibrato::Tokenizer::new(dict),
            reading_field: IPADIC_READING_FIELD,
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        info!("Loading dictionary {:?}...", path);

        let file = File::open(path)
            .with_context(|| format!("Failed to open dictionary: {:?}", path))?;
        let dict = ::vibrato::Dictionary::read(BufReader::new(file))
            .map_err(|e| anyhow!("Failed to read dictionary {:?}: {:?}", path, e))?;

        Ok(Self::new(dict))
    }

    /// Use a different feature column for readings (UniDic and friends).
    pub fn with_reading_field(mut self, reading_field: usize) -> Self {
        self.reading_field = reading_field;
        self
    }
}

impl Tokenizer for VibratoTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<WordPair>> {
        let mut worker = self.inner.new_worker();

        worker.reset_sentence(text);
        worker.tokenize();

        let words: Vec<WordPair> = worker
            .token_iter()
            .map(|token| {
                word_pair_from_feature(token.surface(), token.feature(), self.reading_field)
            })
            .collect();

        debug!(
            "Tokenized {} chars into {} words",
            text.chars().count(),
            words.len()
        );

        Ok(words)
    }
}

/// Build a word pair from a token surface and its dictionary feature string.
/// Unknown words carry no reading column, or `*`; they read as themselves.
pub fn word_pair_from_feature(surface: &str, feature: &str, reading_field: usize) -> WordPair {
    let reading = feature
        .split(',')
        .nth(reading_field)
        .filter(|r| !r.is_empty() && *r != "*")
        .map(hiragana_reading)
        .unwrap_or_else(|| surface.to_string());

    WordPair::new(surface, reading)
}
