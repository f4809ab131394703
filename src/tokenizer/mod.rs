#[cfg(feature = "vibrato")]
pub mod vibrato;

use anyhow::Result;
use wana_kana::{ConvertJapanese, IsJapaneseStr};

/// One lexical unit and its reading, as produced by a tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    pub literal: String,
    pub reading: String,
}

impl WordPair {
    pub fn new(literal: impl Into<String>, reading: impl Into<String>) -> Self {
        Self {
            literal: literal.into(),
            reading: reading.into(),
        }
    }
}

/// Splits a flattened paragraph into words with hiragana readings.
///
/// The literals of the returned pairs, concatenated in order, must rebuild
/// the input exactly. Input never contains line breaks: the morphological
/// analysers this wraps are known to repeat the previous word when a token
/// starts with a control character.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Result<Vec<WordPair>>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Result<Vec<WordPair>> {
        (**self).tokenize(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Result<Vec<WordPair>> {
        (**self).tokenize(text)
    }
}

/// Dictionary readings are katakana; ruby is set in hiragana. Readings with
/// anything other than katakana in them are left alone.
pub fn hiragana_reading(reading: &str) -> String {
    if reading.is_katakana() {
        reading.to_hiragana()
    } else {
        reading.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Chars;

    impl Tokenizer for Chars {
        fn tokenize(&self, text: &str) -> Result<Vec<WordPair>> {
            Ok(text
                .chars()
                .map(|c| WordPair::new(c.to_string(), c.to_string()))
                .collect())
        }
    }

    #[test]
    fn test_boxed_tokenizer_delegates() -> Result<()> {
        let boxed: Box<dyn Tokenizer> = Box::new(Chars);
        let words = boxed.tokenize("あい")?;

        assert_eq!(words, vec![WordPair::new("あ", "あ"), WordPair::new("い", "い")]);

        Ok(())
    }

    #[test]
    fn test_hiragana_reading() {
        assert_eq!(hiragana_reading("ネコ"), "ねこ");
        assert_eq!(hiragana_reading("トウキョウ"), "とうきょう");
        assert_eq!(hiragana_reading("ねこ"), "ねこ");
        assert_eq!(hiragana_reading("2024"), "2024");
    }
}
