use std::ops::RangeInclusive;

// CJK Unified Ideographs
const CJK_RANGE: RangeInclusive<u32> = 0x4e00..=0x9fff;
const KANJI_EXTENDED_A_RANGE: RangeInclusive<u32> = 0x3400..=0x4dbf;
// Radicals Supplement, Kangxi Radicals
const CJK_RADICALS_RANGE: RangeInclusive<u32> = 0x2e80..=0x2fdf;
const CJK_COMPATIBILITY_RANGE: RangeInclusive<u32> = 0xf900..=0xfaff;
// Extensions B and later, plus the compatibility supplement
const CJK_SUPPLEMENTARY_RANGE: RangeInclusive<u32> = 0x20000..=0x3134f;

const HIRAGANA_RANGE: RangeInclusive<u32> = 0x3040..=0x309f;
const KATAKANA_RANGE: RangeInclusive<u32> = 0x30a0..=0x30ff;
const KATAKANA_PHONETIC_EXTENSIONS_RANGE: RangeInclusive<u32> = 0x31f0..=0x31ff;
const HALF_WIDTH_KATAKANA_RANGE: RangeInclusive<u32> = 0xff65..=0xff9f;

const JAPANESE_PUNCTUATION_RANGE: RangeInclusive<u32> = 0x3000..=0x303f;
const FULL_WIDTH_DIGIT_RANGE: RangeInclusive<u32> = 0xff10..=0xff19;
const FULL_WIDTH_UPPER_RANGE: RangeInclusive<u32> = 0xff21..=0xff3a;
const FULL_WIDTH_LOWER_RANGE: RangeInclusive<u32> = 0xff41..=0xff5a;
const FULL_WIDTH_FORMS_RANGE: RangeInclusive<u32> = 0xff01..=0xff64;
const LATIN_EXTENDED_RANGE: RangeInclusive<u32> = 0x00c0..=0x024f;

/// Han marks that live in the punctuation block but are written as kanji:
/// 々 (iteration), 〆 (closing), 〇 (zero), 〻 (vertical iteration).
const HAN_MARKS: [char; 4] = ['\u{3005}', '\u{3006}', '\u{3007}', '\u{303b}'];

/// Script category of a single character, decided purely by code point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Script {
    Logographic,
    Hiragana,
    Katakana,
    Punctuation,
    Digit,
    Latin,
    Control,
    Other,
}

impl Script {
    pub fn of(ch: char) -> Self {
        if ch.is_control() {
            return Script::Control;
        }

        if HAN_MARKS.contains(&ch) {
            return Script::Logographic;
        }

        let c = ch as u32;

        if CJK_RANGE.contains(&c)
            || KANJI_EXTENDED_A_RANGE.contains(&c)
            || CJK_RADICALS_RANGE.contains(&c)
            || CJK_COMPATIBILITY_RANGE.contains(&c)
            || CJK_SUPPLEMENTARY_RANGE.contains(&c)
        {
            Script::Logographic
        } else if HIRAGANA_RANGE.contains(&c) {
            Script::Hiragana
        } else if KATAKANA_RANGE.contains(&c)
            || KATAKANA_PHONETIC_EXTENSIONS_RANGE.contains(&c)
            || HALF_WIDTH_KATAKANA_RANGE.contains(&c)
        {
            Script::Katakana
        } else if ch.is_ascii_digit() || FULL_WIDTH_DIGIT_RANGE.contains(&c) {
            Script::Digit
        } else if ch.is_ascii_alphabetic()
            || FULL_WIDTH_UPPER_RANGE.contains(&c)
            || FULL_WIDTH_LOWER_RANGE.contains(&c)
            || LATIN_EXTENDED_RANGE.contains(&c)
        {
            Script::Latin
        } else if ch.is_ascii_punctuation()
            || JAPANESE_PUNCTUATION_RANGE.contains(&c)
            || FULL_WIDTH_FORMS_RANGE.contains(&c)
        {
            Script::Punctuation
        } else {
            Script::Other
        }
    }
}

/// Whether a literal run receives a ruby annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    Annotate,
    PassThrough,
}

/// A run is annotated only when every character is logographic. Mixed runs
/// pass through whole; annotation is never applied to part of a run.
pub fn classify(run: &str) -> Classification {
    if !run.is_empty() && run.chars().all(|c| Script::of(c) == Script::Logographic) {
        Classification::Annotate
    } else {
        Classification::PassThrough
    }
}
