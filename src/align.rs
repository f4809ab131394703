//! Character alignment between a literal word and its phonetic reading.
//!
//! Shared characters (okurigana, kana already present in the literal) are
//! matched and pass through; the unmatched stretches in between pair a
//! literal core with the slice of the reading that pronounces it.

/// Direction in which the matcher resolves ambiguous shared characters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignPolicy {
    /// Match the sequences as given. A reading that ends in the same kana as
    /// its okurigana may lose part of its core to the trailing match.
    Forward,
    /// Match both sequences reversed and flip the result back, pushing the
    /// ambiguity to the front of the word where kanji cores rarely share a
    /// leading sound with what follows.
    #[default]
    ReverseThenFlip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    /// Identical runs on both sides.
    Match,
    /// Unmatched stretch between matches; either side may be empty.
    Gap,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignmentBlock {
    pub kind: BlockKind,
    pub literal: String,
    pub reading: String,
}

impl AlignmentBlock {
    fn matched(run: &[char]) -> Self {
        let text: String = run.iter().collect();

        Self {
            kind: BlockKind::Match,
            reading: text.clone(),
            literal: text,
        }
    }

    fn gap(literal: &[char], reading: &[char]) -> Self {
        Self {
            kind: BlockKind::Gap,
            literal: literal.iter().collect(),
            reading: reading.iter().collect(),
        }
    }
}

/// A matching block: `a` indexes the literal, `b` the reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Span {
    a: usize,
    b: usize,
    size: usize,
}

pub fn align(literal: &str, reading: &str) -> Vec<AlignmentBlock> {
    align_with(literal, reading, AlignPolicy::default())
}

pub fn align_with(literal: &str, reading: &str, policy: AlignPolicy) -> Vec<AlignmentBlock> {
    debug_assert!(
        !literal.is_empty() && !reading.is_empty(),
        "alignment requires a non-empty literal and reading"
    );

    let a: Vec<char> = literal.chars().collect();
    let b: Vec<char> = reading.chars().collect();

    let spans = match policy {
        AlignPolicy::Forward => matching_spans(&a, &b),
        AlignPolicy::ReverseThenFlip => {
            let ra: Vec<char> = a.iter().rev().copied().collect();
            let rb: Vec<char> = b.iter().rev().copied().collect();

            let mut spans: Vec<Span> = matching_spans(&ra, &rb)
                .into_iter()
                .map(|s| Span {
                    a: a.len() - s.a - s.size,
                    b: b.len() - s.b - s.size,
                    size: s.size,
                })
                .collect();
            spans.reverse();

            spans
        }
    };

    let mut blocks = Vec::with_capacity(spans.len() * 2 + 1);
    let (mut ai, mut bi) = (0, 0);

    for span in spans {
        if ai < span.a || bi < span.b {
            blocks.push(AlignmentBlock::gap(&a[ai..span.a], &b[bi..span.b]));
        }

        blocks.push(AlignmentBlock::matched(&a[span.a..span.a + span.size]));

        ai = span.a + span.size;
        bi = span.b + span.size;
    }

    if ai < a.len() || bi < b.len() {
        blocks.push(AlignmentBlock::gap(&a[ai..], &b[bi..]));
    }

    blocks
}

pub fn reconstruct_literal(blocks: &[AlignmentBlock]) -> String {
    blocks.iter().map(|b| b.literal.as_str()).collect()
}

pub fn reconstruct_reading(blocks: &[AlignmentBlock]) -> String {
    blocks.iter().map(|b| b.reading.as_str()).collect()
}

/// Maximal matching blocks in increasing order, found by repeatedly taking
/// the longest common block of a window and recursing on either side.
fn matching_spans(a: &[char], b: &[char]) -> Vec<Span> {
    let mut queue = vec![(0, a.len(), 0, b.len())];
    let mut found = Vec::new();

    while let Some((alo, ahi, blo, bhi)) = queue.pop() {
        let span = longest_match(a, b, alo, ahi, blo, bhi);

        if span.size == 0 {
            continue;
        }

        if alo < span.a && blo < span.b {
            queue.push((alo, span.a, blo, span.b));
        }
        if span.a + span.size < ahi && span.b + span.size < bhi {
            queue.push((span.a + span.size, ahi, span.b + span.size, bhi));
        }

        found.push(span);
    }

    found.sort();

    // Recursion can leave two blocks touching end to end.
    let mut merged: Vec<Span> = Vec::with_capacity(found.len());
    for span in found {
        match merged.last_mut() {
            Some(last) if last.a + last.size == span.a && last.b + last.size == span.b => {
                last.size += span.size;
            }
            _ => merged.push(span),
        }
    }

    merged
}

/// Longest common block within `a[alo..ahi]` and `b[blo..bhi]`. Ties go to
/// the block starting earliest in `a`, then earliest in `b`.
fn longest_match(a: &[char], b: &[char], alo: usize, ahi: usize, blo: usize, bhi: usize) -> Span {
    let mut best = Span {
        a: alo,
        b: blo,
        size: 0,
    };

    // run[j] = length of the common suffix ending at a[i - 1], b[j - 1]
    let width = bhi - blo + 1;
    let mut prev = vec![0usize; width];
    let mut cur = vec![0usize; width];

    for i in alo..ahi {
        for j in blo..bhi {
            let k = j - blo + 1;

            cur[k] = if a[i] == b[j] { prev[k - 1] + 1 } else { 0 };

            if cur[k] > best.size {
                best = Span {
                    a: i + 1 - cur[k],
                    b: j + 1 - cur[k],
                    size: cur[k],
                };
            }
        }

        std::mem::swap(&mut prev, &mut cur);
    }

    best
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;

    fn shape(blocks: &[AlignmentBlock]) -> Vec<(BlockKind, &str, &str)> {
        blocks
            .iter()
            .map(|b| (b.kind, b.literal.as_str(), b.reading.as_str()))
            .collect()
    }

    #[test]
    fn test_single_kanji() {
        let blocks = align("猫", "ねこ");

        assert_eq!(shape(&blocks), vec![(BlockKind::Gap, "猫", "ねこ")]);
    }

    #[test]
    fn test_okurigana_suffix() {
        let blocks = align("見た", "みた");

        assert_eq!(
            shape(&blocks),
            vec![(BlockKind::Gap, "見", "み"), (BlockKind::Match, "た", "た")]
        );
    }

    #[test]
    fn test_all_kana_literal_is_one_gap() {
        let blocks = align("キツツキ", "きつつき");

        assert_eq!(shape(&blocks), vec![(BlockKind::Gap, "キツツキ", "きつつき")]);
    }

    #[test]
    fn test_identical_sequences_match_whole() {
        let blocks = align("ひらがな", "ひらがな");

        assert_eq!(shape(&blocks), vec![(BlockKind::Match, "ひらがな", "ひらがな")]);
    }

    #[test]
    fn test_prefix_and_suffix_kana() {
        let blocks = align("お茶です", "おちゃです");

        assert_eq!(
            shape(&blocks),
            vec![
                (BlockKind::Match, "お", "お"),
                (BlockKind::Gap, "茶", "ちゃ"),
                (BlockKind::Match, "です", "です"),
            ]
        );
    }

    #[test]
    fn test_interleaved_okurigana() {
        let blocks = align("取り扱い", "とりあつかい");

        assert_eq!(
            shape(&blocks),
            vec![
                (BlockKind::Gap, "取", "と"),
                (BlockKind::Match, "り", "り"),
                (BlockKind::Gap, "扱", "あつか"),
                (BlockKind::Match, "い", "い"),
            ]
        );
    }

    #[test]
    fn test_reading_ending_like_okurigana() {
        // The reading of 聞 is き, the same kana as the suffix.
        let reversed = align_with("聞き", "きき", AlignPolicy::ReverseThenFlip);
        assert_eq!(
            shape(&reversed),
            vec![(BlockKind::Gap, "聞", "き"), (BlockKind::Match, "き", "き")]
        );

        let forward = align_with("聞き", "きき", AlignPolicy::Forward);
        assert_eq!(
            shape(&forward),
            vec![
                (BlockKind::Gap, "聞", ""),
                (BlockKind::Match, "き", "き"),
                (BlockKind::Gap, "", "き"),
            ]
        );
    }

    #[test]
    fn test_no_shared_characters() {
        let blocks = align("今日", "きょう");

        assert_eq!(shape(&blocks), vec![(BlockKind::Gap, "今日", "きょう")]);
    }

    #[test]
    fn test_longest_match_prefers_earliest() {
        let a: Vec<char> = "abab".chars().collect();
        let b: Vec<char> = "ab".chars().collect();

        let span = longest_match(&a, &b, 0, a.len(), 0, b.len());
        assert_eq!(span, Span { a: 0, b: 0, size: 2 });
    }

    #[test]
    fn test_adjacent_spans_are_merged() {
        let a: Vec<char> = "あいう".chars().collect();
        let spans = matching_spans(&a, &a);

        assert_eq!(spans, vec![Span { a: 0, b: 0, size: 3 }]);
    }

    fn word() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                Just('見'),
                Just('聞'),
                Just('日'),
                Just('き'),
                Just('た'),
                Just('み'),
                Just('キ'),
            ],
            1..8,
        )
        .prop_map(|chars| chars.into_iter().collect())
    }

    proptest! {
        #[test]
        fn prop_blocks_reconstruct_both_sides(literal in word(), reading in word()) {
            for policy in [AlignPolicy::Forward, AlignPolicy::ReverseThenFlip] {
                let blocks = align_with(&literal, &reading, policy);

                prop_assert_eq!(reconstruct_literal(&blocks), literal.clone());
                prop_assert_eq!(reconstruct_reading(&blocks), reading.clone());

                for block in &blocks {
                    prop_assert!(!(block.literal.is_empty() && block.reading.is_empty()));
                    if block.kind == BlockKind::Match {
                        prop_assert_eq!(&block.literal, &block.reading);
                    }
                }
            }
        }
    }
}
