use crate::{
    markup::MarkupStyle,
    paragraph::{join_paragraphs, split_paragraphs},
};

/// Opening and closing quotation marks.
pub const QUOTE_PAIRS: [(char, char); 2] = [('「', '」'), ('『', '』')];

/// Wrap every paragraph that is nothing but one quotation in the style's
/// no-indent scope, so dialogue lines start flush with the margin.
pub fn wrap_quoted_paragraphs(text: &str, style: &MarkupStyle) -> String {
    let paragraphs: Vec<String> = split_paragraphs(text)
        .into_iter()
        .map(|paragraph| {
            if is_whole_quotation(paragraph) {
                style.wrap_no_indent(paragraph)
            } else {
                paragraph.to_string()
            }
        })
        .collect();

    join_paragraphs(&paragraphs)
}

/// True if the paragraph opens with a quotation mark whose matching close is
/// its last character. `「あ」「い」` is two quotations, not one.
pub fn is_whole_quotation(paragraph: &str) -> bool {
    let trimmed = paragraph.trim();
    let mut chars = trimmed.char_indices();

    let Some((_, first)) = chars.next() else {
        return false;
    };
    let Some(&(open, close)) = QUOTE_PAIRS.iter().find(|(open, _)| *open == first) else {
        return false;
    };

    let mut depth = 1usize;

    for (i, ch) in chars {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;

            if depth == 0 {
                return i + ch.len_utf8() == trimmed.len();
            }
        }
    }

    false
}
