//! Case and accent folding plus word tokenization.

use std::borrow::Cow;

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Fold `text` according to the requested options.
///
/// Case folding runs before accent stripping: lowercasing can introduce
/// combining marks (`İ` lowercases to `i` + U+0307), and stripping afterwards
/// keeps the function idempotent.
#[must_use]
pub fn normalize(text: &str, ignore_case: bool, ignore_accent: bool) -> String {
    let folded: Cow<'_, str> = if ignore_case {
        Cow::Owned(text.to_lowercase())
    } else {
        Cow::Borrowed(text)
    };

    if ignore_accent {
        folded
            .nfd()
            .filter(|c| !is_combining_mark(*c))
            .nfc()
            .collect()
    } else {
        folded.into_owned()
    }
}

/// Characters that belong to a word. Combining marks stay attached to their
/// base letter when accents are kept.
#[must_use]
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || is_combining_mark(c)
}

/// Split text into maximal runs of word characters.
#[must_use]
pub fn tokenize(text: &str) -> Vec<&str> {
    split_words(text, is_word_char)
}

/// Like [`tokenize`], but keeps `*` inside words so wildcard terms survive.
pub(crate) fn tokenize_pattern(text: &str) -> Vec<&str> {
    split_words(text, |c| c == '*' || is_word_char(c))
}

fn split_words(text: &str, is_word: impl Fn(char) -> bool) -> Vec<&str> {
    let mut words = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, c) in text.char_indices() {
        match (is_word(c), start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                words.push(&text[s..idx]);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        words.push(&text[s..]);
    }
    words
}
