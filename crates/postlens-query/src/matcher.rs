//! Evaluation of compiled expressions against text.

use serde::{Deserialize, Serialize};

use crate::expression::Expression;
use crate::normalize::{is_word_char, normalize, tokenize, tokenize_pattern};

/// How query terms are compared with candidate text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchOptions {
    pub ignore_case: bool,
    pub ignore_accent: bool,
    /// Require whole-word alignment instead of substring containment.
    pub match_word: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_case: true,
            ignore_accent: true,
            match_word: true,
        }
    }
}

impl MatchOptions {
    #[must_use]
    pub fn normalize(&self, text: &str) -> String {
        normalize(text, self.ignore_case, self.ignore_accent)
    }
}

#[derive(Debug, Clone)]
struct Leaf {
    /// Normalized leaf text, used for substring matching.
    text: Vec<char>,
    /// Normalized words, used for whole-word matching.
    words: Vec<Vec<char>>,
    wildcard: bool,
}

#[derive(Debug, Clone)]
enum Node {
    Leaf(Leaf),
    And(Vec<Node>),
    Or(Vec<Node>),
    Not(Box<Node>),
}

/// An expression bound to match options, with every leaf normalized up front.
///
/// Build one per query and reuse it for every record.
#[derive(Debug, Clone)]
pub struct Matcher {
    root: Node,
    options: MatchOptions,
}

impl Matcher {
    #[must_use]
    pub fn new(expression: &Expression, options: MatchOptions) -> Self {
        Self {
            root: prepare(expression, &options),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> MatchOptions {
        self.options
    }

    /// Evaluate against `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let normalized = self.options.normalize(text);
        let chars: Vec<char> = normalized.chars().collect();
        let tokens: Vec<Vec<char>> = if self.options.match_word {
            tokenize(&normalized)
                .into_iter()
                .map(|t| t.chars().collect())
                .collect()
        } else {
            Vec::new()
        };
        let candidate = Candidate {
            chars: &chars,
            tokens: &tokens,
            match_word: self.options.match_word,
        };
        candidate.eval(&self.root)
    }

    /// Evaluate against an optional field; an absent field never matches.
    #[must_use]
    pub fn matches_field(&self, text: Option<&str>) -> bool {
        text.is_some_and(|t| self.matches(t))
    }
}

/// Compile-free convenience: evaluate `expression` against one text.
///
/// Prefer [`Matcher`] when evaluating the same expression many times.
#[must_use]
pub fn evaluate(expression: &Expression, text: &str, options: MatchOptions) -> bool {
    Matcher::new(expression, options).matches(text)
}

fn prepare(expr: &Expression, options: &MatchOptions) -> Node {
    match expr {
        Expression::Term(term) => Node::Leaf(prepare_leaf(term, options, true)),
        Expression::Phrase(phrase) => Node::Leaf(prepare_leaf(phrase, options, false)),
        Expression::And(children) => {
            Node::And(children.iter().map(|c| prepare(c, options)).collect())
        }
        Expression::Or(children) => Node::Or(children.iter().map(|c| prepare(c, options)).collect()),
        Expression::Not(child) => Node::Not(Box::new(prepare(child, options))),
    }
}

fn prepare_leaf(raw: &str, options: &MatchOptions, allow_wildcard: bool) -> Leaf {
    let normalized = options.normalize(raw);
    let wildcard = allow_wildcard && normalized.contains('*');
    let words = if wildcard {
        tokenize_pattern(&normalized)
    } else {
        tokenize(&normalized)
    };
    Leaf {
        text: normalized.chars().collect(),
        words: words.into_iter().map(|w| w.chars().collect()).collect(),
        wildcard,
    }
}

struct Candidate<'a> {
    chars: &'a [char],
    tokens: &'a [Vec<char>],
    match_word: bool,
}

impl Candidate<'_> {
    fn eval(&self, node: &Node) -> bool {
        match node {
            Node::Leaf(leaf) => self.leaf_matches(leaf),
            Node::And(children) => children.iter().all(|c| self.eval(c)),
            Node::Or(children) => children.iter().any(|c| self.eval(c)),
            Node::Not(child) => !self.eval(child),
        }
    }

    fn leaf_matches(&self, leaf: &Leaf) -> bool {
        if self.match_word && !leaf.words.is_empty() {
            return self.words_match(leaf);
        }
        // Substring mode, or a leaf made only of punctuation.
        if leaf.text.is_empty() {
            return false;
        }
        if leaf.wildcard {
            wildcard_match(&leaf.text, self.chars, false)
        } else {
            contains(self.chars, &leaf.text)
        }
    }

    /// Whether the leaf's words appear as a contiguous run of tokens.
    fn words_match(&self, leaf: &Leaf) -> bool {
        let n = leaf.words.len();
        if n > self.tokens.len() {
            return false;
        }
        self.tokens.windows(n).any(|window| {
            window.iter().zip(&leaf.words).all(|(token, word)| {
                if leaf.wildcard {
                    wildcard_match(word, token, true)
                } else {
                    token == word
                }
            })
        })
    }
}

fn contains(haystack: &[char], needle: &[char]) -> bool {
    needle.len() <= haystack.len() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Match `pattern` against `text`, where `*` stands for any run of word
/// characters. With `whole`, the pattern must span all of `text`; otherwise it
/// may match anywhere inside it.
///
/// Runs the pattern as a set of live positions over `text`, so the cost is
/// `text.len() * pattern.len()` whatever the number of stars.
fn wildcard_match(pattern: &[char], text: &[char], whole: bool) -> bool {
    let end = pattern.len();
    let mut live = vec![false; end + 1];
    let mut next = vec![false; end + 1];
    live[0] = true;
    skip_stars(pattern, &mut live);

    for &c in text {
        if !whole && live[end] {
            return true;
        }
        next.fill(false);
        for (pos, &p) in pattern.iter().enumerate() {
            if !live[pos] {
                continue;
            }
            if p == '*' {
                if is_word_char(c) {
                    next[pos] = true;
                }
            } else if p == c {
                next[pos + 1] = true;
            }
        }
        if !whole {
            next[0] = true;
        }
        skip_stars(pattern, &mut next);
        std::mem::swap(&mut live, &mut next);
    }
    live[end]
}

/// A star may match nothing, so a live star also makes the position after it live.
fn skip_stars(pattern: &[char], live: &mut [bool]) {
    for (pos, &p) in pattern.iter().enumerate() {
        if p == '*' && live[pos] {
            live[pos + 1] = true;
        }
    }
}

#[cfg(test)]
#[path = "matcher_test.rs"]
mod tests;
