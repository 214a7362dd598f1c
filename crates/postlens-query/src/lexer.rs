use crate::error::{QuerySyntaxError, SyntaxErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Word(String),
    Phrase(String),
    And,
    Or,
    Not,
    LParen,
    RParen,
}

impl TokenKind {
    /// Whether this token can open an operand (and so triggers an implicit AND).
    pub(crate) fn starts_operand(&self) -> bool {
        matches!(
            self,
            TokenKind::Word(_) | TokenKind::Phrase(_) | TokenKind::Not | TokenKind::LParen
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    /// Character offset of the token's first character.
    pub pos: usize,
}

fn ends_word(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '"' | '&' | '|')
}

pub(crate) fn lex(query: &str) -> Result<Vec<Token>, QuerySyntaxError> {
    let chars: Vec<char> = query.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let pos = i;
        let kind = match c {
            c if c.is_whitespace() => {
                i += 1;
                continue;
            }
            '(' => {
                i += 1;
                TokenKind::LParen
            }
            ')' => {
                i += 1;
                TokenKind::RParen
            }
            '&' | '|' => {
                i += 1;
                // `&&` and `||` read as a single operator.
                if chars.get(i) == Some(&c) {
                    i += 1;
                }
                if c == '&' {
                    TokenKind::And
                } else {
                    TokenKind::Or
                }
            }
            '!' => {
                i += 1;
                TokenKind::Not
            }
            '"' => {
                let close = chars[i + 1..]
                    .iter()
                    .position(|&ch| ch == '"')
                    .map(|off| i + 1 + off)
                    .ok_or_else(|| {
                        QuerySyntaxError::new(query, pos, SyntaxErrorKind::UnclosedQuote)
                    })?;
                let phrase: String = chars[i + 1..close].iter().collect();
                i = close + 1;
                let phrase = phrase.trim();
                if phrase.is_empty() {
                    return Err(QuerySyntaxError::new(
                        query,
                        pos,
                        SyntaxErrorKind::EmptyPhrase,
                    ));
                }
                TokenKind::Phrase(phrase.to_string())
            }
            _ => {
                let start = i;
                while i < chars.len() && !ends_word(chars[i]) {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                match word.as_str() {
                    "AND" => TokenKind::And,
                    "OR" => TokenKind::Or,
                    "NOT" => TokenKind::Not,
                    _ => TokenKind::Word(word),
                }
            }
        };
        tokens.push(Token { kind, pos });
    }

    Ok(tokens)
}
