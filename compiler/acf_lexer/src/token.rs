//! Token model emitted by the [`Tokenizer`](crate::Tokenizer).
//!
//! Only braces and strings carry structure. Any other non-whitespace
//! character seen outside a string or comment is passed through as a
//! [`TokenKind::Punct`] so the parser layer can decide what to do with it.

use std::fmt;

/// A 1-based source position.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// What a token is.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TokenKind {
    /// `{`
    OpenBrace,
    /// `}`
    CloseBrace,
    /// A quoted string, already unescaped.
    String(String),
    /// Any other bare non-whitespace character.
    Punct(char),
}

impl TokenKind {
    /// Returns `true` for the kinds the ACF grammar is built from.
    pub fn is_structural(&self) -> bool {
        !matches!(self, TokenKind::Punct(_))
    }
}

/// A classified, positioned unit of lexical output.
///
/// `pos` is the position of the token's first source character; for a
/// string that is the opening quote.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Token {
    pub kind: TokenKind,
    pub pos: Position,
}

impl Token {
    pub fn new(kind: TokenKind, pos: Position) -> Self {
        Self { kind, pos }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.pos.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.pos.column
    }

    /// String contents, for string tokens only.
    pub fn value(&self) -> Option<&str> {
        match &self.kind {
            TokenKind::String(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::OpenBrace => f.write_str("{"),
            TokenKind::CloseBrace => f.write_str("}"),
            TokenKind::String(value) => {
                f.write_str("\"")?;
                for c in value.chars() {
                    if c == '"' || c == '\\' {
                        f.write_str("\\")?;
                    }
                    write!(f, "{c}")?;
                }
                f.write_str("\"")
            }
            TokenKind::Punct(c) => write!(f, "{c}"),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ {}", self.kind, self.pos)
    }
}
