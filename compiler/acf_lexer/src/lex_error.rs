//! Lexical errors.
//!
//! Every error carries the position of the character that triggered it.
//! After an error the tokenizer session is spent; callers start a new
//! [`Tokenizer`](crate::Tokenizer) for fresh input.

use std::fmt;

use crate::decode::DecodeError;
use crate::token::Position;

/// A lexical error with the 1-based position it was observed at.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{kind} at {pos}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub pos: Position,
}

/// What went wrong.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    /// A `/` outside a string not followed by a second `/`.
    #[error("Unexpected character after /: {}", Readable(*found))]
    UnexpectedAfterSlash { found: char },
    /// A `\r` outside a string not followed by `\n`.
    #[error("Unexpected character after \\r: {}", Readable(*found))]
    UnexpectedAfterCarriageReturn { found: char },
    /// Input ended inside a string that opened at `start`.
    #[error("Unterminated string starting at {start}")]
    UnterminatedString { start: Position },
    /// The byte stream could not be decoded.
    #[error(transparent)]
    Decode(DecodeError),
}

impl LexError {
    #[cold]
    pub fn unexpected_after_slash(found: char, pos: Position) -> Self {
        Self {
            kind: LexErrorKind::UnexpectedAfterSlash { found },
            pos,
        }
    }

    #[cold]
    pub fn unexpected_after_carriage_return(found: char, pos: Position) -> Self {
        Self {
            kind: LexErrorKind::UnexpectedAfterCarriageReturn { found },
            pos,
        }
    }

    #[cold]
    pub fn unterminated_string(start: Position, pos: Position) -> Self {
        Self {
            kind: LexErrorKind::UnterminatedString { start },
            pos,
        }
    }

    #[cold]
    pub fn decode(err: DecodeError, pos: Position) -> Self {
        Self {
            kind: LexErrorKind::Decode(err),
            pos,
        }
    }

    /// The message without the position suffix.
    pub fn message(&self) -> String {
        self.kind.to_string()
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.pos.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.pos.column
    }
}

/// Renders control characters as backslash escapes.
struct Readable(char);

impl fmt::Display for Readable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            '\0' => f.write_str("\\0"),
            '\n' => f.write_str("\\n"),
            '\r' => f.write_str("\\r"),
            '\t' => f.write_str("\\t"),
            '\u{0B}' => f.write_str("\\v"),
            '\u{08}' => f.write_str("\\b"),
            '\u{0C}' => f.write_str("\\f"),
            c => write!(f, "{c}"),
        }
    }
}
