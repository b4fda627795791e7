//! Streaming tokenizer for ACF documents.
//!
//! ACF is a tree of key/value pairs where a value is either a quoted
//! string or a brace-delimited block of further pairs:
//!
//! ```text
//! "AppState"
//! {
//!     "appid"   "440"   // trailing comments run to end of line
//!     "Mounted" { "depot" "441" }
//! }
//! ```
//!
//! This crate turns such text into a flat stream of positioned tokens
//! (`{`, `}`, strings). Input may arrive in byte chunks of any size,
//! split anywhere; the output is identical to lexing the whole document
//! at once. Building the tree is left to the caller.
//!
//! Pipeline: bytes -> [`Decoder`] -> characters -> [`Tokenizer`] -> [`Token`]s.

mod cursor;
mod decode;
mod lex_error;
mod token;
mod tokenizer;

pub use decode::{DecodeError, Decoder, Encoding, UnknownEncoding};
pub use lex_error::{LexError, LexErrorKind};
pub use token::{Position, Token, TokenKind};
pub use tokenizer::{tokenize, Mode, Tokenizer};
