//! Streaming ACF tokenizer.
//!
//! The tokenizer is a character-driven state machine with three modes:
//!
//! - **Normal** skips whitespace, emits `{`, `}` and any other bare
//!   character, opens strings on `"` and comments on `//`.
//! - **Comment** ignores everything up to the next `\n`.
//! - **String** collects characters until an unescaped `"`. A `\` takes
//!   the following character literally, whatever it is.
//!
//! All state needed to resume lives in the tokenizer and is updated
//! one character at a time, so the token stream (kinds, values, positions)
//! does not depend on how the input was split across [`Tokenizer::push`]
//! calls. Splits inside multi-byte characters are absorbed by the
//! [`Decoder`]; splits inside escapes, strings, comments, `//` and `\r\n`
//! are absorbed by the look-back flags.
//!
//! # Positions
//!
//! Lines and columns are 1-based and count characters. The column advances
//! once per character in every mode; `\n` (anywhere) then resets it to 0
//! and advances the line, so the next character lands in column 1.
//!
//! # Structure
//!
//! The tokenizer never checks brace balance or key/value arity. That is
//! the parser's job.

use tracing::{debug, trace};

use crate::cursor::ChunkCursor;
use crate::decode::{Decoder, Encoding};
use crate::lex_error::LexError;
use crate::token::{Position, Token, TokenKind};

/// Lexical mode.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Mode {
    #[default]
    Normal,
    Comment,
    /// Inside a string whose opening quote is at `start`.
    String { start: Position },
}

/// Mutable lexing state for one input stream.
#[derive(Clone, Debug)]
struct TokenizerState {
    mode: Mode,
    line: u32,
    /// Column of the last consumed character; 0 at the start of a line.
    column: u32,
    /// Previous Normal-mode character was an unmatched `/`.
    pending_slash: bool,
    /// Previous Normal-mode character was `\r`.
    pending_cr: bool,
    /// Previous string character was an unconsumed `\`.
    pending_backslash: bool,
    /// Contents of the open string so far. Empty outside String mode.
    string_buf: String,
}

impl Default for TokenizerState {
    fn default() -> Self {
        Self {
            mode: Mode::Normal,
            line: 1,
            column: 0,
            pending_slash: false,
            pending_cr: false,
            pending_backslash: false,
            string_buf: String::new(),
        }
    }
}

impl TokenizerState {
    #[inline]
    fn position(&self) -> Position {
        Position::new(self.line, self.column)
    }

    #[inline]
    fn newline(&mut self) {
        self.line = self.line.saturating_add(1);
        self.column = 0;
    }

    #[inline]
    fn bump_column(&mut self) {
        self.column = self.column.saturating_add(1);
    }

    fn advance_columns(&mut self, chars: usize) {
        let chars = u32::try_from(chars).unwrap_or(u32::MAX);
        self.column = self.column.saturating_add(chars);
    }

    /// Switch modes. Look-back memory never crosses a mode boundary.
    fn enter(&mut self, mode: Mode) {
        trace!(from = ?self.mode, to = ?mode, line = self.line, column = self.column, "mode change");
        self.mode = mode;
        self.pending_slash = false;
        self.pending_cr = false;
        self.pending_backslash = false;
    }

    fn lex(&mut self, chunk: &str, out: &mut Vec<Token>) -> Result<(), LexError> {
        let mut cursor = ChunkCursor::new(chunk);
        while !cursor.is_eof() {
            match self.mode {
                Mode::Normal => {
                    let Some(c) = cursor.next_char() else { break };
                    self.bump_column();
                    self.normal_char(c, out)?;
                }
                Mode::Comment => self.comment(&mut cursor),
                Mode::String { start } => self.string(&mut cursor, start, out),
            }
        }
        Ok(())
    }

    fn normal_char(&mut self, c: char, out: &mut Vec<Token>) -> Result<(), LexError> {
        if c == '/' {
            if self.pending_slash {
                self.enter(Mode::Comment);
            } else {
                self.pending_slash = true;
                self.pending_cr = false;
            }
            return Ok(());
        }
        if self.pending_slash {
            return Err(LexError::unexpected_after_slash(c, self.position()));
        }
        if c == '\n' {
            self.pending_cr = false;
            self.newline();
            return Ok(());
        }
        if self.pending_cr {
            return Err(LexError::unexpected_after_carriage_return(
                c,
                self.position(),
            ));
        }

        match c {
            '\r' => self.pending_cr = true,
            '"' => {
                self.string_buf.clear();
                self.enter(Mode::String {
                    start: self.position(),
                });
            }
            '{' => out.push(Token::new(TokenKind::OpenBrace, self.position())),
            '}' => out.push(Token::new(TokenKind::CloseBrace, self.position())),
            c if c.is_whitespace() => {}
            c => out.push(Token::new(TokenKind::Punct(c), self.position())),
        }
        Ok(())
    }

    fn comment(&mut self, cursor: &mut ChunkCursor<'_>) {
        let skipped = cursor.eat_until_newline();
        self.advance_columns(skipped);
        if cursor.next_char().is_some() {
            self.bump_column();
            self.newline();
            self.enter(Mode::Normal);
        }
    }

    fn string(&mut self, cursor: &mut ChunkCursor<'_>, start: Position, out: &mut Vec<Token>) {
        if self.pending_backslash {
            let Some(c) = cursor.next_char() else { return };
            self.bump_column();
            self.pending_backslash = false;
            self.string_buf.push(c);
            if c == '\n' {
                self.newline();
            }
            return;
        }

        let run = cursor.take_string_run();
        self.advance_columns(run.chars().count());
        self.string_buf.push_str(run);

        let Some(c) = cursor.next_char() else { return };
        self.bump_column();
        match c {
            '"' => {
                let value = std::mem::take(&mut self.string_buf);
                out.push(Token::new(TokenKind::String(value), start));
                self.enter(Mode::Normal);
            }
            '\\' => self.pending_backslash = true,
            _ => {
                self.string_buf.push(c);
                self.newline();
            }
        }
    }
}

/// Incremental tokenizer for one ACF document.
///
/// Feed bytes with [`push`](Self::push) (or already-decoded text with
/// [`push_str`](Self::push_str)); each call returns the tokens completed
/// during that call. After the final push, consult
/// [`is_legal_to_end`](Self::is_legal_to_end) or [`finish`](Self::finish)
/// to detect an unterminated string.
///
/// Once a push fails the session is spent and must not be reused.
///
/// ```
/// use acf_lexer::{Tokenizer, TokenKind};
///
/// let mut tokenizer = Tokenizer::new();
/// let mut tokens = tokenizer.push(b"\"AppState\" { \"na", false)?;
/// tokens.extend(tokenizer.push(b"me\" \"x\" }", true)?);
/// tokenizer.finish()?;
///
/// assert_eq!(tokens[0].value(), Some("AppState"));
/// assert_eq!(tokens[1].kind, TokenKind::OpenBrace);
/// assert_eq!(tokens[2].value(), Some("name"));
/// # Ok::<(), acf_lexer::LexError>(())
/// ```
#[derive(Clone, Debug, Default)]
pub struct Tokenizer {
    decoder: Decoder,
    state: TokenizerState,
}

impl Tokenizer {
    /// Tokenizer for UTF-8 input.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_encoding(encoding: Encoding) -> Self {
        Self {
            decoder: Decoder::new(encoding),
            state: TokenizerState::default(),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.decoder.encoding()
    }

    /// Decode and lex the next byte chunk.
    ///
    /// `is_final` must be set on the last chunk (which may be empty); it
    /// makes a dangling partial character an error.
    pub fn push(&mut self, bytes: &[u8], is_final: bool) -> Result<Vec<Token>, LexError> {
        let text = self
            .decoder
            .decode(bytes, is_final)
            .map_err(|err| LexError::decode(err, self.state.position()))?;
        self.push_str(&text)
    }

    /// Lex the next chunk of already-decoded text.
    pub fn push_str(&mut self, chunk: &str) -> Result<Vec<Token>, LexError> {
        let mut out = Vec::new();
        self.state.lex(chunk, &mut out)?;
        debug!(
            chunk_len = chunk.len(),
            tokens = out.len(),
            mode = ?self.state.mode,
            line = self.state.line,
            column = self.state.column,
            "pushed chunk"
        );
        Ok(out)
    }

    /// Returns `false` while inside a string.
    pub fn is_legal_to_end(&self) -> bool {
        !matches!(self.state.mode, Mode::String { .. })
    }

    /// Current cursor position (line, and column of the last character).
    pub fn buffer_progress(&self) -> Position {
        self.state.position()
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Check that the input may end here.
    ///
    /// Turns an open string into [`LexErrorKind::UnterminatedString`]
    /// positioned at [`buffer_progress`](Self::buffer_progress).
    ///
    /// [`LexErrorKind::UnterminatedString`]: crate::LexErrorKind::UnterminatedString
    pub fn finish(&self) -> Result<(), LexError> {
        match self.state.mode {
            Mode::String { start } => Err(LexError::unterminated_string(
                start,
                self.buffer_progress(),
            )),
            Mode::Normal | Mode::Comment => Ok(()),
        }
    }
}

/// Tokenize a complete UTF-8 document in one call.
pub fn tokenize(bytes: &[u8]) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new();
    let tokens = tokenizer.push(bytes, true)?;
    tokenizer.finish()?;
    Ok(tokens)
}
