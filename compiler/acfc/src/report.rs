//! Error rendering.
//!
//! UTF-8 sources get a source-annotated report; other encodings fall back
//! to a one-line `path:line:column: error: message`.

use acf_lexer::{Encoding, LexError, LexErrorKind, Position};
use ariadne::{Label, Report, ReportKind, Source};

pub fn emit(path: &str, source: &[u8], encoding: Encoding, err: &LexError) {
    if encoding == Encoding::Utf8 {
        let text = String::from_utf8_lossy(source).into_owned();
        if render(path, text, err).is_ok() {
            return;
        }
    }
    eprintln!("{path}:{}: error: {}", err.pos, err.message());
}

fn render(path: &str, text: String, err: &LexError) -> std::io::Result<()> {
    let (anchor, label) = match &err.kind {
        LexErrorKind::UnterminatedString { start } => {
            (*start, "this string is never closed".to_string())
        }
        LexErrorKind::UnexpectedAfterSlash { .. } => {
            (err.pos, "comments start with `//`".to_string())
        }
        LexErrorKind::UnexpectedAfterCarriageReturn { .. } => {
            (err.pos, "`\\r` must be followed by `\\n`".to_string())
        }
        LexErrorKind::Decode(_) => (err.pos, "decoding stopped here".to_string()),
    };

    let total = text.chars().count();
    let offset = char_offset(&text, anchor);
    let span = offset..(offset + 1).min(total);

    Report::build(ReportKind::Error, (), offset)
        .with_message(format!("{path}: {}", err.message()))
        .with_label(Label::new(span).with_message(label))
        .finish()
        .eprint(Source::from(text))
}

/// Character offset of a tokenizer position (column 0 maps to the start
/// of the line).
pub(crate) fn char_offset(text: &str, pos: Position) -> usize {
    let mut offset = 0;
    for (index, line) in text.split('\n').enumerate() {
        let width = line.chars().count();
        if index + 1 == pos.line as usize {
            return offset + (pos.column.saturating_sub(1) as usize).min(width);
        }
        offset += width + 1;
    }
    offset.saturating_sub(1)
}
