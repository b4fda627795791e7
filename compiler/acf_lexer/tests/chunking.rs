//! Property-based tests for chunked input.
//!
//! Random ACF documents are rendered alongside the tokens (with positions)
//! they must produce. Each document is then fed to the tokenizer split in
//! different ways and with both `\n` and `\r\n` line endings; every
//! combination must yield exactly the expected token stream.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]
#![allow(
    clippy::disallowed_types,
    clippy::cast_possible_truncation,
    reason = "Proptest macros generate code with these patterns"
)]

use acf_lexer::{LexError, Position, Token, TokenKind, Tokenizer};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use proptest::sample::Index;

// -- Document model --

#[derive(Clone, Debug)]
struct Entry {
    key: String,
    value: Value,
    comment: Option<String>,
}

#[derive(Clone, Debug)]
enum Value {
    Text(String),
    Block(Vec<Entry>),
}

// -- Strategies --

/// String contents: printable ASCII (including `"` and `\`) plus a few
/// multi-byte characters so byte splits land inside them.
fn text_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[ -~éß☃\u{1F600}]{0,12}").expect("valid regex")
}

/// Comment bodies: anything but a newline.
fn comment_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[^\n]{0,16}").expect("valid regex")
}

fn entry_strategy(value: impl Strategy<Value = Value>) -> impl Strategy<Value = Entry> {
    (
        text_strategy(),
        value,
        proptest::option::of(comment_strategy()),
    )
        .prop_map(|(key, value, comment)| Entry {
            key,
            value,
            comment,
        })
}

fn value_strategy() -> impl Strategy<Value = Value> {
    text_strategy()
        .prop_map(Value::Text)
        .prop_recursive(3, 32, 4, |inner| {
            proptest::collection::vec(entry_strategy(inner), 0..4).prop_map(Value::Block)
        })
}

fn document_strategy() -> impl Strategy<Value = Vec<Entry>> {
    proptest::collection::vec(entry_strategy(value_strategy()), 1..4)
}

// -- Rendering --

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        if c == '"' || c == '\\' {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Renders a document line by line, recording the token expected at each
/// position as it goes.
#[derive(Default)]
struct Render {
    lines: Vec<String>,
    current: String,
    line: u32,
    column: u32,
    expected: Vec<Token>,
}

impl Render {
    fn new() -> Self {
        Self {
            line: 1,
            ..Self::default()
        }
    }

    fn write(&mut self, text: &str) {
        self.current.push_str(text);
        self.column += text.chars().count() as u32;
    }

    fn token(&mut self, kind: TokenKind, text: &str) {
        self.expected
            .push(Token::new(kind, Position::new(self.line, self.column + 1)));
        self.write(text);
    }

    fn string(&mut self, value: &str) {
        self.token(
            TokenKind::String(value.to_owned()),
            &format!("\"{}\"", escape(value)),
        );
    }

    fn end_line(&mut self, comment: Option<&str>) {
        if let Some(comment) = comment {
            self.write(" //");
            self.write(comment);
        }
        self.lines.push(std::mem::take(&mut self.current));
        self.line += 1;
        self.column = 0;
    }

    fn entries(&mut self, entries: &[Entry], depth: usize) {
        let indent = "\t".repeat(depth);
        for entry in entries {
            self.write(&indent);
            self.string(&entry.key);
            match &entry.value {
                Value::Text(value) => {
                    self.write(" ");
                    self.string(value);
                    self.end_line(entry.comment.as_deref());
                }
                Value::Block(children) => {
                    self.end_line(entry.comment.as_deref());
                    self.write(&indent);
                    self.token(TokenKind::OpenBrace, "{");
                    self.end_line(None);
                    self.entries(children, depth + 1);
                    self.write(&indent);
                    self.token(TokenKind::CloseBrace, "}");
                    self.end_line(None);
                }
            }
        }
    }
}

/// Render `document` with the given line ending.
fn render(document: &[Entry], eol: &str) -> (String, Vec<Token>) {
    let mut render = Render::new();
    render.entries(document, 0);
    (render.lines.join(eol), render.expected)
}

// -- Feeding --

/// Feed `bytes` in pieces of `size` (0 = whole input at once), then a final
/// empty push.
fn feed_sized(bytes: &[u8], size: usize) -> Result<Vec<Token>, LexError> {
    let size = if size == 0 { bytes.len().max(1) } else { size };
    let pieces: Vec<&[u8]> = bytes.chunks(size).collect();
    feed(&pieces)
}

fn feed(pieces: &[&[u8]]) -> Result<Vec<Token>, LexError> {
    let mut tokenizer = Tokenizer::new();
    let mut tokens = Vec::new();
    for piece in pieces {
        tokens.extend(tokenizer.push(piece, false)?);
    }
    tokens.extend(tokenizer.push(&[], true)?);
    tokenizer.finish()?;
    Ok(tokens)
}

/// Split `bytes` at the given cut points.
fn split_at_points<'a>(bytes: &'a [u8], cuts: &[Index]) -> Vec<&'a [u8]> {
    let mut points: Vec<usize> = cuts.iter().map(|i| i.index(bytes.len() + 1)).collect();
    points.sort_unstable();
    points.dedup();
    let mut pieces = Vec::new();
    let mut start = 0;
    for point in points {
        pieces.push(&bytes[start..point]);
        start = point;
    }
    pieces.push(&bytes[start..]);
    pieces
}

// -- Properties --

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn chunk_size_does_not_change_tokens(document in document_strategy()) {
        let (source, expected) = render(&document, "\n");
        prop_assert_eq!(&acf_lexer::tokenize(source.as_bytes()).unwrap(), &expected);
        for size in [1, 16, 32, 64, 0] {
            let tokens = feed_sized(source.as_bytes(), size).unwrap();
            prop_assert_eq!(&tokens, &expected, "chunk size {}", size);
        }
    }

    #[test]
    fn arbitrary_split_points_do_not_change_tokens(
        document in document_strategy(),
        cuts in proptest::collection::vec(any::<Index>(), 0..12),
    ) {
        let (source, expected) = render(&document, "\n");
        let pieces = split_at_points(source.as_bytes(), &cuts);
        prop_assert_eq!(feed(&pieces).unwrap(), expected);
    }

    #[test]
    fn crlf_and_lf_documents_agree(document in document_strategy()) {
        let (unix, expected) = render(&document, "\n");
        let (windows, _) = render(&document, "\r\n");
        for size in [1, 16, 32, 64, 0] {
            prop_assert_eq!(&feed_sized(unix.as_bytes(), size).unwrap(), &expected);
            prop_assert_eq!(&feed_sized(windows.as_bytes(), size).unwrap(), &expected);
        }
    }

    #[test]
    fn escaped_strings_round_trip(value in any::<String>()) {
        let source = format!("\"{}\"", escape(&value));
        let tokens = feed_sized(source.as_bytes(), 0).unwrap();
        prop_assert_eq!(tokens.len(), 1);
        prop_assert_eq!(tokens[0].value(), Some(value.as_str()));
    }

    #[test]
    fn comments_are_elided(comment in comment_strategy()) {
        let source = format!("\"a\" //{comment}\n\"b\" {{");
        let tokens = feed_sized(source.as_bytes(), 1).unwrap();
        prop_assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::String("a".into()), Position::new(1, 1)),
                Token::new(TokenKind::String("b".into()), Position::new(2, 1)),
                Token::new(TokenKind::OpenBrace, Position::new(2, 5)),
            ]
        );
    }

    /// Errors (and their positions) are also independent of chunking.
    #[test]
    fn outcome_is_split_independent(
        source in prop::string::string_regex("[/\r\n\"\\\\{}a ]{0,24}").expect("valid regex"),
        cuts in proptest::collection::vec(any::<Index>(), 0..6),
    ) {
        let whole = feed_sized(source.as_bytes(), 0);
        let bytewise = feed_sized(source.as_bytes(), 1);
        let split = feed(&split_at_points(source.as_bytes(), &cuts));
        prop_assert_eq!(&whole, &bytewise);
        prop_assert_eq!(&whole, &split);
    }
}

#[test]
fn generated_document_shape() {
    let document = vec![Entry {
        key: "AppState".into(),
        value: Value::Block(vec![Entry {
            key: "name".into(),
            value: Value::Text("Team \"Fortress\"".into()),
            comment: Some(" the name".into()),
        }]),
        comment: None,
    }];
    let (source, expected) = render(&document, "\n");
    assert_eq!(
        source,
        "\"AppState\"\n{\n\t\"name\" \"Team \\\"Fortress\\\"\" // the name\n}"
    );
    assert_eq!(feed_sized(source.as_bytes(), 3).unwrap(), expected);
    assert_eq!(
        expected.iter().map(|t| t.pos).collect::<Vec<_>>(),
        vec![
            Position::new(1, 1),
            Position::new(2, 1),
            Position::new(3, 2),
            Position::new(3, 9),
            Position::new(4, 1),
        ]
    );
}
