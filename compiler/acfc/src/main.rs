//! `acf-lex`: tokenize an ACF file and print the token stream.
//!
//! The file is fed to the tokenizer in fixed-size byte chunks, the same
//! way a streaming reader would.

mod args;
mod report;

use std::process::ExitCode;

use acf_lexer::{Encoding, LexError, Token, Tokenizer};
use tracing::debug;

use crate::args::{parse_args, print_usage};

fn main() -> ExitCode {
    init_tracing();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let options = match parse_args(&argv) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("error: {message}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    let source = match std::fs::read(&options.path) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read '{}': {err}", options.path);
            return ExitCode::FAILURE;
        }
    };

    match lex_chunked(&source, options.chunk_size, options.encoding) {
        Ok(tokens) => {
            if !options.quiet {
                println!("Tokens for '{}' ({} tokens):", options.path, tokens.len());
                for tok in &tokens {
                    println!("  {tok}");
                }
            }
            ExitCode::SUCCESS
        }
        Err(err) => {
            report::emit(&options.path, &source, options.encoding, &err);
            ExitCode::FAILURE
        }
    }
}

/// Feed `source` in pieces of `chunk_size` bytes (0 = all at once).
fn lex_chunked(source: &[u8], chunk_size: usize, encoding: Encoding) -> Result<Vec<Token>, LexError> {
    let size = if chunk_size == 0 {
        source.len().max(1)
    } else {
        chunk_size
    };
    let mut tokenizer = Tokenizer::with_encoding(encoding);
    let mut tokens = Vec::new();
    for chunk in source.chunks(size) {
        tokens.extend(tokenizer.push(chunk, false)?);
    }
    tokens.extend(tokenizer.push(&[], true)?);
    tokenizer.finish()?;
    debug!(bytes = source.len(), chunk_size = size, tokens = tokens.len(), "lexed file");
    Ok(tokens)
}

/// Install a stderr subscriber when `RUST_LOG` is set.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .with(EnvFilter::from_default_env())
            .init();
    }
}
