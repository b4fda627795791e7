//! Command-line options.

use acf_lexer::Encoding;

/// Bytes per push when `--chunk-size` is not given.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Options {
    pub path: String,
    /// Bytes per push; 0 feeds the whole file at once.
    pub chunk_size: usize,
    pub encoding: Encoding,
    /// Only report errors.
    pub quiet: bool,
}

/// Parse the arguments after the program name.
pub fn parse_args(args: &[String]) -> Result<Options, String> {
    let mut path = None;
    let mut chunk_size = DEFAULT_CHUNK_SIZE;
    let mut encoding = Encoding::default();
    let mut quiet = false;

    for arg in args {
        if let Some(size) = arg.strip_prefix("--chunk-size=") {
            chunk_size = size
                .parse()
                .map_err(|_| format!("invalid chunk size `{size}`"))?;
        } else if let Some(label) = arg.strip_prefix("--encoding=") {
            encoding = label.parse().map_err(|err| format!("{err}"))?;
        } else if arg == "--quiet" || arg == "-q" {
            quiet = true;
        } else if arg.starts_with('-') {
            return Err(format!("unknown option `{arg}`"));
        } else if path.is_none() {
            path = Some(arg.clone());
        } else {
            return Err(format!("unexpected argument `{arg}`"));
        }
    }

    let path = path.ok_or_else(|| "missing file path".to_string())?;
    Ok(Options {
        path,
        chunk_size,
        encoding,
        quiet,
    })
}

pub fn print_usage() {
    eprintln!("Usage: acf-lex <file.acf> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --chunk-size=<n>    Bytes per push (default {DEFAULT_CHUNK_SIZE}, 0 = whole file)");
    eprintln!("  --encoding=<label>  utf-8 (default), utf-16le, latin1");
    eprintln!("  -q, --quiet         Only report errors");
    eprintln!();
    eprintln!("Set RUST_LOG (e.g. RUST_LOG=acf_lexer=trace) for tokenizer tracing.");
}
