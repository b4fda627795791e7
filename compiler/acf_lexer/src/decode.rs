//! Incremental byte-to-text decoding.
//!
//! Callers hand the tokenizer raw byte chunks that may end anywhere,
//! including in the middle of a multi-byte character. The [`Decoder`]
//! holds back an incomplete trailing sequence until the next chunk
//! completes it, so the tokenizer only ever sees whole characters.
//!
//! # Encodings
//!
//! - [`Encoding::Utf8`]: 1-4 byte sequences. Chunks that need no
//!   reassembly are returned borrowed.
//! - [`Encoding::Utf16Le`]: 2-byte code units. An odd trailing byte and a
//!   trailing high surrogate are held back.
//! - [`Encoding::Latin1`]: one byte per character; never buffers, never
//!   fails.
//!
//! A byte order mark is not stripped; it reaches the tokenizer as U+FEFF.
//!
//! Malformed input is an error ([`DecodeError::InvalidSequence`]), never
//! replaced with U+FFFD, so string values always match the bytes on disk.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Text encoding of the incoming byte stream.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum Encoding {
    #[default]
    Utf8,
    Utf16Le,
    Latin1,
}

impl Encoding {
    /// Canonical label, as accepted by [`FromStr`].
    pub fn label(self) -> &'static str {
        match self {
            Encoding::Utf8 => "utf-8",
            Encoding::Utf16Le => "utf-16le",
            Encoding::Latin1 => "latin1",
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned by `Encoding::from_str` for a label no decoder handles.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown encoding `{0}`")]
pub struct UnknownEncoding(pub String);

impl FromStr for Encoding {
    type Err = UnknownEncoding;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        match label.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Encoding::Utf8),
            "utf-16le" | "utf16le" | "ucs2" | "ucs-2" => Ok(Encoding::Utf16Le),
            "latin1" | "binary" | "iso-8859-1" => Ok(Encoding::Latin1),
            _ => Err(UnknownEncoding(label.to_owned())),
        }
    }
}

/// Decoding failure. Offsets are absolute byte offsets in the stream.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum DecodeError {
    #[error("invalid {encoding} sequence at byte offset {offset}")]
    InvalidSequence { encoding: Encoding, offset: u64 },
    #[error("input ended inside a {encoding} sequence ({pending} byte(s) pending)")]
    Incomplete { encoding: Encoding, pending: usize },
}

/// Streaming decoder for one input stream.
#[derive(Clone, Debug, Default)]
pub struct Decoder {
    encoding: Encoding,
    /// Bytes of an incomplete sequence carried over from the previous chunk.
    pending: Vec<u8>,
    /// Total bytes received so far, including `pending`.
    received: u64,
}

impl Decoder {
    pub fn new(encoding: Encoding) -> Self {
        Self {
            encoding,
            pending: Vec::new(),
            received: 0,
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Returns `true` while an incomplete sequence is held back.
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Decode the next chunk.
    ///
    /// With `is_final` set, a held-back incomplete sequence is an error
    /// instead of being carried into a later call.
    pub fn decode<'a>(
        &mut self,
        bytes: &'a [u8],
        is_final: bool,
    ) -> Result<Cow<'a, str>, DecodeError> {
        // Stream offset of the first pending byte (or of `bytes[0]`).
        let base = self.received - self.pending.len() as u64;
        self.received += bytes.len() as u64;
        match self.encoding {
            Encoding::Utf8 => self.decode_utf8(bytes, base, is_final),
            Encoding::Utf16Le => self.decode_utf16le(bytes, base, is_final),
            Encoding::Latin1 => Ok(Cow::Owned(bytes.iter().map(|&b| char::from(b)).collect())),
        }
    }

    fn decode_utf8<'a>(
        &mut self,
        bytes: &'a [u8],
        base: u64,
        is_final: bool,
    ) -> Result<Cow<'a, str>, DecodeError> {
        let mut head = String::new();
        let mut rest = bytes;

        if !self.pending.is_empty() {
            let width = utf8_char_width(self.pending[0]);
            let take = width.saturating_sub(self.pending.len()).min(rest.len());
            self.pending.extend_from_slice(&rest[..take]);
            rest = &rest[take..];
            match std::str::from_utf8(&self.pending) {
                Ok(s) => {
                    head.push_str(s);
                    self.pending.clear();
                }
                Err(err) if err.error_len().is_some() => {
                    return Err(self.invalid(base + err.valid_up_to() as u64));
                }
                Err(_) => {
                    // Still short; `rest` is necessarily empty here.
                    return if is_final {
                        Err(self.incomplete())
                    } else {
                        Ok(Cow::Borrowed(""))
                    };
                }
            }
        }

        let rest_base = base + head.len() as u64;
        let valid_len = match std::str::from_utf8(rest) {
            Ok(_) => rest.len(),
            Err(err) if err.error_len().is_some() => {
                return Err(self.invalid(rest_base + err.valid_up_to() as u64));
            }
            Err(err) => err.valid_up_to(),
        };
        let (valid, tail) = rest.split_at(valid_len);
        let valid = std::str::from_utf8(valid)
            .map_err(|err| self.invalid(rest_base + err.valid_up_to() as u64))?;

        if !tail.is_empty() {
            self.pending.extend_from_slice(tail);
            if is_final {
                return Err(self.incomplete());
            }
        }

        if head.is_empty() {
            Ok(Cow::Borrowed(valid))
        } else {
            head.push_str(valid);
            Ok(Cow::Owned(head))
        }
    }

    fn decode_utf16le(
        &mut self,
        bytes: &[u8],
        base: u64,
        is_final: bool,
    ) -> Result<Cow<'static, str>, DecodeError> {
        let mut data = std::mem::take(&mut self.pending);
        data.extend_from_slice(bytes);

        let whole = data.len() / 2 * 2;
        let mut units: Vec<u16> = data[..whole]
            .chunks_exact(2)
            .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
            .collect();
        let mut keep = data.len() - whole;
        if units.last().is_some_and(|unit| is_high_surrogate(*unit)) {
            units.pop();
            keep += 2;
        }

        let mut out = String::with_capacity(units.len());
        let mut unit_index = 0u64;
        for decoded in char::decode_utf16(units.iter().copied()) {
            match decoded {
                Ok(c) => {
                    unit_index += c.len_utf16() as u64;
                    out.push(c);
                }
                Err(_) => return Err(self.invalid(base + unit_index * 2)),
            }
        }

        self.pending = data[data.len() - keep..].to_vec();
        if is_final && !self.pending.is_empty() {
            return Err(self.incomplete());
        }
        Ok(Cow::Owned(out))
    }

    #[cold]
    fn invalid(&self, offset: u64) -> DecodeError {
        DecodeError::InvalidSequence {
            encoding: self.encoding,
            offset,
        }
    }

    #[cold]
    fn incomplete(&self) -> DecodeError {
        DecodeError::Incomplete {
            encoding: self.encoding,
            pending: self.pending.len(),
        }
    }
}

/// Sequence length implied by a UTF-8 leading byte.
fn utf8_char_width(byte: u8) -> usize {
    match byte {
        0xC0..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF7 => 4,
        _ => 1,
    }
}

fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}
