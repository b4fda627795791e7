//! Cursor over one decoded chunk.
//!
//! The tokenizer walks each chunk with a [`ChunkCursor`]. Besides single
//! character steps, the cursor offers two bulk scans backed by `memchr`:
//! skipping a comment body up to the next `\n`, and taking a run of plain
//! string content up to the next `"`, `\`, or `\n`. All three delimiters
//! are ASCII, so every position memchr reports is a character boundary.

#[derive(Clone, Copy, Debug)]
pub(crate) struct ChunkCursor<'a> {
    text: &'a str,
    /// Byte offset of the next unread character.
    pos: usize,
}

impl<'a> ChunkCursor<'a> {
    pub(crate) fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    #[inline]
    pub(crate) fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Consume and return the next character.
    #[inline]
    pub(crate) fn next_char(&mut self) -> Option<char> {
        let c = self.text[self.pos..].chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Advance to the next `\n` (not consumed) or the end of the chunk.
    ///
    /// Returns the number of characters skipped.
    pub(crate) fn eat_until_newline(&mut self) -> usize {
        let remaining = &self.text.as_bytes()[self.pos..];
        let len = memchr::memchr(b'\n', remaining).unwrap_or(remaining.len());
        let skipped = &self.text[self.pos..self.pos + len];
        self.pos += len;
        skipped.chars().count()
    }

    /// Take plain string content up to the next `"`, `\`, or `\n` (not
    /// consumed) or the end of the chunk.
    pub(crate) fn take_string_run(&mut self) -> &'a str {
        let remaining = &self.text.as_bytes()[self.pos..];
        let len = memchr::memchr3(b'"', b'\\', b'\n', remaining).unwrap_or(remaining.len());
        let run = &self.text[self.pos..self.pos + len];
        self.pos += len;
        run
    }
}
