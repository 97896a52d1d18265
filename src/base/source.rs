//! Source file representation with a precomputed line index.
//!
//! All byte offsets are 0-based and count UTF-8 bytes. Lines and columns are
//! 1-based. Ranges are half-open `[start, end)`.

use text_size::{TextRange, TextSize};

/// A 1-based line/column position in a source file.
///
/// `col` counts bytes from the start of the line, so a tab advances the
/// column by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineCol {
    pub line: u32,
    pub col: u32,
}

/// The sentinel range used for elements with no meaningful source location,
/// such as built-in symbols.
pub fn invalid_range() -> TextRange {
    TextRange::empty(TextSize::new(u32::MAX))
}

/// True if `range` is a real source range rather than the invalid sentinel.
pub fn is_valid_range(range: TextRange) -> bool {
    range != invalid_range()
}

/// An in-memory source file, immutable for the duration of a session.
///
/// The content is owned by the caller and may outlive or be dropped
/// independently of the session arena.
#[derive(Debug, Clone)]
pub struct SourceFile {
    path: String,
    text: String,
    /// Byte offset of the start of each line. Always contains offset 0.
    line_starts: Vec<TextSize>,
}

impl SourceFile {
    pub fn new(path: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let mut line_starts = vec![TextSize::new(0)];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(offset as u32 + 1));
            }
        }
        Self {
            path: path.into(),
            text,
            line_starts,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn len(&self) -> TextSize {
        TextSize::of(self.text.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of lines, counting the final line even when unterminated.
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Convert a byte offset into a 1-based line/column pair.
    ///
    /// Offsets past the end of the file clamp to the last position.
    pub fn line_col(&self, offset: TextSize) -> LineCol {
        let offset = offset.min(self.len());
        let line_idx = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let col = u32::from(offset) - u32::from(self.line_starts[line_idx]);
        LineCol {
            line: line_idx as u32 + 1,
            col: col + 1,
        }
    }

    /// The text of a 1-based line, without its trailing newline.
    pub fn line_text(&self, line: u32) -> &str {
        let idx = (line.saturating_sub(1)) as usize;
        if idx >= self.line_starts.len() {
            return "";
        }
        let start = u32::from(self.line_starts[idx]) as usize;
        let end = self
            .line_starts
            .get(idx + 1)
            .map(|&s| u32::from(s) as usize)
            .unwrap_or(self.text.len());
        self.text[start..end].trim_end_matches(['\n', '\r'])
    }

    /// Slice the source by a byte range.
    pub fn slice(&self, range: TextRange) -> &str {
        &self.text[range]
    }
}
