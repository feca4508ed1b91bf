//! Source file identifiers, spans and line lookup

use serde::{Deserialize, Serialize};
use std::ops::Range;

/// A unique identifier for a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId(pub u32);

impl FileId {
    pub fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A byte offset span in a source file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct Span {
    pub start: u32,
    pub end: u32,
}

impl Span {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A zero-length span at a single offset
    pub fn point(offset: u32) -> Self {
        Self { start: offset, end: offset }
    }

    pub fn range(&self) -> Range<usize> {
        self.start as usize..self.end as usize
    }

    pub fn len(&self) -> u32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A span with associated file
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileSpan {
    pub file: FileId,
    pub span: Span,
}

impl FileSpan {
    pub fn new(file: FileId, span: Span) -> Self {
        Self { file, span }
    }

    pub fn range(&self) -> Range<usize> {
        self.span.range()
    }
}

/// Maps byte offsets of one source file to 1-based line and column numbers.
///
/// Hosts that already track positions line-wise can skip this and put line
/// numbers directly into spans; tools that render `file:line` diagnostics
/// from byte-offset spans build one of these from the file contents.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMap {
    /// Byte offset at which each line starts; `line_starts[0]` is always 0
    line_starts: Vec<u32>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        for (offset, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(offset as u32 + 1);
            }
        }
        Self { line_starts }
    }

    /// Returns the 1-based line number containing `offset`
    pub fn line_number(&self, offset: u32) -> u32 {
        match self.line_starts.binary_search(&offset) {
            Ok(line) => line as u32 + 1,
            Err(next_line) => next_line as u32,
        }
    }

    /// Returns 1-based (line, column) for `offset`
    pub fn line_col(&self, offset: u32) -> (u32, u32) {
        let line = self.line_number(offset);
        let line_start = self.line_starts[line as usize - 1];
        (line, offset - line_start + 1)
    }
}
