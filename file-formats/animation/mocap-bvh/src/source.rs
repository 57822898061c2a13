//! Line-numbered access to the text of a BVH file

use std::io::{self, BufRead};

use crate::error::Result;

/// A single non-blank line of input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 1-based line number in the source
    pub number: usize,
    /// Line content with surrounding whitespace removed
    pub content: String,
}

impl Line {
    /// Whitespace-separated tokens
    pub fn tokens(&self) -> std::str::SplitWhitespace<'_> {
        self.content.split_whitespace()
    }
}

/// Feeds the parser stages one non-blank line at a time
///
/// Wraps any iterator of `io::Result<String>`, such as [`BufRead::lines`].
/// Blank lines are skipped but still counted, so line numbers in errors match
/// the file. I/O errors are passed through unchanged.
pub struct LineSource<I> {
    lines: I,
    line_number: usize,
}

impl<I> LineSource<I>
where
    I: Iterator<Item = io::Result<String>>,
{
    pub fn new(lines: I) -> Self {
        Self {
            lines,
            line_number: 0,
        }
    }

    /// Next non-blank line, or `None` at end of input
    pub fn next_line(&mut self) -> Result<Option<Line>> {
        for line in self.lines.by_ref() {
            let line = line?;
            self.line_number += 1;
            let content = line.trim();
            if content.is_empty() {
                continue;
            }
            return Ok(Some(Line {
                number: self.line_number,
                content: content.to_string(),
            }));
        }
        Ok(None)
    }

    /// Number of physical lines consumed so far
    pub fn line_number(&self) -> usize {
        self.line_number
    }
}

impl<R: BufRead> LineSource<io::Lines<R>> {
    /// Line source over a buffered reader
    pub fn from_reader(reader: R) -> Self {
        Self::new(reader.lines())
    }
}
