//! Pull-based line input for the interpreter.
//!
//! The core only ever asks "give me the next line"; whether that line
//! comes from a file, a pipe, an in-memory string, or a list of strings
//! is the supplier's business.

use std::collections::VecDeque;
use std::fs::File;
use std::io::{self, BufRead, BufReader, Cursor};
use std::path::Path;

/// A pull-based supplier of input lines.
///
/// `next_line` returns `Ok(None)` once the input is exhausted. Returned
/// lines carry no trailing newline.
pub trait LineSupplier {
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// A supplier over any buffered reader (file, pipe, in-memory cursor).
pub struct ReadSource<R: BufRead> {
    inner: R,
}

impl<R: BufRead> ReadSource<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }
}

impl ReadSource<BufReader<File>> {
    /// Open a script file as a line supplier.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        Ok(Self::new(BufReader::new(File::open(path)?)))
    }
}

impl ReadSource<Cursor<String>> {
    /// A supplier over a string of source text.
    pub fn from_str(text: &str) -> Self {
        Self::new(Cursor::new(text.to_string()))
    }
}

impl<R: BufRead> LineSupplier for ReadSource<R> {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.inner.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if line.ends_with('\n') {
            line.pop();
            if line.ends_with('\r') {
                line.pop();
            }
        }
        Ok(Some(line))
    }
}

/// A supplier over an in-memory list of lines.
pub struct StringListSource {
    lines: VecDeque<String>,
}

impl StringListSource {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSupplier for StringListSource {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        Ok(self.lines.pop_front())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_source_strips_line_endings() {
        let mut src = ReadSource::from_str("one\r\ntwo\nthree");
        assert_eq!(src.next_line().unwrap().as_deref(), Some("one"));
        assert_eq!(src.next_line().unwrap().as_deref(), Some("two"));
        assert_eq!(src.next_line().unwrap().as_deref(), Some("three"));
        assert_eq!(src.next_line().unwrap(), None);
    }

    #[test]
    fn test_read_source_keeps_empty_lines() {
        let mut src = ReadSource::from_str("a\n\nb\n");
        assert_eq!(src.next_line().unwrap().as_deref(), Some("a"));
        assert_eq!(src.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(src.next_line().unwrap().as_deref(), Some("b"));
        assert_eq!(src.next_line().unwrap(), None);
    }

    #[test]
    fn test_string_list_source() {
        let mut src = StringListSource::new(["puts 'hi'", "", "get_coords"]);
        assert_eq!(src.next_line().unwrap().as_deref(), Some("puts 'hi'"));
        assert_eq!(src.next_line().unwrap().as_deref(), Some(""));
        assert_eq!(src.next_line().unwrap().as_deref(), Some("get_coords"));
        assert_eq!(src.next_line().unwrap(), None);
    }
}
