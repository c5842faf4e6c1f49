//! Indentation-tracking line writer

use std::fmt;
use std::io::{self, Write};

use super::DECLARATION;

/// Writes tab-indented lines to a sink.
///
/// The depth only changes inside [`XmlWriter::nested`], so every indent is
/// matched by an outdent, including when the body returns an error.
pub struct XmlWriter<W: Write> {
    inner: W,
    depth: usize,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(inner: W) -> Self {
        Self { inner, depth: 0 }
    }

    /// Current nesting depth
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Write the document declaration line
    pub fn declaration(&mut self) -> io::Result<()> {
        writeln!(self.inner, "{}", DECLARATION)
    }

    /// Write one indented line
    pub fn line(&mut self, args: fmt::Arguments<'_>) -> io::Result<()> {
        for _ in 0..self.depth {
            self.inner.write_all(b"\t")?;
        }
        self.inner.write_fmt(args)?;
        self.inner.write_all(b"\n")
    }

    /// Write an empty line (never indented)
    pub fn blank(&mut self) -> io::Result<()> {
        self.inner.write_all(b"\n")
    }

    /// Run `body` one level deeper
    pub fn nested<T, E>(&mut self, body: impl FnOnce(&mut Self) -> Result<T, E>) -> Result<T, E> {
        self.depth += 1;
        let result = body(self);
        self.depth -= 1;
        result
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    pub fn into_inner(self) -> W {
        self.inner
    }
}
