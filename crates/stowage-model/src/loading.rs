// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Text loader for bin packing instances.
//!
//! The canonical format is one number per line: the bin capacity first,
//! then one item size per line. The scanner is more forgiving than that.
//! Tokens may be separated by any whitespace or by commas, so CSV rows load
//! as well, and `#` starts a comment that runs to the end of the line.
//!
//! ```raw
//! # capacity
//! 10
//! # sizes
//! 9, 8, 2
//! 7 6 5
//! ```
//!
//! When the capacity is known from elsewhere, `InstanceLoader::capacity`
//! switches the loader to a sizes-only format.

use crate::instance::{Instance, InvalidInstance};
use std::{
    fs::File,
    io::{BufRead, BufReader, Read},
    path::Path,
    str::FromStr,
};
use stowage_core::num::PackingNumeric;
use thiserror::Error;

/// Details about a token that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("could not parse token '{token}' on line {line} as type {type_name}")]
pub struct ParseTokenError {
    /// The offending token.
    pub token: String,
    /// The 1-based line the token was found on.
    pub line: usize,
    /// The name of the target type, e.g. `i64`.
    pub type_name: &'static str,
}

/// The error type of the loading process.
#[derive(Debug, Error)]
pub enum InstanceLoaderError<T>
where
    T: std::fmt::Debug + std::fmt::Display,
{
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("input contains no bin capacity")]
    MissingCapacity,
    #[error("parse error: {0}")]
    Parse(#[from] ParseTokenError),
    #[error("invalid instance: {0}")]
    Invalid(#[from] InvalidInstance<T>),
}

/// A configurable loader for bin packing instances.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceLoader<T> {
    capacity: Option<T>,
}

impl<T> Default for InstanceLoader<T> {
    fn default() -> Self {
        Self { capacity: None }
    }
}

impl<T> InstanceLoader<T>
where
    T: PackingNumeric + FromStr,
{
    /// Creates a loader that expects the capacity as the first token.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses `capacity` for every loaded instance. The input then holds item
    /// sizes only.
    #[inline]
    pub fn capacity(mut self, capacity: T) -> Self {
        self.capacity = Some(capacity);
        self
    }

    /// Loads an instance from a type implementing `BufRead`.
    pub fn from_bufread<R: BufRead>(&self, rdr: R) -> Result<Instance<T>, InstanceLoaderError<T>> {
        let mut sc = Scanner::new(rdr);

        let capacity = match self.capacity {
            Some(capacity) => capacity,
            None => sc.next::<T>()?.ok_or(InstanceLoaderError::MissingCapacity)?,
        };

        let mut sizes = Vec::new();
        while let Some(size) = sc.next::<T>()? {
            sizes.push(size);
        }

        Ok(Instance::new(sizes, capacity)?)
    }

    /// Loads an instance from a file path.
    #[inline]
    pub fn from_path<P: AsRef<Path>>(&self, path: P) -> Result<Instance<T>, InstanceLoaderError<T>> {
        let file = File::open(path)?;
        self.from_bufread(BufReader::new(file))
    }

    /// Loads an instance from a generic reader.
    #[inline]
    pub fn from_reader<R: Read>(&self, r: R) -> Result<Instance<T>, InstanceLoaderError<T>> {
        self.from_bufread(BufReader::new(r))
    }

    /// Loads an instance from a string slice.
    #[inline]
    pub fn from_str(&self, s: &str) -> Result<Instance<T>, InstanceLoaderError<T>> {
        self.from_reader(s.as_bytes())
    }
}

#[inline]
fn is_separator(c: char) -> bool {
    c.is_whitespace() || c == ','
}

/// Reads separator-delimited tokens line by line.
struct Scanner<R> {
    rdr: R,
    buf: String,
    pos: usize,
    line: usize,
}

impl<R: BufRead> Scanner<R> {
    #[inline]
    fn new(rdr: R) -> Self {
        Self {
            rdr,
            buf: String::new(),
            pos: 0,
            line: 0,
        }
    }

    /// Refills the line buffer. `Ok(false)` on end of input.
    #[inline]
    fn fill_line(&mut self) -> std::io::Result<bool> {
        self.buf.clear();
        self.pos = 0;
        let n = self.rdr.read_line(&mut self.buf)?;
        if n > 0 {
            self.line += 1;
        }
        Ok(n > 0)
    }

    /// Reads the next token and parses it into `T`. Returns `Ok(None)` once
    /// the input is exhausted.
    fn next<T>(&mut self) -> Result<Option<T>, InstanceLoaderError<T>>
    where
        T: FromStr + std::fmt::Debug + std::fmt::Display,
    {
        loop {
            if self.pos >= self.buf.len() && !self.fill_line()? {
                return Ok(None);
            }

            let line = &self.buf[self.pos..];
            let content = match line.find('#') {
                Some(comment) => &line[..comment],
                None => line,
            };

            let Some(start) = content.find(|c: char| !is_separator(c)) else {
                self.pos = self.buf.len();
                continue;
            };
            let end = content[start..]
                .find(is_separator)
                .map_or(content.len(), |offset| start + offset);

            let token = &content[start..end];
            let parsed = token.parse::<T>().map_err(|_| ParseTokenError {
                token: token.to_owned(),
                line: self.line,
                type_name: std::any::type_name::<T>(),
            });
            self.pos += end;
            return Ok(Some(parsed?));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::ItemId;

    const SMALL_INSTANCE: &str = r#"
        # capacity
        10
        9       # largest
        8
        2, 7,6
        5
    "#;

    #[test]
    fn test_loads_mixed_separators_and_comments() {
        let instance: Instance<i64> = InstanceLoader::new()
            .from_str(SMALL_INSTANCE)
            .expect("failed to load");

        assert_eq!(instance.capacity(), 10);
        assert_eq!(instance.item_sizes(), &[9, 8, 7, 6, 5, 2]);
        assert_eq!(instance.total_size(), 37);
    }

    #[test]
    fn test_fixed_capacity_reads_sizes_only() {
        let instance: Instance<i32> = InstanceLoader::new()
            .capacity(10)
            .from_str("3\n4\n")
            .unwrap();
        assert_eq!(instance.capacity(), 10);
        assert_eq!(instance.num_items(), 2);
    }

    #[test]
    fn test_missing_capacity() {
        let res = InstanceLoader::<i64>::new().from_str("  # nothing here\n\n");
        assert!(matches!(res, Err(InstanceLoaderError::MissingCapacity)));
    }

    #[test]
    fn test_capacity_only_is_empty_instance() {
        let instance = InstanceLoader::<i64>::new().from_str("10").unwrap();
        assert!(instance.is_empty());
    }

    #[test]
    fn test_parse_error_structure() {
        let res = InstanceLoader::<i64>::new().from_str("10\n4\ngarbage 3");
        match res {
            Err(InstanceLoaderError::Parse(ParseTokenError {
                token,
                line,
                type_name,
            })) => {
                assert_eq!(token, "garbage");
                assert_eq!(line, 3);
                assert_eq!(type_name, "i64");
            }
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_instance_is_reported() {
        let res = InstanceLoader::<i64>::new().from_str("10 4 12");
        match res {
            Err(InstanceLoaderError::Invalid(InvalidInstance::OversizedItem { item, size, .. })) => {
                assert_eq!(item, ItemId::new(1));
                assert_eq!(size, 12);
            }
            other => panic!("expected invalid instance, got {:?}", other),
        }
    }

    #[test]
    fn test_comment_directly_after_token() {
        let instance = InstanceLoader::<i64>::new().from_str("10#cap\n3#a\n").unwrap();
        assert_eq!(instance.capacity(), 10);
        assert_eq!(instance.item_sizes(), &[3]);
    }

    #[test]
    fn test_from_path_missing_file_is_io_error() {
        let res = InstanceLoader::<i64>::new().from_path("/definitely/not/here.txt");
        assert!(matches!(res, Err(InstanceLoaderError::Io(_))));
    }
}
