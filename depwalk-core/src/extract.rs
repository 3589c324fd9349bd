//! Regex-driven line extraction.
//!
//! [`LineExtractor`] covers the common case of dependencies declared one per
//! line, such as `#include <boost/any.hpp>` or `-> target`. Each line is
//! matched against a regex and capture group 1 (or the whole match when the
//! regex has no groups) is taken as the raw reference.

use regex::Regex;
use std::io::{self, BufRead};
use std::path::Path;

use crate::walker::SourceFile;

/// Extracts one reference per matching line.
///
/// With search roots configured, each reference is resolved through
/// [`Resolver::try_resolve`](crate::resolver::Resolver::try_resolve) and
/// references that resolve to nothing are dropped. Without search roots the
/// reference is used as the vertex identifier directly, optionally with its
/// extension removed.
#[derive(Clone, Debug)]
pub struct LineExtractor {
    pattern: Regex,
    search_roots: Vec<String>,
    strip_extension: bool,
}

impl LineExtractor {
    /// Create an extractor for `pattern`.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
            search_roots: Vec::new(),
            strip_extension: false,
        })
    }

    /// Resolve references against these directories, in order.
    pub fn with_search_roots<I, S>(mut self, roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_roots = roots.into_iter().map(Into::into).collect();
        self
    }

    /// Drop the extension of unresolved references (`b.txt` becomes `b`).
    pub fn strip_extension(mut self, strip: bool) -> Self {
        self.strip_extension = strip;
        self
    }

    /// Raw references in line order. Each line is matched without its
    /// terminator (`\n` or `\r\n`), so `$` anchors at the end of the line.
    /// Invalid UTF-8 is replaced, not rejected.
    pub fn references(&self, reader: &mut dyn BufRead) -> io::Result<Vec<String>> {
        let mut refs = Vec::new();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf)? == 0 {
                break;
            }
            while matches!(buf.last(), Some(b'\n' | b'\r')) {
                buf.pop();
            }
            let line = String::from_utf8_lossy(&buf);
            if let Some(caps) = self.pattern.captures(&line) {
                if let Some(m) = caps.get(1).or_else(|| caps.get(0)) {
                    refs.push(m.as_str().to_string());
                }
            }
        }

        Ok(refs)
    }

    /// Dependencies of `file`, ready for the walker.
    pub fn extract(&self, file: &SourceFile<'_>, reader: &mut dyn BufRead) -> io::Result<Vec<String>> {
        let refs = self.references(reader)?;

        if !self.search_roots.is_empty() {
            let roots: Vec<&str> = self.search_roots.iter().map(String::as_str).collect();
            return Ok(refs
                .iter()
                .filter_map(|r| file.resolver.try_resolve(r, &roots))
                .map(str::to_string)
                .collect());
        }

        if self.strip_extension {
            return Ok(refs.iter().map(|r| without_extension(r)).collect());
        }

        Ok(refs)
    }
}

/// File stem of a reference, or the reference itself when it has none.
fn without_extension(reference: &str) -> String {
    Path::new(reference)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| reference.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::Resolver;
    use std::io::Cursor;

    fn source<'a>(resolver: &'a Resolver) -> SourceFile<'a> {
        SourceFile {
            relative_path: "boost/any.hpp",
            path: "include/boost/any.hpp",
            vertex: "any",
            resolver,
        }
    }

    #[test]
    fn test_references_capture_group() {
        let extractor = LineExtractor::new(r#"#include\s+["<]([^">]+)"#).unwrap();
        let mut input = Cursor::new("#include <boost/config.hpp>\nint x;\n#include \"detail/a.hpp\"\n");
        let refs = extractor.references(&mut input).unwrap();
        assert_eq!(refs, vec!["boost/config.hpp", "detail/a.hpp"]);
    }

    #[test]
    fn test_references_whole_match_without_groups() {
        let extractor = LineExtractor::new(r"[a-z]+\.h").unwrap();
        let mut input = Cursor::new("see foo.h\nnothing\n");
        assert_eq!(extractor.references(&mut input).unwrap(), vec!["foo.h"]);
    }

    #[test]
    fn test_references_tolerate_invalid_utf8() {
        let extractor = LineExtractor::new(r"^->\s*(\w+)").unwrap();
        let mut input = Cursor::new(b"\xff\xfe junk\n-> b\n".to_vec());
        assert_eq!(extractor.references(&mut input).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_references_end_anchored_pattern() {
        let extractor = LineExtractor::new(r"^->\s*(\w+)$").unwrap();
        let mut input = Cursor::new("-> b\n-> c\n-> d trailing\n-> e");
        assert_eq!(extractor.references(&mut input).unwrap(), vec!["b", "c", "e"]);
    }

    #[test]
    fn test_references_crlf_lines() {
        let extractor = LineExtractor::new(r"^->\s*(.+)").unwrap();
        let mut input = Cursor::new("-> b\r\n-> c.txt\r\n");
        assert_eq!(extractor.references(&mut input).unwrap(), vec!["b", "c.txt"]);

        let anchored = LineExtractor::new(r"^->\s*(\w+)$").unwrap();
        let mut input = Cursor::new("-> b\r\n");
        assert_eq!(anchored.references(&mut input).unwrap(), vec!["b"]);
    }

    #[test]
    fn test_extract_resolves_against_roots() {
        let mut resolver = Resolver::new();
        resolver.insert("include/boost/config.hpp", "config");

        let extractor = LineExtractor::new(r#"#include\s+["<]([^">]+)"#)
            .unwrap()
            .with_search_roots(["include"]);
        let mut input = Cursor::new("#include <boost/config.hpp>\n#include <vector>\n");

        let deps = extractor.extract(&source(&resolver), &mut input).unwrap();
        assert_eq!(deps, vec!["config"]);
    }

    #[test]
    fn test_extract_strips_extension() {
        let resolver = Resolver::new();
        let extractor = LineExtractor::new(r"^->\s*(\S+)").unwrap().strip_extension(true);
        let mut input = Cursor::new("-> b.txt\n-> c\n");

        let deps = extractor.extract(&source(&resolver), &mut input).unwrap();
        assert_eq!(deps, vec!["b", "c"]);
    }
}
