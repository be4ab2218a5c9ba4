//! Provide the property path parser.

use core::fmt;
use std::borrow::Cow;

use crate::access::accessor::{Accessor, OffsetAccessor};

// -----------------------------------------------------------------------------
// PathParseError

/// An interface for representing path parsing error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParseError<'a> {
    /// Position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: &'a str,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl fmt::Display for PathParseError<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for PathParseError<'_> {}

// -----------------------------------------------------------------------------
// Parser

/// Parses a path into its segments.
///
/// Grammar: a path is one or more segments joined with `.`; a segment
/// is a property name followed by any number of `[index]` suffixes.
/// The leading segment of a path rooted at a sequence may start
/// directly with `[index]`.
pub(crate) fn parse_segments(path: &str) -> Result<Vec<OffsetAccessor<'_>>, PathParseError<'_>> {
    let mut segments = Vec::new();
    let mut rest = path;
    let mut offset = 0;

    let err = |offset: usize, error: &'static str| PathParseError {
        offset,
        path,
        error: Cow::Borrowed(error),
    };

    loop {
        // Property name, optional only at the very start (so that a
        // path rooted at a sequence can open with `[0]`).
        let name_len = rest
            .char_indices()
            .find(|&(_, c)| c == '.' || c == '[' || c == ']')
            .map_or(rest.len(), |(i, _)| i);
        if name_len > 0 {
            segments.push(OffsetAccessor {
                accessor: Accessor::Property(Cow::Borrowed(&rest[..name_len])),
                offset,
            });
        } else if offset != 0 || rest.is_empty() || !rest.starts_with('[') {
            return Err(err(offset, "expected a property name"));
        }
        rest = &rest[name_len..];
        offset += name_len;

        // Index suffixes.
        while let Some(tail) = rest.strip_prefix('[') {
            let Some(close) = tail.find(']') else {
                return Err(err(offset, "unterminated `[` index"));
            };
            let digits = &tail[..close];
            let Ok(index) = digits.parse::<usize>() else {
                return Err(err(offset + 1, "expected a number inside `[ ]`"));
            };
            segments.push(OffsetAccessor {
                accessor: Accessor::Index(index),
                offset,
            });
            rest = &tail[close + 1..];
            offset += close + 2;
        }

        match rest.strip_prefix('.') {
            Some(tail) if tail.is_empty() => return Err(err(offset, "trailing `.`")),
            Some(tail) => {
                rest = tail;
                offset += 1;
            }
            None if rest.is_empty() => break,
            // Only reachable for a stray `]` or similar.
            None => return Err(err(offset, "unexpected character")),
        }
    }

    Ok(segments)
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    fn parts(path: &str) -> Vec<Accessor<'_>> {
        parse_segments(path)
            .unwrap()
            .into_iter()
            .map(|s| s.accessor)
            .collect()
    }

    #[test]
    fn dotted_path() {
        assert_eq!(
            parts("a.b.c"),
            [
                Accessor::Property("a".into()),
                Accessor::Property("b".into()),
                Accessor::Property("c".into()),
            ],
        );
    }

    #[test]
    fn indexed_path() {
        assert_eq!(
            parts("accounts[2].label"),
            [
                Accessor::Property("accounts".into()),
                Accessor::Index(2),
                Accessor::Property("label".into()),
            ],
        );
    }

    #[test]
    fn nested_indices() {
        assert_eq!(
            parts("grid[0][1]"),
            [
                Accessor::Property("grid".into()),
                Accessor::Index(0),
                Accessor::Index(1),
            ],
        );
    }

    #[test]
    fn leading_index() {
        assert_eq!(
            parts("[3].name"),
            [Accessor::Index(3), Accessor::Property("name".into())],
        );
    }

    #[test]
    fn offsets_point_at_segments() {
        let segments = parse_segments("ab.cd[7]").unwrap();
        assert_eq!(segments[0].offset, 0);
        assert_eq!(segments[1].offset, 3);
        assert_eq!(segments[2].offset, 5);
    }

    #[test]
    fn errors() {
        assert!(parse_segments("").is_err());
        assert!(parse_segments("a..b").is_err());
        assert!(parse_segments("a.").is_err());
        assert!(parse_segments("a[").is_err());
        assert!(parse_segments("a[x]").is_err());
        assert!(parse_segments("a]b").is_err());
        assert!(parse_segments(".a").is_err());
    }
}
