//! Provide entity escaping for text travelling inside the tagged form.
//!
//! Exactly four characters are structurally significant and escaped:
//! `&`, `"`, `<`, `>`. Everything else passes through untouched, in
//! both directions.

use core::fmt;
use std::borrow::Cow;

// -----------------------------------------------------------------------------
// escape

/// Escapes the structurally significant characters of `text`.
///
/// Returns the input unchanged (and unallocated) when nothing needs
/// escaping.
///
/// # Examples
///
/// ```
/// use og_codec::escape::escape;
///
/// assert_eq!(escape("plain"), "plain");
/// assert_eq!(escape(r#"Say "hello"."#), "Say &quot;hello&quot;.");
/// assert_eq!(escape("a < b && b > c"), "a &lt; b &amp;&amp; b &gt; c");
/// ```
pub fn escape(text: &str) -> Cow<'_, str> {
    let Some(first) = text.find(['&', '"', '<', '>']) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 8);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

// -----------------------------------------------------------------------------
// unescape

/// An entity that could not be decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnescapeError {
    /// Byte position of the offending `&` within the escaped text.
    pub offset: usize,
    /// The entity text as it appeared, `&` included.
    pub entity: String,
}

impl fmt::Display for UnescapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown entity `{}` at offset {}",
            self.entity, self.offset,
        )
    }
}

impl core::error::Error for UnescapeError {}

/// Decodes the four known entities back into their characters.
///
/// A `&` that does not open one of `&amp;` `&quot;` `&lt;` `&gt;` is
/// an [`UnescapeError`].
pub fn unescape(text: &str) -> Result<Cow<'_, str>, UnescapeError> {
    let Some(first) = text.find('&') else {
        return Ok(Cow::Borrowed(text));
    };

    let mut out = String::with_capacity(text.len());
    out.push_str(&text[..first]);
    let mut rest = &text[first..];
    let mut offset = first;
    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        offset += pos;
        let tail = &rest[pos..];
        let entity = [
            ("&amp;", '&'),
            ("&quot;", '"'),
            ("&lt;", '<'),
            ("&gt;", '>'),
        ]
        .into_iter()
        .find(|(name, _)| tail.starts_with(name));
        let Some((name, c)) = entity else {
            // Take up to the terminating `;` for the message, if any.
            let end = tail
                .find(';')
                .map_or_else(|| tail.len().min(8), |i| (i + 1).min(tail.len()));
            return Err(UnescapeError {
                offset,
                entity: tail[..end].to_owned(),
            });
        };
        out.push(c);
        rest = &tail[name.len()..];
        offset += name.len();
    }
    out.push_str(rest);
    Ok(Cow::Owned(out))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_borrowed() {
        assert!(matches!(escape("plain"), Cow::Borrowed("plain")));
        assert!(matches!(unescape("plain"), Ok(Cow::Borrowed("plain"))));
    }

    #[test]
    fn round_trips() {
        for text in [
            "",
            r#"Say "hello"."#,
            "a < b && b > c",
            "&amp; literally",
            "trailing &",
        ] {
            // "trailing &" escapes to "trailing &amp;", which decodes
            // back; every escaped form must decode to its source.
            assert_eq!(unescape(&escape(text)).unwrap(), text);
        }
    }

    #[test]
    fn ampersand_escapes_first() {
        assert_eq!(escape("&lt;"), "&amp;lt;");
    }

    #[test]
    fn unknown_entity_is_an_error() {
        let err = unescape("x &nbsp; y").unwrap_err();
        assert_eq!(err.offset, 2);
        assert_eq!(err.entity, "&nbsp;");

        assert!(unescape("dangling &").is_err());
    }
}
