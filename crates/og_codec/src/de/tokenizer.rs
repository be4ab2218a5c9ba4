//! Provide the tokenizer turning tagged text into a raw node tree.
//!
//! The tokenizer knows nothing about classes, ids, or the registry;
//! it only enforces the structural rules: balanced nesting, matching
//! closing tags, well-formed attributes, one root element, and no
//! mixing of text with element children (whitespace between elements
//! is insignificant and dropped).

use core::fmt;
use std::borrow::Cow;

use crate::escape::unescape;

// -----------------------------------------------------------------------------
// SyntaxError

/// Structurally malformed tagged text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    /// Byte position in the input.
    pub offset: usize,
    /// The underlying error.
    pub reason: Cow<'static, str>,
}

impl SyntaxError {
    /// Creates an error at the given byte position.
    #[inline]
    pub fn new(offset: usize, reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset,
            reason: reason.into(),
        }
    }
}

impl fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "malformed document at offset {}: {}", self.offset, self.reason)
    }
}

impl core::error::Error for SyntaxError {}

// -----------------------------------------------------------------------------
// RawNode

/// One tokenized element: tag name, attributes, and either element
/// children or leaf text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct RawNode {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<RawNode>,
    /// Unescaped text content; `None` for empty and children-bearing
    /// elements.
    pub text: Option<String>,
    /// Byte offset of this element's `<`.
    pub offset: usize,
}

impl RawNode {
    /// Looks up an attribute by name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}

// -----------------------------------------------------------------------------
// tokenize

/// Tokenizes one document: a single root element, optionally
/// surrounded by whitespace, with nothing after it.
pub(crate) fn tokenize(input: &str) -> Result<RawNode, SyntaxError> {
    let mut tokenizer = Tokenizer { input, pos: 0 };
    tokenizer.skip_whitespace();
    if !tokenizer.rest().starts_with('<') {
        return Err(tokenizer.error("expected an element"));
    }
    let root = tokenizer.element()?;
    tokenizer.skip_whitespace();
    if tokenizer.pos < input.len() {
        return Err(tokenizer.error("trailing content after the root element"));
    }
    Ok(root)
}

struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl Tokenizer<'_> {
    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn error(&self, reason: impl Into<Cow<'static, str>>) -> SyntaxError {
        SyntaxError::new(self.pos, reason)
    }

    fn skip_whitespace(&mut self) {
        let trimmed = self.rest().trim_start();
        self.pos = self.input.len() - trimmed.len();
    }

    /// A tag or attribute name: everything up to a delimiter.
    fn name(&mut self) -> Result<String, SyntaxError> {
        let rest = self.rest();
        let len = rest
            .char_indices()
            .find(|&(_, c)| c.is_whitespace() || matches!(c, '<' | '>' | '/' | '=' | '"'))
            .map_or(rest.len(), |(i, _)| i);
        if len == 0 {
            return Err(self.error("expected a name"));
        }
        let name = rest[..len].to_owned();
        self.pos += len;
        Ok(name)
    }

    fn attribute(&mut self) -> Result<(String, String), SyntaxError> {
        let name = self.name()?;
        self.skip_whitespace();
        if !self.rest().starts_with('=') {
            return Err(self.error("expected `=` after the attribute name"));
        }
        self.pos += 1;
        self.skip_whitespace();
        if !self.rest().starts_with('"') {
            return Err(self.error("expected `\"` to open the attribute value"));
        }
        self.pos += 1;
        let value_offset = self.pos;
        let Some(len) = self.rest().find('"') else {
            return Err(self.error("unterminated attribute value"));
        };
        let value = unescape(&self.rest()[..len]).map_err(|err| {
            SyntaxError::new(
                value_offset + err.offset,
                format!("unknown entity `{}`", err.entity),
            )
        })?;
        let value = value.into_owned();
        self.pos += len + 1;
        Ok((name, value))
    }

    fn element(&mut self) -> Result<RawNode, SyntaxError> {
        let offset = self.pos;
        // The caller has seen the `<`.
        self.pos += 1;
        let name = self.name()?;

        let mut attrs = Vec::new();
        loop {
            self.skip_whitespace();
            if self.rest().starts_with("/>") {
                self.pos += 2;
                return Ok(RawNode {
                    name,
                    attrs,
                    children: Vec::new(),
                    text: None,
                    offset,
                });
            }
            if self.rest().starts_with('>') {
                self.pos += 1;
                break;
            }
            if self.rest().is_empty() {
                return Err(self.error("unexpected end of input inside a tag"));
            }
            attrs.push(self.attribute()?);
        }

        let mut children = Vec::new();
        let mut text = String::new();
        loop {
            let segment_offset = self.pos;
            let Some(len) = self.rest().find('<') else {
                return Err(SyntaxError::new(offset, format!("`{name}` is never closed")));
            };
            let segment = &self.input[segment_offset..segment_offset + len];
            self.pos += len;
            let unescaped = unescape(segment).map_err(|err| {
                SyntaxError::new(
                    segment_offset + err.offset,
                    format!("unknown entity `{}`", err.entity),
                )
            })?;
            text.push_str(&unescaped);

            if self.rest().starts_with("</") {
                let close_offset = self.pos;
                self.pos += 2;
                let close = self.name()?;
                self.skip_whitespace();
                if !self.rest().starts_with('>') {
                    return Err(self.error("expected `>` to finish the closing tag"));
                }
                self.pos += 1;
                if close != name {
                    return Err(SyntaxError::new(
                        close_offset,
                        format!("closing tag `{close}` does not match `{name}`"),
                    ));
                }
                break;
            }
            children.push(self.element()?);
        }

        let text = if children.is_empty() {
            (!text.is_empty()).then_some(text)
        } else if text.trim().is_empty() {
            // Whitespace between elements is insignificant.
            None
        } else {
            return Err(SyntaxError::new(
                offset,
                format!("`{name}` mixes text with element children"),
            ));
        };
        Ok(RawNode {
            name,
            attrs,
            children,
            text,
            offset,
        })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leaf_element() {
        let node = tokenize(r#"<obj class="Integer">42</obj>"#).unwrap();
        assert_eq!(node.name, "obj");
        assert_eq!(node.attr("class"), Some("Integer"));
        assert_eq!(node.text.as_deref(), Some("42"));
        assert!(node.children.is_empty());
    }

    #[test]
    fn nested_elements_with_insignificant_whitespace() {
        let node = tokenize(
            "<obj class=\"List\" mem=\"1\">\n  <e><null/></e>\n  <e><obj class=\"String\">x</obj></e>\n</obj>",
        )
        .unwrap();
        assert_eq!(node.attr("mem"), Some("1"));
        assert_eq!(node.children.len(), 2);
        assert_eq!(node.children[0].children[0].name, "null");
        assert_eq!(node.text, None);
    }

    #[test]
    fn self_closing_carries_attributes() {
        let node = tokenize(r#"<obj class="Person" ref="3"/>"#).unwrap();
        assert_eq!(node.attr("ref"), Some("3"));
        assert!(node.children.is_empty());
        assert_eq!(node.text, None);
    }

    #[test]
    fn text_and_attribute_values_are_unescaped() {
        let node = tokenize(r#"<obj class="A&lt;B&gt;">x &amp; y</obj>"#).unwrap();
        assert_eq!(node.attr("class"), Some("A<B>"));
        assert_eq!(node.text.as_deref(), Some("x & y"));
    }

    #[test]
    fn empty_element_has_no_text() {
        let node = tokenize("<name></name>").unwrap();
        assert_eq!(node.text, None);
        assert!(node.children.is_empty());
    }

    #[test]
    fn offsets_are_tracked() {
        let node = tokenize("  <obj class=\"List\" mem=\"1\"><e><null/></e></obj>").unwrap();
        assert_eq!(node.offset, 2);
        assert_eq!(node.children[0].offset, 28);
    }

    #[test]
    fn mismatched_closing_tag() {
        let err = tokenize("<a><b></a></a>").unwrap_err();
        assert!(err.reason.contains("does not match"));
    }

    #[test]
    fn unclosed_element() {
        let err = tokenize("<a><b></b>").unwrap_err();
        assert_eq!(err.offset, 0);
        assert!(err.reason.contains("never closed"));
    }

    #[test]
    fn trailing_content() {
        assert!(tokenize("<a></a><b></b>").is_err());
        assert!(tokenize("<a></a>junk").is_err());
        // Trailing whitespace is fine.
        assert!(tokenize("<a></a>  \n").is_ok());
    }

    #[test]
    fn mixed_content_is_rejected() {
        let err = tokenize("<a>text<b></b></a>").unwrap_err();
        assert!(err.reason.contains("mixes text"));
    }

    #[test]
    fn unknown_entity_is_rejected() {
        let err = tokenize("<a>x &nbsp; y</a>").unwrap_err();
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn malformed_attributes() {
        assert!(tokenize(r#"<a b></a>"#).is_err());
        assert!(tokenize(r#"<a b="x></a>"#).is_err());
        assert!(tokenize(r#"<a ="x"></a>"#).is_err());
    }
}
