//! Provide the per-field boundary for the relational mapping layer.
//!
//! A binding is a (declared type tag, value) pair crossing into a leaf
//! factory. The relational layer encodes and decodes one field at a
//! time through these two functions; it never sees identity tracking
//! or reference tables, and nulls stay its own concern (SQL `NULL` is
//! not a renderable value).

use core::fmt;

use og_graph::Value;

use crate::registry::factory::ConstructionError;
use crate::registry::type_registry::TypeRegistry;

// -----------------------------------------------------------------------------
// BindingError

/// A failed per-field encode or decode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BindingError {
    /// The declared tag resolves to no leaf factory.
    UnknownTag { tag: String },
    /// The value is null; a binding carries data, never null.
    NullValue { tag: String },
    /// The value is a reference-bearing node, not a value type.
    NotALeaf { tag: String },
    /// The factory rejected the data.
    Construction(ConstructionError),
}

impl fmt::Display for BindingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownTag { tag } => {
                write!(f, "declared tag `{tag}` resolves to no leaf factory")
            }
            Self::NullValue { tag } => {
                write!(f, "cannot bind a null as `{tag}`; nulls are the caller's concern")
            }
            Self::NotALeaf { tag } => {
                write!(f, "cannot bind a reference-bearing node as `{tag}`")
            }
            Self::Construction(err) => fmt::Display::fmt(err, f),
        }
    }
}

impl core::error::Error for BindingError {}

impl From<ConstructionError> for BindingError {
    #[inline]
    fn from(err: ConstructionError) -> Self {
        Self::Construction(err)
    }
}

// -----------------------------------------------------------------------------
// encode / decode

/// Encodes one field value under its declared tag.
///
/// # Examples
///
/// ```
/// use og_graph::{Value, tag};
/// use og_reflect::registry::{TypeRegistry, encode_binding};
///
/// let registry = TypeRegistry::new();
/// let text = encode_binding(&registry, tag::INTEGER, &Value::leaf(42_i32)).unwrap();
/// assert_eq!(text, "42");
/// ```
pub fn encode_binding(
    registry: &TypeRegistry,
    tag: &str,
    value: &Value,
) -> Result<String, BindingError> {
    let Some(factory) = registry.resolve_leaf(tag) else {
        return Err(BindingError::UnknownTag {
            tag: tag.to_owned(),
        });
    };
    match value {
        Value::Null => Err(BindingError::NullValue {
            tag: tag.to_owned(),
        }),
        Value::Node(_) => Err(BindingError::NotALeaf {
            tag: tag.to_owned(),
        }),
        Value::Leaf(leaf) => Ok(factory.render(leaf)?.into_owned()),
    }
}

/// Decodes one field value under its declared tag.
///
/// # Examples
///
/// ```
/// use og_graph::{Leaf, Value, tag};
/// use og_reflect::registry::{TypeRegistry, decode_binding};
///
/// let registry = TypeRegistry::new();
/// let value = decode_binding(&registry, tag::LONG, "7").unwrap();
/// assert_eq!(value, Value::Leaf(Leaf::Long(7)));
/// ```
pub fn decode_binding(
    registry: &TypeRegistry,
    tag: &str,
    text: &str,
) -> Result<Value, BindingError> {
    let Some(factory) = registry.resolve_leaf(tag) else {
        return Err(BindingError::UnknownTag {
            tag: tag.to_owned(),
        });
    };
    Ok(Value::Leaf(factory.construct(text)?))
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use og_graph::tag;

    #[test]
    fn round_trip_builtins() {
        let registry = TypeRegistry::new();
        for (tag, value) in [
            (tag::BOOLEAN, Value::leaf(true)),
            (tag::INTEGER, Value::leaf(42_i32)),
            (tag::DOUBLE, Value::leaf(2.5_f64)),
            (tag::STRING, Value::leaf("field text")),
        ] {
            let text = encode_binding(&registry, tag, &value).unwrap();
            let back = decode_binding(&registry, tag, &text).unwrap();
            assert_eq!(back, value, "binding round trip for `{tag}`");
        }
    }

    #[test]
    fn null_is_refused() {
        let registry = TypeRegistry::new();
        let err = encode_binding(&registry, tag::INTEGER, &Value::Null).unwrap_err();
        assert!(matches!(err, BindingError::NullValue { .. }));
    }

    #[test]
    fn unknown_tag_is_refused() {
        let registry = TypeRegistry::new();
        let err = decode_binding(&registry, "Timestamp", "7").unwrap_err();
        assert!(matches!(err, BindingError::UnknownTag { .. }));
    }

    #[test]
    fn mismatched_data_is_a_construction_error() {
        let registry = TypeRegistry::new();
        let err = decode_binding(&registry, tag::INTEGER, "not a number").unwrap_err();
        assert!(matches!(err, BindingError::Construction(_)));
    }
}
