//! Provide the inlined value types and their open extension point.

use core::fmt;
use std::borrow::Cow;

use crate::tag;

// -----------------------------------------------------------------------------
// CustomLeaf

/// The open extension point for user-defined value types.
///
/// A custom leaf is a value type that is not part of the closed
/// primitive set: it is inlined into its parent like any other leaf,
/// carries no identity, and is rendered to (and constructed from) a
/// single piece of text. A date/time value is the canonical example.
///
/// Construction from text is not part of this trait; it belongs to the
/// leaf factory registered for the same tag in the type registry, so
/// that the graph model stays free of parsing concerns.
///
/// # Examples
///
/// ```
/// use std::borrow::Cow;
/// use og_graph::{CustomLeaf, Leaf};
///
/// #[derive(Debug, Clone)]
/// struct Timestamp(i64);
///
/// impl CustomLeaf for Timestamp {
///     fn tag(&self) -> &str {
///         "Timestamp"
///     }
///
///     fn render(&self) -> Cow<'_, str> {
///         Cow::Owned(self.0.to_string())
///     }
///
///     fn clone_leaf(&self) -> Box<dyn CustomLeaf> {
///         Box::new(self.clone())
///     }
/// }
///
/// let leaf = Leaf::custom(Timestamp(1724457600));
/// assert_eq!(leaf.tag(), "Timestamp");
/// ```
pub trait CustomLeaf: fmt::Debug + Send + Sync {
    /// The type tag this leaf is registered under.
    fn tag(&self) -> &str;

    /// Renders the canonical, unescaped text form of this value.
    ///
    /// The registered factory for [`tag`](CustomLeaf::tag) must accept
    /// this exact text in its construction path.
    fn render(&self) -> Cow<'_, str>;

    /// Clones this leaf behind a fresh box.
    fn clone_leaf(&self) -> Box<dyn CustomLeaf>;

    /// Compares two custom leaves.
    ///
    /// The default implementation compares tag and rendered text,
    /// which matches the wire-level notion of equality.
    fn leaf_eq(&self, other: &dyn CustomLeaf) -> bool {
        self.tag() == other.tag() && self.render() == other.render()
    }
}

impl Clone for Box<dyn CustomLeaf> {
    #[inline]
    fn clone(&self) -> Self {
        self.clone_leaf()
    }
}

// -----------------------------------------------------------------------------
// Leaf

/// An inlined value type.
///
/// Leaves are the categories that never take part in identity
/// tracking: two equal leaves are indistinguishable, and a leaf
/// appearing twice in a graph is simply written twice. The closed
/// variants cover the built-in primitive vocabulary; [`Leaf::Custom`]
/// is the single open extension point.
#[derive(Debug, Clone)]
pub enum Leaf {
    /// A boolean, tagged [`tag::BOOLEAN`].
    Bool(bool),
    /// An 8-bit signed integer, tagged [`tag::BYTE`].
    Byte(i8),
    /// A 16-bit signed integer, tagged [`tag::SHORT`].
    Short(i16),
    /// A 32-bit signed integer, tagged [`tag::INTEGER`].
    Int(i32),
    /// A 64-bit signed integer, tagged [`tag::LONG`].
    Long(i64),
    /// A 32-bit float, tagged [`tag::FLOAT`].
    Float(f32),
    /// A 64-bit float, tagged [`tag::DOUBLE`].
    Double(f64),
    /// A single character, tagged [`tag::CHARACTER`].
    Char(char),
    /// A text value, tagged [`tag::STRING`].
    Str(String),
    /// A user-defined value type. See [`CustomLeaf`].
    Custom(Box<dyn CustomLeaf>),
}

impl Leaf {
    /// Wraps a custom leaf value.
    #[inline]
    pub fn custom(leaf: impl CustomLeaf + 'static) -> Self {
        Self::Custom(Box::new(leaf))
    }

    /// Returns the type tag of this leaf.
    pub fn tag(&self) -> &str {
        match self {
            Self::Bool(_) => tag::BOOLEAN,
            Self::Byte(_) => tag::BYTE,
            Self::Short(_) => tag::SHORT,
            Self::Int(_) => tag::INTEGER,
            Self::Long(_) => tag::LONG,
            Self::Float(_) => tag::FLOAT,
            Self::Double(_) => tag::DOUBLE,
            Self::Char(_) => tag::CHARACTER,
            Self::Str(_) => tag::STRING,
            Self::Custom(leaf) => leaf.tag(),
        }
    }

    /// Renders the canonical, unescaped text form of this leaf.
    ///
    /// This is the text the built-in factories produce and consume;
    /// escaping is applied later, by the codec.
    pub fn render(&self) -> Cow<'_, str> {
        match self {
            Self::Bool(v) => Cow::Owned(v.to_string()),
            Self::Byte(v) => Cow::Owned(v.to_string()),
            Self::Short(v) => Cow::Owned(v.to_string()),
            Self::Int(v) => Cow::Owned(v.to_string()),
            Self::Long(v) => Cow::Owned(v.to_string()),
            Self::Float(v) => Cow::Owned(v.to_string()),
            Self::Double(v) => Cow::Owned(v.to_string()),
            Self::Char(v) => Cow::Owned(v.to_string()),
            Self::Str(v) => Cow::Borrowed(v.as_str()),
            Self::Custom(leaf) => leaf.render(),
        }
    }
}

impl PartialEq for Leaf {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Byte(a), Self::Byte(b)) => a == b,
            (Self::Short(a), Self::Short(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Long(a), Self::Long(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a == b,
            (Self::Double(a), Self::Double(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Custom(a), Self::Custom(b)) => a.leaf_eq(b.as_ref()),
            _ => false,
        }
    }
}

impl fmt::Display for Leaf {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

macro_rules! impl_leaf_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Leaf {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value.into())
                }
            }
        )*
    };
}

impl_leaf_from! {
    bool => Bool,
    i8 => Byte,
    i16 => Short,
    i32 => Int,
    i64 => Long,
    f32 => Float,
    f64 => Double,
    char => Char,
    String => Str,
    &str => Str,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone)]
    struct Stamp(i64);

    impl CustomLeaf for Stamp {
        fn tag(&self) -> &str {
            "Stamp"
        }

        fn render(&self) -> Cow<'_, str> {
            Cow::Owned(self.0.to_string())
        }

        fn clone_leaf(&self) -> Box<dyn CustomLeaf> {
            Box::new(self.clone())
        }
    }

    #[test]
    fn tags() {
        assert_eq!(Leaf::from(true).tag(), "Boolean");
        assert_eq!(Leaf::from(42_i32).tag(), "Integer");
        assert_eq!(Leaf::from("x").tag(), "String");
        assert_eq!(Leaf::custom(Stamp(7)).tag(), "Stamp");
    }

    #[test]
    fn render_text() {
        assert_eq!(Leaf::from(42_i32).render(), "42");
        assert_eq!(Leaf::from(false).render(), "false");
        assert_eq!(Leaf::from('e').render(), "e");
        assert_eq!(Leaf::custom(Stamp(9)).render(), "9");
    }

    #[test]
    fn equality_is_per_variant() {
        assert_eq!(Leaf::from(1_i32), Leaf::from(1_i32));
        // Same numeric value, different tag.
        assert_ne!(Leaf::from(1_i32), Leaf::from(1_i64));
        assert_eq!(Leaf::custom(Stamp(3)), Leaf::custom(Stamp(3)));
        assert_ne!(Leaf::custom(Stamp(3)), Leaf::custom(Stamp(4)));
    }

    #[test]
    fn clone_custom() {
        let leaf = Leaf::custom(Stamp(11));
        let copy = leaf.clone();
        assert_eq!(leaf, copy);
    }
}
