//! Provide the tagged value categories.

use core::fmt;

use crate::graph::NodeId;
use crate::leaf::Leaf;

// -----------------------------------------------------------------------------
// Value

/// A single position in an object graph.
///
/// Every property, element, map key, and map value holds exactly one
/// `Value`. The three variants are the whole story:
///
/// - [`Value::Null`] is an explicit null. It is distinct from an
///   absent property and from an empty collection.
/// - [`Value::Leaf`] is an inlined value type; it carries no identity
///   and never takes part in reference tracking.
/// - [`Value::Node`] is an index into the owning [`Graph`]. The same
///   `NodeId` may appear in any number of positions, which is how
///   sharing and cycles are expressed.
///
/// `Value` equality is shallow: two `Node` values are equal when they
/// name the same arena slot. For structural comparison across graphs,
/// see [`Graph::shape_eq`].
///
/// [`Graph`]: crate::Graph
/// [`Graph::shape_eq`]: crate::Graph::shape_eq
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An explicit null.
    Null,
    /// An inlined value type.
    Leaf(Leaf),
    /// A reference-bearing node, addressed by arena index.
    Node(NodeId),
}

impl Value {
    /// Wraps a leaf-convertible value.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_graph::{Leaf, Value};
    ///
    /// assert_eq!(Value::leaf(42_i32), Value::Leaf(Leaf::Int(42)));
    /// ```
    #[inline]
    pub fn leaf(value: impl Into<Leaf>) -> Self {
        Self::Leaf(value.into())
    }

    /// Returns `true` for [`Value::Null`].
    #[inline]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the inner leaf, if this is a leaf value.
    #[inline]
    pub const fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    /// Returns the inner node id, if this is a node reference.
    #[inline]
    pub const fn as_node(&self) -> Option<NodeId> {
        match self {
            Self::Node(id) => Some(*id),
            _ => None,
        }
    }

}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Leaf(leaf) => write!(f, "{leaf}"),
            Self::Node(id) => write!(f, "#{}", id.index()),
        }
    }
}

macro_rules! impl_value_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::Leaf(value.into())
                }
            }
        )*
    };
}

impl_value_from!(bool, i8, i16, i32, i64, f32, f64, char, String, &str);

impl From<Leaf> for Value {
    #[inline]
    fn from(leaf: Leaf) -> Self {
        Self::Leaf(leaf)
    }
}

impl From<NodeId> for Value {
    #[inline]
    fn from(id: NodeId) -> Self {
        Self::Node(id)
    }
}
