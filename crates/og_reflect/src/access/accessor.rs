//! Provide single-segment access and its error type.

use core::fmt;
use std::borrow::Cow;

use og_graph::{Graph, Node, Value};

// -----------------------------------------------------------------------------
// ReflectionError

/// The kind of [`ReflectionError`], with kind-specific detail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReflectionErrorKind {
    /// The bean has no property of this name.
    NoSuchProperty { class: String },
    /// A property segment was applied to something that is not a bean.
    NotABean { found: &'static str },
    /// An index segment was applied to something that is not an array
    /// or list.
    NotIndexable { found: &'static str },
    /// The index is past the end of the sequence.
    IndexOutOfBounds { len: usize },
    /// The chain stepped into an explicit null.
    NullTraversal,
    /// The property's declared type cannot hold null.
    NotNullable { class: String },
    /// The value names a slot that is not in this graph.
    UnboundNode,
    /// The path has no segments, so there is nothing to resolve.
    EmptyPath,
}

/// A named segment in a property path failed to resolve.
///
/// Use the `Display` impl of this type to get information on the
/// error; the unresolved segment is always part of the message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionError {
    segment: String,
    kind: ReflectionErrorKind,
}

impl ReflectionError {
    /// Creates an error for the given segment.
    #[inline]
    pub fn new(segment: impl Into<String>, kind: ReflectionErrorKind) -> Self {
        Self {
            segment: segment.into(),
            kind,
        }
    }

    /// The segment that did not resolve.
    #[inline]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// The kind of failure.
    #[inline]
    pub fn kind(&self) -> &ReflectionErrorKind {
        &self.kind
    }
}

impl fmt::Display for ReflectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let segment = &self.segment;
        match &self.kind {
            ReflectionErrorKind::NoSuchProperty { class } => {
                write!(f, "bean `{class}` has no property `{segment}`")
            }
            ReflectionErrorKind::NotABean { found } => {
                write!(f, "cannot read property `{segment}` of a {found}")
            }
            ReflectionErrorKind::NotIndexable { found } => {
                write!(f, "cannot index `{segment}` into a {found}")
            }
            ReflectionErrorKind::IndexOutOfBounds { len } => {
                write!(f, "index `{segment}` is out of bounds (length {len})")
            }
            ReflectionErrorKind::NullTraversal => {
                write!(f, "cannot resolve `{segment}` through an explicit null")
            }
            ReflectionErrorKind::NotNullable { class } => {
                write!(
                    f,
                    "property `{segment}` of bean `{class}` cannot hold null"
                )
            }
            ReflectionErrorKind::UnboundNode => {
                write!(f, "`{segment}` names a node outside this graph")
            }
            ReflectionErrorKind::EmptyPath => f.write_str("the path has no segments"),
        }
    }
}

impl core::error::Error for ReflectionError {}

// -----------------------------------------------------------------------------
// Accessor

/// A **singular** step within a property path.
///
/// # Examples
///
/// ```
/// use og_graph::{BeanNode, Graph, Value};
/// use og_reflect::access::Accessor;
///
/// let mut graph = Graph::new();
/// let id = graph.insert(BeanNode::new("Person").with("name", "Bob"));
///
/// let accessor = Accessor::Property("name".into());
/// let value = accessor.access(&graph, &Value::Node(id)).unwrap();
/// assert_eq!(value, &Value::leaf("Bob"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Accessor<'a> {
    /// A name-based property access on a bean.
    ///
    /// Example: the `b` of `a.b`
    Property(Cow<'a, str>),
    /// An index-based access on an array or list.
    ///
    /// Example: the `5` of `[5]`
    Index(usize),
}

impl fmt::Display for Accessor<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Property(name) => write!(f, ".{name}"),
            Self::Index(index) => write!(f, "[{index}]"),
        }
    }
}

impl<'a> Accessor<'a> {
    /// Converts this into an "owned" segment.
    #[inline]
    pub fn into_owned(self) -> Accessor<'static> {
        match self {
            Self::Property(name) => Accessor::Property(Cow::Owned(name.into_owned())),
            Self::Index(index) => Accessor::Index(index),
        }
    }

    fn segment_name(&self) -> String {
        match self {
            Self::Property(name) => name.clone().into_owned(),
            Self::Index(index) => index.to_string(),
        }
    }

    fn err(&self, kind: ReflectionErrorKind) -> ReflectionError {
        ReflectionError::new(self.segment_name(), kind)
    }

    /// Resolves the node a value must point at for this step.
    fn node_of<'r>(&self, graph: &'r Graph, base: &Value) -> Result<&'r Node, ReflectionError> {
        match base {
            Value::Null => Err(self.err(ReflectionErrorKind::NullTraversal)),
            Value::Leaf(_) => Err(self.err(match self {
                Self::Property(_) => ReflectionErrorKind::NotABean { found: "leaf" },
                Self::Index(_) => ReflectionErrorKind::NotIndexable { found: "leaf" },
            })),
            Value::Node(id) => graph
                .get(*id)
                .ok_or_else(|| self.err(ReflectionErrorKind::UnboundNode)),
        }
    }

    /// Applies this step to a value; on success returns the child.
    pub fn access<'r>(&self, graph: &'r Graph, base: &Value) -> Result<&'r Value, ReflectionError> {
        let node = self.node_of(graph, base)?;
        match (self, node) {
            (Self::Property(name), Node::Bean(bean)) => {
                bean.property(name).ok_or_else(|| {
                    self.err(ReflectionErrorKind::NoSuchProperty {
                        class: bean.class().to_owned(),
                    })
                })
            }
            (Self::Property(_), other) => Err(self.err(ReflectionErrorKind::NotABean {
                found: kind_name(other),
            })),
            (&Self::Index(index), Node::Array(array)) => array
                .get(index)
                .ok_or_else(|| self.err(ReflectionErrorKind::IndexOutOfBounds { len: array.len() })),
            (&Self::Index(index), Node::List(list)) => list
                .get(index)
                .ok_or_else(|| self.err(ReflectionErrorKind::IndexOutOfBounds { len: list.len() })),
            (Self::Index(_), other) => Err(self.err(ReflectionErrorKind::NotIndexable {
                found: kind_name(other),
            })),
        }
    }

    /// Applies this step as a mutator, replacing the child value.
    ///
    /// Assigning to a bean property that is currently absent creates
    /// it; every property of a dynamic bean has a mutator. Indexed
    /// assignment requires the element to exist.
    pub fn assign(
        &self,
        graph: &mut Graph,
        base: &Value,
        value: Value,
    ) -> Result<(), ReflectionError> {
        let id = match base {
            Value::Null => return Err(self.err(ReflectionErrorKind::NullTraversal)),
            Value::Leaf(_) => {
                return Err(self.err(match self {
                    Self::Property(_) => ReflectionErrorKind::NotABean { found: "leaf" },
                    Self::Index(_) => ReflectionErrorKind::NotIndexable { found: "leaf" },
                }));
            }
            Value::Node(id) => *id,
        };
        let Some(node) = graph.get_mut(id) else {
            return Err(self.err(ReflectionErrorKind::UnboundNode));
        };
        match (self, node) {
            (Self::Property(name), Node::Bean(bean)) => {
                bean.set(name.as_ref(), value);
                Ok(())
            }
            (Self::Property(_), other) => Err(self.err(ReflectionErrorKind::NotABean {
                found: kind_name(other),
            })),
            (&Self::Index(index), Node::Array(array)) => {
                let len = array.len();
                match array.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(self.err(ReflectionErrorKind::IndexOutOfBounds { len })),
                }
            }
            (&Self::Index(index), Node::List(list)) => {
                let len = list.len();
                match list.get_mut(index) {
                    Some(slot) => {
                        *slot = value;
                        Ok(())
                    }
                    None => Err(self.err(ReflectionErrorKind::IndexOutOfBounds { len })),
                }
            }
            (Self::Index(_), other) => Err(self.err(ReflectionErrorKind::NotIndexable {
                found: kind_name(other),
            })),
        }
    }
}

fn kind_name(node: &Node) -> &'static str {
    match node {
        Node::Bean(_) => "bean",
        Node::Array(_) => "array",
        Node::List(_) => "list",
        Node::Map(_) => "map",
    }
}

// -----------------------------------------------------------------------------
// Single segment with offset

/// An [`Accessor`] combined with its byte offset in the source path.
///
/// The offset is only used for error reporting, unrelated to access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetAccessor<'a> {
    pub accessor: Accessor<'a>,
    /// only used to display error messages
    pub offset: usize,
}

impl<'a> OffsetAccessor<'a> {
    /// Converts this into an "owned" segment.
    #[inline]
    pub fn into_owned(self) -> OffsetAccessor<'static> {
        OffsetAccessor {
            accessor: self.accessor.into_owned(),
            offset: self.offset,
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use og_graph::{BeanNode, ListNode, MapNode};

    #[test]
    fn property_on_non_bean_fails() {
        let mut graph = Graph::new();
        let id = graph.insert(MapNode::new());

        let err = Accessor::Property("x".into())
            .access(&graph, &Value::Node(id))
            .unwrap_err();
        assert_eq!(err.kind(), &ReflectionErrorKind::NotABean { found: "map" });
    }

    #[test]
    fn index_out_of_bounds() {
        let mut graph = Graph::new();
        let id = graph.insert(ListNode::from_items([1_i32]));

        let err = Accessor::Index(3)
            .access(&graph, &Value::Node(id))
            .unwrap_err();
        assert_eq!(err.segment(), "3");
        assert_eq!(err.kind(), &ReflectionErrorKind::IndexOutOfBounds { len: 1 });
    }

    #[test]
    fn assign_creates_bean_property() {
        let mut graph = Graph::new();
        let id = graph.insert(BeanNode::new("Person"));
        let base = Value::Node(id);

        Accessor::Property("name".into())
            .assign(&mut graph, &base, Value::leaf("Bob"))
            .unwrap();
        assert_eq!(
            graph[id].as_bean().unwrap().property("name"),
            Some(&Value::leaf("Bob")),
        );
    }

    #[test]
    fn null_traversal_is_named() {
        let graph = Graph::new();
        let err = Accessor::Property("x".into())
            .access(&graph, &Value::Null)
            .unwrap_err();
        assert_eq!(err.kind(), &ReflectionErrorKind::NullTraversal);
    }
}
