//! Provide reusable multi-segment path access.

use core::fmt;

use og_graph::{Graph, Value};

use crate::access::accessor::{Accessor, OffsetAccessor, ReflectionError, ReflectionErrorKind};
use crate::access::path::{PathParseError, parse_segments};
use crate::registry::TypeRegistry;

// -----------------------------------------------------------------------------
// PathAccessor

/// A parsed, reusable property path.
///
/// The getter chain is [`resolve`](Self::resolve); the setter chain is
/// [`assign`](Self::assign), which reuses the getter chain for every
/// segment but the last. Parsing happens once, at construction.
///
/// # Examples
///
/// ```
/// use og_graph::{BeanNode, Graph, Value};
/// use og_reflect::access::PathAccessor;
///
/// let mut graph = Graph::new();
/// let addr = graph.insert(BeanNode::new("Address").with("city", "Uppsala"));
/// let person = graph.insert(
///     BeanNode::new("Person").with("address", Value::Node(addr)),
/// );
/// let root = Value::Node(person);
///
/// let path = PathAccessor::parse("address.city").unwrap();
/// assert_eq!(path.resolve(&graph, &root).unwrap(), &Value::leaf("Uppsala"));
///
/// path.assign(&mut graph, &root, Value::leaf("Umeå")).unwrap();
/// assert_eq!(path.resolve(&graph, &root).unwrap(), &Value::leaf("Umeå"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathAccessor(Box<[OffsetAccessor<'static>]>);

impl PathAccessor {
    /// Parses the path string and creates a [`PathAccessor`].
    /// Returns [`PathParseError`] if parsing fails.
    pub fn parse(path: &str) -> Result<Self, PathParseError<'_>> {
        let segments = parse_segments(path)?;
        Ok(Self(
            segments
                .into_iter()
                .map(OffsetAccessor::into_owned)
                .collect(),
        ))
    }

    /// The number of segments.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns a reference to the value the path names.
    ///
    /// The accessor itself will not change and can be reused.
    pub fn resolve<'r>(
        &self,
        graph: &'r Graph,
        base: &'r Value,
    ) -> Result<&'r Value, ReflectionError> {
        let mut it = base;
        for segment in &self.0 {
            it = segment.accessor.access(graph, it)?;
        }
        Ok(it)
    }

    /// Replaces the value the path names.
    ///
    /// All but the last segment resolve as in [`resolve`](Self::resolve);
    /// the last segment is applied as a mutator. An empty path cannot
    /// be assigned through.
    pub fn assign(
        &self,
        graph: &mut Graph,
        base: &Value,
        value: Value,
    ) -> Result<(), ReflectionError> {
        let (last, prefix) = match self.0.split_last() {
            Some(split) => split,
            None => {
                return Err(ReflectionError::new(
                    String::new(),
                    ReflectionErrorKind::EmptyPath,
                ));
            }
        };

        // Getter chain over the prefix; the parent must be resolved
        // before the graph can be borrowed mutably.
        let parent = {
            let mut it = base;
            for segment in prefix {
                it = segment.accessor.access(graph, it)?;
            }
            it.clone()
        };

        last.accessor.assign(graph, &parent, value)
    }

    /// Like [`assign`](Self::assign), but validated against the bean
    /// definitions in `registry`.
    ///
    /// When the final segment is a property of a bean whose class is
    /// registered, the assignment is checked: the property must be
    /// declared, and a null is refused if the declared type cannot
    /// hold one.
    pub fn assign_checked(
        &self,
        graph: &mut Graph,
        base: &Value,
        value: Value,
        registry: &TypeRegistry,
    ) -> Result<(), ReflectionError> {
        let (last, prefix) = match self.0.split_last() {
            Some(split) => split,
            None => {
                return Err(ReflectionError::new(
                    String::new(),
                    ReflectionErrorKind::EmptyPath,
                ));
            }
        };

        let parent = {
            let mut it = base;
            for segment in prefix {
                it = segment.accessor.access(graph, it)?;
            }
            it.clone()
        };

        if let Accessor::Property(name) = &last.accessor
            && let Some(id) = parent.as_node()
            && let Some(bean) = graph.get(id).and_then(og_graph::Node::as_bean)
            && let Some(def) = registry.resolve_bean(bean.class())
        {
            def.check_assignable(name, &value)?;
        }

        last.accessor.assign(graph, &parent, value)
    }
}

impl fmt::Display for PathAccessor {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for it in &self.0 {
            fmt::Display::fmt(&it.accessor, f)?;
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::BeanDef;
    use og_graph::{BeanNode, ListNode, tag};

    fn sample() -> (Graph, Value) {
        let mut graph = Graph::new();
        let accounts = graph.insert(ListNode::from_items(["checking", "savings"]));
        let person = graph.insert(
            BeanNode::new("Person")
                .with("name", "Bob")
                .with("accounts", Value::Node(accounts)),
        );
        (graph, Value::Node(person))
    }

    #[test]
    fn resolve_through_list() {
        let (graph, root) = sample();
        let path = PathAccessor::parse("accounts[0]").unwrap();
        assert_eq!(path.resolve(&graph, &root).unwrap(), &Value::leaf("checking"));
    }

    #[test]
    fn resolve_names_failing_segment() {
        let (graph, root) = sample();
        let path = PathAccessor::parse("employer.name").unwrap();
        let err = path.resolve(&graph, &root).unwrap_err();
        assert_eq!(err.segment(), "employer");
    }

    #[test]
    fn assign_indexed() {
        let (mut graph, root) = sample();
        let path = PathAccessor::parse("accounts[1]").unwrap();
        path.assign(&mut graph, &root, Value::leaf("pension")).unwrap();
        assert_eq!(path.resolve(&graph, &root).unwrap(), &Value::leaf("pension"));
    }

    #[test]
    fn assign_follows_self_reference() {
        let mut graph = Graph::new();
        let id = graph.insert(BeanNode::new("Person").with("name", "Bob"));
        graph[id].as_bean_mut().unwrap().set("this", Value::Node(id));
        let root = Value::Node(id);

        let path = PathAccessor::parse("this.this.name").unwrap();
        path.assign(&mut graph, &root, Value::leaf("Rob")).unwrap();
        assert_eq!(
            graph[id].as_bean().unwrap().property("name"),
            Some(&Value::leaf("Rob")),
        );
    }

    #[test]
    fn checked_assign_refuses_null_in_primitive() {
        let (mut graph, root) = sample();
        let mut registry = TypeRegistry::new();
        registry.register_bean(
            BeanDef::new("Person")
                .with_property("name", tag::STRING)
                .with_primitive("age", tag::INTEGER)
                .with_property("accounts", tag::LIST),
        );

        let path = PathAccessor::parse("age").unwrap();
        let err = path
            .assign_checked(&mut graph, &root, Value::Null, &registry)
            .unwrap_err();
        assert_eq!(err.segment(), "age");

        path.assign_checked(&mut graph, &root, Value::leaf(33_i32), &registry)
            .unwrap();
    }

    #[test]
    fn display_round_trip() {
        let path = PathAccessor::parse("a.b[2].c").unwrap();
        assert_eq!(path.to_string(), ".a.b[2].c");
    }
}
