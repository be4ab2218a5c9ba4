//! Provide the depth-first serialization walk.

use std::borrow::Cow;

use og_graph::{ArrayNode, BeanNode, Graph, Leaf, ListNode, MapNode, Node, Value};
use og_reflect::registry::{PropertyDef, TypeRegistry};

use crate::escape::escape;
use crate::ident::IdentityTracker;
use crate::ser::error::{EncodeError, EncodeErrorKind};
use crate::trace::TagGuard;

// -----------------------------------------------------------------------------
// GraphSerializer

/// The depth-first walk producing the tagged text form of a graph.
///
/// The walk is deterministic: given the same graph and the same
/// registered bean definitions, two serializations are byte-identical.
/// No sorting is applied anywhere; order follows property declaration
/// order (stored order for undeclared properties) and element
/// insertion order.
///
/// Every reference-bearing node is emitted in full exactly once, on
/// first visit, under a fresh `mem` id; later visits write a `ref`
/// marker instead, which is the sole cycle-breaking step of the walk.
/// Leaves are inlined without an id, every time they appear.
///
/// # Examples
///
/// ```
/// use og_codec::GraphSerializer;
/// use og_graph::{Graph, Value};
/// use og_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let graph = Graph::new();
/// let serializer = GraphSerializer::new(&graph, &registry);
///
/// let text = serializer.serialize(&Value::leaf(42_i32)).unwrap();
/// assert_eq!(text, r#"<obj class="Integer">42</obj>"#);
/// ```
#[derive(Debug)]
pub struct GraphSerializer<'a> {
    graph: &'a Graph,
    registry: &'a TypeRegistry,
}

impl<'a> GraphSerializer<'a> {
    /// Creates a serializer over one graph.
    #[inline]
    pub fn new(graph: &'a Graph, registry: &'a TypeRegistry) -> Self {
        Self { graph, registry }
    }

    /// Serializes the value (and everything reachable from it).
    ///
    /// The identity tracker lives for exactly this call; serializing
    /// the same value twice produces two independent, identical
    /// documents.
    pub fn serialize(&self, root: &Value) -> Result<String, EncodeError> {
        let mut out = String::new();
        let mut tracker = IdentityTracker::new();
        self.write_value(&mut out, root, &mut tracker)?;
        Ok(out)
    }

    fn write_value(
        &self,
        out: &mut String,
        value: &Value,
        tracker: &mut IdentityTracker,
    ) -> Result<(), EncodeError> {
        match value {
            Value::Null => {
                out.push_str("<null/>");
                Ok(())
            }
            Value::Leaf(leaf) => self.write_leaf(out, leaf),
            Value::Node(id) => {
                let Some(node) = self.graph.get(*id) else {
                    return Err(EncodeErrorKind::UnboundNode { id: *id }.into());
                };
                let class = node.class();
                let _guard = TagGuard::enter(&class);

                let visit = tracker.visit(*id);
                if !visit.first_visit {
                    out.push_str("<obj class=\"");
                    out.push_str(&escape(&class));
                    out.push_str("\" ref=\"");
                    out.push_str(&visit.id.to_string());
                    out.push_str("\"/>");
                    return Ok(());
                }

                out.push_str("<obj class=\"");
                out.push_str(&escape(&class));
                out.push_str("\" mem=\"");
                out.push_str(&visit.id.to_string());
                out.push_str("\">");
                match node {
                    Node::Bean(bean) => self.write_bean(out, bean, tracker)?,
                    Node::Array(array) => self.write_array(out, array, tracker)?,
                    Node::List(list) => self.write_list(out, list, tracker)?,
                    Node::Map(map) => self.write_map(out, map, tracker)?,
                }
                out.push_str("</obj>");
                Ok(())
            }
        }
    }

    fn write_leaf(&self, out: &mut String, leaf: &Leaf) -> Result<(), EncodeError> {
        let _guard = TagGuard::enter(leaf.tag());
        let text = self.render_leaf(leaf)?;
        out.push_str("<obj class=\"");
        out.push_str(&escape(leaf.tag()));
        out.push_str("\">");
        out.push_str(&escape(&text));
        out.push_str("</obj>");
        Ok(())
    }

    /// Renders a leaf through its registered factory, falling back to
    /// the leaf's own generic formatter for unregistered tags.
    fn render_leaf<'l>(&self, leaf: &'l Leaf) -> Result<Cow<'l, str>, EncodeError> {
        match self.registry.resolve_leaf(leaf.tag()) {
            Some(factory) => Ok(factory.render(leaf)?),
            None => Ok(leaf.render()),
        }
    }

    fn write_bean(
        &self,
        out: &mut String,
        bean: &BeanNode,
        tracker: &mut IdentityTracker,
    ) -> Result<(), EncodeError> {
        let def = self.registry.resolve_bean(bean.class());

        // Declared properties first, in declaration order; properties
        // the definition does not know about follow in stored order.
        let mut ordered: Vec<(&str, &Value, Option<&PropertyDef>)> =
            Vec::with_capacity(bean.len());
        match def {
            Some(def) => {
                for property in def.properties() {
                    if let Some(value) = bean.property(property.name()) {
                        ordered.push((property.name(), value, Some(property)));
                    }
                }
                for (name, value) in bean.iter() {
                    if def.property(name).is_none() {
                        ordered.push((name, value, None));
                    }
                }
            }
            None => ordered.extend(bean.iter().map(|(n, v)| (n, v, None))),
        }

        for (name, value, property) in ordered {
            out.push('<');
            out.push_str(name);
            out.push('>');
            match (value, property) {
                // A leaf matching its declared tag travels as bare
                // text; the declared tag recovers it on the way in.
                (Value::Leaf(leaf), Some(property)) if leaf.tag() == property.ty() => {
                    match self.registry.resolve_leaf(property.ty()) {
                        Some(factory) => {
                            let _guard = TagGuard::enter(leaf.tag());
                            out.push_str(&escape(&factory.render(leaf)?));
                        }
                        None => self.write_value(out, value, tracker)?,
                    }
                }
                _ => self.write_value(out, value, tracker)?,
            }
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Ok(())
    }

    fn write_array(
        &self,
        out: &mut String,
        array: &ArrayNode,
        tracker: &mut IdentityTracker,
    ) -> Result<(), EncodeError> {
        for item in array.iter() {
            out.push_str("<e>");
            match item {
                // Elements matching the declared element tag travel
                // as bare text, like declared bean properties.
                Value::Leaf(leaf) if leaf.tag() == array.elem() => {
                    match self.registry.resolve_leaf(array.elem()) {
                        Some(factory) => {
                            let _guard = TagGuard::enter(leaf.tag());
                            out.push_str(&escape(&factory.render(leaf)?));
                        }
                        None => self.write_value(out, item, tracker)?,
                    }
                }
                _ => self.write_value(out, item, tracker)?,
            }
            out.push_str("</e>");
        }
        Ok(())
    }

    fn write_list(
        &self,
        out: &mut String,
        list: &ListNode,
        tracker: &mut IdentityTracker,
    ) -> Result<(), EncodeError> {
        // List elements are self-describing; no declared tag exists
        // that could recover bare text.
        for item in list.iter() {
            out.push_str("<e>");
            self.write_value(out, item, tracker)?;
            out.push_str("</e>");
        }
        Ok(())
    }

    fn write_map(
        &self,
        out: &mut String,
        map: &MapNode,
        tracker: &mut IdentityTracker,
    ) -> Result<(), EncodeError> {
        for (key, value) in map.iter() {
            out.push_str("<map>");
            self.write_value(out, key, tracker)?;
            self.write_value(out, value, tracker)?;
            out.push_str("</map>");
        }
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use og_graph::tag;
    use og_reflect::registry::BeanDef;

    fn serialize(graph: &Graph, registry: &TypeRegistry, root: &Value) -> String {
        GraphSerializer::new(graph, registry).serialize(root).unwrap()
    }

    #[test]
    fn integer_leaf() {
        let registry = TypeRegistry::new();
        let graph = Graph::new();
        assert_eq!(
            serialize(&graph, &registry, &Value::leaf(42_i32)),
            r#"<obj class="Integer">42</obj>"#,
        );
    }

    #[test]
    fn string_leaf_is_escaped() {
        let registry = TypeRegistry::new();
        let graph = Graph::new();
        assert_eq!(
            serialize(&graph, &registry, &Value::leaf(r#"Say "hello"."#)),
            r#"<obj class="String">Say &quot;hello&quot;.</obj>"#,
        );
    }

    #[test]
    fn integer_array() {
        let registry = TypeRegistry::new();
        let mut graph = Graph::new();
        let id = graph.insert(ArrayNode::from_items(tag::INTEGER, [1_i32, 2, 3]));
        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            r#"<obj class="Integer[]" mem="1"><e>1</e><e>2</e><e>3</e></obj>"#,
        );
    }

    #[test]
    fn two_entry_map() {
        let registry = TypeRegistry::new();
        let mut graph = Graph::new();
        let mut map = MapNode::new();
        map.insert("a", 1_i32);
        map.insert("b", 2_i32);
        let id = graph.insert(map);
        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            concat!(
                r#"<obj class="Map" mem="1">"#,
                r#"<map><obj class="String">a</obj><obj class="Integer">1</obj></map>"#,
                r#"<map><obj class="String">b</obj><obj class="Integer">2</obj></map>"#,
                r#"</obj>"#,
            ),
        );
    }

    #[test]
    fn self_reference_emits_one_id() {
        let mut registry = TypeRegistry::new();
        registry.register_bean(BeanDef::new("Person").with_property("partner", "Person"));
        let mut graph = Graph::new();
        let id = graph.insert(BeanNode::new("Person"));
        graph[id]
            .as_bean_mut()
            .unwrap()
            .set("partner", Value::Node(id));

        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            concat!(
                r#"<obj class="Person" mem="1">"#,
                r#"<partner><obj class="Person" ref="1"/></partner>"#,
                r#"</obj>"#,
            ),
        );
    }

    #[test]
    fn all_null_bean() {
        let mut registry = TypeRegistry::new();
        registry.register_bean(
            BeanDef::new("Person")
                .with_property("name", tag::STRING)
                .with_property("partner", "Person"),
        );
        let mut graph = Graph::new();
        let id = graph.insert(
            BeanNode::new("Person")
                .with("name", Value::Null)
                .with("partner", Value::Null),
        );

        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            concat!(
                r#"<obj class="Person" mem="1">"#,
                r#"<name><null/></name>"#,
                r#"<partner><null/></partner>"#,
                r#"</obj>"#,
            ),
        );
    }

    #[test]
    fn declared_leaf_property_is_bare_text() {
        let mut registry = TypeRegistry::new();
        registry.register_bean(
            BeanDef::new("Person")
                .with_property("name", tag::STRING)
                .with_primitive("age", tag::INTEGER),
        );
        let mut graph = Graph::new();
        let id = graph.insert(
            BeanNode::new("Person")
                .with("name", "Bob")
                .with("age", 33_i32),
        );

        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            r#"<obj class="Person" mem="1"><name>Bob</name><age>33</age></obj>"#,
        );
    }

    #[test]
    fn undeclared_property_is_self_describing() {
        let registry = TypeRegistry::new();
        let mut graph = Graph::new();
        let id = graph.insert(BeanNode::new("Person").with("name", "Bob"));

        // No bean definition: the leaf keeps its own tag on the wire.
        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            concat!(
                r#"<obj class="Person" mem="1">"#,
                r#"<name><obj class="String">Bob</obj></name>"#,
                r#"</obj>"#,
            ),
        );
    }

    #[test]
    fn declaration_order_wins_over_stored_order() {
        let mut registry = TypeRegistry::new();
        registry.register_bean(
            BeanDef::new("Person")
                .with_property("name", tag::STRING)
                .with_primitive("age", tag::INTEGER),
        );
        let mut graph = Graph::new();
        // Stored in the opposite order.
        let id = graph.insert(
            BeanNode::new("Person")
                .with("age", 33_i32)
                .with("name", "Bob"),
        );

        assert_eq!(
            serialize(&graph, &registry, &Value::Node(id)),
            r#"<obj class="Person" mem="1"><name>Bob</name><age>33</age></obj>"#,
        );
    }

    #[test]
    fn shared_child_is_emitted_once() {
        let registry = TypeRegistry::new();
        let mut graph = Graph::new();
        let child = graph.insert(ListNode::from_items([7_i32]));
        let root = graph.insert(
            BeanNode::new("Pair")
                .with("left", Value::Node(child))
                .with("right", Value::Node(child)),
        );

        let text = serialize(&graph, &registry, &Value::Node(root));
        assert_eq!(text.matches("mem=\"2\"").count(), 1);
        assert_eq!(text.matches("ref=\"2\"").count(), 1);
    }

    #[test]
    fn two_calls_are_byte_identical() {
        let registry = TypeRegistry::new();
        let mut graph = Graph::new();
        let list = graph.insert(ListNode::from_items(["x", "y"]));
        let root = Value::Node(list);

        let serializer = GraphSerializer::new(&graph, &registry);
        assert_eq!(
            serializer.serialize(&root).unwrap(),
            serializer.serialize(&root).unwrap(),
        );
    }

    #[test]
    fn unbound_node_is_reported() {
        let registry = TypeRegistry::new();
        let mut other = Graph::new();
        let foreign = other.insert(ListNode::new());

        let graph = Graph::new();
        let err = GraphSerializer::new(&graph, &registry)
            .serialize(&Value::Node(foreign))
            .unwrap_err();
        assert!(matches!(err.kind(), EncodeErrorKind::UnboundNode { .. }));
    }
}
