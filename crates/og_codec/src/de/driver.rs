//! Provide the two-phase graph rebuild.

use hashbrown::HashMap;

use og_graph::{ArrayNode, BeanNode, Graph, ListNode, MapNode, Node, NodeId, Value, tag};
use og_reflect::access::{ReflectionError, ReflectionErrorKind};
use og_reflect::registry::{BeanDef, ConstructionError, LeafFactory, TextFactory, TypeRegistry};

use crate::de::error::{ClassResolutionError, DanglingReferenceError, DecodeError};
use crate::de::tokenizer::{RawNode, SyntaxError, tokenize};
use crate::trace::TagGuard;

// -----------------------------------------------------------------------------
// Parsed

/// The result of one parse call: the rebuilt arena and its root.
#[derive(Debug)]
pub struct Parsed {
    /// The arena holding every reference-bearing node of the document.
    pub graph: Graph,
    /// The document's root value.
    pub root: Value,
}

// -----------------------------------------------------------------------------
// GraphParser

/// Rebuilds an object graph from its tagged text form.
///
/// Parsing runs in two phases per node. When an element with a `mem`
/// id opens, its arena slot is allocated and the id is bound in the
/// reference table *before* any child is processed; the children then
/// fill the slot. A `ref` marker anywhere below can therefore resolve
/// an ancestor that is still under construction, which is how
/// self-references and parent-chain cycles come back. Only backward
/// references resolve; a forward reference is a
/// [`DanglingReferenceError`].
///
/// The reference table lives for exactly one call; parsing two
/// documents with the same ids never interferes.
///
/// # Examples
///
/// ```
/// use og_codec::GraphParser;
/// use og_graph::Value;
/// use og_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
/// let parsed = GraphParser::new(&registry)
///     .parse(r#"<obj class="Integer">42</obj>"#)
///     .unwrap();
/// assert_eq!(parsed.root, Value::leaf(42_i32));
/// ```
#[derive(Debug)]
pub struct GraphParser<'a> {
    registry: &'a TypeRegistry,
}

impl<'a> GraphParser<'a> {
    /// Creates a parser over one registry.
    #[inline]
    pub fn new(registry: &'a TypeRegistry) -> Self {
        Self { registry }
    }

    /// Parses one document into a fresh graph.
    pub fn parse(&self, input: &str) -> Result<Parsed, DecodeError> {
        let raw = tokenize(input)?;
        let mut builder = Builder {
            registry: self.registry,
            graph: Graph::new(),
            table: HashMap::new(),
        };
        let root = builder.value(&raw)?;
        Ok(Parsed {
            graph: builder.graph,
            root,
        })
    }
}

// -----------------------------------------------------------------------------
// Builder

struct Builder<'a> {
    registry: &'a TypeRegistry,
    graph: Graph,
    table: HashMap<u32, NodeId>,
}

fn parse_id(text: &str, offset: usize) -> Result<u32, SyntaxError> {
    text.parse()
        .map_err(|_| SyntaxError::new(offset, format!("`{text}` is not a valid id")))
}

impl Builder<'_> {
    fn value(&mut self, raw: &RawNode) -> Result<Value, DecodeError> {
        match raw.name.as_str() {
            "null" => {
                if !raw.attrs.is_empty() || !raw.children.is_empty() || raw.text.is_some() {
                    return Err(SyntaxError::new(raw.offset, "`null` carries no content").into());
                }
                Ok(Value::Null)
            }
            "obj" => self.object(raw),
            other => Err(SyntaxError::new(
                raw.offset,
                format!("expected `obj` or `null`, found `{other}`"),
            )
            .into()),
        }
    }

    fn object(&mut self, raw: &RawNode) -> Result<Value, DecodeError> {
        let Some(class) = raw.attr("class") else {
            return Err(
                SyntaxError::new(raw.offset, "`obj` is missing its `class` attribute").into(),
            );
        };
        let _guard = TagGuard::enter(class);

        if let Some(reference) = raw.attr("ref") {
            if raw.attr("mem").is_some() {
                return Err(SyntaxError::new(
                    raw.offset,
                    "`mem` and `ref` cannot appear on the same node",
                )
                .into());
            }
            if !raw.children.is_empty() || raw.text.is_some() {
                return Err(SyntaxError::new(
                    raw.offset,
                    "a reference marker carries no content",
                )
                .into());
            }
            let id = parse_id(reference, raw.offset)?;
            return match self.table.get(&id) {
                Some(&node) => Ok(Value::Node(node)),
                None => Err(DanglingReferenceError {
                    id,
                    offset: raw.offset,
                }
                .into()),
            };
        }

        let mem = raw.attr("mem").map(|m| parse_id(m, raw.offset)).transpose()?;

        if let Some(elem) = class.strip_suffix(tag::ARRAY_SUFFIX) {
            return self.array(raw, elem, mem).map(Value::Node);
        }
        if class == tag::LIST {
            return self.list(raw, mem).map(Value::Node);
        }
        if class == tag::MAP {
            return self.map(raw, mem).map(Value::Node);
        }
        if self.registry.contains_leaf(class) {
            return self.leaf(raw, class, mem);
        }
        if let Some(def) = self.registry.resolve_bean(class) {
            let def = def.clone();
            return self.bean(raw, &def, mem).map(Value::Node);
        }
        if raw.children.is_empty() {
            // The single-parameter fallback: an unregistered tag with
            // pure text content round-trips as an opaque text leaf.
            Self::forbid_identity(raw, class, mem)?;
            let text = raw.text.as_deref().unwrap_or("");
            return Ok(Value::Leaf(TextFactory::new(class).construct(text)?));
        }
        Err(ClassResolutionError {
            class: class.to_owned(),
            offset: raw.offset,
        }
        .into())
    }

    /// Value types are always inlined and never tracked; an identity
    /// id on one is malformed input.
    fn forbid_identity(raw: &RawNode, class: &str, mem: Option<u32>) -> Result<(), SyntaxError> {
        if mem.is_some() {
            return Err(SyntaxError::new(
                raw.offset,
                format!("value type `{class}` cannot carry an identity id"),
            ));
        }
        Ok(())
    }

    /// Children-bearing nodes hold elements; any non-whitespace text
    /// directly inside them is malformed.
    fn expect_elements(raw: &RawNode, class: &str) -> Result<(), SyntaxError> {
        match &raw.text {
            Some(text) if !text.trim().is_empty() => Err(SyntaxError::new(
                raw.offset,
                format!("`{class}` holds elements, not text"),
            )),
            _ => Ok(()),
        }
    }

    fn expect_wrapper(raw: &RawNode, name: &str) -> Result<(), SyntaxError> {
        if raw.name != name {
            return Err(SyntaxError::new(
                raw.offset,
                format!("expected `{name}`, found `{}`", raw.name),
            ));
        }
        if !raw.attrs.is_empty() {
            return Err(SyntaxError::new(
                raw.offset,
                format!("unexpected attribute on `{}`", raw.name),
            ));
        }
        Ok(())
    }

    fn bind(&mut self, mem: Option<u32>, id: NodeId, offset: usize) -> Result<(), SyntaxError> {
        if let Some(mem) = mem
            && self.table.insert(mem, id).is_some()
        {
            return Err(SyntaxError::new(offset, format!("duplicate id `{mem}`")));
        }
        Ok(())
    }

    fn leaf(&mut self, raw: &RawNode, class: &str, mem: Option<u32>) -> Result<Value, DecodeError> {
        Self::forbid_identity(raw, class, mem)?;
        if !raw.children.is_empty() {
            return Err(SyntaxError::new(
                raw.offset,
                format!("`{class}` holds text, not elements"),
            )
            .into());
        }
        let text = raw.text.as_deref().unwrap_or("");
        let Some(factory) = self.registry.resolve_leaf(class) else {
            return Err(ConstructionError::no_factory(class.to_owned(), text).into());
        };
        Ok(Value::Leaf(factory.construct(text)?))
    }

    fn bean(
        &mut self,
        raw: &RawNode,
        def: &BeanDef,
        mem: Option<u32>,
    ) -> Result<NodeId, DecodeError> {
        // Phase 1: the slot exists and the id resolves before any
        // child is touched.
        let id = self.graph.insert(BeanNode::new(def.class()));
        self.bind(mem, id, raw.offset)?;
        Self::expect_elements(raw, def.class())?;

        for child in &raw.children {
            if !child.attrs.is_empty() {
                return Err(SyntaxError::new(
                    child.offset,
                    format!("unexpected attribute on property `{}`", child.name),
                )
                .into());
            }
            let value = match child.children.as_slice() {
                // Bare text: the declared tag says what to construct.
                [] => {
                    let text = child.text.as_deref().unwrap_or("");
                    let Some(property) = def.property(&child.name) else {
                        return Err(ReflectionError::new(
                            child.name.clone(),
                            ReflectionErrorKind::NoSuchProperty {
                                class: def.class().to_owned(),
                            },
                        )
                        .into());
                    };
                    let Some(factory) = self.registry.resolve_leaf(property.ty()) else {
                        return Err(
                            ConstructionError::no_factory(property.ty().to_owned(), text).into()
                        );
                    };
                    Value::Leaf(factory.construct(text)?)
                }
                [wrapped] => {
                    let value = self.value(wrapped)?;
                    // Full-form properties are self-describing, so an
                    // undeclared one is accepted as-is; the declared
                    // ones still go through the nullability check.
                    if def.property(&child.name).is_some() {
                        def.check_assignable(&child.name, &value)?;
                    }
                    value
                }
                _ => {
                    return Err(SyntaxError::new(
                        child.offset,
                        format!("property `{}` holds more than one value", child.name),
                    )
                    .into());
                }
            };
            if let Some(Node::Bean(bean)) = self.graph.get_mut(id) {
                bean.set(child.name.as_str(), value);
            }
        }
        Ok(id)
    }

    fn array(&mut self, raw: &RawNode, elem: &str, mem: Option<u32>) -> Result<NodeId, DecodeError> {
        let id = self.graph.insert(ArrayNode::new(elem));
        self.bind(mem, id, raw.offset)?;
        Self::expect_elements(raw, elem)?;

        for child in &raw.children {
            Self::expect_wrapper(child, "e")?;
            let value = match child.children.as_slice() {
                [] => {
                    let text = child.text.as_deref().unwrap_or("");
                    let Some(factory) = self.registry.resolve_leaf(elem) else {
                        return Err(ConstructionError::no_factory(elem.to_owned(), text).into());
                    };
                    Value::Leaf(factory.construct(text)?)
                }
                [wrapped] => {
                    let value = self.value(wrapped)?;
                    if let Value::Leaf(leaf) = &value
                        && leaf.tag() != elem
                    {
                        return Err(ConstructionError::new(
                            elem.to_owned(),
                            leaf.render().into_owned(),
                            format!("array element has tag `{}`", leaf.tag()),
                        )
                        .into());
                    }
                    value
                }
                _ => {
                    return Err(SyntaxError::new(
                        child.offset,
                        "an element holds exactly one value",
                    )
                    .into());
                }
            };
            if let Some(Node::Array(array)) = self.graph.get_mut(id) {
                array.push(value);
            }
        }
        Ok(id)
    }

    fn list(&mut self, raw: &RawNode, mem: Option<u32>) -> Result<NodeId, DecodeError> {
        let id = self.graph.insert(ListNode::new());
        self.bind(mem, id, raw.offset)?;
        Self::expect_elements(raw, tag::LIST)?;

        for child in &raw.children {
            Self::expect_wrapper(child, "e")?;
            // No declared element tag exists, so bare text has no
            // recoverable type; list elements are self-describing.
            let value = match child.children.as_slice() {
                [wrapped] => self.value(wrapped)?,
                _ => {
                    return Err(SyntaxError::new(
                        child.offset,
                        "a list element holds exactly one self-describing value",
                    )
                    .into());
                }
            };
            if let Some(Node::List(list)) = self.graph.get_mut(id) {
                list.push(value);
            }
        }
        Ok(id)
    }

    fn map(&mut self, raw: &RawNode, mem: Option<u32>) -> Result<NodeId, DecodeError> {
        let id = self.graph.insert(MapNode::new());
        self.bind(mem, id, raw.offset)?;
        Self::expect_elements(raw, tag::MAP)?;

        for child in &raw.children {
            Self::expect_wrapper(child, "map")?;
            let [key, value] = child.children.as_slice() else {
                return Err(SyntaxError::new(
                    child.offset,
                    "a map entry holds exactly two subtrees, key then value",
                )
                .into());
            };
            let key = self.value(key)?;
            let value = self.value(value)?;
            if let Some(Node::Map(map)) = self.graph.get_mut(id) {
                map.insert(key, value);
            }
        }
        Ok(id)
    }
}

// -----------------------------------------------------------------------------
// Tests
