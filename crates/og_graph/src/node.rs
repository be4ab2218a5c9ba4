//! Provide the reference-bearing node categories.
//!
//! ## Menu
//!
//! The four categories that take part in identity tracking, each with
//! its own concrete type:
//!
//! - [`BeanNode`]: named properties in a stable order.
//! - [`ArrayNode`]: a sequence with a declared element tag.
//! - [`ListNode`]: an ordered collection without a declared element tag.
//! - [`MapNode`]: ordered key/value entries.
//!
//! [`Node`] is the closed sum of the four. Everything that is not one
//! of these categories is either a leaf or null and lives inline in a
//! [`Value`](crate::Value); see the crate-level documentation.

use core::fmt;

use crate::tag;
use crate::value::Value;

// -----------------------------------------------------------------------------
// NodeKind

/// The category of a [`Node`], used in dispatch and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Bean,
    Array,
    List,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bean => "bean",
            Self::Array => "array",
            Self::List => "list",
            Self::Map => "map",
        })
    }
}

// -----------------------------------------------------------------------------
// BeanNode

/// A node with named properties.
///
/// Property order is insertion order and is preserved exactly; the
/// serializer may re-order against a registered bean definition, but
/// the node itself never sorts. A property that was never set is
/// absent, which is a different state from a property set to
/// [`Value::Null`].
#[derive(Debug, Clone, PartialEq)]
pub struct BeanNode {
    class: String,
    properties: Vec<(String, Value)>,
}

impl BeanNode {
    /// Creates an empty bean of the given class.
    #[inline]
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            properties: Vec::new(),
        }
    }

    /// The class tag of this bean.
    #[inline]
    pub fn class(&self) -> &str {
        &self.class
    }

    /// Returns the value of a property, or `None` if it is absent.
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns a mutable reference to a property value.
    pub fn property_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.properties
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Sets a property, replacing any previous value.
    ///
    /// A new property is appended; an existing one keeps its position.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        let name = name.into();
        match self.property_mut(&name) {
            Some(slot) => *slot = value.into(),
            None => self.properties.push((name, value.into())),
        }
        self
    }

    /// Builder-style [`set`](Self::set).
    #[inline]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// The number of present properties.
    #[inline]
    pub fn len(&self) -> usize {
        self.properties.len()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &Value)> {
        self.properties.iter().map(|(n, v)| (n.as_str(), v))
    }
}

// -----------------------------------------------------------------------------
// ArrayNode

/// A sequence with a declared element tag.
///
/// The element tag becomes part of the wire class name
/// (`Integer[]` for an array of `Integer`), so an array knows what
/// its elements claim to be even when it is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    elem: String,
    items: Vec<Value>,
}

impl ArrayNode {
    /// Creates an empty array whose elements are tagged `elem`.
    #[inline]
    pub fn new(elem: impl Into<String>) -> Self {
        Self {
            elem: elem.into(),
            items: Vec::new(),
        }
    }

    /// Creates an array from the given items.
    #[inline]
    pub fn from_items(
        elem: impl Into<String>,
        items: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Self {
        Self {
            elem: elem.into(),
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// The declared element tag.
    #[inline]
    pub fn elem(&self) -> &str {
        &self.elem
    }

    /// The wire class name of this array, e.g. `Integer[]`.
    #[inline]
    pub fn class(&self) -> String {
        let mut class = String::with_capacity(self.elem.len() + tag::ARRAY_SUFFIX.len());
        class.push_str(&self.elem);
        class.push_str(tag::ARRAY_SUFFIX);
        class
    }

    /// Appends an element.
    #[inline]
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the elements in order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.items.iter()
    }
}

// -----------------------------------------------------------------------------
// ListNode

/// An ordered collection without a declared element tag.
///
/// Unlike an [`ArrayNode`], a list says nothing about its elements;
/// every element is self-describing on the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListNode {
    items: Vec<Value>,
}

impl ListNode {
    /// Creates an empty list.
    #[inline]
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates a list from the given items.
    #[inline]
    pub fn from_items(items: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self {
            items: items.into_iter().map(Into::into).collect(),
        }
    }

    /// Appends an element.
    #[inline]
    pub fn push(&mut self, value: impl Into<Value>) {
        self.items.push(value.into());
    }

    /// Returns the element at `index`.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Returns a mutable reference to the element at `index`.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    /// The number of elements.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Iterates over the elements in order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Value> {
        self.items.iter()
    }
}

// -----------------------------------------------------------------------------
// MapNode

/// Ordered key/value entries.
///
/// Entry order is insertion order and is preserved through a
/// round-trip. Keys compare by [`Value`] equality, which for node
/// keys means arena identity.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapNode {
    entries: Vec<(Value, Value)>,
}

impl MapNode {
    /// Creates an empty map.
    #[inline]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts an entry, replacing the value of an equal key.
    ///
    /// A new key is appended; an existing one keeps its position.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value.into(),
            None => self.entries.push((key, value.into())),
        }
    }

    /// Returns the value stored under an equal key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// The number of entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Iterates over `(key, value)` pairs in insertion order.
    #[inline]
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }
}

// -----------------------------------------------------------------------------
// Node

/// A reference-bearing node: the closed sum of the four categories
/// that live in the [`Graph`](crate::Graph) arena.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Bean(BeanNode),
    Array(ArrayNode),
    List(ListNode),
    Map(MapNode),
}

impl Node {
    /// The category of this node.
    #[inline]
    pub const fn kind(&self) -> NodeKind {
        match self {
            Self::Bean(_) => NodeKind::Bean,
            Self::Array(_) => NodeKind::Array,
            Self::List(_) => NodeKind::List,
            Self::Map(_) => NodeKind::Map,
        }
    }

    /// The wire class name of this node.
    pub fn class(&self) -> String {
        match self {
            Self::Bean(bean) => bean.class().to_owned(),
            Self::Array(array) => array.class(),
            Self::List(_) => tag::LIST.to_owned(),
            Self::Map(_) => tag::MAP.to_owned(),
        }
    }

    /// Returns the inner bean, if this is a bean node.
    #[inline]
    pub const fn as_bean(&self) -> Option<&BeanNode> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Returns the inner bean mutably, if this is a bean node.
    #[inline]
    pub const fn as_bean_mut(&mut self) -> Option<&mut BeanNode> {
        match self {
            Self::Bean(bean) => Some(bean),
            _ => None,
        }
    }

    /// Returns the inner list, if this is a list node.
    #[inline]
    pub const fn as_list(&self) -> Option<&ListNode> {
        match self {
            Self::List(list) => Some(list),
            _ => None,
        }
    }

    /// Returns the inner array, if this is an array node.
    #[inline]
    pub const fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Self::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Returns the inner map, if this is a map node.
    #[inline]
    pub const fn as_map(&self) -> Option<&MapNode> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }
}

macro_rules! impl_node_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Node {
                #[inline]
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

impl_node_from! {
    BeanNode => Bean,
    ArrayNode => Array,
    ListNode => List,
    MapNode => Map,
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bean_set_keeps_position() {
        let mut bean = BeanNode::new("Person");
        bean.set("name", "Bob").set("age", 33_i32);
        bean.set("name", "Rob");

        let names: Vec<_> = bean.iter().map(|(n, _)| n.to_owned()).collect();
        assert_eq!(names, ["name", "age"]);
        assert_eq!(bean.property("name"), Some(&Value::leaf("Rob")));
        assert_eq!(bean.property("missing"), None);
    }

    #[test]
    fn array_class_name() {
        let array = ArrayNode::from_items("Integer", [1_i32, 2, 3]);
        assert_eq!(array.class(), "Integer[]");
        assert_eq!(array.len(), 3);
    }

    #[test]
    fn map_insert_replaces_equal_key() {
        let mut map = MapNode::new();
        map.insert("a", 1_i32);
        map.insert("b", 2_i32);
        map.insert("a", 3_i32);

        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&Value::leaf("a")), Some(&Value::leaf(3_i32)));
    }
}
