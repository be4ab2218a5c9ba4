//! Provide the slot arena that owns every reference-bearing node.

use core::fmt;

use hashbrown::HashSet;

use crate::node::Node;
use crate::value::Value;

// -----------------------------------------------------------------------------
// NodeId

/// The identity of a node within one [`Graph`].
///
/// A `NodeId` is an arena index, not a pointer: it stays valid for the
/// lifetime of the graph and is meaningless in any other graph. Two
/// ids are the same identity exactly when they are equal, which is
/// what the codec's identity tracking is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The slot index inside the owning graph.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    #[inline]
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

// -----------------------------------------------------------------------------
// Graph

/// A flat arena of reference-bearing nodes.
///
/// Sharing and cycles are expressed through [`NodeId`] indices: any
/// number of [`Value::Node`] positions may name the same slot, and a
/// slot's contents may name any slot, including its own. An object
/// graph as a whole is a `Graph` plus one root [`Value`].
///
/// # Examples
///
/// A bean pointing back at itself:
///
/// ```
/// use og_graph::{BeanNode, Graph, Node, Value};
///
/// let mut graph = Graph::new();
/// let id = graph.insert(BeanNode::new("Person"));
/// graph[id]
///     .as_bean_mut()
///     .unwrap()
///     .set("partner", Value::Node(id));
///
/// let bean = graph[id].as_bean().unwrap();
/// assert_eq!(bean.property("partner"), Some(&Value::Node(id)));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Graph {
    slots: Vec<Node>,
}

impl Graph {
    /// Creates an empty graph.
    #[inline]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Moves a node into the arena and returns its identity.
    pub fn insert(&mut self, node: impl Into<Node>) -> NodeId {
        let id = u32::try_from(self.slots.len()).expect("graph arena overflowed u32 slots");
        self.slots.push(node.into());
        NodeId(id)
    }

    /// Returns the node in the given slot.
    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index())
    }

    /// Returns the node in the given slot mutably.
    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.slots.get_mut(id.index())
    }

    /// The number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena holds no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Iterates over `(id, node)` pairs in insertion order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (NodeId, &Node)> {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, node)| (NodeId(i as u32), node))
    }

    /// Compares two values structurally across graphs.
    ///
    /// Shape equality follows the topology rather than the indices:
    /// leaves compare by value, nodes compare by category, class,
    /// length, property names, and entry order, and a pair of slots
    /// already being compared further up the walk is taken as equal,
    /// which is what terminates cyclic graphs. Two graphs with
    /// different slot numbering but the same reachable structure
    /// compare equal.
    ///
    /// # Examples
    ///
    /// ```
    /// use og_graph::{Graph, ListNode, Value};
    ///
    /// let mut a = Graph::new();
    /// let list_a = a.insert(ListNode::from_items([1_i32, 2]));
    ///
    /// let mut b = Graph::new();
    /// let list_b = b.insert(ListNode::from_items([1_i32, 2]));
    ///
    /// assert!(a.shape_eq(&Value::Node(list_a), &b, &Value::Node(list_b)));
    /// ```
    pub fn shape_eq(&self, value: &Value, other: &Graph, other_value: &Value) -> bool {
        let mut in_progress = HashSet::new();
        self.shape_eq_inner(value, other, other_value, &mut in_progress)
    }

    fn shape_eq_inner(
        &self,
        value: &Value,
        other: &Graph,
        other_value: &Value,
        in_progress: &mut HashSet<(NodeId, NodeId)>,
    ) -> bool {
        let (a, b) = match (value, other_value) {
            (Value::Null, Value::Null) => return true,
            (Value::Leaf(a), Value::Leaf(b)) => return a == b,
            (Value::Node(a), Value::Node(b)) => (*a, *b),
            _ => return false,
        };

        // A pair on the walk stack means we are already comparing it.
        if !in_progress.insert((a, b)) {
            return true;
        }

        let eq = match (self.get(a), other.get(b)) {
            (Some(node_a), Some(node_b)) => self.node_shape_eq(node_a, other, node_b, in_progress),
            _ => false,
        };

        in_progress.remove(&(a, b));
        eq
    }

    fn node_shape_eq(
        &self,
        node: &Node,
        other: &Graph,
        other_node: &Node,
        in_progress: &mut HashSet<(NodeId, NodeId)>,
    ) -> bool {
        if node.kind() != other_node.kind() {
            return false;
        }
        match (node, other_node) {
            (Node::Bean(a), Node::Bean(b)) => {
                a.class() == b.class()
                    && a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((na, va), (nb, vb))| {
                        na == nb && self.shape_eq_inner(va, other, vb, in_progress)
                    })
            }
            (Node::Array(a), Node::Array(b)) => {
                a.elem() == b.elem()
                    && a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(va, vb)| self.shape_eq_inner(va, other, vb, in_progress))
            }
            (Node::List(a), Node::List(b)) => {
                a.len() == b.len()
                    && a.iter()
                        .zip(b.iter())
                        .all(|(va, vb)| self.shape_eq_inner(va, other, vb, in_progress))
            }
            (Node::Map(a), Node::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b.iter()).all(|((ka, va), (kb, vb))| {
                        self.shape_eq_inner(ka, other, kb, in_progress)
                            && self.shape_eq_inner(va, other, vb, in_progress)
                    })
            }
            _ => false,
        }
    }

}

impl core::ops::Index<NodeId> for Graph {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.slots[id.index()]
    }
}

impl core::ops::IndexMut<NodeId> for Graph {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.slots[id.index()]
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{BeanNode, ListNode, MapNode, NodeKind};

    #[test]
    fn insert_and_index() {
        let mut graph = Graph::new();
        let a = graph.insert(ListNode::new());
        let b = graph.insert(MapNode::new());

        assert_ne!(a, b);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph[a].kind(), NodeKind::List);
        assert_eq!(graph[b].kind(), NodeKind::Map);
    }

    #[test]
    fn shape_eq_ignores_slot_numbering() {
        let mut a = Graph::new();
        // Padding so the interesting node gets a different index.
        a.insert(ListNode::new());
        let list_a = a.insert(ListNode::from_items(["x", "y"]));

        let mut b = Graph::new();
        let list_b = b.insert(ListNode::from_items(["x", "y"]));

        assert!(a.shape_eq(&Value::Node(list_a), &b, &Value::Node(list_b)));
    }

    #[test]
    fn shape_eq_detects_difference() {
        let mut a = Graph::new();
        let la = a.insert(ListNode::from_items([1_i32, 2]));
        let mut b = Graph::new();
        let lb = b.insert(ListNode::from_items([1_i32, 3]));

        assert!(!a.shape_eq(&Value::Node(la), &b, &Value::Node(lb)));
    }

    #[test]
    fn shape_eq_terminates_on_cycles() {
        let mut a = Graph::new();
        let ba = a.insert(BeanNode::new("Person"));
        a[ba].as_bean_mut().unwrap().set("this", Value::Node(ba));

        let mut b = Graph::new();
        let bb = b.insert(BeanNode::new("Person"));
        b[bb].as_bean_mut().unwrap().set("this", Value::Node(bb));

        assert!(a.shape_eq(&Value::Node(ba), &b, &Value::Node(bb)));
    }

    #[test]
    fn shape_eq_distinguishes_aliasing() {
        // Two properties sharing one child ...
        let mut a = Graph::new();
        let child_a = a.insert(ListNode::new());
        let root_a = a.insert(
            BeanNode::new("Pair")
                .with("left", Value::Node(child_a))
                .with("right", Value::Node(child_a)),
        );

        // ... still shape-equal to two equal but distinct children;
        // shape equality is about structure, not identity.
        let mut b = Graph::new();
        let left = b.insert(ListNode::new());
        let right = b.insert(ListNode::new());
        let root_b = b.insert(
            BeanNode::new("Pair")
                .with("left", Value::Node(left))
                .with("right", Value::Node(right)),
        );

        assert!(a.shape_eq(&Value::Node(root_a), &b, &Value::Node(root_b)));
    }
}
