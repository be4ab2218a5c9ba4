//! Provide per-call identity tracking for the serializer.

use hashbrown::HashMap;

use og_graph::NodeId;

// -----------------------------------------------------------------------------
// Visit

/// The outcome of presenting a node to the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Visit {
    /// Whether this is the first time the node was seen in this walk.
    pub first_visit: bool,
    /// The id assigned to the node, stable for the rest of the walk.
    pub id: u32,
}

// -----------------------------------------------------------------------------
// IdentityTracker

/// A per-call map from arena identity to a sequential wire id.
///
/// Keyed on [`NodeId`], never on value equality: two equal but
/// distinct nodes get two ids, and a node reached twice gets its
/// original id back with `first_visit == false`. Ids start at 1 and
/// follow discovery order. One tracker serves exactly one serialize
/// call and is then discarded.
///
/// Only reference-bearing values are ever presented; leaves are
/// inlined without an id and bypass the tracker entirely.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    table: HashMap<NodeId, u32>,
    next: u32,
}

impl IdentityTracker {
    /// Creates an empty tracker.
    #[inline]
    pub fn new() -> Self {
        Self {
            table: HashMap::new(),
            next: 1,
        }
    }

    /// Presents a node; assigns a fresh id on first visit, returns
    /// the existing one otherwise.
    pub fn visit(&mut self, node: NodeId) -> Visit {
        match self.table.get(&node) {
            Some(&id) => Visit {
                first_visit: false,
                id,
            },
            None => {
                let id = self.next;
                self.next += 1;
                self.table.insert(node, id);
                Visit {
                    first_visit: true,
                    id,
                }
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use og_graph::{Graph, ListNode};

    #[test]
    fn ids_are_sequential_from_one() {
        let mut graph = Graph::new();
        let a = graph.insert(ListNode::new());
        let b = graph.insert(ListNode::new());

        let mut tracker = IdentityTracker::new();
        assert_eq!(
            tracker.visit(a),
            Visit {
                first_visit: true,
                id: 1,
            },
        );
        assert_eq!(
            tracker.visit(b),
            Visit {
                first_visit: true,
                id: 2,
            },
        );
    }

    #[test]
    fn repeat_visit_keeps_the_id() {
        let mut graph = Graph::new();
        let a = graph.insert(ListNode::new());
        let b = graph.insert(ListNode::new());

        let mut tracker = IdentityTracker::new();
        tracker.visit(a);
        tracker.visit(b);
        let again = tracker.visit(a);
        assert!(!again.first_visit);
        assert_eq!(again.id, 1);
    }

    #[test]
    fn distinct_equal_nodes_get_distinct_ids() {
        let mut graph = Graph::new();
        let a = graph.insert(ListNode::from_items([1_i32]));
        let b = graph.insert(ListNode::from_items([1_i32]));
        assert_eq!(graph[a], graph[b]);

        let mut tracker = IdentityTracker::new();
        let va = tracker.visit(a);
        let vb = tracker.visit(b);
        assert_ne!(va.id, vb.id);
    }
}
