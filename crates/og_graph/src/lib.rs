#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

mod graph;
mod leaf;
mod node;
mod value;

pub mod tag;

// -----------------------------------------------------------------------------
// Exports

pub use graph::{Graph, NodeId};
pub use leaf::{CustomLeaf, Leaf};
pub use node::{ArrayNode, BeanNode, ListNode, MapNode, Node, NodeKind};
pub use value::Value;
