#![doc = include_str!("../README.md")]

pub use og_codec as codec;
pub use og_graph as graph;
pub use og_reflect as reflect;
