//! Provide path-based access to values inside an object graph.
//!
//! A property path is a dotted, optionally indexed chain resolved
//! against a starting value: `owner.accounts[2].label` reads the
//! `owner` property, indexes its `accounts` sequence, and reads the
//! `label` property of the element. Paths resolve through the graph
//! arena, so they follow shared nodes and cycles like any other
//! traversal.
//!
//! Two APIs are exposed:
//!
//! - [`PathAccessor`]: a parsed, reusable accessor. The path string is
//!   parsed once; resolution and assignment can then run any number of
//!   times against any graph.
//! - [`Accessor`]: a single path segment, for callers that build
//!   chains programmatically.
//!
//! # Syntax
//!
//! - Property: a bare name, segments joined with `.` — `a.b.c`
//! - Index: a bracketed number after a segment — `list[2]`, `grid[0][1]`
//!
//! Parsing failures are [`PathParseError`]s with a byte offset;
//! resolution failures are [`ReflectionError`]s naming the segment
//! that did not resolve.
//!
//! # Examples
//!
//! ```
//! use og_graph::{BeanNode, Graph, ListNode, Value};
//! use og_reflect::access::PathAccessor;
//!
//! let mut graph = Graph::new();
//! let accounts = graph.insert(ListNode::from_items(["checking", "savings"]));
//! let person = graph.insert(
//!     BeanNode::new("Person").with("accounts", Value::Node(accounts)),
//! );
//!
//! let path = PathAccessor::parse("accounts[1]").unwrap();
//! let root = Value::Node(person);
//! let value = path.resolve(&graph, &root).unwrap();
//! assert_eq!(value, &Value::leaf("savings"));
//! ```

// -----------------------------------------------------------------------------
// Modules

mod accessor;
mod path;
mod path_access;

// -----------------------------------------------------------------------------
// Exports

pub use accessor::{Accessor, OffsetAccessor, ReflectionError, ReflectionErrorKind};
pub use path::PathParseError;
pub use path_access::PathAccessor;
