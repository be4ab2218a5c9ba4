//! Wire names of the built-in type tags.
//!
//! These are the `class` attribute values the codec emits for the
//! closed set of value and container categories. User types extend the
//! vocabulary through the type registry; the names below are reserved.

/// `class` name of the boolean leaf.
pub const BOOLEAN: &str = "Boolean";
/// `class` name of the 8-bit integer leaf.
pub const BYTE: &str = "Byte";
/// `class` name of the 16-bit integer leaf.
pub const SHORT: &str = "Short";
/// `class` name of the 32-bit integer leaf.
pub const INTEGER: &str = "Integer";
/// `class` name of the 64-bit integer leaf.
pub const LONG: &str = "Long";
/// `class` name of the 32-bit float leaf.
pub const FLOAT: &str = "Float";
/// `class` name of the 64-bit float leaf.
pub const DOUBLE: &str = "Double";
/// `class` name of the character leaf.
pub const CHARACTER: &str = "Character";
/// `class` name of the text leaf.
pub const STRING: &str = "String";

/// `class` name of an ordered collection node.
pub const LIST: &str = "List";
/// `class` name of a map node.
pub const MAP: &str = "Map";

/// Suffix appended to an element tag to form an array `class` name,
/// e.g. `Integer[]`.
pub const ARRAY_SUFFIX: &str = "[]";
