#![doc = include_str!("../README.md")]

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod registry;

// -----------------------------------------------------------------------------
// Top-Level exports

#[cfg(feature = "auto_register")]
#[doc(hidden)]
pub mod __macro_exports {
    pub use inventory;
}

pub use access::{Accessor, PathAccessor, PathParseError, ReflectionError};
pub use registry::{BeanDef, ConstructionError, LeafFactory, PropertyDef, TypeRegistry};
