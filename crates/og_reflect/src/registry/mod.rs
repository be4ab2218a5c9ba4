//! Provide the type registry for tag-to-strategy resolution.
//!
//! ## Menu
//!
//! - [`LeafFactory`]: a pluggable construct-from-text / render-to-text
//!   strategy for one value type.
//! - [`TextFactory`]: the default strategy for leaf-like user types,
//!   a generic formatter with single-parameter construction.
//! - [`BeanDef`] / [`PropertyDef`]: declared property order, types and
//!   nullability for one bean class.
//! - [`TypeRegistry`]: the store resolving a tag to its factory or
//!   bean definition; built-ins plus user registrations.
//! - [`TypeRegistryArc`]: a shared, lock-guarded handle for the
//!   configure-once-then-share model.
//! - [`encode_binding`] / [`decode_binding`]: the per-field boundary
//!   handed to the relational mapping layer.
//!
//! ## auto_register
//!
//! See [`TypeRegistry::auto_register`] .
//!
//! We use the [`inventory`] crate to implement static registration,
//! not all platforms support it (although major platforms do).
//! If it is not supported, the function returns `false` without
//! causing any errors.

// -----------------------------------------------------------------------------
// Modules

mod bean;
mod binding;
mod builtin;
mod factory;
mod type_registry;

// -----------------------------------------------------------------------------
// Exports

pub use bean::{BeanDef, PropertyDef};
pub use binding::{BindingError, decode_binding, encode_binding};
pub use builtin::builtin_factories;
pub use factory::{ConstructionError, LeafFactory, TextFactory, TextLeaf};
pub use type_registry::{TypeRegistry, TypeRegistryArc};

#[cfg(feature = "auto_register")]
pub use type_registry::RegisteredLeafFactory;
