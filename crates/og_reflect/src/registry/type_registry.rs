//! Provide the central tag-to-strategy store.

use hashbrown::HashMap;

use crate::registry::bean::BeanDef;
use crate::registry::builtin::builtin_factories;
use crate::registry::factory::LeafFactory;

// -----------------------------------------------------------------------------
// TypeRegistry

/// A registry of type tags and their strategies.
///
/// This struct is the central store consulted by the codec: leaf tags
/// resolve to a [`LeafFactory`], bean classes resolve to a
/// [`BeanDef`]. It is the only state that lives across serialize and
/// parse calls, and it is mutated only during one-time configuration;
/// afterwards every consumer takes it by shared reference, so
/// concurrent calls from independent threads are safe.
///
/// # Example
///
/// ```
/// use og_reflect::registry::TypeRegistry;
///
/// let registry = TypeRegistry::new();
///
/// let factory = registry.resolve_leaf("Integer").unwrap();
/// let leaf = factory.construct("42").unwrap();
/// assert_eq!(factory.render(&leaf).unwrap(), "42");
/// ```
pub struct TypeRegistry {
    leaf_table: HashMap<String, Box<dyn LeafFactory>>,
    bean_table: HashMap<String, BeanDef>,
}

impl Default for TypeRegistry {
    /// See [`TypeRegistry::new`] .
    #[inline]
    fn default() -> Self {
        Self::new()
    }
}

impl TypeRegistry {
    /// Creates a registry with no registrations at all, not even the
    /// built-in factories.
    #[inline]
    pub fn empty() -> Self {
        Self {
            leaf_table: HashMap::new(),
            bean_table: HashMap::new(),
        }
    }

    /// Creates a registry with the built-in leaf factories registered:
    ///
    /// - `Boolean` `Character` `String`
    /// - `Byte` `Short` `Integer` `Long`
    /// - `Float` `Double`
    pub fn new() -> Self {
        let mut registry = Self::empty();
        for factory in builtin_factories() {
            registry.register_boxed_leaf(factory);
        }
        registry
    }

    /// Registers a leaf factory under its own tag, replacing any
    /// previous factory for that tag.
    #[inline]
    pub fn register_leaf(&mut self, factory: impl LeafFactory + 'static) {
        self.register_boxed_leaf(Box::new(factory));
    }

    /// Registers an already boxed leaf factory. See
    /// [`register_leaf`](Self::register_leaf).
    pub fn register_boxed_leaf(&mut self, factory: Box<dyn LeafFactory>) {
        self.leaf_table.insert(factory.tag().to_owned(), factory);
    }

    /// Registers a bean definition under its class name, replacing any
    /// previous definition for that class.
    pub fn register_bean(&mut self, def: BeanDef) {
        self.bean_table.insert(def.class().to_owned(), def);
    }

    /// Resolves a leaf tag to its factory.
    ///
    /// Returns `None` for tags with neither a built-in nor a
    /// registered factory.
    #[inline]
    pub fn resolve_leaf(&self, tag: &str) -> Option<&dyn LeafFactory> {
        self.leaf_table.get(tag).map(AsRef::as_ref)
    }

    /// Resolves a bean class to its definition.
    #[inline]
    pub fn resolve_bean(&self, class: &str) -> Option<&BeanDef> {
        self.bean_table.get(class)
    }

    /// Whether the tag names a resolvable leaf type.
    #[inline]
    pub fn contains_leaf(&self, tag: &str) -> bool {
        self.leaf_table.contains_key(tag)
    }

    /// Whether the class names a registered bean.
    #[inline]
    pub fn contains_bean(&self, class: &str) -> bool {
        self.bean_table.contains_key(class)
    }

    /// Automatically registers all leaf factories declared via
    /// [`submit_leaf_factory!`](crate::submit_leaf_factory).
    ///
    /// Repeated calls are cheap and idempotent: a factory registers
    /// under its tag, and re-registration replaces it with an equal
    /// instance.
    ///
    /// ## Return Value
    ///
    /// Returns `true` if automatic registration is available; when the
    /// `auto_register` feature is disabled this method does nothing
    /// and returns `false`.
    #[cfg_attr(not(feature = "auto_register"), inline(always))]
    pub fn auto_register(&mut self) -> bool {
        #[cfg(feature = "auto_register")]
        {
            for entry in inventory::iter::<RegisteredLeafFactory> {
                self.register_boxed_leaf((entry.build)());
            }
            true
        }
        #[cfg(not(feature = "auto_register"))]
        {
            false
        }
    }
}

impl core::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TypeRegistry")
            .field("leaf_tags", &self.leaf_table.keys())
            .field("bean_classes", &self.bean_table.keys())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// auto_register support

/// An inventory entry produced by
/// [`submit_leaf_factory!`](crate::submit_leaf_factory).
#[cfg(feature = "auto_register")]
pub struct RegisteredLeafFactory {
    /// Builds the factory to register.
    pub build: fn() -> Box<dyn LeafFactory>,
}

#[cfg(feature = "auto_register")]
impl RegisteredLeafFactory {
    /// Creates an entry from a factory constructor.
    pub const fn new(build: fn() -> Box<dyn LeafFactory>) -> Self {
        Self { build }
    }
}

#[cfg(feature = "auto_register")]
inventory::collect!(RegisteredLeafFactory);

/// Declares a leaf factory for collection by
/// [`TypeRegistry::auto_register`].
///
/// ```ignore
/// og_reflect::submit_leaf_factory!(|| Box::new(TimestampFactory));
/// ```
#[cfg(feature = "auto_register")]
#[macro_export]
macro_rules! submit_leaf_factory {
    ($build:expr) => {
        $crate::__macro_exports::inventory::submit! {
            $crate::registry::RegisteredLeafFactory::new($build)
        }
    };
}

// -----------------------------------------------------------------------------
// TypeRegistryArc

use std::sync::{Arc, PoisonError};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

/// A shared, lock-guarded [`TypeRegistry`] handle.
///
/// Configuration happens through [`write`](Self::write) before the
/// first serialize/parse call; afterwards every thread takes
/// [`read`](Self::read) guards and the lock is never contended for
/// writing again.
#[derive(Clone, Default)]
pub struct TypeRegistryArc {
    /// The wrapped [`TypeRegistry`].
    pub internal: Arc<RwLock<TypeRegistry>>,
}

impl TypeRegistryArc {
    /// Takes a read lock on the underlying [`TypeRegistry`].
    pub fn read(&self) -> RwLockReadGuard<'_, TypeRegistry> {
        self.internal.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Takes a write lock on the underlying [`TypeRegistry`].
    pub fn write(&self) -> RwLockWriteGuard<'_, TypeRegistry> {
        self.internal
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl core::fmt::Debug for TypeRegistryArc {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.read().fmt(f)
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::bean::BeanDef;
    use crate::registry::factory::TextFactory;
    use og_graph::tag;

    #[test]
    fn builtins_are_present() {
        let registry = TypeRegistry::new();
        for tag in [
            tag::BOOLEAN,
            tag::BYTE,
            tag::SHORT,
            tag::INTEGER,
            tag::LONG,
            tag::FLOAT,
            tag::DOUBLE,
            tag::CHARACTER,
            tag::STRING,
        ] {
            assert!(registry.contains_leaf(tag), "missing builtin `{tag}`");
        }
        assert!(!registry.contains_leaf("Timestamp"));
    }

    #[test]
    fn empty_has_nothing() {
        let registry = TypeRegistry::empty();
        assert!(!registry.contains_leaf(tag::STRING));
    }

    #[test]
    fn user_registration_resolves() {
        let mut registry = TypeRegistry::new();
        registry.register_leaf(TextFactory::new("Uuid"));
        registry.register_bean(BeanDef::new("Person").with_property("name", tag::STRING));

        assert!(registry.resolve_leaf("Uuid").is_some());
        assert_eq!(registry.resolve_bean("Person").unwrap().class(), "Person");
        assert!(registry.resolve_bean("Employee").is_none());
    }

    #[test]
    fn shared_handle_reads_after_setup() {
        let arc = TypeRegistryArc::default();
        arc.write().register_leaf(TextFactory::new("Uuid"));
        assert!(arc.read().contains_leaf("Uuid"));
    }
}
