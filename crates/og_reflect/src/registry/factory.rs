//! Provide the pluggable construction/rendering strategy interface.

use core::fmt;
use std::borrow::Cow;

use og_graph::{CustomLeaf, Leaf};

// -----------------------------------------------------------------------------
// ConstructionError

/// No usable strategy could build or render a value of a target type.
///
/// Carries the offending tag and the data that could not be consumed,
/// so the caller can tell *which* type in a large graph failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstructionError {
    tag: Cow<'static, str>,
    data: String,
    reason: Cow<'static, str>,
}

impl ConstructionError {
    /// Creates an error for `tag` with the data that was rejected.
    pub fn new(
        tag: impl Into<Cow<'static, str>>,
        data: impl Into<String>,
        reason: impl Into<Cow<'static, str>>,
    ) -> Self {
        Self {
            tag: tag.into(),
            data: data.into(),
            reason: reason.into(),
        }
    }

    /// An error for a tag with no registered or built-in factory.
    pub fn no_factory(tag: impl Into<Cow<'static, str>>, data: impl Into<String>) -> Self {
        Self::new(tag, data, "no registered factory for this tag")
    }

    /// The tag that could not be constructed or rendered.
    #[inline]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The data that could not be consumed.
    #[inline]
    pub fn data(&self) -> &str {
        &self.data
    }
}

impl fmt::Display for ConstructionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot construct `{}` from `{}`: {}",
            self.tag, self.data, self.reason,
        )
    }
}

impl core::error::Error for ConstructionError {}

// -----------------------------------------------------------------------------
// LeafFactory

/// A pluggable strategy mapping one value type to its
/// construction-from-text and rendering-to-text logic.
///
/// Factories are stateless and side-effect-free; the registry owns one
/// instance per tag and shares it across every serialize/parse call.
/// The two methods are exact inverses on the factory's own canonical
/// text: `construct(render(leaf))` must reproduce an equal leaf.
///
/// The text on both sides is unescaped; entity escaping belongs to the
/// codec, not to factories.
pub trait LeafFactory: Send + Sync {
    /// The tag this factory is registered under.
    fn tag(&self) -> &str;

    /// Builds a leaf from its parsed text.
    ///
    /// Fails with [`ConstructionError`] when the text cannot be
    /// consumed by this type.
    fn construct(&self, text: &str) -> Result<Leaf, ConstructionError>;

    /// Renders a leaf of this factory's type to its canonical text.
    ///
    /// Fails with [`ConstructionError`] when handed a leaf of a
    /// different type.
    fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError>;
}

pub(crate) fn render_mismatch(expected: &str, leaf: &Leaf) -> ConstructionError {
    ConstructionError::new(
        expected.to_owned(),
        leaf.render().into_owned(),
        format!("factory cannot render a `{}` leaf", leaf.tag()),
    )
}

// -----------------------------------------------------------------------------
// TextLeaf

/// An opaque leaf holding a tag and its canonical text.
///
/// This is what [`TextFactory`] constructs: the value keeps whatever
/// text the document carried, without interpretation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLeaf {
    tag: String,
    text: String,
}

impl TextLeaf {
    /// Creates a text leaf for the given tag.
    #[inline]
    pub fn new(tag: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            text: text.into(),
        }
    }

    /// The stored text.
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl CustomLeaf for TextLeaf {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn render(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.text)
    }

    fn clone_leaf(&self) -> Box<dyn CustomLeaf> {
        Box::new(self.clone())
    }
}

// -----------------------------------------------------------------------------
// TextFactory

/// The default strategy for leaf-like user types.
///
/// Rendering goes through the generic formatter (the stored text
/// itself); reconstruction is the single-parameter construction
/// strategy, accepting any text and storing it as a [`TextLeaf`].
/// Register one of these for a tag whose values need no validation
/// beyond round-tripping their text:
///
/// ```
/// use og_reflect::registry::{TextFactory, TypeRegistry};
///
/// let mut registry = TypeRegistry::new();
/// registry.register_leaf(TextFactory::new("Uuid"));
///
/// let factory = registry.resolve_leaf("Uuid").unwrap();
/// let leaf = factory.construct("07cc9262-3b1d-4a57").unwrap();
/// assert_eq!(factory.render(&leaf).unwrap(), "07cc9262-3b1d-4a57");
/// ```
#[derive(Debug, Clone)]
pub struct TextFactory {
    tag: String,
}

impl TextFactory {
    /// Creates a default factory for the given tag.
    #[inline]
    pub fn new(tag: impl Into<String>) -> Self {
        Self { tag: tag.into() }
    }
}

impl LeafFactory for TextFactory {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn construct(&self, text: &str) -> Result<Leaf, ConstructionError> {
        Ok(Leaf::custom(TextLeaf::new(self.tag.clone(), text)))
    }

    fn render<'a>(&self, leaf: &'a Leaf) -> Result<Cow<'a, str>, ConstructionError> {
        match leaf {
            Leaf::Custom(custom) if custom.tag() == self.tag => Ok(custom.render()),
            other => Err(render_mismatch(&self.tag, other)),
        }
    }
}

// -----------------------------------------------------------------------------
// Tests
