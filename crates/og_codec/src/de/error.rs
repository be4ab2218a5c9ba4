//! Provide the parse-side failure types.

use core::fmt;

use og_reflect::access::ReflectionError;
use og_reflect::registry::ConstructionError;

use crate::de::tokenizer::SyntaxError;
use crate::trace;

// -----------------------------------------------------------------------------
// ClassResolutionError

/// A type tag that does not name a resolvable type.
///
/// Raised when a `class` attribute is neither a built-in or registered
/// leaf tag, a registered bean class, nor one of the structural forms
/// (array, list, map), and its content rules out the generic text
/// fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassResolutionError {
    /// The unresolvable tag.
    pub class: String,
    /// Byte offset of the node carrying the tag.
    pub offset: usize,
}

impl fmt::Display for ClassResolutionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tag `{}` at offset {} does not name a resolvable type",
            self.class, self.offset,
        )
    }
}

impl core::error::Error for ClassResolutionError {}

// -----------------------------------------------------------------------------
// DanglingReferenceError

/// A `ref` marker naming an id that was never opened.
///
/// Only backward references resolve: the target must have been opened
/// earlier in document order. A reference to a later sibling is the
/// same error as a reference to an id that never appears.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DanglingReferenceError {
    /// The referenced id.
    pub id: u32,
    /// Byte offset of the reference marker.
    pub offset: usize,
}

impl fmt::Display for DanglingReferenceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "reference at offset {} names id `{}`, which was not opened earlier in the document",
            self.offset, self.id,
        )
    }
}

impl core::error::Error for DanglingReferenceError {}

// -----------------------------------------------------------------------------
// DecodeError

/// What went wrong inside one parse call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeErrorKind {
    /// The document is structurally malformed.
    Syntax(SyntaxError),
    /// A type tag resolves to nothing.
    ClassResolution(ClassResolutionError),
    /// A factory rejected the parsed data.
    Construction(ConstructionError),
    /// A bean property could not be assigned.
    Reflection(ReflectionError),
    /// A reference to an id that was never opened.
    DanglingReference(DanglingReferenceError),
}

/// A fatal parse failure.
///
/// Nothing is returned on failure; the partially built graph is
/// discarded. With the `debug` feature the error carries the tag
/// stack at the point of failure.
#[derive(Debug, Clone)]
pub struct DecodeError {
    kind: DecodeErrorKind,
    trace: Option<Box<str>>,
}

impl DecodeError {
    /// The kind of failure.
    #[inline]
    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            trace: trace::capture(),
        }
    }
}

macro_rules! impl_decode_from {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for DecodeError {
                #[inline]
                fn from(err: $ty) -> Self {
                    DecodeErrorKind::$variant(err).into()
                }
            }
        )*
    };
}

impl_decode_from! {
    SyntaxError => Syntax,
    ClassResolutionError => ClassResolution,
    ConstructionError => Construction,
    ReflectionError => Reflection,
    DanglingReferenceError => DanglingReference,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DecodeErrorKind::Syntax(err) => fmt::Display::fmt(err, f)?,
            DecodeErrorKind::ClassResolution(err) => fmt::Display::fmt(err, f)?,
            DecodeErrorKind::Construction(err) => fmt::Display::fmt(err, f)?,
            DecodeErrorKind::Reflection(err) => fmt::Display::fmt(err, f)?,
            DecodeErrorKind::DanglingReference(err) => fmt::Display::fmt(err, f)?,
        }
        if let Some(trace) = &self.trace {
            write!(f, " (while decoding {trace})")?;
        }
        Ok(())
    }
}

impl core::error::Error for DecodeError {}
