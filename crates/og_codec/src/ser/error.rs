//! Provide the serialize-side failure type.

use core::fmt;

use og_graph::NodeId;
use og_reflect::registry::ConstructionError;

use crate::trace;

// -----------------------------------------------------------------------------
// EncodeError

/// What went wrong inside one serialize call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeErrorKind {
    /// No strategy could render a leaf to text.
    Construction(ConstructionError),
    /// A value names an arena slot outside the graph being walked.
    UnboundNode { id: NodeId },
}

/// A fatal serialize failure.
///
/// Nothing is returned on failure; the partially written text is
/// discarded. With the `debug` feature the error carries the tag
/// stack at the point of failure.
#[derive(Debug, Clone)]
pub struct EncodeError {
    kind: EncodeErrorKind,
    trace: Option<Box<str>>,
}

impl EncodeError {
    /// The kind of failure.
    #[inline]
    pub fn kind(&self) -> &EncodeErrorKind {
        &self.kind
    }
}

impl From<EncodeErrorKind> for EncodeError {
    fn from(kind: EncodeErrorKind) -> Self {
        Self {
            kind,
            trace: trace::capture(),
        }
    }
}

impl From<ConstructionError> for EncodeError {
    #[inline]
    fn from(err: ConstructionError) -> Self {
        EncodeErrorKind::Construction(err).into()
    }
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            EncodeErrorKind::Construction(err) => fmt::Display::fmt(err, f)?,
            EncodeErrorKind::UnboundNode { id } => {
                write!(f, "value names node `{id}` outside the graph being serialized")?;
            }
        }
        if let Some(trace) = &self.trace {
            write!(f, " (while encoding {trace})")?;
        }
        Ok(())
    }
}

impl core::error::Error for EncodeError {}
