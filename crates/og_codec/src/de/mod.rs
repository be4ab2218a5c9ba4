//! Provide the text-to-graph direction.
//!
//! ## Menu
//!
//! - [`GraphParser`]: tokenizes tagged text and rebuilds the graph.
//! - [`Parsed`]: the rebuilt arena plus its root value.
//! - [`DecodeError`]: the unified failure type of one parse call,
//!   wrapping [`SyntaxError`], [`ClassResolutionError`],
//!   [`DanglingReferenceError`] and the reflection/construction
//!   errors of `og_reflect`.

// -----------------------------------------------------------------------------
// Modules

mod driver;
mod error;
mod tokenizer;

// -----------------------------------------------------------------------------
// Exports

pub use driver::{GraphParser, Parsed};
pub use error::{ClassResolutionError, DanglingReferenceError, DecodeError, DecodeErrorKind};
pub use tokenizer::SyntaxError;
