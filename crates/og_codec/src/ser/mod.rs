//! Provide the graph-to-text direction.
//!
//! ## Menu
//!
//! - [`GraphSerializer`]: the depth-first walk producing tagged text.
//! - [`EncodeError`]: the unified failure type of one serialize call.

// -----------------------------------------------------------------------------
// Modules

mod driver;
mod error;

// -----------------------------------------------------------------------------
// Exports

pub use driver::GraphSerializer;
pub use error::{EncodeError, EncodeErrorKind};
