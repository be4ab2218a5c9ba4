#![doc = include_str!("../README.md")]
//!
//! ## Menu
//!
//! - [`GraphSerializer`]: object graph → tagged text.
//! - [`GraphParser`] / [`Parsed`]: tagged text → object graph.
//! - [`IdentityTracker`]: the per-call identity-to-id map.
//! - [`escape`]: entity escaping of leaf text and attribute values.
//! - Errors: [`EncodeError`] on the way out; [`DecodeError`] wrapping
//!   [`SyntaxError`], [`ClassResolutionError`] and
//!   [`DanglingReferenceError`] on the way in.

// -----------------------------------------------------------------------------
// Modules

pub mod de;
pub mod escape;
pub mod ident;
pub mod ser;

mod trace;

// -----------------------------------------------------------------------------
// Exports

pub use de::{
    ClassResolutionError, DanglingReferenceError, DecodeError, DecodeErrorKind, GraphParser,
    Parsed, SyntaxError,
};
pub use ident::{IdentityTracker, Visit};
pub use ser::{EncodeError, EncodeErrorKind, GraphSerializer};
