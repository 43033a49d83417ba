//! Foundation types for the request core.
//!
//! This module provides fundamental types used throughout the crate:
//! - [`Position`], [`Span`] - Line/column locations attached to diagnostics
//! - [`HashCode`], [`hash_value`], [`hash_combine`] - Stable structural hashing
//! - [`SimpleDisplay`] - Deterministic rendering of request inputs
//!
//! This module has NO dependencies on other crate modules.

mod display;
mod hashing;
mod position;

pub use display::{SimpleDisplay, display_to_string};
pub use hashing::{HashCode, hash_combine, hash_value};
pub use position::{Position, Span};
