//! Requests: typed, uniquely identified questions for the evaluator.
//!
//! A request kind is declared once: its input tuple, its output, its caching
//! policy and its cycle diagnostics. Everything else (identity, equality,
//! hashing, display, cache dispatch) comes from [`Request<K>`].
//!
//! ## Key Types
//!
//! - [`RequestKind`] - The definition a kind implements
//! - [`Request`] - An immutable request of one kind
//! - [`AnyRequest`] - A request of any kind, for heterogeneous collections
//! - [`CacheKind`] and the policy markers [`Uncached`], [`Cached`], [`SeparatelyCached`]
//! - [`Direct`] / [`Templated`] - The two ways to supply cycle diagnostics
//!
//! ## Build-time checks
//!
//! ```text
//! type Caching = SeparatelyCached    → requires impl ExternallyCached
//! type CycleDiagnostics = Direct     → requires impl DiagnoseCycle
//! type CycleDiagnostics = Templated  → requires impl CycleDiagnosticTemplate
//! kind without a registry entry      → RequestKind: ZonedType fails
//! ```

mod any;
mod caching;
mod cycle;
mod simple;

pub use any::AnyRequest;
pub use caching::{CacheKind, Cached, CachingPolicy, ExternallyCached, SeparatelyCached, Uncached};
pub use cycle::{CycleDiagnosticTemplate, CycleDiagnostics, DiagnoseCycle, Direct, Templated};
pub use simple::{Request, RequestKey, RequestKind};
