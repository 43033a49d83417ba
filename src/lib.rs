//! # polar-request
//!
//! Demand-driven request core for the compiler front end: typed requests,
//! the type identity registry, and the evaluator that memoizes requests and
//! diagnoses cycles between them.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! evaluator → Drives requests, memo tables, cycle diagnosis, dependency dumps
//!   ↓
//! request   → RequestKind, Request<K>, AnyRequest, caching and cycle policies
//!   ↓
//! stats     → Per-kind counters, tracing scope per evaluation
//!   ↓
//! diagnostics → Diag templates, Diagnostic, DiagnosticEngine
//!   ↓
//! typeid    → Zones, TypeIdentity, type_id_zone! registry
//!   ↓
//! base      → Primitives (Span/Position, hashing, simple display)
//! ```

// ============================================================================
// MODULES (dependency order: base → typeid → diagnostics → stats → request → evaluator)
// ============================================================================

/// Foundation types: Span/Position, hash combination, simple display
pub mod base;

/// Compile-time type identity registry
pub mod typeid;

/// Diagnostic templates and the engine that collects them
pub mod diagnostics;

/// Per-kind request statistics
pub mod stats;

/// Request abstraction: kinds, caching policies, cycle diagnostics
pub mod request;

/// Request evaluation and memoization
pub mod evaluator;


// Re-export foundation types
pub use base::{Position, SimpleDisplay, Span};

// Re-export registry types
pub use typeid::{TypeIdentity, Zone, ZonedType, identity_of, name_of};

// Re-export diagnostics
pub use diagnostics::{Diag, Diagnostic, DiagnosticEngine, Severity};

// Re-export the request core
pub use evaluator::{Evaluator, EvaluatorOptions, RequestError};
pub use request::{
    AnyRequest, CacheKind, Cached, CycleDiagnosticTemplate, DiagnoseCycle, Direct,
    ExternallyCached, Request, RequestKind, SeparatelyCached, Templated, Uncached,
};
pub use stats::StatsReporter;
