//! Error types for request evaluation.

use thiserror::Error;

use crate::base::display_to_string;
use crate::diagnostics::Diagnostic;
use crate::request::AnyRequest;

/// Why a request produced no output.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RequestError {
    /// The request was already being evaluated further up the stack.
    #[error("circular dependency while evaluating {request}")]
    Cycle { request: String },

    /// The kind's evaluation failed and described why.
    #[error("{0}")]
    Diagnosed(Diagnostic),
}

impl RequestError {
    /// Create a cycle error for the request that closed the cycle.
    pub fn cycle(request: &AnyRequest) -> Self {
        Self::Cycle {
            request: display_to_string(request),
        }
    }

    /// Create an error from a diagnostic.
    pub fn diagnosed(diagnostic: Diagnostic) -> Self {
        Self::Diagnosed(diagnostic)
    }

    pub fn is_cycle(&self) -> bool {
        matches!(self, Self::Cycle { .. })
    }
}

impl From<Diagnostic> for RequestError {
    fn from(diagnostic: Diagnostic) -> Self {
        Self::Diagnosed(diagnostic)
    }
}
