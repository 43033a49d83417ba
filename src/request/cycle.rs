//! Cycle diagnostics.
//!
//! A kind supplies its cycle diagnostics in exactly one of two ways, chosen by
//! `type CycleDiagnostics = Direct;` or `= Templated;`:
//!
//! - [`Direct`]: implement [`DiagnoseCycle`] and emit whatever you like.
//! - [`Templated`]: implement [`CycleDiagnosticTemplate`] with a location
//!   function and two static templates; the stored inputs are substituted as
//!   the template arguments.
//!
//! Each hook trait pins the marker in its supertrait, so a kind cannot
//! implement both, and naming a marker without implementing its trait fails
//! the kind's `CycleDiagnostics` bound.

use crate::base::Span;
use crate::diagnostics::{Diag, DiagnosticArgs, DiagnosticEngine};

use super::simple::{Request, RequestKind};

/// Strategy marker: the kind implements [`DiagnoseCycle`].
#[derive(Debug)]
pub enum Direct {}

/// Strategy marker: the kind implements [`CycleDiagnosticTemplate`].
#[derive(Debug)]
pub enum Templated {}

/// Dispatch from a strategy marker to the kind's hooks.
pub trait CycleDiagnostics<K: ?Sized>: 'static {
    /// Emit the diagnostic for the request that closes a cycle.
    fn diagnose_cycle(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind;

    /// Emit the note for one intermediate request of a cycle.
    fn note_cycle_step(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind;
}

/// Hand-written cycle diagnostics.
pub trait DiagnoseCycle: RequestKind<CycleDiagnostics = Direct> {
    fn diagnose_cycle(request: &Request<Self>, diags: &mut DiagnosticEngine);

    fn note_cycle_step(request: &Request<Self>, diags: &mut DiagnosticEngine);
}

/// Cycle diagnostics built from static templates over the input tuple.
pub trait CycleDiagnosticTemplate: RequestKind<CycleDiagnostics = Templated> {
    /// Emitted once, for the request that closes the cycle.
    const CYCLE_DIAGNOSTIC: Diag<Self::Inputs>;

    /// Emitted for every other request in the cycle.
    const CYCLE_STEP_DIAGNOSTIC: Diag<Self::Inputs>;

    /// Where the cycle diagnostics for these inputs point.
    fn cycle_diagnostic_loc(inputs: &Self::Inputs) -> Option<Span>;
}

impl<K: DiagnoseCycle> CycleDiagnostics<K> for Direct {
    fn diagnose_cycle(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind,
    {
        <K as DiagnoseCycle>::diagnose_cycle(request, diags);
    }

    fn note_cycle_step(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind,
    {
        <K as DiagnoseCycle>::note_cycle_step(request, diags);
    }
}

impl<K> CycleDiagnostics<K> for Templated
where
    K: CycleDiagnosticTemplate,
    K::Inputs: DiagnosticArgs,
{
    fn diagnose_cycle(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind,
    {
        let inputs = request.inputs();
        diags.diagnose(K::cycle_diagnostic_loc(inputs), K::CYCLE_DIAGNOSTIC, inputs);
    }

    fn note_cycle_step(request: &Request<K>, diags: &mut DiagnosticEngine)
    where
        K: RequestKind,
    {
        let inputs = request.inputs();
        diags.diagnose(
            K::cycle_diagnostic_loc(inputs),
            K::CYCLE_STEP_DIAGNOSTIC,
            inputs,
        );
    }
}
