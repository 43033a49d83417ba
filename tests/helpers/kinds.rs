//! Request kinds used across the integration tests.
//!
//! Evaluation counts are per thread, so tests that assert on them stay
//! independent under the parallel test runner. The separately cached store is
//! process-wide; tests give it unique keys.

use std::cell::RefCell;
use std::sync::LazyLock;

use parking_lot::Mutex;
use polar_request::{
    Cached, CycleDiagnosticTemplate, Diag, DiagnoseCycle, Diagnostic, DiagnosticEngine, Direct,
    Evaluator, ExternallyCached, Request, RequestError, RequestKind, SeparatelyCached, Span,
    Templated, Uncached,
};
use rustc_hash::FxHashMap;

polar_request::type_id_zone! {
    /// Local ids of the test kinds.
    pub unsafe zone UnitTests as TestTypeIds, base 1;
    types {
        Fibonacci => Fibonacci,
        CountingSquare => CountingSquare,
        UncachedSquare => UncachedSquare,
        ExternalLength => ExternalLength,
        CycleA => CycleA,
        CycleB => CycleB,
        CycleC => CycleC,
        DirectCycle => DirectCycle,
        FailingLookup => FailingLookup,
        DependentLookup => DependentLookup,
        SumOfSquares => SumOfSquares,
        ScopedLookup => ScopedLookup,
        Answer => Answer,
    }
}

// ============================================================================
// EVALUATION COUNTERS
// ============================================================================

thread_local! {
    static EVALUATIONS: RefCell<FxHashMap<&'static str, usize>> = RefCell::new(FxHashMap::default());
}

fn bump(kind: &'static str) {
    EVALUATIONS.with(|counts| *counts.borrow_mut().entry(kind).or_default() += 1);
}

/// How often `kind` ran its computation on this thread since the last reset.
pub fn evaluations(kind: &str) -> usize {
    EVALUATIONS.with(|counts| counts.borrow().get(kind).copied().unwrap_or(0))
}

pub fn reset_counters() {
    EVALUATIONS.with(|counts| counts.borrow_mut().clear());
}

macro_rules! templated_cycle {
    ($kind:ty, $id:literal, $head:literal, $step:literal) => {
        impl CycleDiagnosticTemplate for $kind {
            const CYCLE_DIAGNOSTIC: Diag<Self::Inputs> = Diag::error($id, $head);
            const CYCLE_STEP_DIAGNOSTIC: Diag<Self::Inputs> = Diag::note($id, $step);

            fn cycle_diagnostic_loc(_inputs: &Self::Inputs) -> Option<Span> {
                None
            }
        }
    };
}

// ============================================================================
// CACHING
// ============================================================================

/// Naive recursive Fibonacci; memoization makes it linear.
pub struct Fibonacci;

impl RequestKind for Fibonacci {
    type Inputs = (u64,);
    type Output = u64;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, &(n,): &(u64,)) -> Result<u64, RequestError> {
        bump("Fibonacci");
        if n < 2 {
            return Ok(n);
        }
        let a = evaluator.evaluate(&Request::<Fibonacci>::new((n - 1,)))?;
        let b = evaluator.evaluate(&Request::<Fibonacci>::new((n - 2,)))?;
        Ok(a + b)
    }
}

templated_cycle!(Fibonacci, "fibonacci_cycle", "fibonacci({0}) depends on itself", "through fibonacci({0})");

pub struct CountingSquare;

impl RequestKind for CountingSquare {
    type Inputs = (u32,);
    type Output = u64;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u64, RequestError> {
        bump("CountingSquare");
        Ok(u64::from(x) * u64::from(x))
    }
}

templated_cycle!(CountingSquare, "square_cycle", "square({0}) depends on itself", "through square({0})");

pub struct UncachedSquare;

impl RequestKind for UncachedSquare {
    type Inputs = (u32,);
    type Output = u64;
    type Caching = Uncached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u64, RequestError> {
        bump("UncachedSquare");
        Ok(u64::from(x) * u64::from(x))
    }
}

templated_cycle!(UncachedSquare, "square_cycle", "square({0}) depends on itself", "through square({0})");

/// Sum of `CountingSquare(1..=n)`.
pub struct SumOfSquares;

impl RequestKind for SumOfSquares {
    type Inputs = (u32,);
    type Output = u64;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, &(n,): &(u32,)) -> Result<u64, RequestError> {
        bump("SumOfSquares");
        let mut sum = 0;
        for x in 1..=n {
            sum += evaluator.evaluate(&Request::<CountingSquare>::new((x,)))?;
        }
        Ok(sum)
    }
}

templated_cycle!(SumOfSquares, "sum_cycle", "sum({0}) depends on itself", "through sum({0})");

// ============================================================================
// SEPARATELY CACHED
// ============================================================================

static LENGTH_STORE: LazyLock<Mutex<FxHashMap<String, usize>>> = LazyLock::new(Default::default);

/// Byte length of a string, memoized in its own store.
pub struct ExternalLength;

impl RequestKind for ExternalLength {
    type Inputs = (String,);
    type Output = usize;
    type Caching = SeparatelyCached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, (text,): &(String,)) -> Result<usize, RequestError> {
        bump("ExternalLength");
        Ok(text.len())
    }
}

impl ExternallyCached for ExternalLength {
    fn get_cached_result(request: &Request<Self>) -> Option<usize> {
        LENGTH_STORE.lock().get(&request.inputs().0).copied()
    }

    fn cache_result(request: &Request<Self>, value: usize) {
        LENGTH_STORE.lock().insert(request.inputs().0.clone(), value);
    }
}

templated_cycle!(ExternalLength, "length_cycle", "length of {0} depends on itself", "through length of {0}");

/// Whether the separately cached store holds `text`.
pub fn length_store_contains(text: &str) -> bool {
    LENGTH_STORE.lock().contains_key(text)
}

// ============================================================================
// CYCLES
// ============================================================================

/// `A(n) -> B(n) -> C(n) -> A(n)`.
pub struct CycleA;
pub struct CycleB;
pub struct CycleC;

impl RequestKind for CycleA {
    type Inputs = (u32,);
    type Output = u32;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, inputs: &(u32,)) -> Result<u32, RequestError> {
        bump("CycleA");
        evaluator.evaluate(&Request::<CycleB>::new(*inputs))
    }
}

impl CycleDiagnosticTemplate for CycleA {
    const CYCLE_DIAGNOSTIC: Diag<(u32,)> = Diag::error("circular_reference", "circular reference in A({0})");
    const CYCLE_STEP_DIAGNOSTIC: Diag<(u32,)> = Diag::note("circular_reference_step", "through A({0})");

    fn cycle_diagnostic_loc(&(n,): &(u32,)) -> Option<Span> {
        Some(Span::point(n as usize, 0))
    }
}

impl RequestKind for CycleB {
    type Inputs = (u32,);
    type Output = u32;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, inputs: &(u32,)) -> Result<u32, RequestError> {
        bump("CycleB");
        evaluator.evaluate(&Request::<CycleC>::new(*inputs))
    }
}

templated_cycle!(CycleB, "circular_reference", "circular reference in B({0})", "through B({0})");

impl RequestKind for CycleC {
    type Inputs = (u32,);
    type Output = u32;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, inputs: &(u32,)) -> Result<u32, RequestError> {
        bump("CycleC");
        evaluator.evaluate(&Request::<CycleA>::new(*inputs))
    }
}

templated_cycle!(CycleC, "circular_reference", "circular reference in C({0})", "through C({0})");

/// `DirectCycle(n) -> DirectCycle((n + 1) % 3)`, with hand-written diagnostics.
pub struct DirectCycle;

impl RequestKind for DirectCycle {
    type Inputs = (u32,);
    type Output = u32;
    type Caching = Uncached;
    type CycleDiagnostics = Direct;

    fn evaluate(evaluator: &mut Evaluator, &(n,): &(u32,)) -> Result<u32, RequestError> {
        bump("DirectCycle");
        evaluator.evaluate(&Request::<DirectCycle>::new(((n + 1) % 3,)))
    }
}

impl DiagnoseCycle for DirectCycle {
    fn diagnose_cycle(request: &Request<Self>, diags: &mut DiagnosticEngine) {
        diags.emit(Diagnostic::error(format!("{request} is circular")).with_code("direct_cycle"));
    }

    fn note_cycle_step(request: &Request<Self>, diags: &mut DiagnosticEngine) {
        diags.emit(Diagnostic::note(format!("via {request}")).with_code("direct_cycle_step"));
    }
}

// ============================================================================
// ERRORS
// ============================================================================

/// Fails for every name except "known".
pub struct FailingLookup;

impl RequestKind for FailingLookup {
    type Inputs = (String,);
    type Output = u32;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, (name,): &(String,)) -> Result<u32, RequestError> {
        bump("FailingLookup");
        if name == "known" {
            return Ok(7);
        }
        Err(Diagnostic::error(format!("cannot find '{name}'"))
            .with_code("unresolved_name")
            .into())
    }
}

templated_cycle!(FailingLookup, "lookup_cycle", "lookup of {0} depends on itself", "through lookup of {0}");

/// `FailingLookup(name) + 1`.
pub struct DependentLookup;

impl RequestKind for DependentLookup {
    type Inputs = (String,);
    type Output = u32;
    type Caching = Cached;
    type CycleDiagnostics = Templated;

    fn evaluate(evaluator: &mut Evaluator, inputs: &(String,)) -> Result<u32, RequestError> {
        bump("DependentLookup");
        let value = evaluator.evaluate(&Request::<FailingLookup>::new(inputs.clone()))?;
        Ok(value + 1)
    }
}

templated_cycle!(DependentLookup, "lookup_cycle", "lookup of {0} depends on itself", "through lookup of {0}");

// ============================================================================
// DISPLAY
// ============================================================================

/// Two inputs of different types.
pub struct ScopedLookup;

impl RequestKind for ScopedLookup {
    type Inputs = (String, u32);
    type Output = usize;
    type Caching = Uncached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, (name, depth): &(String, u32)) -> Result<usize, RequestError> {
        Ok(name.len() + *depth as usize)
    }
}

templated_cycle!(ScopedLookup, "scoped_cycle", "lookup of {0} at depth {1} depends on itself", "through {0} at depth {1}");

/// No inputs.
pub struct Answer;

impl RequestKind for Answer {
    type Inputs = ();
    type Output = u32;
    type Caching = Uncached;
    type CycleDiagnostics = Templated;

    fn evaluate(_evaluator: &mut Evaluator, _inputs: &()) -> Result<u32, RequestError> {
        Ok(42)
    }
}

templated_cycle!(Answer, "answer_cycle", "the answer depends on itself", "through the answer");
