//! Typed requests.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

use crate::base::{HashCode, SimpleDisplay, display_to_string, hash_combine};
use crate::diagnostics::DiagnosticEngine;
use crate::evaluator::{Evaluator, RequestError};
use crate::stats::{FrontendStatsTracer, StatsReporter};
use crate::typeid::{TypeIdentity, ZonedType, name_of};

use super::caching::{CacheKind, CachingPolicy};
use super::cycle::CycleDiagnostics;

/// A request definition.
///
/// Implement this on a zero-sized marker type that has a registry entry, and
/// build instances with [`Request::new`]:
///
/// ```
/// use polar_request::{
///     Cached, CycleDiagnosticTemplate, Diag, Evaluator, Request, RequestError, RequestKind, Span,
///     Templated,
/// };
///
/// pub struct Triple;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone UnitTests as DocTypeIds, base 1;
///     types { Triple => Triple }
/// }
///
/// impl RequestKind for Triple {
///     type Inputs = (u32,);
///     type Output = u32;
///     type Caching = Cached;
///     type CycleDiagnostics = Templated;
///
///     fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u32, RequestError> {
///         Ok(x * 3)
///     }
/// }
///
/// impl CycleDiagnosticTemplate for Triple {
///     const CYCLE_DIAGNOSTIC: Diag<(u32,)> = Diag::error("triple_cycle", "triple({0}) depends on itself");
///     const CYCLE_STEP_DIAGNOSTIC: Diag<(u32,)> = Diag::note("triple_cycle_step", "through triple({0})");
///
///     fn cycle_diagnostic_loc(_inputs: &(u32,)) -> Option<Span> {
///         None
///     }
/// }
///
/// let mut evaluator = Evaluator::new();
/// assert_eq!(evaluator.evaluate(&Request::<Triple>::new((4,))).unwrap(), 12);
/// assert_eq!(Request::<Triple>::new((4,)).to_string(), "Triple(4)");
/// ```
///
/// A kind picks exactly one cycle diagnostic strategy. Naming `Direct`
/// without implementing [`DiagnoseCycle`](super::DiagnoseCycle) does not
/// build:
///
/// ```compile_fail
/// use polar_request::{Cached, Direct, Evaluator, RequestError, RequestKind};
///
/// pub struct Lookup;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone UnitTests as DocTypeIds, base 1;
///     types { Lookup => Lookup }
/// }
///
/// impl RequestKind for Lookup {
///     type Inputs = (u32,);
///     type Output = u32;
///     type Caching = Cached;
///     type CycleDiagnostics = Direct;
///
///     fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u32, RequestError> {
///         Ok(x)
///     }
/// }
/// ```
///
/// Neither does implementing both strategies:
///
/// ```compile_fail
/// use polar_request::{
///     Cached, CycleDiagnosticTemplate, Diag, DiagnoseCycle, DiagnosticEngine, Direct, Evaluator,
///     Request, RequestError, RequestKind, Span,
/// };
///
/// pub struct Lookup;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone UnitTests as DocTypeIds, base 1;
///     types { Lookup => Lookup }
/// }
///
/// impl RequestKind for Lookup {
///     type Inputs = (u32,);
///     type Output = u32;
///     type Caching = Cached;
///     type CycleDiagnostics = Direct;
///
///     fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u32, RequestError> {
///         Ok(x)
///     }
/// }
///
/// impl DiagnoseCycle for Lookup {
///     fn diagnose_cycle(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
///     fn note_cycle_step(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
/// }
///
/// impl CycleDiagnosticTemplate for Lookup {
///     const CYCLE_DIAGNOSTIC: Diag<(u32,)> = Diag::error("lookup_cycle", "lookup({0})");
///     const CYCLE_STEP_DIAGNOSTIC: Diag<(u32,)> = Diag::note("lookup_cycle_step", "through lookup({0})");
///
///     fn cycle_diagnostic_loc(_inputs: &(u32,)) -> Option<Span> {
///         None
///     }
/// }
/// ```
///
/// A kind without a registry entry is not a [`ZonedType`] and cannot be a
/// request kind:
///
/// ```compile_fail
/// use polar_request::{
///     Cached, DiagnoseCycle, DiagnosticEngine, Direct, Evaluator, Request, RequestError,
///     RequestKind,
/// };
///
/// pub struct Lookup;
///
/// impl RequestKind for Lookup {
///     type Inputs = (u32,);
///     type Output = u32;
///     type Caching = Cached;
///     type CycleDiagnostics = Direct;
///
///     fn evaluate(_evaluator: &mut Evaluator, &(x,): &(u32,)) -> Result<u32, RequestError> {
///         Ok(x)
///     }
/// }
///
/// impl DiagnoseCycle for Lookup {
///     fn diagnose_cycle(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
///     fn note_cycle_step(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
/// }
/// ```
pub trait RequestKind: ZonedType + Sized {
    /// The input tuple. Determines request identity.
    type Inputs: Clone + Eq + Hash + SimpleDisplay + 'static;

    /// The evaluation result.
    type Output: Clone + 'static;

    /// One of [`Uncached`](super::Uncached), [`Cached`](super::Cached) or
    /// [`SeparatelyCached`](super::SeparatelyCached).
    type Caching: CachingPolicy<Self>;

    /// One of [`Direct`](super::Direct) or [`Templated`](super::Templated).
    type CycleDiagnostics: CycleDiagnostics<Self>;

    const CACHE_KIND: CacheKind = <Self::Caching as CachingPolicy<Self>>::KIND;

    /// Compute the output. Nested requests go through `evaluator`.
    fn evaluate(
        evaluator: &mut Evaluator,
        inputs: &Self::Inputs,
    ) -> Result<Self::Output, RequestError>;
}

/// The memoization key of a request: kind identity plus input hash.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub kind: TypeIdentity,
    pub hash: HashCode,
}

/// An immutable request of kind `K`.
///
/// Equality and hashing are structural over `(K, inputs)`. Requests of
/// different kinds are different Rust types; see
/// [`AnyRequest`](super::AnyRequest) for comparing across kinds.
pub struct Request<K: RequestKind> {
    inputs: K::Inputs,
    kind: PhantomData<fn() -> K>,
}

impl<K: RequestKind> Request<K> {
    pub const IS_EVER_CACHED: bool = K::CACHE_KIND.is_ever_cached();
    pub const HAS_EXTERNAL_CACHE: bool = K::CACHE_KIND.has_external_cache();

    pub fn new(inputs: K::Inputs) -> Self {
        Self {
            inputs,
            kind: PhantomData,
        }
    }

    pub fn inputs(&self) -> &K::Inputs {
        &self.inputs
    }

    pub fn into_inputs(self) -> K::Inputs {
        self.inputs
    }

    /// Registry identity of the kind.
    pub const fn kind_identity() -> TypeIdentity {
        K::IDENTITY
    }

    /// Stable structural hash of `(kind identity, inputs)`.
    pub fn hash_code(&self) -> HashCode {
        hash_combine(K::IDENTITY.value(), &self.inputs)
    }

    pub fn key(&self) -> RequestKey {
        RequestKey {
            kind: K::IDENTITY,
            hash: self.hash_code(),
        }
    }

    /// Run the kind's evaluation with the stored inputs. Does not consult or
    /// fill any cache; use [`Evaluator::evaluate`] for that.
    pub fn evaluate_request(&self, evaluator: &mut Evaluator) -> Result<K::Output, RequestError> {
        K::evaluate(evaluator, &self.inputs)
    }

    pub fn diagnose_cycle(&self, diags: &mut DiagnosticEngine) {
        <K::CycleDiagnostics as CycleDiagnostics<K>>::diagnose_cycle(self, diags);
    }

    pub fn note_cycle_step(&self, diags: &mut DiagnosticEngine) {
        <K::CycleDiagnostics as CycleDiagnostics<K>>::note_cycle_step(self, diags);
    }

    /// Open a stats/tracing scope for one evaluation of this request.
    pub fn make_tracer<'a>(&self, reporter: Option<&'a StatsReporter>) -> FrontendStatsTracer<'a> {
        FrontendStatsTracer::new(reporter, name_of::<K>(), || display_to_string(&self.inputs))
    }
}

impl<K: RequestKind> Clone for Request<K> {
    fn clone(&self) -> Self {
        Self::new(self.inputs.clone())
    }
}

impl<K: RequestKind> PartialEq for Request<K> {
    fn eq(&self, other: &Self) -> bool {
        self.inputs == other.inputs
    }
}

impl<K: RequestKind> Eq for Request<K> {}

impl<K: RequestKind> Hash for Request<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(K::IDENTITY.value());
        self.inputs.hash(state);
    }
}

impl<K: RequestKind> SimpleDisplay for Request<K> {
    fn simple_display(&self, out: &mut dyn fmt::Write) -> fmt::Result {
        out.write_str(&name_of::<K>())?;
        self.inputs.simple_display(out)
    }
}

impl<K: RequestKind> fmt::Display for Request<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_display(f)
    }
}

impl<K: RequestKind> fmt::Debug for Request<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.simple_display(f)
    }
}
