//! Caching policies.
//!
//! A kind picks its policy with `type Caching = Cached;` (or `Uncached`,
//! `SeparatelyCached`). The marker decides, at compile time, where the
//! evaluator looks for and stores results:
//!
//! | policy             | lookup                          | store                     |
//! |--------------------|---------------------------------|---------------------------|
//! | `Uncached`         | never                           | never                     |
//! | `Cached`           | evaluator memo table            | evaluator memo table      |
//! | `SeparatelyCached` | [`ExternallyCached::get_cached_result`] | [`ExternallyCached::cache_result`] |

use crate::evaluator::Evaluator;

use super::simple::{Request, RequestKind};

/// How results of a request kind are cached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CacheKind {
    /// Never cached; every evaluation recomputes.
    Uncached,
    /// Cached in the evaluator, keyed by request identity.
    Cached,
    /// Cached by the kind itself, through [`ExternallyCached`].
    SeparatelyCached,
}

impl CacheKind {
    pub const fn is_ever_cached(self) -> bool {
        !matches!(self, CacheKind::Uncached)
    }

    pub const fn has_external_cache(self) -> bool {
        matches!(self, CacheKind::SeparatelyCached)
    }
}

/// Policy marker: never cache.
#[derive(Debug)]
pub enum Uncached {}

/// Policy marker: the evaluator memoizes results.
#[derive(Debug)]
pub enum Cached {}

/// Policy marker: the kind memoizes results in its own store.
#[derive(Debug)]
pub enum SeparatelyCached {}

/// Dispatch from a policy marker to the store that backs it.
///
/// Implemented only for the three markers. A `SeparatelyCached` kind that
/// does not implement [`ExternallyCached`] does not satisfy its own
/// `Caching` bound and fails to build.
pub trait CachingPolicy<K: ?Sized>: 'static {
    const KIND: CacheKind;

    /// A previously stored result for `request`, if any.
    fn lookup(evaluator: &Evaluator, request: &Request<K>) -> Option<K::Output>
    where
        K: RequestKind;

    /// Record a freshly computed result.
    fn store(evaluator: &mut Evaluator, request: &Request<K>, output: &K::Output)
    where
        K: RequestKind;
}

impl<K: ?Sized> CachingPolicy<K> for Uncached {
    const KIND: CacheKind = CacheKind::Uncached;

    fn lookup(_evaluator: &Evaluator, _request: &Request<K>) -> Option<K::Output>
    where
        K: RequestKind,
    {
        None
    }

    fn store(_evaluator: &mut Evaluator, _request: &Request<K>, _output: &K::Output)
    where
        K: RequestKind,
    {
    }
}

impl<K: ?Sized> CachingPolicy<K> for Cached {
    const KIND: CacheKind = CacheKind::Cached;

    fn lookup(evaluator: &Evaluator, request: &Request<K>) -> Option<K::Output>
    where
        K: RequestKind,
    {
        evaluator.cached_output(request)
    }

    fn store(evaluator: &mut Evaluator, request: &Request<K>, output: &K::Output)
    where
        K: RequestKind,
    {
        evaluator.insert_cached_output(request, output.clone());
    }
}

impl<K: ExternallyCached> CachingPolicy<K> for SeparatelyCached {
    const KIND: CacheKind = CacheKind::SeparatelyCached;

    fn lookup(_evaluator: &Evaluator, request: &Request<K>) -> Option<K::Output>
    where
        K: RequestKind,
    {
        K::get_cached_result(request)
    }

    fn store(_evaluator: &mut Evaluator, request: &Request<K>, output: &K::Output)
    where
        K: RequestKind,
    {
        K::cache_result(request, output.clone());
    }
}

/// Cache hooks of a `SeparatelyCached` kind.
///
/// The hooks own their store, including any locking it needs: the evaluator
/// may call them from whichever thread drives it.
///
/// Choosing `SeparatelyCached` without providing the hooks does not build:
///
/// ```compile_fail
/// use polar_request::{
///     DiagnoseCycle, DiagnosticEngine, Direct, Evaluator, Request, RequestError, RequestKind,
///     SeparatelyCached,
/// };
///
/// pub struct Length;
///
/// polar_request::type_id_zone! {
///     pub unsafe zone UnitTests as DocTypeIds, base 1;
///     types { Length => Length }
/// }
///
/// impl RequestKind for Length {
///     type Inputs = (String,);
///     type Output = usize;
///     type Caching = SeparatelyCached;
///     type CycleDiagnostics = Direct;
///
///     fn evaluate(_evaluator: &mut Evaluator, (text,): &(String,)) -> Result<usize, RequestError> {
///         Ok(text.len())
///     }
/// }
///
/// impl DiagnoseCycle for Length {
///     fn diagnose_cycle(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
///     fn note_cycle_step(_request: &Request<Self>, _diags: &mut DiagnosticEngine) {}
/// }
/// ```
pub trait ExternallyCached: RequestKind<Caching = SeparatelyCached> {
    fn get_cached_result(request: &Request<Self>) -> Option<Self::Output>;

    fn cache_result(request: &Request<Self>, value: Self::Output);
}
