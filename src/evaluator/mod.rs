//! Evaluator: drives requests, memoizes results, diagnoses cycles.
//!
//! ```text
//! evaluate(request)
//!     │
//!     ├─ already on the active stack? ──► diagnose cycle, Err(Cycle)
//!     │
//!     ├─ K::Caching::lookup ──► hit: return cached output
//!     │
//!     ├─ K::evaluate(evaluator, inputs)   (nested requests recurse here)
//!     │
//!     └─ K::Caching::store ──► return output
//! ```
//!
//! The evaluator is single threaded; kinds receive `&mut Evaluator` and
//! issue nested requests through it.

mod dependencies;
mod error;

use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashMap};

use crate::diagnostics::{Diagnostic, DiagnosticEngine};
use crate::request::{AnyRequest, CachingPolicy, Request, RequestKind};
use crate::stats::StatsReporter;
use crate::typeid::{TypeIdentity, name_of};

pub use error::RequestError;

type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;
type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

// ============================================================================
// OPTIONS
// ============================================================================

/// Evaluator configuration.
#[derive(Clone, Debug, Default)]
pub struct EvaluatorOptions {
    /// Log the dependency tree of every diagnosed cycle at debug level.
    pub debug_dump_cycles: bool,
    /// Where per-kind statistics go, if anywhere.
    pub stats: Option<Arc<StatsReporter>>,
}

impl EvaluatorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_debug_dump_cycles(mut self, enabled: bool) -> Self {
        self.debug_dump_cycles = enabled;
        self
    }

    pub fn with_stats(mut self, reporter: Arc<StatsReporter>) -> Self {
        self.stats = Some(reporter);
        self
    }
}

// ============================================================================
// MEMO TABLES
// ============================================================================

/// Object-safe view of a per-kind memo table. Only `RequestCache<K>`
/// implements it.
trait ErasedCache {
    fn kind_identity(&self) -> TypeIdentity;
    fn contains(&self, request: &AnyRequest) -> bool;
    fn len(&self) -> usize;
}

struct RequestCache<K: RequestKind> {
    entries: FxHashMap<Request<K>, K::Output>,
}

impl<K: RequestKind> Default for RequestCache<K> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
        }
    }
}

impl<K: RequestKind> ErasedCache for RequestCache<K> {
    fn kind_identity(&self) -> TypeIdentity {
        K::IDENTITY
    }

    fn contains(&self, request: &AnyRequest) -> bool {
        request
            .downcast_ref::<K>()
            .is_some_and(|request| self.entries.contains_key(request))
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}

fn table<'a, K: RequestKind>(slot: &'a (dyn ErasedCache + 'static)) -> Option<&'a RequestCache<K>> {
    if slot.kind_identity() != K::IDENTITY {
        return None;
    }
    // SAFETY: `RequestCache<K>` is the only implementor of `ErasedCache`, and
    // identities are unique per type.
    Some(unsafe { &*std::ptr::from_ref(slot).cast::<RequestCache<K>>() })
}

fn table_mut<'a, K: RequestKind>(
    slot: &'a mut (dyn ErasedCache + 'static),
) -> Option<&'a mut RequestCache<K>> {
    if slot.kind_identity() != K::IDENTITY {
        return None;
    }
    // SAFETY: as in `table`.
    Some(unsafe { &mut *std::ptr::from_mut(slot).cast::<RequestCache<K>>() })
}

// ============================================================================
// EVALUATOR
// ============================================================================

/// Evaluates requests and owns the memo tables of `Cached` kinds.
pub struct Evaluator {
    diags: DiagnosticEngine,
    options: EvaluatorOptions,
    /// Requests currently being evaluated, outermost first.
    active_requests: FxIndexSet<AnyRequest>,
    /// Memo tables keyed by the packed identity of the kind.
    cache: FxHashMap<u64, Box<dyn ErasedCache>>,
    /// Requests each request asked for, in first-request order.
    dependencies: FxIndexMap<AnyRequest, FxIndexSet<AnyRequest>>,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_options(EvaluatorOptions::default())
    }

    pub fn with_options(options: EvaluatorOptions) -> Self {
        Self {
            diags: DiagnosticEngine::new(),
            options,
            active_requests: FxIndexSet::default(),
            cache: FxHashMap::default(),
            dependencies: FxIndexMap::default(),
        }
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    pub fn diagnostics(&self) -> &DiagnosticEngine {
        &self.diags
    }

    pub fn diagnostics_mut(&mut self) -> &mut DiagnosticEngine {
        &mut self.diags
    }

    /// Take the collected diagnostics.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        self.diags.take()
    }

    /// Evaluate `request`, consulting and filling the cache its kind selects.
    ///
    /// Every call, cache hits included, pushes an erased copy of the request
    /// on the active stack and records it as a dependency of the enclosing
    /// request. The graph is kept until [`clear_cache`](Self::clear_cache).
    ///
    /// Errors from the kind's evaluation are returned unchanged. A request
    /// that is already active is a cycle: it is diagnosed and rejected with
    /// [`RequestError::Cycle`] without being evaluated.
    pub fn evaluate<K: RequestKind>(
        &mut self,
        request: &Request<K>,
    ) -> Result<K::Output, RequestError> {
        let any = AnyRequest::new(request.clone());
        if self.check_dependency(&any) {
            return Err(RequestError::cycle(&any));
        }

        let result = self.result_for(request);
        self.active_requests.pop();
        result
    }

    /// Evaluate `request`, substituting `default` for any error.
    pub fn evaluate_or_default<K: RequestKind>(
        &mut self,
        request: &Request<K>,
        default: K::Output,
    ) -> K::Output {
        match self.evaluate(request) {
            Ok(output) => output,
            Err(error) => {
                tracing::debug!(request = %request, %error, "using default output");
                default
            }
        }
    }

    /// Whether `request` is currently being evaluated.
    pub fn has_active_request<K: RequestKind>(&self, request: &Request<K>) -> bool {
        self.active_requests
            .iter()
            .any(|active| active.downcast_ref::<K>() == Some(request))
    }

    /// Requests currently being evaluated, outermost first.
    pub fn active_requests(&self) -> impl Iterator<Item = &AnyRequest> + '_ {
        self.active_requests.iter()
    }

    /// Seed the cache of `request`'s kind with a known output. Does nothing
    /// for `Uncached` kinds.
    pub fn cache_output<K: RequestKind>(&mut self, request: &Request<K>, output: K::Output) {
        <K::Caching as CachingPolicy<K>>::store(self, request, &output);
    }

    /// Whether the evaluator's own memo table holds a result for `request`.
    pub fn is_cached(&self, request: &AnyRequest) -> bool {
        self.cache
            .get(&request.kind_identity().value())
            .is_some_and(|slot| slot.contains(request))
    }

    /// Number of results in the evaluator's memo tables.
    pub fn cached_count(&self) -> usize {
        self.cache.values().map(|slot| slot.len()).sum()
    }

    /// Drop every memoized result and the recorded dependency graph.
    /// Separately cached kinds are not affected.
    pub fn clear_cache(&mut self) {
        tracing::debug!(
            entries = self.cached_count(),
            edges = self.dependency_count(),
            "clearing request cache"
        );
        self.cache.clear();
        self.dependencies.clear();
    }

    /// Number of recorded dependency edges.
    pub fn dependency_count(&self) -> usize {
        self.dependencies.values().map(|deps| deps.len()).sum()
    }

    /// Requests `request` asked for, in order.
    pub fn dependencies_of(&self, request: &AnyRequest) -> impl Iterator<Item = &AnyRequest> + '_ {
        self.dependencies
            .get(request)
            .into_iter()
            .flat_map(|deps| deps.iter())
    }

    pub(crate) fn cached_output<K: RequestKind>(&self, request: &Request<K>) -> Option<K::Output> {
        let slot = self.cache.get(&K::IDENTITY.value())?;
        table::<K>(&**slot)?.entries.get(request).cloned()
    }

    pub(crate) fn insert_cached_output<K: RequestKind>(
        &mut self,
        request: &Request<K>,
        output: K::Output,
    ) {
        let slot = self
            .cache
            .entry(K::IDENTITY.value())
            .or_insert_with(|| Box::new(RequestCache::<K>::default()));
        if let Some(table) = table_mut::<K>(&mut **slot) {
            table.entries.insert(request.clone(), output);
        }
    }

    /// Record `request` as a dependency of the innermost active request and
    /// push it. Returns `true` (after diagnosing) if it closes a cycle.
    fn check_dependency(&mut self, request: &AnyRequest) -> bool {
        if let Some(parent) = self.active_requests.last().cloned() {
            self.dependencies
                .entry(parent)
                .or_default()
                .insert(request.clone());
        }

        if self.active_requests.insert(request.clone()) {
            return false;
        }

        self.diagnose_cycle(request);
        true
    }

    /// Emit the head diagnostic for `request`, then one step note for every
    /// request pushed after it.
    fn diagnose_cycle(&mut self, request: &AnyRequest) {
        tracing::debug!(request = %request, depth = self.active_requests.len(), "cycle detected");

        if self.options.debug_dump_cycles {
            let mut tree = String::new();
            if self.print_dependencies(request, &mut tree).is_ok() {
                tracing::debug!("dependency tree:\n{tree}");
            }
        }

        if let Some(stats) = &self.options.stats {
            stats.record_cycle(&request.kind_name());
        }

        request.diagnose_cycle(&mut self.diags);
        let Some(start) = self.active_requests.get_index_of(request) else {
            return;
        };
        for step in self.active_requests.iter().skip(start + 1) {
            step.note_cycle_step(&mut self.diags);
        }
    }

    fn result_for<K: RequestKind>(&mut self, request: &Request<K>) -> Result<K::Output, RequestError> {
        if let Some(output) = <K::Caching as CachingPolicy<K>>::lookup(self, request) {
            tracing::trace!(request = %request, "cache hit");
            if let Some(stats) = &self.options.stats {
                stats.record_cache_hit(&name_of::<K>());
            }
            return Ok(output);
        }
        if K::CACHE_KIND.is_ever_cached() {
            tracing::trace!(request = %request, "cache miss");
        }

        let output = self.result_uncached(request)?;
        <K::Caching as CachingPolicy<K>>::store(self, request, &output);
        Ok(output)
    }

    fn result_uncached<K: RequestKind>(
        &mut self,
        request: &Request<K>,
    ) -> Result<K::Output, RequestError> {
        let stats = self.options.stats.clone();
        let _tracer = request.make_tracer(stats.as_deref());
        request.evaluate_request(self)
    }
}
