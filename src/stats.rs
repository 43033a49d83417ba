//! Per-kind request statistics.
//!
//! A [`StatsReporter`] is optional; without one, [`FrontendStatsTracer`] only
//! opens a tracing span.

use std::borrow::Cow;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use tracing::span::EnteredSpan;

/// Counters for one request kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RequestCounters {
    /// Evaluations that ran the kind's computation.
    pub evaluations: u64,
    /// Evaluations answered from a cache.
    pub cache_hits: u64,
    /// Cycles closed by a request of this kind.
    pub cycles: u64,
    /// Wall time spent inside the kind's computation, nested requests included.
    pub total_time: Duration,
}

/// Collects [`RequestCounters`] keyed by kind name.
#[derive(Debug, Default)]
pub struct StatsReporter {
    counters: Mutex<FxHashMap<String, RequestCounters>>,
}

impl StatsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_evaluation(&self, kind: &str, elapsed: Duration) {
        self.update(kind, |counters| {
            counters.evaluations += 1;
            counters.total_time += elapsed;
        });
    }

    pub fn record_cache_hit(&self, kind: &str) {
        self.update(kind, |counters| counters.cache_hits += 1);
    }

    pub fn record_cycle(&self, kind: &str) {
        self.update(kind, |counters| counters.cycles += 1);
    }

    /// Counters for `kind`; all zero if nothing was recorded.
    pub fn counters(&self, kind: &str) -> RequestCounters {
        self.counters.lock().get(kind).copied().unwrap_or_default()
    }

    /// Every kind's counters, sorted by kind name.
    pub fn snapshot(&self) -> Vec<(String, RequestCounters)> {
        let mut entries: Vec<_> = self
            .counters
            .lock()
            .iter()
            .map(|(kind, counters)| (kind.clone(), *counters))
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    fn update(&self, kind: &str, f: impl FnOnce(&mut RequestCounters)) {
        let mut counters = self.counters.lock();
        match counters.get_mut(kind) {
            Some(entry) => f(entry),
            None => f(counters.entry(kind.to_owned()).or_default()),
        }
    }
}

/// Scope of one request evaluation.
///
/// Enters a `request` span for its lifetime and, when a reporter is
/// attached, records the evaluation and its duration on drop.
pub struct FrontendStatsTracer<'a> {
    reporter: Option<&'a StatsReporter>,
    kind: Cow<'static, str>,
    started: Instant,
    _span: EnteredSpan,
}

impl<'a> FrontendStatsTracer<'a> {
    /// `render_inputs` runs only if the span is enabled.
    pub fn new(
        reporter: Option<&'a StatsReporter>,
        kind: Cow<'static, str>,
        render_inputs: impl FnOnce() -> String,
    ) -> Self {
        let span = tracing::debug_span!("request", kind = %kind, inputs = tracing::field::Empty);
        if !span.is_disabled() {
            span.record("inputs", render_inputs().as_str());
        }
        Self {
            reporter,
            kind,
            started: Instant::now(),
            _span: span.entered(),
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl Drop for FrontendStatsTracer<'_> {
    fn drop(&mut self) {
        if let Some(reporter) = self.reporter {
            reporter.record_evaluation(&self.kind, self.started.elapsed());
        }
    }
}
