use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use crate::source::SourceFormat;

/// Context about the load an event belongs to.
#[derive(Debug, Clone)]
pub struct LoadContext {
    /// Path of the source being loaded.
    pub path: PathBuf,
    /// Format of the source being loaded.
    pub format: SourceFormat,
}

/// Stats reported when a load stops producing rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadStats {
    /// Number of rows in the table when the load stopped.
    pub rows: usize,
}

/// Observer interface for load lifecycle events.
///
/// Implementors can record metrics or logs. All hooks have empty defaults and
/// run on the loader's worker thread, except [`on_started`] which runs on the
/// thread that called `start`.
///
/// [`on_started`]: LoadObserver::on_started
pub trait LoadObserver: Send + Sync {
    /// Called when a load has been accepted, before the worker runs.
    fn on_started(&self, _ctx: &LoadContext) {}

    /// Called after each row is appended to the table.
    fn on_row(&self, _ctx: &LoadContext, _index: u64) {}

    /// Called when a load ran to completion (the completion step has been
    /// posted by this point).
    fn on_completed(&self, _ctx: &LoadContext, _stats: LoadStats) {}

    /// Called when a load exited due to cancellation.
    fn on_cancelled(&self, _ctx: &LoadContext, _stats: LoadStats) {}
}

/// An observer that fans out callbacks to a list of observers.
#[derive(Default)]
pub struct CompositeObserver {
    observers: Vec<Arc<dyn LoadObserver>>,
}

impl CompositeObserver {
    /// Create a new composite observer from a list of observers.
    pub fn new(observers: Vec<Arc<dyn LoadObserver>>) -> Self {
        Self { observers }
    }
}

impl fmt::Debug for CompositeObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeObserver")
            .field("observers_len", &self.observers.len())
            .finish()
    }
}

impl LoadObserver for CompositeObserver {
    fn on_started(&self, ctx: &LoadContext) {
        for o in &self.observers {
            o.on_started(ctx);
        }
    }

    fn on_row(&self, ctx: &LoadContext, index: u64) {
        for o in &self.observers {
            o.on_row(ctx, index);
        }
    }

    fn on_completed(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_completed(ctx, stats);
        }
    }

    fn on_cancelled(&self, ctx: &LoadContext, stats: LoadStats) {
        for o in &self.observers {
            o.on_cancelled(ctx, stats);
        }
    }
}

/// Logs load lifecycle events to stderr.
#[derive(Debug, Default)]
pub struct StdErrObserver;

impl LoadObserver for StdErrObserver {
    fn on_started(&self, ctx: &LoadContext) {
        eprintln!(
            "[load][start] format={:?} path={}",
            ctx.format,
            ctx.path.display()
        );
    }

    fn on_completed(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[load][ok] format={:?} path={} rows={}",
            ctx.format,
            ctx.path.display(),
            stats.rows
        );
    }

    fn on_cancelled(&self, ctx: &LoadContext, stats: LoadStats) {
        eprintln!(
            "[load][cancelled] format={:?} path={} rows={}",
            ctx.format,
            ctx.path.display(),
            stats.rows
        );
    }
}
