//! The ingestion engine: cancellable background loading of a delimited
//! source into an in-memory [`Table`].
//!
//! A [`Loader`] runs at most one load at a time. [`Loader::start`] opens the
//! source, spawns one worker thread that streams rows into the table, and
//! returns immediately; the caller-supplied completion step is posted to the
//! loader's [`NotifyQueue`] exactly once, and only if the load was not
//! cancelled. [`Loader::request_cancel`] flips the cancellation flag and
//! blocks until the worker has fully exited, after which the table is stable
//! and a new load may start.

mod gate;
mod notify;
mod observer;

pub use notify::{InlineQueue, Job, NotifyQueue, TaskQueue};
pub use observer::{CompositeObserver, LoadContext, LoadObserver, LoadStats, StdErrObserver};

use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use crate::error::OpenResult;
use crate::source::{DelimitedSource, SourceDescriptor, SourceFormat};
use crate::table::Table;

use gate::WorkGate;

/// Lifecycle state of a [`Loader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No load in flight.
    Idle,
    /// A background worker is producing rows.
    Loading,
    /// Cancellation was requested and the worker has not yet exited.
    Cancelling,
}

/// State shared between the loader and its worker thread.
///
/// The worker operates on this handle, never on the `Loader` itself, so the
/// loader value may go out of scope while a load is still draining.
struct Shared {
    state: Mutex<LoadState>,
    cancelled: AtomicBool,
    table: Mutex<Table>,
    gate: WorkGate,
}

/// A cancellable background loader for one delimited-text source.
///
/// The source descriptor is fixed at construction; each call to
/// [`start`](Loader::start) clears the table and re-reads the source from the
/// beginning. Share the loader across threads behind an [`Arc`] to cancel
/// from somewhere other than the starting thread.
///
/// ```no_run
/// use std::sync::Arc;
/// use delimited_ingest::loader::{Loader, TaskQueue};
/// use delimited_ingest::source::SourceDescriptor;
///
/// # fn main() -> Result<(), delimited_ingest::OpenError> {
/// let queue = Arc::new(TaskQueue::new());
/// let loader = Loader::new(SourceDescriptor::from_path("data.csv")?)
///     .with_queue(queue.clone());
///
/// loader.start(|| println!("load finished"))?;
/// // ... on the home event loop:
/// queue.run_pending();
/// # Ok(())
/// # }
/// ```
pub struct Loader {
    descriptor: SourceDescriptor,
    home: Arc<dyn NotifyQueue>,
    observer: Option<Arc<dyn LoadObserver>>,
    shared: Arc<Shared>,
}

impl Loader {
    /// Create a loader for `descriptor`.
    ///
    /// Completions run inline on the worker thread until a queue is attached
    /// with [`with_queue`](Loader::with_queue).
    pub fn new(descriptor: SourceDescriptor) -> Self {
        Self {
            descriptor,
            home: Arc::new(InlineQueue),
            observer: None,
            shared: Arc::new(Shared {
                state: Mutex::new(LoadState::Idle),
                cancelled: AtomicBool::new(false),
                table: Mutex::new(Table::new()),
                gate: WorkGate::new(),
            }),
        }
    }

    /// Attach the queue completions are posted to.
    pub fn with_queue(mut self, queue: Arc<dyn NotifyQueue>) -> Self {
        self.home = queue;
        self
    }

    /// Attach an observer for load lifecycle events.
    pub fn with_observer(mut self, observer: Arc<dyn LoadObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// The source format this loader was built with.
    pub fn format(&self) -> SourceFormat {
        self.descriptor.format
    }

    /// The source path this loader was built with.
    pub fn path(&self) -> &Path {
        &self.descriptor.path
    }

    /// Current lifecycle state.
    pub fn state(&self) -> LoadState {
        *self.shared.state.lock().expect("state mutex poisoned")
    }

    /// Number of rows currently in the table.
    pub fn row_count(&self) -> usize {
        self.shared
            .table
            .lock()
            .expect("table mutex poisoned")
            .row_count()
    }

    /// Clone the current table.
    ///
    /// Stable to read after the completion step has run, or after
    /// [`request_cancel`](Loader::request_cancel) returned (at which point it
    /// holds a partial or empty result).
    pub fn snapshot(&self) -> Table {
        self.shared
            .table
            .lock()
            .expect("table mutex poisoned")
            .clone()
    }

    /// Start loading the source in the background.
    ///
    /// Returns without blocking once the worker is scheduled. If the source
    /// cannot be opened, returns the error immediately: no background work is
    /// scheduled, the table is untouched and `completion` is never invoked.
    ///
    /// On success, `completion` is posted to the loader's queue exactly once
    /// when the whole source has been ingested; a cancelled load posts
    /// nothing.
    ///
    /// # Panics
    ///
    /// Panics if a load is already in flight. Overlapping loads are a
    /// caller-side bug, not a runtime condition.
    pub fn start<F>(&self, completion: F) -> OpenResult<()>
    where
        F: FnOnce() + Send + 'static,
    {
        {
            let state = self.shared.state.lock().expect("state mutex poisoned");
            assert!(
                *state == LoadState::Idle,
                "start called while a load is active"
            );
        }

        // Open eagerly: failures surface here and leave the loader untouched.
        let source = DelimitedSource::open(&self.descriptor)?;

        let ctx = LoadContext {
            path: self.descriptor.path.clone(),
            format: self.descriptor.format,
        };

        self.shared.cancelled.store(false, Ordering::SeqCst);
        self.shared
            .table
            .lock()
            .expect("table mutex poisoned")
            .clear();

        // Register before the state becomes observable as Loading: a canceller
        // that sees Loading must always find in-flight work to wait on.
        self.shared.gate.enter();
        *self.shared.state.lock().expect("state mutex poisoned") = LoadState::Loading;

        if let Some(obs) = &self.observer {
            obs.on_started(&ctx);
        }

        let shared = Arc::clone(&self.shared);
        let home = Arc::clone(&self.home);
        let observer = self.observer.clone();
        let completion: Job = Box::new(completion);
        thread::spawn(move || run_worker(shared, source, ctx, home, observer, completion));

        Ok(())
    }

    /// Request cancellation of the in-flight load and wait for it to stop.
    ///
    /// A no-op returning immediately when no load is in flight. Otherwise
    /// blocks until the worker has exited; cancellation is observed at row
    /// boundaries, so the wait is bounded by the row currently being parsed,
    /// not by the remainder of the file. Once this returns, the table will
    /// not be mutated again and a new [`start`](Loader::start) is safe. The
    /// completion step of a cancelled load is never posted.
    pub fn request_cancel(&self) {
        {
            let mut state = self.shared.state.lock().expect("state mutex poisoned");
            match *state {
                LoadState::Idle => return,
                LoadState::Loading | LoadState::Cancelling => {
                    self.shared.cancelled.store(true, Ordering::SeqCst);
                    *state = LoadState::Cancelling;
                }
            }
        }
        self.shared.gate.wait_idle();
    }
}

impl fmt::Debug for Loader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Loader")
            .field("descriptor", &self.descriptor)
            .field("state", &self.state())
            .field("observer_set", &self.observer.is_some())
            .finish()
    }
}

/// Parse-and-populate routine, run on the worker thread.
fn run_worker(
    shared: Arc<Shared>,
    source: DelimitedSource,
    ctx: LoadContext,
    home: Arc<dyn NotifyQueue>,
    observer: Option<Arc<dyn LoadObserver>>,
    completion: Job,
) {
    source.parse(|index, row| {
        shared
            .table
            .lock()
            .expect("table mutex poisoned")
            .push(row);
        if let Some(obs) = &observer {
            obs.on_row(&ctx, index);
        }
        // Checked after every appended row: at most one row lands after the
        // flag is set.
        !shared.cancelled.load(Ordering::SeqCst)
    });

    // Restore Idle and read the flag under one lock acquisition; this
    // serializes the exit decision against request_cancel.
    let cancelled = {
        let mut state = shared.state.lock().expect("state mutex poisoned");
        *state = LoadState::Idle;
        shared.cancelled.load(Ordering::SeqCst)
    };
    let rows = shared
        .table
        .lock()
        .expect("table mutex poisoned")
        .row_count();

    // Deregister on every exit path, before notifying: a blocked canceller
    // must never outwait a completion.
    shared.gate.leave();

    let stats = LoadStats { rows };
    if cancelled {
        if let Some(obs) = &observer {
            obs.on_cancelled(&ctx, stats);
        }
    } else {
        home.post(completion);
        if let Some(obs) = &observer {
            obs.on_completed(&ctx, stats);
        }
    }
}
