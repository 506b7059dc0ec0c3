//! `delimited-ingest` is a small library for loading delimited text (CSV/TSV)
//! into an ordered in-memory [`table::Table`] on a background thread, with
//! blocking, row-granular cancellation.
//!
//! The primary entrypoint is [`loader::Loader`]: describe a source with
//! [`source::SourceDescriptor`], start a load, and receive a completion step
//! on your own context once the whole file has been ingested. Cancelling an
//! in-flight load blocks only until the worker has observed the request
//! (checked after every row) and fully exited; a cancelled load never fires
//! its completion step.
//!
//! ## What you get
//!
//! - Every line of the source becomes one row of raw text fields; rows may
//!   differ in field count. Nothing is typed, trimmed or interpreted.
//! - Rows arrive in source order, with no drops or duplicates.
//! - Open failures (missing file, unknown extension) are returned
//!   synchronously from [`loader::Loader::start`]; nothing asynchronous ever
//!   reports an error.
//! - After `request_cancel` returns, the table holds a stable prefix of the
//!   source and the loader is ready for a new load.
//!
//! ## Quick example: load a file
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use delimited_ingest::loader::{Loader, TaskQueue};
//! use delimited_ingest::source::SourceDescriptor;
//!
//! # fn main() -> Result<(), delimited_ingest::OpenError> {
//! // Format is inferred from the extension (.csv / .tsv).
//! let descriptor = SourceDescriptor::from_path("people.csv")?;
//!
//! let queue = Arc::new(TaskQueue::new());
//! let loader = Arc::new(Loader::new(descriptor).with_queue(queue.clone()));
//!
//! let done = loader.clone();
//! loader.start(move || {
//!     println!("loaded {} rows", done.row_count());
//! })?;
//!
//! // On the thread that owns `queue` (e.g. a UI tick), drain completions:
//! queue.run_pending();
//! # Ok(())
//! # }
//! ```
//!
//! ## Cancelling
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use delimited_ingest::loader::Loader;
//! use delimited_ingest::source::{SourceDescriptor, SourceFormat};
//!
//! # fn main() -> Result<(), delimited_ingest::OpenError> {
//! let loader = Arc::new(Loader::new(SourceDescriptor::new(
//!     "big_export.tsv",
//!     SourceFormat::Tsv,
//! )));
//!
//! loader.start(|| println!("never printed if cancelled in time"))?;
//!
//! // From any thread. Returns once the worker has stopped; the table then
//! // holds whatever prefix of the file was ingested.
//! loader.request_cancel();
//! println!("kept {} rows", loader.row_count());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`loader`]: the background loader, its notify queues and observer hooks
//! - [`source`]: source descriptors and the delimited-text tokenizer boundary
//! - [`table`]: the in-memory row table
//! - [`error`]: open-time error types

pub mod error;
pub mod loader;
pub mod source;
pub mod table;

pub use error::{OpenError, OpenResult};
