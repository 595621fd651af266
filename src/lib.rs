//! Utilities for composing suspendable computations into asynchronous results.
//!
//! `corodrive` provides a small trampoline for coroutine-style units of work:
//! computations that pause, yield intermediate values, and resume with the
//! settled outcome, including failures injected back at the exact suspension
//! point, so a paused computation can recover locally before anything
//! propagates.
//!
//! The crate is designed to work independently of any specific async runtime:
//! everything it produces is a plain `Future`, and any single-threaded
//! executor can drive it.
//!
//! Features include:
//! - A `Coroutine` trait for resumable computations, with `from_fn` for
//!   building them from plain closures holding continuation state
//! - A driver (`drive`) that steps a computation to completion, classifying
//!   every yielded value: plain values echo straight back, nested
//!   computations are driven recursively, task batches run in parallel, and
//!   asynchronous results suspend the computation until they settle
//! - `parallel` and `series` combinators folding task sequences into a
//!   single completion, concurrently or strictly one at a time
//! - A callback adapter (`promisify`, `promisify_all`) that turns error-first
//!   callback functions into future-returning ones
//! - A `report` entry-point wrapper that logs unhandled rejections instead of
//!   propagating them
//!
//! All components are modular and composable; the driver is the only piece
//! with any interpretation logic, and everything else is built on top of it.

pub mod batch;
pub mod callback;
pub mod classify;
pub mod co_ext;
pub mod coroutine;
pub mod driver;
pub mod report;
pub mod task;

pub use batch::{Batch, parallel, series};
pub use callback::{
    ASYNC_SUFFIX, Adapted, AdaptedFn, ApiFn, Callback, ErrorSlot, LegacyFn, promisify,
    promisify_all,
};
pub use co_ext::CoExt;
pub use coroutine::{Coroutine, FnCoroutine, Resume, Step, from_fn};
pub use driver::{Drive, IntoCoroutine, co, drive};
pub use report::{Reported, report};
pub use task::{BoxCoroutine, CoFuture, CoroFactory, Task, Yielded};
