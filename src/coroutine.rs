//! Defines the `Coroutine` trait and the values that cross a suspension point.
//!
//! A `Coroutine` is a resumable unit of work: each resume either pauses again,
//! yielding an intermediate [`Yielded`] value to whoever is stepping it, or
//! completes with a final value. Failures can be injected back into the paused
//! computation with [`raise`], giving it a chance to recover at the exact spot
//! where it suspended.
//!
//! Coroutines are usually hand-written state machines; [`from_fn`] builds one
//! from a closure that keeps its own continuation state.
//!
//! [`raise`]: Coroutine::raise

use crate::task::Yielded;

/// The outcome of resuming a coroutine once.
pub enum Step<T, E> {
    /// The coroutine paused and produced an intermediate value for the driver
    /// to interpret.
    Yield(Yielded<T, E>),

    /// The coroutine ran to completion with a final value.
    Done(T),
}

/// The value a driver feeds back into a paused coroutine.
pub enum Resume<T, E> {
    /// No value: the initial step, or the completion of a task batch (which
    /// by contract carries no aggregated result).
    Empty,

    /// A settled value: a plain yield echoed straight back, or the
    /// fulfillment of an asynchronous result the coroutine yielded.
    Value(T),

    /// A yielded list that did not classify as a task batch, handed back
    /// whole as a single plain value.
    Mixed(Vec<Yielded<T, E>>),
}

/// A suspendable, resumable computation.
///
/// Both operations return `Err` when a failure escapes the computation,
/// either because [`step`] hit one while running, or because a [`raise`]d
/// failure was not handled locally. A coroutine is terminal once it has
/// returned `Done` or `Err`; resuming it after that is a contract violation
/// and implementations are free to panic.
///
/// A coroutine is only ever stepped by the single driver that owns it, so
/// implementations never need interior locking.
///
/// [`step`]: Coroutine::step
/// [`raise`]: Coroutine::raise
pub trait Coroutine<T, E> {
    /// Resumes the computation with a value, or starts it when `input` is
    /// [`Resume::Empty`] and no step has happened yet.
    fn step(&mut self, input: Resume<T, E>) -> Result<Step<T, E>, E>;

    /// Resumes the computation by injecting a failure at the current
    /// suspension point.
    ///
    /// Returning `Ok(Step::Yield(..))` means the computation recovered and
    /// suspended again; `Ok(Step::Done(v))` means it swallowed the failure
    /// and finished with `v`; `Err(e)` means the failure (or a new one)
    /// escaped.
    fn raise(&mut self, error: E) -> Result<Step<T, E>, E>;
}

/// A coroutine built from a resumable closure. See [`from_fn`].
pub struct FnCoroutine<F> {
    f: F,
}

/// Builds a coroutine from a closure holding its own continuation state.
///
/// The closure receives `Ok(resume)` for a [`step`] and `Err(error)` for a
/// [`raise`], and decides whether to pause again, complete, or let the
/// failure escape.
///
/// [`step`]: Coroutine::step
/// [`raise`]: Coroutine::raise
///
/// # Example
/// ```
/// use corodrive::{drive, from_fn, Resume, Step, Yielded};
///
/// // Yields 1, then completes with whatever came back, plus one.
/// let mut state = 0;
/// let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
///     state += 1;
///     match (state, input) {
///         (1, _) => Ok(Step::Yield(Yielded::Value(1))),
///         (_, Ok(Resume::Value(v))) => Ok(Step::Done(v + 1)),
///         _ => Err("unexpected resume".to_string()),
///     }
/// });
///
/// let result = futures::executor::block_on(drive(machine));
/// assert_eq!(result, Ok(2));
/// ```
pub fn from_fn<T, E, F>(f: F) -> FnCoroutine<F>
where
    F: FnMut(Result<Resume<T, E>, E>) -> Result<Step<T, E>, E>,
{
    FnCoroutine { f }
}

impl<T, E, F> Coroutine<T, E> for FnCoroutine<F>
where
    F: FnMut(Result<Resume<T, E>, E>) -> Result<Step<T, E>, E>,
{
    fn step(&mut self, input: Resume<T, E>) -> Result<Step<T, E>, E> {
        (self.f)(Ok(input))
    }

    fn raise(&mut self, error: E) -> Result<Step<T, E>, E> {
        (self.f)(Err(error))
    }
}
