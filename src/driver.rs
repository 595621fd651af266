//! The driver: a trampoline stepping a coroutine to completion.
//!
//! [`drive`] takes a suspendable computation, steps it, and interprets every
//! yielded value: plain values are echoed straight back, nested computations
//! are driven recursively, task batches run through the parallel combinator,
//! and asynchronous results suspend the computation until they settle.
//! Fulfillment re-enters through [`step`], rejection through [`raise`], so a
//! paused computation always gets the chance to recover a failure locally
//! before it propagates.
//!
//! [`step`]: crate::Coroutine::step
//! [`raise`]: crate::Coroutine::raise

use std::mem;
use std::pin::Pin;

use futures::FutureExt;

use crate::batch::{Batch, parallel};
use crate::classify;
use crate::coroutine::{FnCoroutine, Resume, Step};
use crate::task::{BoxCoroutine, CoFuture, CoroFactory, Yielded};

/// Conversion into a started coroutine, accepted by [`drive`].
pub trait IntoCoroutine<T, E> {
    /// Produces the steppable instance. Factories are invoked here; no user
    /// code runs until the driver first steps the result.
    fn into_coroutine(self) -> BoxCoroutine<T, E>;
}

impl<T, E> IntoCoroutine<T, E> for BoxCoroutine<T, E> {
    fn into_coroutine(self) -> BoxCoroutine<T, E> {
        self
    }
}

impl<T, E> IntoCoroutine<T, E> for CoroFactory<T, E> {
    fn into_coroutine(self) -> BoxCoroutine<T, E> {
        self()
    }
}

impl<T, E, F> IntoCoroutine<T, E> for FnCoroutine<F>
where
    F: FnMut(Result<Resume<T, E>, E>) -> Result<Step<T, E>, E> + 'static,
{
    fn into_coroutine(self) -> BoxCoroutine<T, E> {
        Box::new(self)
    }
}

/// Drives a suspendable computation to completion.
///
/// The returned [`Drive`] future fulfills with the computation's final value
/// or rejects with the failure that escaped it. Nothing is stepped on the
/// caller's stack: user code only runs once the future is polled.
///
/// # Example
/// ```
/// use corodrive::{Resume, Step, Yielded, drive, from_fn};
///
/// // Suspends on an asynchronous result, then finishes with it plus one.
/// let mut state = 0;
/// let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
///     state += 1;
///     match (state, input) {
///         (1, _) => Ok(Step::Yield(Yielded::future(async { Ok(20) }))),
///         (_, Ok(Resume::Value(v))) => Ok(Step::Done(v + 1)),
///         _ => Err("unexpected resume".to_string()),
///     }
/// });
///
/// assert_eq!(futures::executor::block_on(drive(machine)), Ok(21));
/// ```
pub fn drive<T, E>(input: impl IntoCoroutine<T, E>) -> Drive<T, E> {
    Drive::new(input.into_coroutine())
}

/// Lifts an argument-taking coroutine factory into a function returning a
/// driven future.
///
/// # Example
/// ```
/// use corodrive::{BoxCoroutine, Resume, Step, co, from_fn};
///
/// let double = co(|n: i32| -> BoxCoroutine<i32, String> {
///     Box::new(from_fn(
///         move |_: Result<Resume<i32, String>, String>| Ok(Step::Done(n * 2)),
///     ))
/// });
///
/// assert_eq!(futures::executor::block_on(double(21)), Ok(42));
/// ```
pub fn co<A, T, E, F>(factory: F) -> impl Fn(A) -> Drive<T, E>
where
    F: Fn(A) -> BoxCoroutine<T, E>,
{
    move |args| Drive::new(factory(args))
}

// What the driver does next with the coroutine it owns.
enum State<T, E> {
    // Resume with a value (or start, when the resume is `Empty`).
    Step(Resume<T, E>),
    // Resume by injecting a failure at the suspension point.
    Raise(E),
    // Suspended on an inner asynchronous result.
    Wait(CoFuture<T, E>),
    // Suspended on a parallel batch, which completes without a value.
    WaitBatch(Batch<T, E>),
    Finished,
}

/// A future driving a coroutine to completion. Created by [`drive`].
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct Drive<T, E> {
    coro: BoxCoroutine<T, E>,
    state: State<T, E>,
}

// All state is held in boxes or moved as plain values; nothing relies on a
// stable address, so the drive stays freely movable whatever `T` and `E` are.
impl<T, E> Unpin for Drive<T, E> {}

impl<T, E> Drive<T, E> {
    pub(crate) fn new(coro: BoxCoroutine<T, E>) -> Self {
        Drive {
            coro,
            state: State::Step(Resume::Empty),
        }
    }
}

impl<T, E> Drive<T, E>
where
    T: 'static,
    E: 'static,
{
    // Interprets one resume outcome: either the drive settles, or the next
    // state is installed and the poll loop keeps going.
    fn interpret(
        &mut self,
        outcome: Result<Step<T, E>, E>,
    ) -> Option<std::task::Poll<Result<T, E>>> {
        match outcome {
            Err(error) => Some(std::task::Poll::Ready(Err(error))),
            Ok(Step::Done(value)) => Some(std::task::Poll::Ready(Ok(value))),
            Ok(Step::Yield(yielded)) => {
                self.state = match yielded {
                    // Synchronous values resume without a suspension.
                    Yielded::Value(value) => State::Step(Resume::Value(value)),
                    Yielded::Factory(f) => State::Wait(Drive::new(f()).boxed_local()),
                    Yielded::Stepped(coro) => State::Wait(Drive::new(coro).boxed_local()),
                    Yielded::Future(inner) => State::Wait(inner),
                    Yielded::List(items) => {
                        if classify::is_task_batch(&items) {
                            // Checked above, so the per-element conversion
                            // cannot fail.
                            let tasks = items
                                .into_iter()
                                .filter_map(|item| item.into_task().ok())
                                .collect();
                            State::WaitBatch(parallel(tasks))
                        } else {
                            State::Step(Resume::Mixed(items))
                        }
                    }
                };
                None
            }
        }
    }
}

impl<T, E> Future for Drive<T, E>
where
    T: 'static,
    E: 'static,
{
    type Output = Result<T, E>;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let this = self.get_mut();
        loop {
            match mem::replace(&mut this.state, State::Finished) {
                State::Step(input) => {
                    let outcome = this.coro.step(input);
                    if let Some(settled) = this.interpret(outcome) {
                        return settled;
                    }
                }
                State::Raise(error) => {
                    let outcome = this.coro.raise(error);
                    if let Some(settled) = this.interpret(outcome) {
                        return settled;
                    }
                }
                State::Wait(mut inner) => match inner.poll_unpin(cx) {
                    std::task::Poll::Ready(Ok(value)) => {
                        this.state = State::Step(Resume::Value(value));
                    }
                    std::task::Poll::Ready(Err(error)) => {
                        // Rejection re-enters the paused computation, which
                        // may recover locally instead of failing the drive.
                        this.state = State::Raise(error);
                    }
                    std::task::Poll::Pending => {
                        this.state = State::Wait(inner);
                        return std::task::Poll::Pending;
                    }
                },
                State::WaitBatch(mut batch) => match batch.poll_unpin(cx) {
                    std::task::Poll::Ready(Ok(())) => {
                        this.state = State::Step(Resume::Empty);
                    }
                    std::task::Poll::Ready(Err(error)) => {
                        this.state = State::Raise(error);
                    }
                    std::task::Poll::Pending => {
                        this.state = State::WaitBatch(batch);
                        return std::task::Poll::Pending;
                    }
                },
                State::Finished => return std::task::Poll::Pending,
            }
        }
    }
}
