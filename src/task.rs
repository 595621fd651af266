//! The tagged value universe of the driver.
//!
//! [`Yielded`] is everything a coroutine can produce at a suspension point;
//! [`Task`] is the subset admissible as a combinator element (anything that
//! can be turned into an asynchronous result). A value says what it is, so
//! the classifier only has to look at the tag.

use futures::FutureExt;
use futures::future::LocalBoxFuture;

use crate::coroutine::Coroutine;
use crate::driver::Drive;

/// An asynchronous result placeholder: an eventual `Result<T, E>`.
///
/// Futures here are `!Send`: the model is single-threaded and cooperative,
/// and any executor able to drive a local future can drive these.
pub type CoFuture<T, E> = LocalBoxFuture<'static, Result<T, E>>;

/// A started, steppable coroutine instance.
pub type BoxCoroutine<T, E> = Box<dyn Coroutine<T, E>>;

/// A suspendable computation: a factory producing a steppable instance.
/// Invoking the factory runs no user code, it only builds the state machine.
pub type CoroFactory<T, E> = Box<dyn FnOnce() -> BoxCoroutine<T, E>>;

/// A value produced at a suspension point, interpreted by the driver.
pub enum Yielded<T, E> {
    /// A plain value, echoed back into the coroutine on the next step.
    Value(T),

    /// A suspendable computation for the driver to instantiate and drive to
    /// completion before resuming.
    Factory(CoroFactory<T, E>),

    /// An already-started coroutine for the driver to drive to completion
    /// before resuming.
    Stepped(BoxCoroutine<T, E>),

    /// An asynchronous result to wait on before resuming.
    Future(CoFuture<T, E>),

    /// An ordered sequence. Run as a parallel batch when every element is a
    /// task; otherwise handed back whole as a plain value.
    List(Vec<Yielded<T, E>>),
}

impl<T, E> Yielded<T, E> {
    /// Wraps a started coroutine.
    pub fn stepped(coro: impl Coroutine<T, E> + 'static) -> Self {
        Yielded::Stepped(Box::new(coro))
    }

    /// Wraps a coroutine factory.
    pub fn factory(f: impl FnOnce() -> BoxCoroutine<T, E> + 'static) -> Self {
        Yielded::Factory(Box::new(f))
    }

    /// Wraps a future as an asynchronous result.
    pub fn future(f: impl Future<Output = Result<T, E>> + 'static) -> Self {
        Yielded::Future(f.boxed_local())
    }

    /// Converts into a [`Task`] if this value classifies as one, handing the
    /// value back untouched otherwise.
    pub fn into_task(self) -> Result<Task<T, E>, Self> {
        match self {
            Yielded::Factory(f) => Ok(Task::Factory(f)),
            Yielded::Stepped(c) => Ok(Task::Stepped(c)),
            Yielded::Future(f) => Ok(Task::Future(f)),
            other => Err(other),
        }
    }
}

/// An element admissible in a combinator sequence.
pub enum Task<T, E> {
    /// A suspendable computation, started through the driver.
    Factory(CoroFactory<T, E>),

    /// An already-started coroutine, driven to completion.
    Stepped(BoxCoroutine<T, E>),

    /// An asynchronous result already in flight, used as-is.
    Future(CoFuture<T, E>),
}

impl<T, E> Task<T, E> {
    /// Wraps a started coroutine.
    pub fn stepped(coro: impl Coroutine<T, E> + 'static) -> Self {
        Task::Stepped(Box::new(coro))
    }

    /// Wraps a coroutine factory.
    pub fn factory(f: impl FnOnce() -> BoxCoroutine<T, E> + 'static) -> Self {
        Task::Factory(Box::new(f))
    }

    /// Wraps a future.
    pub fn future(f: impl Future<Output = Result<T, E>> + 'static) -> Self {
        Task::Future(f.boxed_local())
    }
}

impl<T, E> Task<T, E>
where
    T: 'static,
    E: 'static,
{
    // Combinators call this the moment a task should be in flight: futures
    // pass through untouched, computations are started through the driver.
    pub(crate) fn into_future(self) -> CoFuture<T, E> {
        match self {
            Task::Future(f) => f,
            Task::Factory(f) => Drive::new(f()).boxed_local(),
            Task::Stepped(c) => Drive::new(c).boxed_local(),
        }
    }
}

impl<T, E> From<Task<T, E>> for Yielded<T, E> {
    fn from(task: Task<T, E>) -> Self {
        match task {
            Task::Factory(f) => Yielded::Factory(f),
            Task::Stepped(c) => Yielded::Stepped(c),
            Task::Future(f) => Yielded::Future(f),
        }
    }
}
