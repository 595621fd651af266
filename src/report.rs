//! The entry-point wrapper: drive a computation and report, never reject.
//!
//! This is the one place in the system where an unhandled rejection becomes
//! an observable side effect instead of a value.

use std::fmt::Display;
use std::pin::Pin;

use pin_project_lite::pin_project;

use crate::driver::{Drive, IntoCoroutine, drive};

pin_project! {
    /// A future that converts rejection into a stderr diagnostic.
    ///
    /// Always fulfills: `Some(value)` on success, `None` after a reported
    /// failure. Wrap any fallible future with
    /// [`reported()`](crate::CoExt::reported), or drive a computation under
    /// it with [`report`].
    #[must_use = "futures do nothing unless polled or .awaited"]
    pub struct Reported<F> {
        #[pin]
        future: F,
    }
}

impl<F> Reported<F> {
    pub(crate) fn new(future: F) -> Self {
        Reported { future }
    }

    /// Consumes the wrapper and returns the inner future.
    pub fn inner(self) -> F {
        self.future
    }
}

impl<F, T, E> Future for Reported<F>
where
    F: Future<Output = Result<T, E>>,
    E: Display,
{
    type Output = Option<T>;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let this = self.project();
        match this.future.poll(cx) {
            std::task::Poll::Ready(Ok(value)) => std::task::Poll::Ready(Some(value)),
            std::task::Poll::Ready(Err(error)) => {
                eprintln!("{error}");
                std::task::Poll::Ready(None)
            }
            std::task::Poll::Pending => std::task::Poll::Pending,
        }
    }
}

/// Drives a computation as a program entry point: a rejection is written to
/// stderr and swallowed, and the returned future always fulfills.
pub fn report<T, E>(input: impl IntoCoroutine<T, E>) -> Reported<Drive<T, E>> {
    Reported::new(drive(input))
}
