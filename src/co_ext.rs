//! Extension operators for futures entering the coroutine world.

use futures::FutureExt;

use crate::report::Reported;
use crate::task::CoFuture;

/// Extend fallible futures with conversions into the driver's value
/// universe.
pub trait CoExt<T, E>: Future<Output = Result<T, E>> {
    /// Boxes this future as an asynchronous result the driver understands.
    fn into_co(self) -> CoFuture<T, E>
    where
        Self: Sized + 'static,
    {
        self.boxed_local()
    }

    /// Wraps this future so a rejection is reported to stderr instead of
    /// propagated; the result always fulfills.
    fn reported(self) -> Reported<Self>
    where
        Self: Sized,
    {
        Reported::new(self)
    }
}

impl<T, E, F> CoExt<T, E> for F where F: Future<Output = Result<T, E>> {}
