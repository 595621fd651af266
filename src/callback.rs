//! Adapts error-first callback functions into future-returning ones.
//!
//! Legacy asynchronous APIs finish by invoking a completion callback whose
//! first argument is the error slot. [`promisify`] wraps such a function so
//! it returns an asynchronous result instead, and [`promisify_all`] applies
//! the adapter across a whole registry of named functions.

use std::collections::HashMap;
use std::pin::Pin;
use std::rc::Rc;

use futures::channel::oneshot;

/// Suffix appended to the adapted siblings installed by [`promisify_all`].
pub const ASYNC_SUFFIX: &str = "_async";

/// The error-first slot of a legacy completion callback.
///
/// Some callback APIs misuse the error slot to carry a success value; the
/// [`Value`] variant covers that anachronism explicitly, and the adapter
/// fulfills rather than rejects when it sees one.
///
/// [`Value`]: ErrorSlot::Value
pub enum ErrorSlot<T, E> {
    /// A genuine failure.
    Error(E),

    /// A success value smuggled through the error slot.
    Value(T),
}

/// The completion callback handed to a wrapped legacy function.
///
/// Consuming `self` means the callback fires exactly once; dropping it
/// unfired leaves the paired [`Adapted`] future pending forever, like a
/// promise whose executor never settles.
pub struct Callback<T, E> {
    tx: oneshot::Sender<Result<T, E>>,
}

impl<T, E> Callback<T, E> {
    /// Settles the paired future from the error-first argument pair.
    ///
    /// An [`ErrorSlot::Error`] rejects; an [`ErrorSlot::Value`] fulfills
    /// with the smuggled value; an empty error slot fulfills with the value
    /// slot, defaulting when that one is empty too.
    pub fn complete(self, error: Option<ErrorSlot<T, E>>, value: Option<T>)
    where
        T: Default,
    {
        let outcome = match error {
            Some(ErrorSlot::Value(smuggled)) => Ok(smuggled),
            Some(ErrorSlot::Error(error)) => Err(error),
            None => Ok(value.unwrap_or_default()),
        };
        // The receiving side may already be gone; nothing to settle then.
        let _ = self.tx.send(outcome);
    }
}

/// The asynchronous result of a wrapped legacy function. Created by
/// [`promisify`].
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct Adapted<T, E> {
    rx: oneshot::Receiver<Result<T, E>>,
}

impl<T, E> Future for Adapted<T, E> {
    type Output = Result<T, E>;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let this = self.get_mut();
        match Pin::new(&mut this.rx).poll(cx) {
            std::task::Poll::Ready(Ok(outcome)) => std::task::Poll::Ready(outcome),
            // The callback was dropped unfired; the result never settles.
            std::task::Poll::Ready(Err(oneshot::Canceled)) => std::task::Poll::Pending,
            std::task::Poll::Pending => std::task::Poll::Pending,
        }
    }
}

/// Wraps a callback-style function into one returning an asynchronous
/// result.
///
/// The legacy function is invoked synchronously with the original arguments
/// plus a fresh [`Callback`]; the returned [`Adapted`] future settles when
/// (and if) the callback fires.
///
/// # Example
/// ```
/// use corodrive::{Callback, promisify};
///
/// let add = promisify(|(a, b): (i32, i32), done: Callback<i32, String>| {
///     done.complete(None, Some(a + b));
/// });
///
/// assert_eq!(futures::executor::block_on(add((2, 3))), Ok(5));
/// ```
pub fn promisify<A, T, E, F>(f: F) -> impl Fn(A) -> Adapted<T, E>
where
    F: Fn(A, Callback<T, E>),
{
    move |args| {
        let (tx, rx) = oneshot::channel();
        f(args, Callback { tx });
        Adapted { rx }
    }
}

/// A legacy callback-style function stored in a registry.
pub type LegacyFn<T, E> = Rc<dyn Fn(Vec<T>, Callback<T, E>)>;

/// The adapted, future-returning form of a registry function.
pub type AdaptedFn<T, E> = Rc<dyn Fn(Vec<T>) -> Adapted<T, E>>;

/// A named function in a callback API registry: either still callback-style
/// or already adapted.
pub enum ApiFn<T, E> {
    /// The original error-first callback form.
    Legacy(LegacyFn<T, E>),

    /// The future-returning form installed by [`promisify_all`].
    Adapted(AdaptedFn<T, E>),
}

/// Installs an adapted sibling for every legacy function in the registry.
///
/// For each [`ApiFn::Legacy`] entry whose name does not already end in
/// [`ASYNC_SUFFIX`], a `"{name}_async"` entry holding the adapted form is
/// added. The original entries stay untouched, suffixed names are never
/// adapted again, and the same registry is mutated and returned.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use std::rc::Rc;
///
/// use corodrive::{ApiFn, Callback, promisify_all};
///
/// let mut api: HashMap<String, ApiFn<i32, String>> = HashMap::new();
/// api.insert(
///     "add_one".to_string(),
///     ApiFn::Legacy(Rc::new(|args: Vec<i32>, done: Callback<i32, String>| {
///         done.complete(None, Some(args[0] + 1));
///     })),
/// );
///
/// promisify_all(&mut api);
/// assert!(api.contains_key("add_one"));
/// assert!(api.contains_key("add_one_async"));
/// ```
pub fn promisify_all<T, E>(
    api: &mut HashMap<String, ApiFn<T, E>>,
) -> &mut HashMap<String, ApiFn<T, E>>
where
    T: 'static,
    E: 'static,
{
    let names: Vec<String> = api
        .iter()
        .filter(|(name, entry)| {
            matches!(entry, ApiFn::Legacy(_)) && !name.ends_with(ASYNC_SUFFIX)
        })
        .map(|(name, _)| name.clone())
        .collect();
    for name in names {
        let Some(ApiFn::Legacy(f)) = api.get(&name) else {
            continue;
        };
        let f = Rc::clone(f);
        let adapted = promisify(move |args: Vec<T>, callback| f(args, callback));
        api.insert(
            format!("{name}{ASYNC_SUFFIX}"),
            ApiFn::Adapted(Rc::new(adapted)),
        );
    }
    api
}
