//! Pure predicates categorizing values produced at suspension points.
//!
//! The driver consults these to decide how a yielded value is interpreted.
//! They are side-effect free and only inspect variant tags.

use crate::task::Yielded;

/// Returns `true` if the value is a suspendable computation (a factory).
pub fn is_factory<T, E>(value: &Yielded<T, E>) -> bool {
    matches!(value, Yielded::Factory(_))
}

/// Returns `true` if the value is an already-started coroutine.
pub fn is_stepped<T, E>(value: &Yielded<T, E>) -> bool {
    matches!(value, Yielded::Stepped(_))
}

/// Returns `true` if the value is an asynchronous result.
pub fn is_future<T, E>(value: &Yielded<T, E>) -> bool {
    matches!(value, Yielded::Future(_))
}

/// Returns `true` if the value is admissible as a combinator task: a
/// factory, a started coroutine, or an asynchronous result.
pub fn is_task<T, E>(value: &Yielded<T, E>) -> bool {
    is_factory(value) || is_stepped(value) || is_future(value)
}

/// Returns `true` if every element of the sequence is a task.
///
/// This is all-or-nothing: a single plain value (or nested list) anywhere
/// means the whole sequence is treated as a plain value, not as a parallel
/// batch. The empty sequence qualifies vacuously.
pub fn is_task_batch<T, E>(items: &[Yielded<T, E>]) -> bool {
    items.iter().all(is_task)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coroutine::{Resume, Step, from_fn};
    use crate::task::Yielded;

    type Y = Yielded<i32, String>;

    fn value() -> Y {
        Yielded::Value(7)
    }

    fn stepped() -> Y {
        Yielded::stepped(from_fn(
            |_input: Result<Resume<i32, String>, String>| Ok(Step::Done(0)),
        ))
    }

    fn factory() -> Y {
        Yielded::factory(|| {
            Box::new(from_fn(
                |_input: Result<Resume<i32, String>, String>| Ok(Step::Done(0)),
            ))
        })
    }

    fn future() -> Y {
        Yielded::future(futures::future::ready(Ok(1)))
    }

    #[test]
    fn tags_classify_independently() {
        assert!(is_factory(&factory()));
        assert!(is_stepped(&stepped()));
        assert!(is_future(&future()));
        assert!(!is_task(&value()));
        assert!(!is_task(&Y::List(vec![])));
        assert!(is_task(&factory()) && is_task(&stepped()) && is_task(&future()));
    }

    #[test]
    fn batch_recognition_is_all_or_nothing() {
        assert!(is_task_batch(&[factory(), stepped(), future()]));
        assert!(
            !is_task_batch(&[stepped(), value(), future()]),
            "one plain value must disqualify the whole sequence"
        );
        assert!(
            !is_task_batch(&[future(), Yielded::List(vec![future()])]),
            "a nested list is not itself a task"
        );
    }

    #[test]
    fn empty_sequence_is_a_batch() {
        let empty: Vec<Y> = vec![];
        assert!(is_task_batch(&empty), "empty sequences qualify vacuously");
    }
}
