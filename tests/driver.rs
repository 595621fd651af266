use std::cell::Cell;
use std::rc::Rc;

use corodrive::{CoExt, Resume, Step, Yielded, co, drive, from_fn, report};
use futures::FutureExt;
use futures::channel::oneshot;

#[test]
fn plain_values_resume_without_suspension() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::Value(10))),
            (2, Ok(Resume::Value(v))) => {
                assert_eq!(v, 10, "the yielded value comes straight back");
                Ok(Step::Yield(Yielded::Value(v + 1)))
            }
            (3, Ok(Resume::Value(v))) => Ok(Step::Done(v + 1)),
            _ => Err("unexpected resume".to_string()),
        }
    });

    assert_eq!(
        drive(machine).now_or_never(),
        Some(Ok(12)),
        "plain yields must settle within a single poll"
    );
}

#[test]
fn nothing_steps_before_first_poll() {
    let touched = Rc::new(Cell::new(false));
    let probe = Rc::clone(&touched);

    let machine = from_fn(move |_: Result<Resume<i32, String>, String>| {
        probe.set(true);
        Ok(Step::Done(0))
    });

    let pending = drive(machine);
    assert!(!touched.get(), "no user code may run on the caller's stack");
    assert_eq!(pending.now_or_never(), Some(Ok(0)));
    assert!(touched.get(), "the first poll steps the computation");
}

#[tokio::test]
async fn suspends_until_an_asynchronous_result_settles() {
    let (sender, receiver) = oneshot::channel::<i32>();

    let mut receiver = Some(receiver);
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => {
                let receiver = receiver.take().expect("first step runs once");
                Ok(Step::Yield(Yielded::future(async move {
                    receiver.await.map_err(|e| e.to_string())
                })))
            }
            (2, Ok(Resume::Value(v))) => Ok(Step::Done(v + 1)),
            _ => Err("unexpected resume".to_string()),
        }
    });

    let mut pending = drive(machine);
    assert!(
        futures::poll!(&mut pending).is_pending(),
        "the drive must suspend on an unsettled result"
    );
    sender.send(41).expect("receiver alive");
    assert_eq!(pending.await, Ok(42));
}

#[tokio::test]
async fn nested_computation_is_driven_recursively() {
    let inner = || -> corodrive::BoxCoroutine<i32, String> {
        Box::new(from_fn(
            |_: Result<Resume<i32, String>, String>| Ok(Step::Done(5)),
        ))
    };

    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::factory(inner))),
            (2, Ok(Resume::Value(v))) => Ok(Step::Done(v * 2)),
            _ => Err("inner result expected".to_string()),
        }
    });

    assert_eq!(drive(machine).await, Ok(10));
}

#[tokio::test]
async fn already_started_computation_is_driven_recursively() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::stepped(from_fn(
                |_: Result<Resume<i32, String>, String>| Ok(Step::Done(4)),
            )))),
            (2, Ok(Resume::Value(v))) => Ok(Step::Done(v + 1)),
            _ => Err("inner result expected".to_string()),
        }
    });

    assert_eq!(drive(machine).await, Ok(5));
}

#[test]
fn mixed_list_comes_back_as_plain_value() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::List(vec![
                Yielded::future(async { Ok(1) }),
                Yielded::Value(2),
            ]))),
            (2, Ok(Resume::Mixed(items))) => {
                assert_eq!(items.len(), 2, "the list must come back whole");
                assert!(
                    matches!(items[1], Yielded::Value(2)),
                    "elements are untouched"
                );
                Ok(Step::Done(0))
            }
            _ => Err("a mixed list must not run as a batch".to_string()),
        }
    });

    assert_eq!(drive(machine).now_or_never(), Some(Ok(0)));
}

#[test]
fn task_list_runs_as_parallel_batch() {
    let ran = Rc::new(Cell::new(0));
    let first = Rc::clone(&ran);
    let second = Rc::clone(&ran);

    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => {
                let first = Rc::clone(&first);
                let second = Rc::clone(&second);
                Ok(Step::Yield(Yielded::List(vec![
                    Yielded::future(async move {
                        first.set(first.get() + 1);
                        Ok(1)
                    }),
                    Yielded::future(async move {
                        second.set(second.get() + 1);
                        Ok(2)
                    }),
                ])))
            }
            (2, Ok(Resume::Empty)) => Ok(Step::Done(7)),
            _ => Err("batch completion must resume with no value".to_string()),
        }
    });

    assert_eq!(
        drive(machine).now_or_never(),
        Some(Ok(7)),
        "an all-task list is a parallel batch"
    );
    assert_eq!(ran.get(), 2, "both batch members should have run");
}

#[test]
fn empty_list_is_a_vacuous_batch() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::List(vec![]))),
            (2, Ok(Resume::Empty)) => Ok(Step::Done(1)),
            _ => Err("an empty list should classify as a batch".to_string()),
        }
    });

    assert_eq!(drive(machine).now_or_never(), Some(Ok(1)));
}

#[tokio::test]
async fn recovered_failure_fulfills() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::future(async {
                Err("boom".to_string())
            }))),
            (2, Err(error)) => {
                // Recover locally and keep going.
                assert_eq!(error, "boom", "the rejection re-enters through raise");
                Ok(Step::Yield(Yielded::Value(3)))
            }
            (3, Ok(Resume::Value(v))) => Ok(Step::Done(v)),
            _ => Err("unexpected resume".to_string()),
        }
    });

    assert_eq!(
        drive(machine).await,
        Ok(3),
        "a locally recovered failure must not reject the drive"
    );
}

#[tokio::test]
async fn swallowed_failure_completes_with_a_value() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::future(async {
                Err("boom".to_string())
            }))),
            (2, Err(_)) => Ok(Step::Done(99)),
            _ => Err("unexpected resume".to_string()),
        }
    });

    assert_eq!(drive(machine).await, Ok(99));
}

#[tokio::test]
async fn unrecovered_failure_rejects() {
    let mut state = 0;
    let machine = from_fn(move |input: Result<Resume<i32, String>, String>| {
        state += 1;
        match (state, input) {
            (1, _) => Ok(Step::Yield(Yielded::future(async {
                Err("boom".to_string())
            }))),
            (2, Err(error)) => Err(format!("fatal: {error}")),
            _ => Err("unexpected resume".to_string()),
        }
    });

    assert_eq!(drive(machine).await, Err("fatal: boom".to_string()));
}

#[test]
fn step_failure_rejects_immediately() {
    let machine = from_fn(|_: Result<Resume<i32, String>, String>| Err("immediate".to_string()));

    assert_eq!(
        drive(machine).now_or_never(),
        Some(Err("immediate".to_string()))
    );
}

#[test]
fn co_lifts_a_factory_into_a_driving_function() {
    let double = co(|n: i32| -> corodrive::BoxCoroutine<i32, String> {
        Box::new(from_fn(
            move |_: Result<Resume<i32, String>, String>| Ok(Step::Done(n * 2)),
        ))
    });

    assert_eq!(futures::executor::block_on(double(4)), Ok(8));
    assert_eq!(futures::executor::block_on(double(5)), Ok(10));
}

#[test]
fn report_swallows_rejections() {
    let failing = from_fn(|_: Result<Resume<i32, String>, String>| Err("unhandled".to_string()));
    assert_eq!(
        futures::executor::block_on(report(failing)),
        None,
        "the entry wrapper always fulfills"
    );

    let succeeding = from_fn(|_: Result<Resume<i32, String>, String>| Ok(Step::Done(5)));
    assert_eq!(futures::executor::block_on(report(succeeding)), Some(5));
}

#[test]
fn any_fallible_future_can_be_reported() {
    let wrapped = async { Err::<i32, String>("oops".to_string()) }.reported();
    assert_eq!(futures::executor::block_on(wrapped), None);
}

#[test]
fn drives_under_any_single_threaded_executor() {
    let machine = from_fn(|_: Result<Resume<i32, String>, String>| Ok(Step::Done(11)));
    assert_eq!(
        smol::block_on(drive(machine)),
        Ok(11),
        "the drive is a plain future, any executor can run it"
    );

    let machine = from_fn(|_: Result<Resume<i32, String>, String>| Ok(Step::Done(12)));
    assert_eq!(futures_lite::future::block_on(drive(machine)), Ok(12));
}
