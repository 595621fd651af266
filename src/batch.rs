//! Ordered composition of task sequences.
//!
//! Both combinators fold completion over the tasks strictly in their original
//! order; they differ only in when a task is started. [`parallel`] puts every
//! task in flight before any waiting begins, [`series`] starts each task only
//! when the one before it has settled.

use std::mem;
use std::pin::Pin;

use futures::FutureExt;

use crate::task::{CoFuture, Task};

// A task's place in the ordered fold.
enum Slot<T, E> {
    // Not started yet (series only).
    Idle(Task<T, E>),
    // In flight.
    Running(CoFuture<T, E>),
    // Settled, waiting for its turn in the order walk.
    Settled(Result<T, E>),
    // Consumed by the order walk.
    Claimed,
}

enum Mode {
    Parallel,
    Series,
}

/// Runs every task concurrently, completing once all of them have settled.
///
/// Each task is converted to its in-flight result immediately (futures are
/// used as-is, computations are started through the driver), so every task
/// makes progress from the first poll, before any completion is awaited.
///
/// Two deliberate quirks of the completion contract: the fulfilled value
/// carries no per-task results (callers needing them must capture them
/// externally), and rejection surfaces in task order, not failure order. A
/// later task's early failure is only observed once every task before it
/// has fulfilled.
///
/// # Example
/// ```
/// use corodrive::{Task, parallel};
///
/// let batch = parallel(vec![
///     Task::future(async { Ok::<_, String>(1) }),
///     Task::future(async { Ok(2) }),
/// ]);
///
/// assert_eq!(futures::executor::block_on(batch), Ok(()));
/// ```
pub fn parallel<T, E>(tasks: Vec<Task<T, E>>) -> Batch<T, E>
where
    T: 'static,
    E: 'static,
{
    Batch {
        mode: Mode::Parallel,
        slots: tasks
            .into_iter()
            .map(|task| Slot::Running(task.into_future()))
            .collect(),
        cursor: 0,
    }
}

/// Runs the tasks strictly one at a time, in order.
///
/// A task is only started when the one before it has settled; rejection
/// stops the walk and later tasks never run. Like [`parallel`], the
/// fulfilled value carries no per-task results.
pub fn series<T, E>(tasks: Vec<Task<T, E>>) -> Batch<T, E> {
    Batch {
        mode: Mode::Series,
        slots: tasks.into_iter().map(Slot::Idle).collect(),
        cursor: 0,
    }
}

/// A future folding the completion of a task sequence. Created by
/// [`parallel`] or [`series`].
#[must_use = "futures do nothing unless polled or .awaited"]
pub struct Batch<T, E> {
    mode: Mode,
    slots: Vec<Slot<T, E>>,
    cursor: usize,
}

// Slots hold boxed futures and plain values; nothing relies on a stable
// address, so the batch stays freely movable whatever `T` and `E` are.
impl<T, E> Unpin for Batch<T, E> {}

impl<T, E> Future for Batch<T, E>
where
    T: 'static,
    E: 'static,
{
    type Output = Result<(), E>;

    fn poll(
        self: Pin<&mut Self>,
        cx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Self::Output> {
        let this = self.get_mut();

        if let Mode::Parallel = this.mode {
            // Every in-flight member gets a poll, so all of them progress
            // regardless of whose turn the order walk is waiting on.
            for slot in &mut this.slots {
                if let Slot::Running(task) = slot {
                    if let std::task::Poll::Ready(result) = task.poll_unpin(cx) {
                        *slot = Slot::Settled(result);
                    }
                }
            }
        }

        loop {
            if this.cursor == this.slots.len() {
                // Completion only; per-task values are not aggregated.
                return std::task::Poll::Ready(Ok(()));
            }
            let slot = &mut this.slots[this.cursor];
            match slot {
                Slot::Idle(_) => {
                    let Slot::Idle(task) = mem::replace(slot, Slot::Claimed) else {
                        unreachable!()
                    };
                    *slot = Slot::Running(task.into_future());
                }
                Slot::Running(task) => match this.mode {
                    // Already polled above; its turn just has not settled.
                    Mode::Parallel => return std::task::Poll::Pending,
                    Mode::Series => match task.poll_unpin(cx) {
                        std::task::Poll::Ready(result) => *slot = Slot::Settled(result),
                        std::task::Poll::Pending => return std::task::Poll::Pending,
                    },
                },
                Slot::Settled(_) => {
                    let Slot::Settled(result) = mem::replace(slot, Slot::Claimed) else {
                        unreachable!()
                    };
                    this.cursor += 1;
                    if let Err(error) = result {
                        return std::task::Poll::Ready(Err(error));
                    }
                }
                // The walk never revisits a claimed slot.
                Slot::Claimed => unreachable!(),
            }
        }
    }
}
