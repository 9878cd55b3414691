//! First-of-N task observation with a completion gate
//!
//! Runs a designated observer task alongside zero or more companion tasks
//! and returns as soon as the observer finishes, surfacing the companions
//! still in flight. Companion completions never release the gate on their
//! own; the wait re-enters on the remaining budget until the observer
//! resolves or the budget is exhausted.
//!
//! This is a standalone primitive with no fixture-specific logic; the
//! [`FixtureCore`](crate::fixture::FixtureCore) helpers are thin wrappers
//! over it.

use std::future::Future;
use std::pin::Pin;
use std::task::Poll;
use std::time::Duration;
use tokio::task::{JoinError, JoinHandle};
use tokio::time::Instant;

/// Boxed task future, for mixing differently-shaped futures in one set
pub type TaskFuture<T> = futures::future::BoxFuture<'static, T>;

/// Index of the observer within the wait set
const OBSERVER: usize = 0;

/// Outcome of one observed task that ran to completion
///
/// A task that panicked is still "done" for set-membership purposes; its
/// [`JoinError`] is carried here for the caller to inspect.
#[derive(Debug)]
pub struct Completed<T> {
    outcome: Result<T, JoinError>,
    observer: bool,
}

impl<T> Completed<T> {
    /// Whether this entry is the observer task
    #[inline]
    #[must_use]
    pub fn is_observer(&self) -> bool {
        self.observer
    }

    /// Borrow the task outcome
    #[inline]
    #[must_use]
    pub fn outcome(&self) -> &Result<T, JoinError> {
        &self.outcome
    }

    /// Consume the entry, yielding the task outcome
    #[inline]
    #[must_use]
    pub fn into_outcome(self) -> Result<T, JoinError> {
        self.outcome
    }
}

/// Report produced once the observer completes
///
/// Pending handles are returned live: nothing is cancelled on the caller's
/// behalf. Inspecting done outcomes and aborting stragglers are explicit
/// caller decisions.
#[derive(Debug)]
pub struct Observation<T> {
    /// Tasks that completed by the time the observer did (observer included)
    pub done: Vec<Completed<T>>,
    /// Tasks still running when the gate released
    pub pending: Vec<JoinHandle<T>>,
}

impl<T> Observation<T> {
    /// The observer's own completion entry
    #[must_use]
    pub fn observer(&self) -> Option<&Completed<T>> {
        self.done.iter().find(|task| task.is_observer())
    }

    /// Number of companions that completed alongside the observer
    #[must_use]
    pub fn companions_done(&self) -> usize {
        self.done.iter().filter(|task| !task.is_observer()).count()
    }
}

/// Translate a seconds-based timeout into a wait budget
///
/// A non-positive value means "no timeout": the wait is bounded only by the
/// observer's own completion.
#[must_use]
pub fn timeout_from_secs(timeout_seconds: f64) -> Option<Duration> {
    (timeout_seconds > 0.0).then(|| Duration::from_secs_f64(timeout_seconds))
}

/// Run an observer and companions concurrently, returning when the observer
/// completes
///
/// Every input future is spawned onto the ambient runtime before joining the
/// wait set. The wait loop takes the earliest completion among the running
/// tasks, bounded by the remaining budget; a companion completion re-enters
/// the wait rather than returning. Elapsed time is measured against the
/// runtime clock ([`tokio::time::Instant`]), which stays correct across
/// suspensions.
///
/// # Errors
/// Returns [`ObserveError::Timeout`] when the budget is exhausted before the
/// observer completes, even if companions completed first. Tasks still
/// running at that point are left running.
pub async fn observe<T, O, C>(
    observer: O,
    timeout: Option<Duration>,
    companions: C,
) -> Result<Observation<T>, ObserveError>
where
    T: Send + 'static,
    O: Future<Output = T> + Send + 'static,
    C: IntoIterator,
    C::Item: Future<Output = T> + Send + 'static,
{
    let mut slots = vec![Slot::spawn(observer)];
    slots.extend(companions.into_iter().map(Slot::spawn));

    let deadline = timeout.map(|budget| (budget, Instant::now() + budget));

    loop {
        let (index, outcome) = if let Some((budget, deadline)) = deadline {
            match tokio::time::timeout_at(deadline, first_completion(&mut slots)).await {
                Ok(woke) => woke,
                Err(_) => return Err(ObserveError::Timeout { timeout: budget }),
            }
        } else {
            first_completion(&mut slots).await
        };
        slots[index].outcome = Some(outcome);

        // Only the observer releases the gate.
        if slots[OBSERVER].outcome.is_some() {
            return Ok(partition(slots));
        }
    }
}

/// One scheduled task plus its recorded outcome, if any
#[derive(Debug)]
struct Slot<T> {
    handle: JoinHandle<T>,
    outcome: Option<Result<T, JoinError>>,
}

impl<T> Slot<T>
where
    T: Send + 'static,
{
    fn spawn<F>(future: F) -> Self
    where
        F: Future<Output = T> + Send + 'static,
    {
        Self {
            handle: tokio::spawn(future),
            outcome: None,
        }
    }
}

/// Wait for the earliest completion among the tasks still running
///
/// Slots with a recorded outcome are skipped so a finished task is never
/// polled again.
async fn first_completion<T>(slots: &mut [Slot<T>]) -> (usize, Result<T, JoinError>) {
    futures::future::poll_fn(|cx| {
        for (index, slot) in slots.iter_mut().enumerate() {
            if slot.outcome.is_some() {
                continue;
            }
            if let Poll::Ready(outcome) = Pin::new(&mut slot.handle).poll(cx) {
                return Poll::Ready((index, outcome));
            }
        }
        Poll::Pending
    })
    .await
}

fn partition<T>(slots: Vec<Slot<T>>) -> Observation<T> {
    let mut done = Vec::new();
    let mut pending = Vec::new();
    for (index, slot) in slots.into_iter().enumerate() {
        match slot.outcome {
            Some(outcome) => done.push(Completed {
                outcome,
                observer: index == OBSERVER,
            }),
            None => pending.push(slot.handle),
        }
    }
    Observation { done, pending }
}

/// Errors related to task observation
#[derive(Debug, thiserror::Error)]
pub enum ObserveError {
    /// Budget exhausted before the observer completed
    #[error("observer did not complete within {timeout:?}")]
    Timeout {
        /// The wait budget that was exhausted
        timeout: Duration,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;

    async fn ticks(n: u64) -> u64 {
        tokio::time::sleep(Duration::from_secs(n)).await;
        n
    }

    fn none() -> Vec<TaskFuture<u64>> {
        Vec::new()
    }

    #[tokio::test(start_paused = true)]
    async fn observer_alone_completes_in_time() {
        let observation = observe(ticks(2), timeout_from_secs(5.0), none())
            .await
            .unwrap();

        assert_eq!(observation.done.len(), 1);
        assert!(observation.pending.is_empty());
        assert_eq!(
            *observation.observer().unwrap().outcome().as_ref().unwrap(),
            2
        );
    }

    #[tokio::test(start_paused = true)]
    async fn observer_misses_deadline() {
        let result = observe(ticks(5), timeout_from_secs(2.0), none()).await;
        assert!(matches!(result, Err(ObserveError::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn companion_completion_does_not_release_gate() {
        // The companion finishes at 1s; the wait must re-enter until the
        // observer finishes at 3s.
        let observation = observe(ticks(3), timeout_from_secs(10.0), vec![ticks(1).boxed()])
            .await
            .unwrap();

        assert_eq!(observation.done.len(), 2);
        assert_eq!(observation.companions_done(), 1);
        assert!(observation.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_companion_left_pending() {
        let observation = observe(ticks(1), timeout_from_secs(5.0), vec![ticks(10).boxed()])
            .await
            .unwrap();

        assert_eq!(observation.done.len(), 1);
        assert_eq!(observation.pending.len(), 1);

        for handle in observation.pending {
            handle.abort();
        }
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_fires_even_when_companions_finished_first() {
        let result = observe(
            ticks(30),
            timeout_from_secs(4.0),
            vec![ticks(1).boxed(), ticks(2).boxed()],
        )
        .await;

        assert!(matches!(result, Err(ObserveError::Timeout { .. })));
    }

    #[tokio::test(start_paused = true)]
    async fn non_positive_timeout_waits_indefinitely() {
        let observation = observe(ticks(2), timeout_from_secs(0.0), none())
            .await
            .unwrap();
        assert!(observation.pending.is_empty());

        let observation = observe(ticks(2), timeout_from_secs(-1.0), none())
            .await
            .unwrap();
        assert!(observation.pending.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn panicking_companion_counts_as_done() {
        let boom: TaskFuture<u64> = async { panic!("companion blew up") }.boxed();

        let observation = observe(ticks(1), timeout_from_secs(5.0), vec![boom])
            .await
            .unwrap();

        assert_eq!(observation.done.len(), 2);
        assert!(observation.pending.is_empty());

        let panicked = observation
            .done
            .iter()
            .find(|task| !task.is_observer())
            .unwrap();
        assert!(panicked.outcome().is_err());
    }

    #[test]
    fn timeout_from_secs_mapping() {
        assert_eq!(timeout_from_secs(1.5), Some(Duration::from_millis(1500)));
        assert_eq!(timeout_from_secs(0.0), None);
        assert_eq!(timeout_from_secs(-3.0), None);
    }
}
