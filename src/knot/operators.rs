//! Stream operators for writing epics.
//!
//! Both effect operators run every unit of work on its own task, so a slow
//! request never blocks the bus or other triggers, and a panicking request
//! only loses its own result.

use std::future::Future;

use futures::stream::{self, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use super::epic::EventStream;

const OPERATOR_BUFFER: usize = 64;

/// Adapt an mpsc receiver into an [`EventStream`]. Ends when every sender is
/// dropped.
pub fn receiver_stream<T: Send + 'static>(receiver: mpsc::Receiver<T>) -> EventStream<T> {
    stream::unfold(receiver, |mut receiver| async move {
        receiver.recv().await.map(|value| (value, receiver))
    })
    .boxed()
}

/// Run `work` for each trigger; a newer trigger aborts the one in flight.
///
/// A result that completed before the abort landed is still delivered, so
/// reducers must reject results that no longer match what they wait for.
pub fn latest_wins<T, E, F, Fut>(triggers: EventStream<T>, work: F) -> EventStream<E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = E> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(OPERATOR_BUFFER);
    tokio::spawn(async move {
        let mut triggers = triggers;
        let mut in_flight: Option<JoinHandle<()>> = None;
        while let Some(trigger) = triggers.next().await {
            if let Some(previous) = in_flight.take() {
                if !previous.is_finished() {
                    tracing::debug!("superseding in-flight effect");
                }
                previous.abort();
            }
            in_flight = Some(tokio::spawn(deliver(work(trigger), sender.clone())));
        }
    });
    receiver_stream(receiver)
}

/// Run `work` for each trigger; all runs complete and race.
pub fn concurrent<T, E, F, Fut>(triggers: EventStream<T>, work: F) -> EventStream<E>
where
    T: Send + 'static,
    E: Send + 'static,
    F: Fn(T) -> Fut + Send + 'static,
    Fut: Future<Output = E> + Send + 'static,
{
    let (sender, receiver) = mpsc::channel(OPERATOR_BUFFER);
    tokio::spawn(async move {
        let mut triggers = triggers;
        while let Some(trigger) = triggers.next().await {
            tokio::spawn(deliver(work(trigger), sender.clone()));
        }
    });
    receiver_stream(receiver)
}

async fn deliver<E, Fut>(work: Fut, sender: mpsc::Sender<E>)
where
    Fut: Future<Output = E>,
{
    let event = work.await;
    // Receiver gone means the epic was torn down.
    let _ = sender.send(event).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn triggers(values: Vec<u64>) -> EventStream<u64> {
        stream::iter(values).boxed()
    }

    #[tokio::test]
    async fn latest_wins_drops_superseded_work() {
        let output = latest_wins(triggers(vec![200, 0]), |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay
        });
        let results: Vec<u64> = output.collect().await;
        assert_eq!(results, vec![0]);
    }

    #[tokio::test]
    async fn concurrent_delivers_every_result_by_completion() {
        let output = concurrent(triggers(vec![100, 0]), |delay| async move {
            tokio::time::sleep(Duration::from_millis(delay)).await;
            delay
        });
        let results: Vec<u64> = output.collect().await;
        assert_eq!(results, vec![0, 100]);
    }

    #[tokio::test]
    async fn panicking_work_only_loses_its_own_result() {
        let output = concurrent(triggers(vec![1, 2, 3]), |value| async move {
            if value == 2 {
                panic!("boom");
            }
            value
        });
        let mut results: Vec<u64> = output.collect().await;
        results.sort();
        assert_eq!(results, vec![1, 3]);
    }
}
