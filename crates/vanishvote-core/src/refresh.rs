use crate::view::ViewAction;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use vanishvote_client::PollApi;

/// Background re-fetch of one poll on a fixed period.
///
/// Each fetch result is sent as a [`ViewAction`] (`Loaded` or `LoadFailed`).
/// The loop stops when the task is cancelled or dropped, or when the
/// receiving side of `events` goes away.
#[derive(Debug)]
pub struct RefreshTask {
    handle: JoinHandle<()>,
}

impl RefreshTask {
    /// Start refreshing. The first fetch happens one `period` from now.
    pub fn spawn<A>(
        api: A,
        poll_id: impl Into<String>,
        period: Duration,
        events: UnboundedSender<ViewAction>,
    ) -> Self
    where
        A: PollApi + 'static,
    {
        let poll_id = poll_id.into();
        let period = period.max(Duration::from_millis(1));
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let action = match api.get_poll(&poll_id).await {
                    Ok(poll) => ViewAction::Loaded(poll),
                    Err(e) => {
                        tracing::warn!(poll_id = %poll_id, "refresh failed: {e}");
                        ViewAction::LoadFailed
                    }
                };
                if events.send(action).is_err() {
                    tracing::debug!(poll_id = %poll_id, "refresh receiver closed");
                    break;
                }
            }
        });
        Self { handle }
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    pub fn cancel(self) {
        self.handle.abort();
    }
}

impl Drop for RefreshTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{poll, FakeApi};
    use chrono::{Duration as ChronoDuration, Utc};
    use tokio::sync::mpsc;

    const PERIOD: Duration = Duration::from_millis(20);

    #[tokio::test]
    async fn sends_a_load_each_period() {
        let api = FakeApi::with_poll(poll("p1", &[1, 2], Utc::now() + ChronoDuration::hours(1)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let _task = RefreshTask::spawn(api.clone(), "p1", PERIOD, tx);

        for _ in 0..2 {
            match rx.recv().await {
                Some(ViewAction::Loaded(p)) => assert_eq!(p.id, "p1"),
                other => panic!("unexpected {other:?}"),
            }
        }
        assert!(api.fetches() >= 2);
    }

    #[tokio::test]
    async fn failures_are_reported_without_stopping() {
        let api = FakeApi::with_poll(poll("p1", &[1, 2], Utc::now() + ChronoDuration::hours(1)));
        api.set_failing(true);
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = RefreshTask::spawn(api.clone(), "p1", PERIOD, tx);

        assert_eq!(rx.recv().await, Some(ViewAction::LoadFailed));
        api.set_failing(false);
        loop {
            if let Some(ViewAction::Loaded(_)) = rx.recv().await {
                break;
            }
        }
        assert!(!task.is_finished());
    }

    #[tokio::test]
    async fn dropping_the_task_stops_fetching() {
        let api = FakeApi::with_poll(poll("p1", &[0, 0], Utc::now() + ChronoDuration::hours(1)));
        let (tx, mut rx) = mpsc::unbounded_channel();
        let task = RefreshTask::spawn(api.clone(), "p1", PERIOD, tx);
        rx.recv().await.expect("first refresh");

        drop(task);
        tokio::time::sleep(PERIOD).await;
        let after_drop = api.fetches();
        tokio::time::sleep(PERIOD * 5).await;
        assert_eq!(api.fetches(), after_drop);
    }

    #[tokio::test]
    async fn ends_when_receiver_is_gone() {
        let api = FakeApi::with_poll(poll("p1", &[0, 0], Utc::now() + ChronoDuration::hours(1)));
        let (tx, rx) = mpsc::unbounded_channel();
        let task = RefreshTask::spawn(api, "p1", PERIOD, tx);
        drop(rx);

        for _ in 0..50 {
            if task.is_finished() {
                return;
            }
            tokio::time::sleep(PERIOD).await;
        }
        panic!("refresh task still running");
    }
}
