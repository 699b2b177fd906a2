//! In-memory `PollApi` used by the core tests.

use chrono::{DateTime, Duration, Utc};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vanishvote_client::{ApiError, PollApi};
use vanishvote_models::{
    Comment, CreatePollRequest, Poll, PollOption, ReactionKind, Reactions,
};

pub(crate) fn poll(id: &str, votes: &[u64], expires_at: DateTime<Utc>) -> Poll {
    Poll {
        id: id.to_string(),
        question: "Pizza or Tacos?".to_string(),
        options: votes
            .iter()
            .enumerate()
            .map(|(i, v)| PollOption {
                text: ["Pizza", "Tacos", "Sushi", "Curry"][i % 4].to_string(),
                votes: *v,
            })
            .collect(),
        created_at: Some(expires_at - Duration::hours(24)),
        expires_at,
        hide_results: false,
        is_private: true,
        reactions: Reactions::default(),
        comments: Vec::new(),
    }
}

#[derive(Clone, Default)]
pub(crate) struct FakeApi {
    inner: Arc<FakeInner>,
}

#[derive(Default)]
struct FakeInner {
    poll: Mutex<Option<Poll>>,
    failing: AtomicBool,
    fetches: AtomicUsize,
    calls: AtomicUsize,
    created: Mutex<Vec<CreatePollRequest>>,
}

impl FakeApi {
    pub(crate) fn with_poll(poll: Poll) -> Self {
        let api = Self::default();
        *api.lock_poll() = Some(poll);
        api
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn fetches(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    /// Every call, fetches included.
    pub(crate) fn calls(&self) -> usize {
        self.inner.calls.load(Ordering::SeqCst)
    }

    pub(crate) fn created(&self) -> Vec<CreatePollRequest> {
        match self.inner.created.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn lock_poll(&self) -> std::sync::MutexGuard<'_, Option<Poll>> {
        match self.inner.poll.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn mutate(&self, poll_id: &str, f: impl FnOnce(&mut Poll)) -> Result<Poll, ApiError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Http("connection refused".into()));
        }
        let mut guard = self.lock_poll();
        match guard.as_mut() {
            Some(poll) if poll.id == poll_id => {
                f(poll);
                Ok(poll.clone())
            }
            _ => Err(ApiError::NotFound),
        }
    }
}

impl PollApi for FakeApi {
    async fn create_poll(&self, request: &CreatePollRequest) -> Result<Poll, ApiError> {
        self.inner.calls.fetch_add(1, Ordering::SeqCst);
        if self.inner.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Http("connection refused".into()));
        }
        match self.inner.created.lock() {
            Ok(mut guard) => guard.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        let now = Utc::now();
        let mut created = poll("created", &vec![0; request.options.len()], now + request.expires_in.duration());
        created.question = request.question.clone();
        for (option, text) in created.options.iter_mut().zip(&request.options) {
            option.text = text.clone();
        }
        created.hide_results = request.hide_results;
        created.is_private = request.is_private;
        *self.lock_poll() = Some(created.clone());
        Ok(created)
    }

    async fn get_poll(&self, poll_id: &str) -> Result<Poll, ApiError> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);
        self.mutate(poll_id, |_| {})
    }

    async fn vote(&self, poll_id: &str, option_index: usize) -> Result<Poll, ApiError> {
        self.mutate(poll_id, |poll| {
            if let Some(option) = poll.options.get_mut(option_index) {
                option.votes += 1;
            }
        })
    }

    async fn add_comment(&self, poll_id: &str, text: &str) -> Result<Poll, ApiError> {
        self.mutate(poll_id, |poll| {
            poll.comments.push(Comment {
                text: text.to_string(),
                created_at: Utc::now(),
            })
        })
    }

    async fn add_reaction(&self, poll_id: &str, kind: ReactionKind) -> Result<Poll, ApiError> {
        self.mutate(poll_id, |poll| match kind {
            ReactionKind::Likes => poll.reactions.likes += 1,
            ReactionKind::Trending => poll.reactions.trending += 1,
        })
    }
}
