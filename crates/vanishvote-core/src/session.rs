use chrono::{DateTime, Utc};
use vanishvote_client::PollApi;
use vanishvote_models::ReactionKind;

use crate::view::{PollView, ViewAction};
use crate::vote_store::VoteStore;

/// Drives a [`PollView`] for one poll against the API and the local vote store.
pub struct PollSession<A, S> {
    api: A,
    store: S,
    poll_id: String,
    view: PollView,
}

impl<A: PollApi, S: VoteStore> PollSession<A, S> {
    /// Read the local vote flag, then load the poll.
    pub async fn open(api: A, store: S, poll_id: impl Into<String>) -> Self {
        let poll_id = poll_id.into();
        let has_voted = match store.has_voted(&poll_id).await {
            Ok(flag) => flag,
            Err(e) => {
                tracing::warn!(poll_id = %poll_id, "could not read vote flag: {e}");
                false
            }
        };
        let mut session = Self {
            api,
            store,
            poll_id,
            view: PollView::new(has_voted),
        };
        session.reload().await;
        session
    }

    pub fn poll_id(&self) -> &str {
        &self.poll_id
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn view(&self) -> &PollView {
        &self.view
    }

    /// Feed an externally produced action (e.g. from a [`crate::RefreshTask`]) into the view.
    pub fn apply(&mut self, action: ViewAction) {
        self.view = std::mem::take(&mut self.view).apply(action);
    }

    pub async fn reload(&mut self) {
        let action = match self.api.get_poll(&self.poll_id).await {
            Ok(poll) => ViewAction::Loaded(poll),
            Err(e) => {
                tracing::warn!(poll_id = %self.poll_id, "failed to load poll: {e}");
                ViewAction::LoadFailed
            }
        };
        self.apply(action);
    }

    /// Select an option for voting. Returns false when voting is closed or the index is invalid.
    pub fn select(&mut self, index: usize, now: DateTime<Utc>) -> bool {
        if !self.view.can_vote(now) {
            return false;
        }
        self.apply(ViewAction::Select { index, now });
        self.view.selected() == Some(index)
    }

    /// Submit the selected option. Does nothing without a selection or once voting has closed.
    pub async fn vote(&mut self, now: DateTime<Utc>) {
        let Some(option_index) = self.view.selected() else {
            return;
        };
        if !self.view.can_vote(now) {
            return;
        }

        match self.api.vote(&self.poll_id, option_index).await {
            Ok(poll) => {
                self.apply(ViewAction::Voted(poll));
                if let Err(e) = self.store.mark_voted(&self.poll_id).await {
                    tracing::warn!(poll_id = %self.poll_id, "vote counted but flag not stored: {e}");
                }
            }
            Err(e) => {
                tracing::warn!(poll_id = %self.poll_id, "vote failed: {e}");
                self.apply(ViewAction::VoteFailed);
            }
        }
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.apply(ViewAction::DraftChanged(text.into()));
    }

    /// Post the current draft as a comment. Blank drafts are not sent.
    pub async fn submit_comment(&mut self) {
        if self.view.draft().trim().is_empty() {
            return;
        }
        let text = self.view.draft().to_string();
        match self.api.add_comment(&self.poll_id, &text).await {
            Ok(poll) => self.apply(ViewAction::Commented(poll)),
            Err(e) => {
                tracing::warn!(poll_id = %self.poll_id, "comment failed: {e}");
                self.apply(ViewAction::CommentFailed);
            }
        }
    }

    pub async fn comment(&mut self, text: impl Into<String>) {
        self.set_draft(text);
        self.submit_comment().await;
    }

    pub async fn react(&mut self, kind: ReactionKind) {
        match self.api.add_reaction(&self.poll_id, kind).await {
            Ok(poll) => self.apply(ViewAction::Reacted(poll)),
            Err(e) => {
                tracing::warn!(poll_id = %self.poll_id, %kind, "reaction failed: {e}");
                self.apply(ViewAction::ReactionFailed);
            }
        }
    }
}
