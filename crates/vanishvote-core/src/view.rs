//! Client-side poll lifecycle: loading → votable → voted / expired.
//!
//! `PollView` is an immutable record. Every change goes through
//! [`PollView::apply`], which consumes the old view and returns the next one.
//! Anything that depends on wall-clock time takes `now` explicitly, so expiry
//! is re-evaluated on every render.

use chrono::{DateTime, Utc};
use std::fmt;
use vanishvote_models::{Poll, Reactions};

use crate::humanize;
use crate::results;

/// User-facing failure messages of the poll view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewError {
    PollUnavailable,
    VoteFailed,
    CommentFailed,
    ReactionFailed,
}

impl ViewError {
    pub fn message(self) -> &'static str {
        match self {
            ViewError::PollUnavailable => "Poll not found or has expired",
            ViewError::VoteFailed => "Failed to submit vote",
            ViewError::CommentFailed => "Failed to add comment",
            ViewError::ReactionFailed => "Failed to add reaction",
        }
    }
}

impl fmt::Display for ViewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewAction {
    Loaded(Poll),
    LoadFailed,
    /// Pick option `index`; ignored unless voting is open at `now`.
    Select { index: usize, now: DateTime<Utc> },
    Voted(Poll),
    VoteFailed,
    DraftChanged(String),
    Commented(Poll),
    CommentFailed,
    Reacted(Poll),
    ReactionFailed,
    Dismiss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Error(ViewError),
    Votable,
    Voted,
    Expired,
}

impl Phase {
    pub fn is_results_only(self) -> bool {
        matches!(self, Phase::Voted | Phase::Expired)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollView {
    poll: Option<Poll>,
    load_error: Option<ViewError>,
    notice: Option<ViewError>,
    selected: Option<usize>,
    has_voted: bool,
    draft: String,
}

impl PollView {
    /// A view that has not loaded yet. `has_voted` comes from the local vote store.
    pub fn new(has_voted: bool) -> Self {
        Self {
            has_voted,
            ..Self::default()
        }
    }

    pub fn poll(&self) -> Option<&Poll> {
        self.poll.as_ref()
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn has_voted(&self) -> bool {
        self.has_voted
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn notice(&self) -> Option<ViewError> {
        self.notice
    }

    pub fn phase(&self, now: DateTime<Utc>) -> Phase {
        if let Some(err) = self.load_error {
            return Phase::Error(err);
        }
        match &self.poll {
            None => Phase::Loading,
            Some(poll) if poll.is_expired_at(now) => Phase::Expired,
            Some(_) if self.has_voted => Phase::Voted,
            Some(_) => Phase::Votable,
        }
    }

    pub fn can_vote(&self, now: DateTime<Utc>) -> bool {
        self.phase(now) == Phase::Votable
    }

    /// Results are visible unless the creator hid them and this client can still vote.
    pub fn show_results(&self, now: DateTime<Utc>) -> bool {
        match &self.poll {
            Some(poll) => !poll.hide_results || self.has_voted || poll.is_expired_at(now),
            None => false,
        }
    }

    pub fn apply(self, action: ViewAction) -> Self {
        match action {
            ViewAction::Loaded(poll) => {
                let selected = self.selected.filter(|i| *i < poll.options.len());
                Self {
                    poll: Some(poll),
                    load_error: None,
                    selected,
                    ..self
                }
            }
            ViewAction::LoadFailed => Self {
                load_error: Some(ViewError::PollUnavailable),
                ..self
            },
            ViewAction::Select { index, now } => {
                let in_range = self
                    .poll
                    .as_ref()
                    .is_some_and(|p| index < p.options.len());
                if !in_range || !self.can_vote(now) {
                    return self;
                }
                Self {
                    selected: Some(index),
                    ..self
                }
            }
            ViewAction::Voted(poll) => Self {
                poll: Some(poll),
                has_voted: true,
                notice: None,
                ..self
            },
            ViewAction::VoteFailed => Self {
                notice: Some(ViewError::VoteFailed),
                ..self
            },
            ViewAction::DraftChanged(draft) => Self { draft, ..self },
            ViewAction::Commented(poll) => Self {
                poll: Some(poll),
                draft: String::new(),
                notice: None,
                ..self
            },
            ViewAction::CommentFailed => Self {
                notice: Some(ViewError::CommentFailed),
                ..self
            },
            ViewAction::Reacted(poll) => Self {
                poll: Some(poll),
                notice: None,
                ..self
            },
            ViewAction::ReactionFailed => Self {
                notice: Some(ViewError::ReactionFailed),
                ..self
            },
            ViewAction::Dismiss => Self {
                notice: None,
                ..self
            },
        }
    }

    /// Render-ready projection of the view at `now`.
    /// `None` until a poll has loaded, and while the last load failed.
    pub fn snapshot(&self, now: DateTime<Utc>) -> Option<PollSnapshot> {
        if self.load_error.is_some() {
            return None;
        }
        let poll = self.poll.as_ref()?;
        let phase = self.phase(now);
        let show_results = self.show_results(now);
        let voting_open = phase == Phase::Votable;
        let shares = results::shares(&poll.options);

        let options = poll
            .options
            .iter()
            .zip(shares)
            .enumerate()
            .map(|(index, (option, share))| OptionRow {
                text: option.text.clone(),
                percentage: show_results.then_some(share),
                selected: self.selected == Some(index),
            })
            .collect();

        let comments = poll
            .comments
            .iter()
            .map(|c| CommentRow {
                text: c.text.clone(),
                age: humanize::relative(c.created_at, now),
            })
            .collect();

        Some(PollSnapshot {
            id: poll.id.clone(),
            question: poll.question.clone(),
            phase,
            expiry: humanize::expiry_label(poll.expires_at, now),
            options,
            total_votes: show_results.then(|| poll.total_votes()),
            voting_open,
            can_submit_vote: voting_open && self.selected.is_some(),
            reactions: poll.reactions,
            comments,
            notice: self.notice.map(|n| n.message().to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionRow {
    pub text: String,
    /// Present only when results are visible.
    pub percentage: Option<u8>,
    pub selected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRow {
    pub text: String,
    pub age: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSnapshot {
    pub id: String,
    pub question: String,
    pub phase: Phase,
    pub expiry: String,
    pub options: Vec<OptionRow>,
    pub total_votes: Option<u64>,
    pub voting_open: bool,
    pub can_submit_vote: bool,
    pub reactions: Reactions,
    pub comments: Vec<CommentRow>,
    pub notice: Option<String>,
}
