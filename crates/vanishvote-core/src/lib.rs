pub mod error;
pub mod form;
pub mod humanize;
pub mod refresh;
pub mod results;
pub mod session;
pub mod theme;
pub mod view;
pub mod vote_store;

#[cfg(test)]
pub(crate) mod testing;

use std::time::Duration;

pub use error::{FormError, StoreError};
pub use form::PollForm;
pub use refresh::RefreshTask;
pub use session::PollSession;
pub use theme::Theme;
pub use view::{Phase, PollSnapshot, PollView, ViewAction, ViewError};
pub use vote_store::{FileVoteStore, MemoryVoteStore, VoteFlags, VoteStore};

/// How often an open poll view re-fetches the poll.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Link that opens poll `poll_id` in the web front-end hosted at `base`.
pub fn share_url(base: &str, poll_id: &str) -> String {
    format!("{}/poll/{}", base.trim().trim_end_matches('/'), poll_id)
}
