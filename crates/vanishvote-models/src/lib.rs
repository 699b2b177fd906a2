pub mod poll;
pub mod request;

pub use poll::{Comment, Poll, PollOption, ReactionKind, Reactions};
pub use request::{AddCommentRequest, AddReactionRequest, CreatePollRequest, ExpiresIn, VoteRequest};

/// Smallest number of options a poll may carry.
pub const MIN_OPTIONS: usize = 2;
/// Largest number of options a poll may carry.
pub const MAX_OPTIONS: usize = 10;
