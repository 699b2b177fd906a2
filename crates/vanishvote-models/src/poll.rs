use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A poll as returned by the VanishVote API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub question: String,
    pub options: Vec<PollOption>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub hide_results: bool,
    #[serde(default)]
    pub is_private: bool,
    #[serde(default)]
    pub reactions: Reactions,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Poll {
    /// A poll is read-only once `now` has reached its expiration timestamp.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    pub fn total_votes(&self) -> u64 {
        self.options.iter().map(|o| o.votes).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollOption {
    pub text: String,
    #[serde(default)]
    pub votes: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reactions {
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub trending: u64,
}

impl Reactions {
    pub fn count(&self, kind: ReactionKind) -> u64 {
        match kind {
            ReactionKind::Likes => self.likes,
            ReactionKind::Trending => self.trending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReactionKind {
    Likes,
    Trending,
}

impl ReactionKind {
    pub const ALL: [ReactionKind; 2] = [ReactionKind::Likes, ReactionKind::Trending];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReactionKind::Likes => "likes",
            ReactionKind::Trending => "trending",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown reaction kind '{0}' (expected 'likes' or 'trending')")]
pub struct UnknownReactionKind(pub String);

impl FromStr for ReactionKind {
    type Err = UnknownReactionKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "likes" | "like" => Ok(ReactionKind::Likes),
            "trending" => Ok(ReactionKind::Trending),
            other => Err(UnknownReactionKind(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    pub created_at: DateTime<Utc>,
}
