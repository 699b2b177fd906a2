use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::poll::ReactionKind;

/// Poll lifetimes the API accepts, in hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u32", try_from = "u32")]
pub enum ExpiresIn {
    OneHour,
    TwelveHours,
    #[default]
    OneDay,
    TwoDays,
    OneWeek,
}

impl ExpiresIn {
    pub const ALL: [ExpiresIn; 5] = [
        ExpiresIn::OneHour,
        ExpiresIn::TwelveHours,
        ExpiresIn::OneDay,
        ExpiresIn::TwoDays,
        ExpiresIn::OneWeek,
    ];

    pub fn hours(self) -> u32 {
        match self {
            ExpiresIn::OneHour => 1,
            ExpiresIn::TwelveHours => 12,
            ExpiresIn::OneDay => 24,
            ExpiresIn::TwoDays => 48,
            ExpiresIn::OneWeek => 168,
        }
    }

    pub fn duration(self) -> chrono::Duration {
        chrono::Duration::hours(i64::from(self.hours()))
    }

    pub fn label(self) -> &'static str {
        match self {
            ExpiresIn::OneHour => "1 hour",
            ExpiresIn::TwelveHours => "12 hours",
            ExpiresIn::OneDay => "24 hours",
            ExpiresIn::TwoDays => "48 hours",
            ExpiresIn::OneWeek => "1 week",
        }
    }
}

impl From<ExpiresIn> for u32 {
    fn from(value: ExpiresIn) -> Self {
        value.hours()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unsupported poll duration '{0}' (allowed hours: 1, 12, 24, 48, 168)")]
pub struct InvalidExpiresIn(pub String);

impl TryFrom<u32> for ExpiresIn {
    type Error = InvalidExpiresIn;

    fn try_from(hours: u32) -> Result<Self, Self::Error> {
        ExpiresIn::ALL
            .into_iter()
            .find(|e| e.hours() == hours)
            .ok_or_else(|| InvalidExpiresIn(hours.to_string()))
    }
}

impl FromStr for ExpiresIn {
    type Err = InvalidExpiresIn;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_suffix('h').unwrap_or(trimmed);
        let hours: u32 = trimmed
            .parse()
            .map_err(|_| InvalidExpiresIn(s.to_string()))?;
        ExpiresIn::try_from(hours)
    }
}

impl fmt::Display for ExpiresIn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Body of `POST /polls`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePollRequest {
    pub question: String,
    pub options: Vec<String>,
    pub expires_in: ExpiresIn,
    pub hide_results: bool,
    pub is_private: bool,
}

/// Body of `POST /polls/{id}/vote`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRequest {
    pub option_index: usize,
}

/// Body of `POST /polls/{id}/comments`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCommentRequest {
    pub text: String,
}

/// Body of `POST /polls/{id}/reactions`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddReactionRequest {
    #[serde(rename = "type")]
    pub kind: ReactionKind,
}
