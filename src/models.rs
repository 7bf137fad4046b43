use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;
use time::{Duration, OffsetDateTime};

/// Fixed category set. Polls carry exactly one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PollCategory {
    Technology,
    Entertainment,
    Sports,
    Politics,
    Travel,
    Food,
    Other,
}

impl PollCategory {
    pub const ALL: [PollCategory; 7] = [
        PollCategory::Technology,
        PollCategory::Entertainment,
        PollCategory::Sports,
        PollCategory::Politics,
        PollCategory::Travel,
        PollCategory::Food,
        PollCategory::Other,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            PollCategory::Technology => "Technology",
            PollCategory::Entertainment => "Entertainment",
            PollCategory::Sports => "Sports",
            PollCategory::Politics => "Politics",
            PollCategory::Travel => "Travel",
            PollCategory::Food => "Food",
            PollCategory::Other => "Other",
        }
    }
}

impl FromStr for PollCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "technology" => Ok(PollCategory::Technology),
            "entertainment" => Ok(PollCategory::Entertainment),
            "sports" => Ok(PollCategory::Sports),
            "politics" => Ok(PollCategory::Politics),
            "travel" => Ok(PollCategory::Travel),
            "food" => Ok(PollCategory::Food),
            "other" => Ok(PollCategory::Other),
            other => Err(other.to_string()),
        }
    }
}

/// Recognized poll durations, serialized as the day count.
/// `NoEnd` (0 days) means the poll never expires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum PollDuration {
    NoEnd,
    OneDay,
    ThreeDays,
    OneWeek,
    TwoWeeks,
    OneMonth,
}

impl PollDuration {
    pub const fn days(self) -> u32 {
        match self {
            PollDuration::NoEnd => 0,
            PollDuration::OneDay => 1,
            PollDuration::ThreeDays => 3,
            PollDuration::OneWeek => 7,
            PollDuration::TwoWeeks => 14,
            PollDuration::OneMonth => 30,
        }
    }
}

impl TryFrom<u32> for PollDuration {
    type Error = u32;

    fn try_from(days: u32) -> Result<Self, u32> {
        match days {
            0 => Ok(PollDuration::NoEnd),
            1 => Ok(PollDuration::OneDay),
            3 => Ok(PollDuration::ThreeDays),
            7 => Ok(PollDuration::OneWeek),
            14 => Ok(PollDuration::TwoWeeks),
            30 => Ok(PollDuration::OneMonth),
            n => Err(n),
        }
    }
}

impl From<PollDuration> for u32 {
    fn from(duration: PollDuration) -> u32 {
        duration.days()
    }
}

/// A question with discrete options open for voting, plus its aggregate
/// tally. Mutated only through the vote path; never deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Poll {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub options: Vec<String>,
    pub category: PollCategory,
    pub duration: PollDuration,
    pub multiple_choice: bool,
    pub anonymous_voting: bool,
    pub public_results: bool,
    pub author: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Tally: option index -> vote count. Holds an entry for every option
    /// index, defaulting to 0; repaired on load if a stored record is short.
    #[serde(default)]
    pub votes: BTreeMap<usize, u64>,
    pub total_votes: u64,
}

impl Poll {
    pub fn option_count(&self) -> usize {
        self.options.len()
    }

    pub fn votes_for(&self, option_index: usize) -> u64 {
        self.votes.get(&option_index).copied().unwrap_or(0)
    }

    /// The instant voting closes, or `None` for unbounded polls.
    pub fn ends_at(&self) -> Option<OffsetDateTime> {
        match self.duration.days() {
            0 => None,
            days => Some(self.created_at + Duration::days(i64::from(days))),
        }
    }

    /// Stored polls may predate an option's tally entry; fill the gaps.
    pub(crate) fn repair_tally(&mut self) {
        for index in 0..self.options.len() {
            self.votes.entry(index).or_insert(0);
        }
    }
}

/// Creation form input, pre-validation. `None` category/duration models an
/// unselected control; validation reports it as a required-field error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollDraft {
    pub title: String,
    pub description: String,
    pub options: Vec<String>,
    pub category: Option<PollCategory>,
    pub duration: Option<PollDuration>,
    pub multiple_choice: bool,
    pub anonymous_voting: bool,
    pub public_results: bool,
}

impl Default for PollDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            options: Vec::new(),
            category: None,
            duration: None,
            multiple_choice: false,
            anonymous_voting: true,
            public_results: true,
        }
    }
}

/// Immutable proof that a voter voted on a poll with given selections.
/// At most one per (voter, poll) pair, ever.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteRecord {
    pub poll_id: String,
    pub voter_id: String,
    pub selected_options: Vec<usize>,
    #[serde(with = "time::serde::rfc3339")]
    pub voted_at: OffsetDateTime,
}

/// The identity the session capability supplies. Gates voting and creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    Anonymous,
    User { id: String, name: String },
}

impl Identity {
    pub fn user(id: impl Into<String>, name: impl Into<String>) -> Self {
        Identity::User {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, Identity::User { .. })
    }

    pub fn display_name(&self) -> &str {
        match self {
            Identity::Anonymous => "anonymous",
            Identity::User { name, .. } => name,
        }
    }

    pub fn voter_id(&self) -> Option<&str> {
        match self {
            Identity::Anonymous => None,
            Identity::User { id, .. } => Some(id),
        }
    }
}

/// Persisted session record for the signed-in user. Credential storage and
/// sign-in flows live outside this crate; only the identity is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredUser {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}
