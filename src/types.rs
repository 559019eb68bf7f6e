use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Opaque ID types for type safety
pub type SessionId = String;
pub type PollId = String;

/// Fallback when a create request carries no usable time limit
pub const DEFAULT_TIME_LIMIT_SECS: u32 = 60;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Presenter,
    Participant,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum PollState {
    Open,
    Closed,
}

/// The single in-flight question. Lives in the lifecycle slot while Open
/// and is finalized into a `HistoryEntry` at close.
#[derive(Debug, Clone, PartialEq)]
pub struct Poll {
    pub id: PollId,
    pub sequence_number: u64,
    pub question: String,
    pub options: Vec<String>,
    pub time_limit_seconds: u32,
    pub started_at: DateTime<Utc>,
    pub state: PollState,
    /// session id -> chosen option, at most one entry per session
    pub answers: HashMap<SessionId, String>,
}

/// One tally row. Rows follow the poll's option order, so duplicate option
/// text shows up as duplicate rows sharing the same string key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OptionTally {
    pub option: String,
    pub count: u32,
    pub percentage: u32,
}

/// Roster line for one participant
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RosterEntry {
    pub name: String,
    pub has_answered: bool,
}

/// Immutable record of a concluded poll, retained for process lifetime
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HistoryEntry {
    pub id: PollId,
    pub sequence_number: u64,
    pub question: String,
    pub options: Vec<String>,
    pub time_limit_seconds: u32,
    pub started_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub total_answers: u32,
    pub results: Vec<OptionTally>,
}
