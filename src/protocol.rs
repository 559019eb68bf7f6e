use crate::types::*;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinPresenter,
    JoinParticipant {
        name: String,
    },
    CreatePoll {
        question: String,
        options: Vec<String>,
        /// Seconds until the poll closes itself; 0 or absent means the
        /// server default
        #[serde(default)]
        time_limit_seconds: u32,
    },
    SubmitAnswer {
        option: String,
    },
    RequestClose,
    FetchHistory,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    JoinAcknowledged {
        role: Role,
        #[serde(skip_serializing_if = "Option::is_none")]
        name: Option<String>,
    },
    /// Participants in join order, with their answered flags
    RosterChanged {
        participants: Vec<RosterEntry>,
    },
    ParticipantLeft {
        name: String,
    },
    /// A poll started accepting answers (question and options, no tallies)
    PollOpened {
        poll: PollInfo,
    },
    AnswerAccepted {
        participant_name: String,
        option: String,
    },
    /// Live tallies for the open poll
    TallyUpdate {
        poll: PollInfo,
        total_answers: u32,
        results: Vec<OptionTally>,
    },
    /// Final results; the archived entry as it enters the history
    PollClosed {
        poll: HistoryEntry,
    },
    /// Concluded polls, oldest first
    HistorySnapshot {
        polls: Vec<HistoryEntry>,
    },
    Error {
        code: String,
        msg: String,
    },
}

/// Public poll info (per-session answers stay server-side)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PollInfo {
    pub id: PollId,
    pub sequence_number: u64,
    pub question: String,
    pub options: Vec<String>,
    pub time_limit_seconds: u32,
    pub started_at: DateTime<Utc>,
}

impl From<&Poll> for PollInfo {
    fn from(poll: &Poll) -> Self {
        Self {
            id: poll.id.clone(),
            sequence_number: poll.sequence_number,
            question: poll.question.clone(),
            options: poll.options.clone(),
            time_limit_seconds: poll.time_limit_seconds,
            started_at: poll.started_at,
        }
    }
}
