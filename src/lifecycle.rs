use crate::history::HistoryStore;
use crate::results;
use crate::types::{HistoryEntry, Poll, PollId, PollState, SessionId, DEFAULT_TIME_LIMIT_SECS};
use chrono::Utc;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PollError {
    #[error("question must not be empty")]
    EmptyQuestion,
    #[error("a poll needs at least two non-empty options")]
    InsufficientOptions,
}

/// Single-slot poll state machine.
///
/// The slot is empty (idle), or holds the one Open poll. Closing finalizes
/// the poll into a `HistoryEntry`, appends it to the history exactly once
/// and empties the slot again, so explicit close requests and deadline
/// expiry can both call [`close`](Self::close) without coordinating.
#[derive(Debug, Default)]
pub struct PollLifecycle {
    active: Option<Poll>,
    polls_created: u64,
}

impl PollLifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate a create request, returning the usable option list. Blank
    /// options are dropped before the minimum-count check; surviving
    /// options keep their given text and order, duplicates included.
    pub fn validate_request(question: &str, options: &[String]) -> Result<Vec<String>, PollError> {
        if question.trim().is_empty() {
            return Err(PollError::EmptyQuestion);
        }

        let usable: Vec<String> = options
            .iter()
            .filter(|option| !option.trim().is_empty())
            .cloned()
            .collect();
        if usable.len() < 2 {
            return Err(PollError::InsufficientOptions);
        }

        Ok(usable)
    }

    /// Open a new poll. Validation happens before anything else, so a bad
    /// request leaves a running poll untouched. A running poll is then
    /// force-closed (finalized and archived) before the new one starts;
    /// its archive entry is returned alongside the opened poll.
    ///
    /// A zero time limit falls back to [`DEFAULT_TIME_LIMIT_SECS`].
    pub fn open(
        &mut self,
        history: &mut HistoryStore,
        question: &str,
        options: &[String],
        time_limit_seconds: u32,
    ) -> Result<(Option<HistoryEntry>, &Poll), PollError> {
        let options = Self::validate_request(question, options)?;

        let superseded = self.close(history);

        self.polls_created += 1;
        let poll = Poll {
            id: ulid::Ulid::new().to_string(),
            sequence_number: self.polls_created,
            question: question.to_string(),
            options,
            time_limit_seconds: if time_limit_seconds == 0 {
                DEFAULT_TIME_LIMIT_SECS
            } else {
                time_limit_seconds
            },
            started_at: Utc::now(),
            state: PollState::Open,
            answers: HashMap::new(),
        };

        Ok((superseded, self.active.insert(poll)))
    }

    /// Record an answer, overwriting any earlier one from the same session.
    /// Returns false (and records nothing) unless a poll is Open and the
    /// option is one of its own.
    pub fn record_answer(&mut self, session_id: &SessionId, option: &str) -> bool {
        let Some(poll) = self.active.as_mut() else {
            return false;
        };
        if poll.state != PollState::Open || !poll.options.iter().any(|o| o == option) {
            return false;
        }

        poll.answers.insert(session_id.clone(), option.to_string());
        true
    }

    /// Close the active poll: compute final results, archive the entry,
    /// empty the slot. Idempotent; returns None when nothing was open.
    pub fn close(&mut self, history: &mut HistoryStore) -> Option<HistoryEntry> {
        let mut poll = self.active.take()?;
        poll.state = PollState::Closed;

        let results = results::compute_results(&poll.options, &poll.answers);
        let entry = HistoryEntry {
            id: poll.id,
            sequence_number: poll.sequence_number,
            question: poll.question,
            options: poll.options,
            time_limit_seconds: poll.time_limit_seconds,
            started_at: poll.started_at,
            closed_at: Utc::now(),
            total_answers: poll.answers.len() as u32,
            results,
        };
        history.append(entry.clone());

        Some(entry)
    }

    pub fn active(&self) -> Option<&Poll> {
        self.active.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Whether `poll_id` is the poll currently in the slot
    pub fn is_current(&self, poll_id: &PollId) -> bool {
        self.active.as_ref().map(|p| p.id == *poll_id).unwrap_or(false)
    }
}
