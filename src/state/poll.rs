use super::{AppState, CoreState};
use crate::lifecycle::PollError;
use crate::protocol::{PollInfo, ServerMessage};
use crate::types::{HistoryEntry, PollId, Role, SessionId};

impl CoreState {
    /// Closing notifications: final results, then the grown archive
    fn announce_closed(&self, entry: HistoryEntry) {
        self.hub.notify_all(&ServerMessage::PollClosed { poll: entry });
        let snapshot = self.history_snapshot();
        self.hub.notify_all(&snapshot);
    }

    /// The one close path, shared by explicit requests, deadline expiry
    /// and create-supersedes-running. No-op when nothing is open.
    fn finalize_poll(&mut self) {
        if let Some(entry) = self.lifecycle.close(&mut self.history) {
            tracing::info!(
                "Poll {} closed with {} answers",
                entry.sequence_number,
                entry.total_answers
            );
            self.announce_closed(entry);
        }
    }
}

impl AppState {
    /// create-poll. Validation happens before the running poll (if any) is
    /// touched; on success the superseded poll's close goes out first, then
    /// the opening notifications. Returns the opened poll so the caller can
    /// arm its deadline, or Ok(None) when the sender may not create polls
    /// (silently ignored).
    pub async fn open_poll(
        &self,
        session_id: &SessionId,
        question: &str,
        options: &[String],
        time_limit_seconds: u32,
    ) -> Result<Option<PollInfo>, PollError> {
        let mut core = self.core.lock().await;
        if !core.registry.is_presenter(session_id) {
            tracing::debug!("create-poll from non-presenter {} ignored", session_id);
            return Ok(None);
        }

        let core = &mut *core;
        let (superseded, poll) =
            core.lifecycle
                .open(&mut core.history, question, options, time_limit_seconds)?;
        let info = PollInfo::from(poll);

        if let Some(entry) = superseded {
            tracing::info!(
                "Poll {} force-closed with {} answers: superseded",
                entry.sequence_number,
                entry.total_answers
            );
            core.announce_closed(entry);
        }

        core.registry.reset_answered();
        core.hub.notify_all(&ServerMessage::PollOpened {
            poll: info.clone(),
        });
        let roster = core.roster_changed();
        core.hub.notify_all(&roster);

        tracing::info!(
            "Poll {} opened: {} ({} options, {}s, {} participants)",
            info.sequence_number,
            info.question,
            info.options.len(),
            info.time_limit_seconds,
            core.registry.participant_count()
        );
        Ok(Some(info))
    }

    /// submit-answer. Ignored without feedback unless a poll is open, the
    /// sender is a joined participant and the option is on the ballot. A
    /// resubmission replaces the earlier answer.
    pub async fn submit_answer(&self, session_id: &SessionId, option: &str) {
        let mut core = self.core.lock().await;
        let core = &mut *core;

        let participant_name = match core.registry.get(session_id) {
            Some(session) if session.role == Role::Participant => {
                session.name.clone().unwrap_or_default()
            }
            _ => {
                tracing::debug!("answer from non-participant {} ignored", session_id);
                return;
            }
        };

        if !core.lifecycle.record_answer(session_id, option) {
            tracing::debug!("answer {:?} from {} ignored", option, participant_name);
            return;
        }
        core.registry.mark_answered(session_id);

        core.hub.notify_all(&ServerMessage::AnswerAccepted {
            participant_name,
            option: option.to_string(),
        });
        if let Some(tally) = core.tally_update() {
            core.hub.notify_all(&tally);
        }
        let roster = core.roster_changed();
        core.hub.notify_all(&roster);
    }

    /// request-close. Ignored unless the sender is a presenter; closing an
    /// already-closed or absent poll is a no-op.
    pub async fn close_poll(&self, session_id: &SessionId) {
        let mut core = self.core.lock().await;
        if !core.registry.is_presenter(session_id) {
            tracing::debug!("close request from non-presenter {} ignored", session_id);
            return;
        }
        core.finalize_poll();
    }

    /// Deadline expiry for `poll_id`. A stale timer, whose poll was closed
    /// or superseded in the meantime, finds nothing to do.
    pub async fn close_expired(&self, poll_id: &PollId) {
        let mut core = self.core.lock().await;
        if !core.lifecycle.is_current(poll_id) {
            tracing::debug!("Deadline for poll {} fired after its close", poll_id);
            return;
        }
        tracing::info!("Poll {} reached its deadline", poll_id);
        core.finalize_poll();
    }

    /// fetch-history: unicast the full archive to the asking session
    pub async fn send_history(&self, session_id: &SessionId) {
        let core = self.core.lock().await;
        let snapshot = core.history_snapshot();
        core.hub.notify_one(session_id, snapshot);
    }

    /// Read-only view of the live poll, if one is open
    pub async fn active_poll(&self) -> Option<PollInfo> {
        self.core.lock().await.lifecycle.active().map(PollInfo::from)
    }

    /// Concluded polls, oldest first
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.core.lock().await.history.all().to_vec()
    }
}
