//! WebSocket event dispatch
//!
//! This module routes parsed client events into the core state. Most
//! outcomes travel back through the session outboxes; the returned message
//! is the unicast rejection for requests that failed validation.

use crate::lifecycle::PollError;
use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::timer;
use crate::types::SessionId;
use std::sync::Arc;

/// Handle one client event and return an optional direct reply
pub async fn dispatch(
    msg: ClientMessage,
    session_id: &SessionId,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Join messages
        ClientMessage::JoinPresenter => {
            state.join_presenter(session_id).await;
            None
        }

        ClientMessage::JoinParticipant { name } => {
            match state.join_participant(session_id, &name).await {
                Ok(()) => None,
                Err(e) => Some(ServerMessage::Error {
                    code: "INVALID_NAME".to_string(),
                    msg: e.to_string(),
                }),
            }
        }

        // Presenter commands (role checked inside the core)
        ClientMessage::CreatePoll {
            question,
            options,
            time_limit_seconds,
        } => {
            match state
                .open_poll(session_id, &question, &options, time_limit_seconds)
                .await
            {
                Ok(Some(poll)) => {
                    timer::spawn_close_timer(
                        state.clone(),
                        poll.id.clone(),
                        poll.time_limit_seconds,
                    );
                    None
                }
                Ok(None) => None,
                Err(e) => {
                    let code = match e {
                        PollError::EmptyQuestion => "INVALID_QUESTION",
                        PollError::InsufficientOptions => "INSUFFICIENT_OPTIONS",
                    };
                    Some(ServerMessage::Error {
                        code: code.to_string(),
                        msg: e.to_string(),
                    })
                }
            }
        }

        ClientMessage::RequestClose => {
            state.close_poll(session_id).await;
            None
        }

        // Participant messages
        ClientMessage::SubmitAnswer { option } => {
            state.submit_answer(session_id, &option).await;
            None
        }

        ClientMessage::FetchHistory => {
            state.send_history(session_id).await;
            None
        }
    }
}
