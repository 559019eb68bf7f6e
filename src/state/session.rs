use super::AppState;
use crate::protocol::ServerMessage;
use crate::registry::RegistryError;
use crate::types::{Role, RosterEntry, SessionId};
use tokio::sync::mpsc;

impl AppState {
    /// Register a fresh connection's outbox with the hub. Broadcasts reach
    /// the connection from here on; a session identity comes with a join.
    pub async fn attach(&self, session_id: &SessionId, outbox: mpsc::UnboundedSender<ServerMessage>) {
        let mut core = self.core.lock().await;
        core.hub.attach(session_id, outbox);
        tracing::debug!(
            "Connection {} attached ({} connected)",
            session_id,
            core.hub.connection_count()
        );
    }

    /// join-presenter: always succeeds. The newcomer alone is brought up to
    /// date with the roster, the archive, and the running poll if any.
    pub async fn join_presenter(&self, session_id: &SessionId) {
        let mut core = self.core.lock().await;
        core.registry.register_presenter(session_id);

        core.hub.notify_one(
            session_id,
            ServerMessage::JoinAcknowledged {
                role: Role::Presenter,
                name: None,
            },
        );
        core.hub.notify_one(session_id, core.roster_changed());
        core.hub.notify_one(session_id, core.history_snapshot());
        if let Some(poll) = core.lifecycle.active() {
            core.hub.notify_one(
                session_id,
                ServerMessage::PollOpened { poll: poll.into() },
            );
        }
        if let Some(tally) = core.tally_update() {
            core.hub.notify_one(session_id, tally);
        }

        tracing::info!("Presenter {} joined", session_id);
    }

    /// join-participant: rejects names that trim to nothing. Everyone
    /// learns the new roster; the joiner additionally receives the running
    /// poll if one is open.
    pub async fn join_participant(
        &self,
        session_id: &SessionId,
        name: &str,
    ) -> Result<(), RegistryError> {
        let mut core = self.core.lock().await;
        let session = core.registry.register_participant(session_id, name)?;

        core.hub.notify_one(
            session_id,
            ServerMessage::JoinAcknowledged {
                role: Role::Participant,
                name: session.name.clone(),
            },
        );
        let roster = core.roster_changed();
        core.hub.notify_all(&roster);
        if let Some(poll) = core.lifecycle.active() {
            core.hub.notify_one(
                session_id,
                ServerMessage::PollOpened { poll: poll.into() },
            );
        }

        tracing::info!(
            "Participant {} joined as {}",
            session.name.as_deref().unwrap_or_default(),
            session_id
        );
        Ok(())
    }

    /// Transport-level disconnect. The outbox detaches and the roster
    /// shrinks; poll timing and already-recorded answers are untouched.
    /// Unknown sessions are a no-op.
    pub async fn disconnect(&self, session_id: &SessionId) {
        let mut core = self.core.lock().await;
        core.hub.detach(session_id);

        let Some(session) = core.registry.remove(session_id) else {
            tracing::debug!("Connection {} left without joining", session_id);
            return;
        };

        if session.role == Role::Participant {
            let roster = core.roster_changed();
            core.hub.notify_all(&roster);
            if let Some(name) = session.name {
                tracing::info!("Participant {} ({}) disconnected", name, session_id);
                core.hub.notify_all(&ServerMessage::ParticipantLeft { name });
            }
        } else {
            tracing::info!("Presenter {} disconnected", session_id);
        }
    }

    /// Current participants in join order
    pub async fn roster(&self) -> Vec<RosterEntry> {
        self.core.lock().await.registry.roster()
    }
}
