use crate::protocol::ServerMessage;
use crate::registry::SessionRegistry;
use crate::types::{Role, SessionId};
use std::collections::HashMap;
use tokio::sync::mpsc;

/// Fan-out of server messages to connected sockets.
///
/// Every connection registers an unbounded outbox when it is accepted and
/// its socket task drains the other end. Enqueueing never blocks, and a
/// closed outbox (peer already gone) is simply skipped, so one dead party
/// cannot stall or abort delivery to the rest. Per session, messages leave
/// in the order they were enqueued.
#[derive(Debug, Default)]
pub struct BroadcastHub {
    outboxes: HashMap<SessionId, mpsc::UnboundedSender<ServerMessage>>,
}

impl BroadcastHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn attach(&mut self, session_id: &SessionId, outbox: mpsc::UnboundedSender<ServerMessage>) {
        self.outboxes.insert(session_id.clone(), outbox);
    }

    pub fn detach(&mut self, session_id: &SessionId) {
        self.outboxes.remove(session_id);
    }

    /// Unicast to a single session
    pub fn notify_one(&self, session_id: &SessionId, message: ServerMessage) {
        if let Some(outbox) = self.outboxes.get(session_id) {
            // Ignore send errors (receiver already hung up)
            let _ = outbox.send(message);
        }
    }

    /// Deliver to every connected session
    pub fn notify_all(&self, message: &ServerMessage) {
        for outbox in self.outboxes.values() {
            let _ = outbox.send(message.clone());
        }
    }

    /// Deliver to every joined session holding the given role
    pub fn notify_role(&self, registry: &SessionRegistry, role: &Role, message: &ServerMessage) {
        for session in registry.sessions().filter(|s| s.role == *role) {
            self.notify_one(&session.id, message.clone());
        }
    }

    pub fn connection_count(&self) -> usize {
        self.outboxes.len()
    }
}
