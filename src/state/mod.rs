mod poll;
mod session;

use crate::history::HistoryStore;
use crate::hub::BroadcastHub;
use crate::lifecycle::PollLifecycle;
use crate::protocol::ServerMessage;
use crate::registry::SessionRegistry;
use crate::results;
use tokio::sync::Mutex;

/// Everything the orchestrator owns. One lock guards the lot: an inbound
/// event locks, mutates, enqueues its notifications and releases, so events
/// are processed to completion in arrival order and no party can observe
/// the roster, the poll slot or the history mid-mutation.
pub(crate) struct CoreState {
    pub(crate) registry: SessionRegistry,
    pub(crate) lifecycle: PollLifecycle,
    pub(crate) history: HistoryStore,
    pub(crate) hub: BroadcastHub,
}

impl CoreState {
    fn roster_changed(&self) -> ServerMessage {
        ServerMessage::RosterChanged {
            participants: self.registry.roster(),
        }
    }

    fn history_snapshot(&self) -> ServerMessage {
        ServerMessage::HistorySnapshot {
            polls: self.history.all().to_vec(),
        }
    }

    /// Live tallies for the open poll, None when the slot is empty
    fn tally_update(&self) -> Option<ServerMessage> {
        let poll = self.lifecycle.active()?;
        Some(ServerMessage::TallyUpdate {
            poll: poll.into(),
            total_answers: poll.answers.len() as u32,
            results: results::compute_results(&poll.options, &poll.answers),
        })
    }
}

/// Shared application state
pub struct AppState {
    pub(crate) core: Mutex<CoreState>,
}

impl AppState {
    pub fn new() -> Self {
        Self {
            core: Mutex::new(CoreState {
                registry: SessionRegistry::new(),
                lifecycle: PollLifecycle::new(),
                history: HistoryStore::new(),
                hub: BroadcastHub::new(),
            }),
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
