use crate::types::{Role, RosterEntry, SessionId};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RegistryError {
    #[error("display name must not be empty")]
    InvalidName,
}

/// One connected party
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: SessionId,
    pub role: Role,
    /// Display name; presenters have none
    pub name: Option<String>,
    pub has_answered: bool,
}

/// Table of joined sessions. Participants additionally keep their join
/// order so roster listings stay stable.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: HashMap<SessionId, Session>,
    participant_order: Vec<SessionId>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a presenter session. Always succeeds; a session that was a
    /// participant before loses its roster spot.
    pub fn register_presenter(&mut self, session_id: &SessionId) -> Session {
        self.participant_order.retain(|id| id != session_id);
        let session = Session {
            id: session_id.clone(),
            role: Role::Presenter,
            name: None,
            has_answered: false,
        };
        self.sessions.insert(session_id.clone(), session.clone());
        session
    }

    /// Record a participant session under a display name. The name is
    /// stored trimmed; a name that trims to nothing is rejected.
    pub fn register_participant(
        &mut self,
        session_id: &SessionId,
        name: &str,
    ) -> Result<Session, RegistryError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RegistryError::InvalidName);
        }

        let session = Session {
            id: session_id.clone(),
            role: Role::Participant,
            name: Some(name.to_string()),
            has_answered: false,
        };
        self.sessions.insert(session_id.clone(), session.clone());
        if !self.participant_order.iter().any(|id| id == session_id) {
            self.participant_order.push(session_id.clone());
        }
        Ok(session)
    }

    /// Flag a participant as having answered the current poll. Unknown
    /// sessions and presenters are ignored.
    pub fn mark_answered(&mut self, session_id: &SessionId) {
        if let Some(session) = self.sessions.get_mut(session_id) {
            if session.role == Role::Participant {
                session.has_answered = true;
            }
        }
    }

    /// Clear every answered flag (a new poll is starting)
    pub fn reset_answered(&mut self) {
        for session in self.sessions.values_mut() {
            session.has_answered = false;
        }
    }

    /// Drop a session, returning it if it existed
    pub fn remove(&mut self, session_id: &SessionId) -> Option<Session> {
        self.participant_order.retain(|id| id != session_id);
        self.sessions.remove(session_id)
    }

    pub fn get(&self, session_id: &SessionId) -> Option<&Session> {
        self.sessions.get(session_id)
    }

    pub fn is_presenter(&self, session_id: &SessionId) -> bool {
        self.sessions
            .get(session_id)
            .map(|s| s.role == Role::Presenter)
            .unwrap_or(false)
    }

    pub fn is_participant(&self, session_id: &SessionId) -> bool {
        self.sessions
            .get(session_id)
            .map(|s| s.role == Role::Participant)
            .unwrap_or(false)
    }

    /// Current participants in join order
    pub fn participants(&self) -> Vec<&Session> {
        self.participant_order
            .iter()
            .filter_map(|id| self.sessions.get(id))
            .collect()
    }

    pub fn participant_count(&self) -> usize {
        self.participant_order.len()
    }

    /// Roster view of the participants, join order preserved
    pub fn roster(&self) -> Vec<RosterEntry> {
        self.participants()
            .into_iter()
            .map(|session| RosterEntry {
                name: session.name.clone().unwrap_or_default(),
                has_answered: session.has_answered,
            })
            .collect()
    }

    /// All joined sessions, participants and presenters alike
    pub fn sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_participant_keeps_join_order() {
        let mut registry = SessionRegistry::new();
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();
        registry
            .register_participant(&"s2".to_string(), "Grace")
            .unwrap();
        registry
            .register_participant(&"s3".to_string(), "Edsger")
            .unwrap();

        let names: Vec<_> = registry
            .participants()
            .iter()
            .map(|s| s.name.clone().unwrap())
            .collect();
        assert_eq!(names, vec!["Ada", "Grace", "Edsger"]);
    }

    #[test]
    fn test_register_participant_rejects_blank_name() {
        let mut registry = SessionRegistry::new();

        let err = registry
            .register_participant(&"s1".to_string(), "   ")
            .unwrap_err();
        assert_eq!(err, RegistryError::InvalidName);
        assert_eq!(registry.participant_count(), 0);
        assert!(registry.get(&"s1".to_string()).is_none());
    }

    #[test]
    fn test_register_participant_trims_name() {
        let mut registry = SessionRegistry::new();
        let session = registry
            .register_participant(&"s1".to_string(), "  Ada  ")
            .unwrap();

        assert_eq!(session.name.as_deref(), Some("Ada"));
    }

    #[test]
    fn test_reregister_does_not_duplicate_roster_entry() {
        let mut registry = SessionRegistry::new();
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();
        registry
            .register_participant(&"s1".to_string(), "Ada L.")
            .unwrap();

        assert_eq!(registry.participant_count(), 1);
        assert_eq!(registry.roster()[0].name, "Ada L.");
    }

    #[test]
    fn test_mark_answered_only_touches_participants() {
        let mut registry = SessionRegistry::new();
        registry.register_presenter(&"host".to_string());
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();

        registry.mark_answered(&"host".to_string());
        registry.mark_answered(&"s1".to_string());
        registry.mark_answered(&"ghost".to_string());

        assert!(!registry.get(&"host".to_string()).unwrap().has_answered);
        assert!(registry.get(&"s1".to_string()).unwrap().has_answered);
    }

    #[test]
    fn test_reset_answered_clears_flags() {
        let mut registry = SessionRegistry::new();
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();
        registry.mark_answered(&"s1".to_string());
        assert!(registry.roster()[0].has_answered);

        registry.reset_answered();
        assert!(!registry.roster()[0].has_answered);
    }

    #[test]
    fn test_remove_returns_session_and_updates_order() {
        let mut registry = SessionRegistry::new();
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();
        registry
            .register_participant(&"s2".to_string(), "Grace")
            .unwrap();

        let removed = registry.remove(&"s1".to_string()).unwrap();
        assert_eq!(removed.name.as_deref(), Some("Ada"));
        assert_eq!(registry.participant_count(), 1);
        assert_eq!(registry.roster()[0].name, "Grace");

        assert!(registry.remove(&"s1".to_string()).is_none());
    }

    #[test]
    fn test_presenter_is_not_listed_in_roster() {
        let mut registry = SessionRegistry::new();
        registry.register_presenter(&"host".to_string());
        registry
            .register_participant(&"s1".to_string(), "Ada")
            .unwrap();

        assert!(registry.is_presenter(&"host".to_string()));
        assert!(!registry.is_participant(&"host".to_string()));
        assert_eq!(registry.roster().len(), 1);
        assert_eq!(registry.sessions().count(), 2);
    }
}
