//! Server-side session store
//!
//! Sessions are keyed by an opaque random token carried in a cookie. Entries
//! live in process memory and expire `max_age` after they were last
//! established.

use super::state::SessionState;
use crate::domain::{ProfileId, Role};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rand::RngCore;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

const TOKEN_BYTES: usize = 32;

#[derive(Debug, Clone)]
struct SessionEntry {
    state: SessionState,
    established_at: Instant,
}

/// Establishes, reads and tears down sessions
#[derive(Debug, Clone)]
pub struct SessionManager {
    entries: Arc<RwLock<HashMap<String, SessionEntry>>>,
    max_age: Duration,
}

fn new_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

impl SessionManager {
    pub fn new(max_age: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            max_age,
        }
    }

    pub fn max_age(&self) -> Duration {
        self.max_age
    }

    fn is_live(&self, entry: &SessionEntry) -> bool {
        entry.established_at.elapsed() < self.max_age
    }

    /// Writes `{role}_id = id` and returns the token to hand back to the browser
    ///
    /// The token is always rotated. Slots of a still-live previous session
    /// carry over, so one browser can hold several roles at once.
    pub async fn establish(&self, token: Option<&str>, role: Role, id: ProfileId) -> String {
        let mut entries = self.entries.write().await;

        let mut state = token
            .and_then(|t| entries.remove(t))
            .filter(|entry| self.is_live(entry))
            .map(|entry| entry.state)
            .unwrap_or_default();
        state.set(role, id);

        let token = new_token();
        entries.insert(
            token.clone(),
            SessionEntry {
                state,
                established_at: Instant::now(),
            },
        );
        tracing::debug!(role = %role, active_sessions = entries.len(), "Session established");
        token
    }

    /// Current slots for `token`; empty for unknown or expired tokens
    pub async fn state(&self, token: &str) -> SessionState {
        {
            let entries = self.entries.read().await;
            match entries.get(token) {
                Some(entry) if self.is_live(entry) => return entry.state,
                None => return SessionState::default(),
                Some(_) => {}
            }
        }

        // Expired: drop it so it cannot be revived.
        self.entries.write().await.remove(token);
        SessionState::default()
    }

    /// Removes the whole entry, clearing every slot
    pub async fn teardown(&self, token: &str) -> bool {
        self.entries.write().await.remove(token).is_some()
    }

    /// Drops every expired entry, returning how many were removed
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.established_at.elapsed() < self.max_age);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn manager() -> SessionManager {
        SessionManager::new(Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn test_establish_sets_single_slot() {
        let sessions = manager();
        let token = sessions
            .establish(None, Role::Patient, ProfileId::new(7))
            .await;
        let state = sessions.state(&token).await;
        assert_eq!(state.patient_id, Some(ProfileId::new(7)));
        assert_eq!(state.admin_id, None);
        assert_eq!(token.len(), 43);
    }

    #[tokio::test]
    async fn test_establish_rotates_token_and_keeps_slots() {
        let sessions = manager();
        let first = sessions.establish(None, Role::Admin, ProfileId::new(1)).await;
        let second = sessions
            .establish(Some(&first), Role::Doctor, ProfileId::new(2))
            .await;

        assert_ne!(first, second);
        assert!(sessions.state(&first).await.is_empty());
        let state = sessions.state(&second).await;
        assert_eq!(state.admin_id, Some(ProfileId::new(1)));
        assert_eq!(state.doctor_id, Some(ProfileId::new(2)));
        assert_eq!(sessions.len().await, 1);
    }

    #[tokio::test]
    async fn test_teardown_clears_every_slot() {
        let sessions = manager();
        let token = sessions.establish(None, Role::Admin, ProfileId::new(1)).await;
        let token = sessions
            .establish(Some(&token), Role::Patient, ProfileId::new(3))
            .await;

        assert!(sessions.teardown(&token).await);
        assert!(sessions.state(&token).await.is_empty());
        assert!(!sessions.teardown(&token).await);
    }

    #[tokio::test]
    async fn test_unknown_token_is_empty() {
        assert!(manager().state("not-a-token").await.is_empty());
    }

    #[tokio::test]
    async fn test_expired_entries_are_dropped() {
        let sessions = SessionManager::new(Duration::ZERO);
        let token = sessions
            .establish(None, Role::Patient, ProfileId::new(1))
            .await;
        assert!(sessions.state(&token).await.is_empty());
        assert!(sessions.is_empty().await);

        sessions.establish(None, Role::Doctor, ProfileId::new(2)).await;
        assert_eq!(sessions.purge_expired().await, 1);
    }
}
