//! services/app/src/auth.rs
//!
//! Local session handling. The hosted auth service issues the session; this
//! module only stores and checks the record that gates reading access.
//!
//! The original client inferred login from the presence of any storage key
//! containing a token substring. Here the check is explicit: one well-known
//! key holding a serialized `AuthSession`. Intent is unchanged — no session,
//! no reading.

use novelink_core::domain::AuthSession;
use novelink_core::ports::KeyValueStore;

/// Storage key for the serialized authenticated-session record.
pub const AUTH_SESSION_KEY: &str = "auth_session";

/// Returns the stored session, if any. Malformed records count as absent.
pub fn current_session(store: &dyn KeyValueStore) -> Option<AuthSession> {
    let raw = store.get(AUTH_SESSION_KEY)?;
    serde_json::from_str(&raw).ok()
}

pub fn store_session(store: &dyn KeyValueStore, session: &AuthSession) {
    if let Ok(raw) = serde_json::to_string(session) {
        store.set(AUTH_SESSION_KEY, &raw);
    }
}

pub fn clear_session(store: &dyn KeyValueStore) {
    store.remove(AUTH_SESSION_KEY);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemoryStore;
    use uuid::Uuid;

    #[test]
    fn session_round_trips_through_the_store() {
        let store = MemoryStore::new();
        let session = AuthSession {
            token: "tok".to_string(),
            user_id: Uuid::new_v4(),
            email: "reader@example.com".to_string(),
        };
        store_session(&store, &session);

        let loaded = current_session(&store).expect("session present");
        assert_eq!(loaded.token, "tok");
        assert_eq!(loaded.user_id, session.user_id);
    }

    #[test]
    fn absent_or_malformed_session_counts_as_logged_out() {
        let store = MemoryStore::new();
        assert!(current_session(&store).is_none());

        store.set(AUTH_SESSION_KEY, "{broken");
        assert!(current_session(&store).is_none());
    }

    #[test]
    fn clear_session_logs_out() {
        let store = MemoryStore::new();
        store_session(
            &store,
            &AuthSession {
                token: "tok".to_string(),
                user_id: Uuid::new_v4(),
                email: String::new(),
            },
        );
        clear_session(&store);
        assert!(current_session(&store).is_none());
    }
}
