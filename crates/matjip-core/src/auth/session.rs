use std::sync::RwLock;

use serde::{Deserialize, Serialize};

/// The logged-in member's identity and credentials.
///
/// Every field is optional: an empty `Session` is an anonymous visitor.
/// `nickname`, `email` and `profile_image` are display copies only and may lag
/// behind the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(rename = "memberId", default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<String>,
    #[serde(rename = "accessToken", default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(rename = "refreshToken", default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "profileImage", default, skip_serializing_if = "Option::is_none")]
    pub profile_image: Option<String>,
}

impl Session {
    /// A session update carrying only a fresh token pair.
    pub fn tokens(access_token: impl Into<String>, refresh_token: impl Into<String>) -> Self {
        Self {
            access_token: Some(access_token.into()),
            refresh_token: Some(refresh_token.into()),
            ..Self::default()
        }
    }

    /// Overlay every `Some` field of `update` onto `self`. `None` fields in
    /// `update` leave the current value untouched.
    pub fn merge(&mut self, update: &Session) {
        fn overlay(slot: &mut Option<String>, value: &Option<String>) {
            if let Some(v) = value {
                *slot = Some(v.clone());
            }
        }

        overlay(&mut self.member_id, &update.member_id);
        overlay(&mut self.access_token, &update.access_token);
        overlay(&mut self.refresh_token, &update.refresh_token);
        overlay(&mut self.nickname, &update.nickname);
        overlay(&mut self.email, &update.email);
        overlay(&mut self.profile_image, &update.profile_image);
    }

    /// True only when both the member id and the access token are present.
    pub fn is_authenticated(&self) -> bool {
        self.member_id.is_some() && self.access_token.is_some()
    }

    pub fn is_empty(&self) -> bool {
        *self == Session::default()
    }
}

/// Process-wide session storage.
///
/// Implementations never fail towards the caller: storage problems are logged
/// and the call becomes a no-op on the backing medium.
pub trait SessionStore: Send + Sync {
    /// Current session. Missing fields are `None`.
    fn get(&self) -> Session;

    /// Merge the `Some` fields of `update` into the stored session.
    fn set(&self, update: &Session);

    /// Swap in `session` as a whole. Fields it leaves `None` end up empty, and
    /// no reader observes the store between the old and the new session.
    fn replace(&self, session: &Session);

    /// Remove every field. Calling it on an empty store is a no-op.
    fn clear(&self);

    fn is_authenticated(&self) -> bool {
        self.get().is_authenticated()
    }
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    inner: RwLock<Session>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            inner: RwLock::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Session {
        self.inner
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn set(&self, update: &Session) {
        let mut guard = self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let mut next = guard.clone();
        next.merge(update);
        *guard = next;
    }

    fn replace(&self, session: &Session) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = session.clone();
    }

    fn clear(&self) {
        *self
            .inner
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Session::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logged_in() -> Session {
        Session {
            member_id: Some("7".to_string()),
            access_token: Some("tok".to_string()),
            refresh_token: Some("ref".to_string()),
            nickname: Some("kimchi".to_string()),
            email: Some("kimchi@example.com".to_string()),
            profile_image: None,
        }
    }

    #[test]
    fn test_is_authenticated_truth_table() {
        let cases = [
            (None, None, false),
            (Some("7"), None, false),
            (None, Some("tok"), false),
            (Some("7"), Some("tok"), true),
        ];

        for (member_id, token, expected) in cases {
            let store = MemorySessionStore::with_session(Session {
                member_id: member_id.map(String::from),
                access_token: token.map(String::from),
                ..Session::default()
            });
            assert_eq!(
                store.is_authenticated(),
                expected,
                "member_id={:?} access_token={:?}",
                member_id,
                token
            );
        }
    }

    #[test]
    fn test_set_merges_instead_of_replacing() {
        let store = MemorySessionStore::with_session(logged_in());
        store.set(&Session::tokens("tok2", "ref2"));

        let session = store.get();
        assert_eq!(session.access_token.as_deref(), Some("tok2"));
        assert_eq!(session.refresh_token.as_deref(), Some("ref2"));
        // Untouched fields survive
        assert_eq!(session.member_id.as_deref(), Some("7"));
        assert_eq!(session.nickname.as_deref(), Some("kimchi"));
    }

    #[test]
    fn test_replace_drops_fields_missing_from_new_session() {
        let store = MemorySessionStore::with_session(Session {
            profile_image: Some("old.png".to_string()),
            ..logged_in()
        });
        let next = Session {
            member_id: Some("8".to_string()),
            access_token: Some("tok8".to_string()),
            ..Session::default()
        };
        store.replace(&next);

        assert_eq!(store.get(), next);
        assert!(store.get().profile_image.is_none());
        assert!(store.get().refresh_token.is_none());
        assert!(store.is_authenticated());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let store = MemorySessionStore::with_session(logged_in());
        store.clear();
        let once = store.get();
        store.clear();
        let twice = store.get();

        assert_eq!(once, twice);
        assert!(twice.is_empty());
        assert!(twice.member_id.is_none());
        assert!(twice.access_token.is_none());
        assert!(twice.refresh_token.is_none());
        assert!(!store.is_authenticated());
    }

    #[test]
    fn test_session_json_uses_camel_case_keys() {
        let json = serde_json::to_value(logged_in()).unwrap();
        assert_eq!(json["memberId"], "7");
        assert_eq!(json["accessToken"], "tok");
        assert!(json.get("profileImage").is_none());

        let parsed: Session = serde_json::from_str(r#"{"memberId":"3"}"#).unwrap();
        assert_eq!(parsed.member_id.as_deref(), Some("3"));
        assert!(parsed.access_token.is_none());
    }
}
