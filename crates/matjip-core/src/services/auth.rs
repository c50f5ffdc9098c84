use reqwest::Method;
use tracing::info;

use crate::api::{endpoints, RequestClient, RequestError};
use crate::models::{LoginRequest, LoginResponse, Member, SignupRequest};

impl RequestClient {
    /// Log in and replace the stored session with the new member's.
    ///
    /// Bad credentials come back as an `Api` error; the current session is
    /// left alone in that case.
    pub async fn login(&self, email: &str, password: &str) -> Result<Member, RequestError> {
        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: LoginResponse = self
            .send_public_json(Method::POST, endpoints::MEMBER_LOGIN, Some(&request))
            .await?;

        self.session().replace(&response.to_session());
        info!(member_id = response.member.id, "Logged in");

        Ok(response.member)
    }

    pub fn logout(&self) {
        self.session().clear();
        info!("Logged out");
    }

    pub async fn signup(&self, request: &SignupRequest) -> Result<Member, RequestError> {
        self.send_public_json(Method::POST, endpoints::MEMBERS, Some(request))
            .await
    }

    /// True if the email is already registered.
    pub async fn is_email_taken(&self, email: &str) -> Result<bool, RequestError> {
        let path = endpoints::with_query(endpoints::CHECK_EMAIL, "email", email);
        self.send_public_json(Method::GET, &path, None::<&()>).await
    }

    /// True if the nickname is already in use.
    pub async fn is_nickname_taken(&self, nickname: &str) -> Result<bool, RequestError> {
        let path = endpoints::with_query(endpoints::CHECK_NICKNAME, "nickname", nickname);
        self.send_public_json(Method::GET, &path, None::<&()>).await
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use std::sync::{Arc, Mutex};

    use crate::auth::{MemorySessionStore, Session, SessionStore};
    use crate::services::test_support::{client_with, member_session};
    use crate::{ClientConfig, RequestClient};

    /// Records the session left behind by every write.
    #[derive(Default)]
    struct RecordingStore {
        inner: MemorySessionStore,
        states: Mutex<Vec<Session>>,
    }

    impl RecordingStore {
        fn record(&self) {
            self.states.lock().unwrap().push(self.inner.get());
        }
    }

    impl SessionStore for RecordingStore {
        fn get(&self) -> Session {
            self.inner.get()
        }

        fn set(&self, update: &Session) {
            self.inner.set(update);
            self.record();
        }

        fn replace(&self, session: &Session) {
            self.inner.replace(session);
            self.record();
        }

        fn clear(&self) {
            self.inner.clear();
            self.record();
        }
    }

    #[tokio::test]
    async fn test_login_writes_whole_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/members/login"))
            .and(body_json(json!({ "email": "new@example.com", "password": "pw" })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "a1",
                "refreshToken": "r1",
                "member": { "id": 9, "email": "new@example.com", "nickname": "sundae" }
            })))
            .mount(&server)
            .await;

        // A stale profile image from a previous member must not survive
        let mut previous = member_session("3");
        previous.profile_image = Some("/old.png".to_string());
        let (client, store) = client_with(&server, previous);

        let member = client.login("new@example.com", "pw").await.unwrap();

        assert_eq!(member.id, 9);
        let session = store.get();
        assert_eq!(session.member_id.as_deref(), Some("9"));
        assert_eq!(session.access_token.as_deref(), Some("a1"));
        assert_eq!(session.nickname.as_deref(), Some("sundae"));
        assert!(session.profile_image.is_none());
    }

    #[tokio::test]
    async fn test_login_never_exposes_anonymous_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/members/login"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "accessToken": "a2",
                "refreshToken": "r2",
                "member": { "id": 10, "email": "b@example.com", "nickname": "japchae" }
            })))
            .mount(&server)
            .await;

        let store = Arc::new(RecordingStore::default());
        store.inner.replace(&member_session("3"));
        let client = RequestClient::new(&ClientConfig::new(server.uri()), store.clone()).unwrap();

        client.login("b@example.com", "pw").await.unwrap();

        let states = store.states.lock().unwrap();
        assert_eq!(states.len(), 1);
        assert!(states.iter().all(|s| s.is_authenticated()));
        assert_eq!(states[0].member_id.as_deref(), Some("10"));
    }

    #[tokio::test]
    async fn test_failed_login_keeps_session() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/members/login"))
            .respond_with(
                ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid password" })),
            )
            .mount(&server)
            .await;

        let (client, store) = client_with(&server, member_session("3"));
        let err = client.login("a@example.com", "wrong").await.unwrap_err();

        assert_eq!(err.to_string(), "Invalid password");
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_clears_session() {
        let server = MockServer::start().await;
        let (client, store) = client_with(&server, member_session("3"));
        client.logout();
        assert_eq!(store.get(), Session::default());
    }

    #[tokio::test]
    async fn test_duplicate_checks() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/members/check-email"))
            .and(query_param("email", "a+b@example.com"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(true)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/members/check-nickname"))
            .and(query_param("nickname", "순대"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!(false)))
            .mount(&server)
            .await;

        let (client, _) = client_with(&server, Session::default());
        assert!(client.is_email_taken("a+b@example.com").await.unwrap());
        assert!(!client.is_nickname_taken("순대").await.unwrap());
    }
}
