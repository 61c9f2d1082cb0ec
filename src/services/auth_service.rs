use std::sync::Arc;

use tracing::{debug, info, warn};

use super::validation::{validate_registration, validate_update};
use crate::client::{ApiClient, ApiRequest, ClientError};
use crate::config::PayloadEncoding;
use crate::models::{Credentials, NewUser, TokenKind, TokenPair, User, UserUpdate};
use crate::store::TokenStore;

/// Login, registration and profile calls over the authenticated pipeline.
#[derive(Clone)]
pub struct AuthService {
    client: Arc<ApiClient>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AuthService { client }
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    fn store(&self) -> &Arc<dyn TokenStore> {
        self.client.store()
    }

    /// Exchange credentials for tokens, persist them, and return the profile.
    ///
    /// The new pair replaces whatever was stored, refresh slot included. If
    /// the profile fetch fails the previous tokens are put back, so a failed
    /// login leaves the store exactly as it found it.
    pub async fn login(&self, credentials: &Credentials) -> Result<User, ClientError> {
        let config = self.client.config();
        let request = ApiRequest::post(config.endpoints.login.clone()).public();
        let request = match config.login_encoding {
            PayloadEncoding::Json => request.json(&serde_json::json!({
                "email": credentials.email,
                "password": credentials.password,
            }))?,
            PayloadEncoding::Form => request.form(vec![
                ("username".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ]),
            PayloadEncoding::Query => request
                .query("username", &credentials.email)
                .query("password", &credentials.password),
        };

        let pair: TokenPair = match self.client.send_json(request).await {
            Ok(pair) => pair,
            Err(ClientError::Authentication(_)) => {
                info!("Login rejected for '{}'", credentials.email);
                return Err(ClientError::Authentication(
                    "Invalid email or password".to_string(),
                ));
            }
            Err(e) => return Err(e),
        };

        let previous = self.snapshot().await?;
        self.store()
            .overwrite(&pair)
            .await
            .map_err(ClientError::Storage)?;
        debug!("Tokens stored for '{}'", credentials.email);

        match self.get_profile().await {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!("Profile fetch after login failed: {}", e);
                self.restore(previous).await;
                Err(e)
            }
        }
    }

    async fn snapshot(&self) -> Result<(Option<String>, Option<String>), ClientError> {
        let store = self.store();
        let access = store
            .get(TokenKind::Access)
            .await
            .map_err(ClientError::Storage)?;
        let refresh = store
            .get(TokenKind::Refresh)
            .await
            .map_err(ClientError::Storage)?;
        Ok((access, refresh))
    }

    /// Put back the slots captured by [`AuthService::snapshot`].
    async fn restore(&self, previous: (Option<String>, Option<String>)) {
        let store = self.store();
        let result = match previous {
            (Some(access), refresh) => store.overwrite(&TokenPair::new(access, refresh)).await,
            (None, None) => store.clear().await,
            (None, Some(refresh)) => match store.clear().await {
                Ok(()) => store.set(TokenKind::Refresh, &refresh).await,
                Err(e) => Err(e),
            },
        };
        if let Err(e) = result {
            warn!("Failed to restore token store: {}", e);
        }
    }

    /// Create an account. Never stores tokens; callers log in afterwards.
    pub async fn register(&self, new_user: &NewUser) -> Result<Option<User>, ClientError> {
        let config = self.client.config();
        validate_registration(new_user, config.minimum_age)?;

        let request = ApiRequest::post(config.endpoints.register.clone())
            .public()
            .json(new_user)?;
        let created = self.client.send_optional_json(request).await?;
        info!("Registered account for '{}'", new_user.email);
        Ok(created)
    }

    pub async fn get_profile(&self) -> Result<User, ClientError> {
        let path = self.client.config().endpoints.profile.clone();
        self.client.send_json(ApiRequest::get(path)).await
    }

    /// Send only the changed fields; the backend answers with the full user.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, ClientError> {
        validate_update(update)?;
        let path = self.client.config().endpoints.profile.clone();
        self.client
            .send_json(ApiRequest::put(path).json(update)?)
            .await
    }

    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        self.client.request_refresh(refresh_token).await
    }

    /// Delete the current account on the backend.
    pub async fn delete_account(&self) -> Result<(), ClientError> {
        let path = self.client.config().endpoints.profile.clone();
        self.client.send_empty(ApiRequest::delete(path)).await
    }

    /// Local only: forget both tokens. No request is made.
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.store().clear().await.map_err(ClientError::Storage)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::store::MemoryStore;
    use mockito::{Matcher, Server};

    const USER_BODY: &str = r#"{"id": 1, "name": "Rei", "email": "a@b.com", "age": 20, "is_admin": false, "is_active": true}"#;

    fn service(config: ApiConfig) -> (AuthService, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::default());
        let client = ApiClient::new(&config, store.clone()).unwrap();
        (AuthService::new(Arc::new(client)), store)
    }

    #[tokio::test]
    async fn test_login_form_encoded_stores_tokens_and_fetches_profile() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/token")
            .match_header("content-type", "application/x-www-form-urlencoded")
            .match_body(Matcher::AllOf(vec![
                Matcher::UrlEncoded("username".into(), "a@b.com".into()),
                Matcher::UrlEncoded("password".into(), "pw".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"access_token": "abc", "refresh_token": "xyz", "token_type": "bearer"}"#)
            .create_async()
            .await;
        let profile = server
            .mock("GET", "/users/me")
            .match_header("authorization", "Bearer abc")
            .with_status(200)
            .with_body(USER_BODY)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        let user = auth
            .login(&Credentials::new("a@b.com", "pw"))
            .await
            .expect("login should succeed");

        login.assert_async().await;
        profile.assert_async().await;
        assert_eq!(user.email, "a@b.com");
        assert_eq!(store.get(TokenKind::Access).await, Ok(Some("abc".into())));
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(Some("xyz".into())));
    }

    #[tokio::test]
    async fn test_login_json_encoded() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/auth/login")
            .match_body(Matcher::Json(
                serde_json::json!({"email": "a@b.com", "password": "pw"}),
            ))
            .with_status(200)
            .with_body(r#"{"accessToken": "abc"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/users/me")
            .with_status(200)
            .with_body(USER_BODY)
            .create_async()
            .await;

        let mut config = ApiConfig::new(server.url());
        config.login_encoding = PayloadEncoding::Json;
        config.endpoints.login = "/auth/login".to_string();
        let (auth, store) = service(config);

        auth.login(&Credentials::new("a@b.com", "pw")).await.unwrap();
        login.assert_async().await;
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(None));
    }

    #[tokio::test]
    async fn test_login_rejected_is_authentication_error_and_stores_nothing() {
        let mut server = Server::new_async().await;
        let login = server
            .mock("POST", "/token")
            .with_status(401)
            .with_body(r#"{"detail": "Invalid credentials"}"#)
            .expect(1)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        let err = auth
            .login(&Credentials::new("a@b.com", "wrong"))
            .await
            .expect_err("login should fail");

        login.assert_async().await;
        assert!(matches!(err, ClientError::Authentication(ref m) if m == "Invalid email or password"));
        assert_eq!(store.get(TokenKind::Access).await, Ok(None));
    }

    #[tokio::test]
    async fn test_login_clears_tokens_when_profile_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token": "abc", "refresh_token": "xyz"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/users/me")
            .with_status(500)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        let err = auth.login(&Credentials::new("a@b.com", "pw")).await;

        assert!(matches!(err, Err(ClientError::Http { status: 500, .. })));
        assert_eq!(store.get(TokenKind::Access).await, Ok(None));
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(None));
    }

    #[tokio::test]
    async fn test_login_without_refresh_token_drops_the_previous_one() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token": "b1"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/users/me")
            .match_header("authorization", "Bearer b1")
            .with_status(200)
            .with_body(USER_BODY)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        store
            .replace(&TokenPair::new("a1", Some("refresh-of-previous-user".into())))
            .await
            .unwrap();

        auth.login(&Credentials::new("a@b.com", "pw")).await.unwrap();

        assert_eq!(store.get(TokenKind::Access).await, Ok(Some("b1".into())));
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(None));
    }

    #[tokio::test]
    async fn test_failed_relogin_restores_previous_tokens() {
        let mut server = Server::new_async().await;
        server
            .mock("POST", "/token")
            .with_status(200)
            .with_body(r#"{"access_token": "b1", "refresh_token": "rb"}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/users/me")
            .match_header("authorization", "Bearer b1")
            .with_status(500)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        store
            .replace(&TokenPair::new("a1", Some("ra".into())))
            .await
            .unwrap();

        let err = auth.login(&Credentials::new("a@b.com", "pw")).await;

        assert!(matches!(err, Err(ClientError::Http { status: 500, .. })));
        assert_eq!(store.get(TokenKind::Access).await, Ok(Some("a1".into())));
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(Some("ra".into())));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_is_validation_error() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/users")
            .match_body(Matcher::PartialJson(
                serde_json::json!({"email": "a@b.com", "name": "Rei", "age": 20}),
            ))
            .with_status(400)
            .with_body(r#"{"detail": "Email already registered"}"#)
            .create_async()
            .await;

        let (auth, store) = service(ApiConfig::new(server.url()));
        let err = auth
            .register(&NewUser {
                name: "Rei".into(),
                email: "a@b.com".into(),
                password: "Str0ng!pass".into(),
                confirm_password: "Str0ng!pass".into(),
                age: Some(20),
            })
            .await
            .expect_err("duplicate should fail");

        m.assert_async().await;
        assert!(matches!(err, ClientError::Validation(ref msg) if msg == "Email already registered"));
        assert_eq!(store.get(TokenKind::Access).await, Ok(None));
    }

    #[tokio::test]
    async fn test_register_rejects_locally_without_request() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/users")
            .expect(0)
            .create_async()
            .await;

        let (auth, _) = service(ApiConfig::new(server.url()));
        let err = auth
            .register(&NewUser {
                name: "Rei".into(),
                email: "a@b.com".into(),
                password: "Str0ng!pass".into(),
                confirm_password: "different".into(),
                age: None,
            })
            .await;

        m.assert_async().await;
        assert!(matches!(err, Err(ClientError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_profile_sends_only_changed_fields() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("PUT", "/users/me")
            .match_body(Matcher::Json(serde_json::json!({"name": "Ayanami"})))
            .with_status(200)
            .with_body(r#"{"id": 1, "name": "Ayanami", "email": "a@b.com", "is_admin": false}"#)
            .create_async()
            .await;

        let (auth, _) = service(ApiConfig::new(server.url()));
        let user = auth
            .update_profile(&UserUpdate {
                name: Some("Ayanami".into()),
                ..Default::default()
            })
            .await
            .unwrap();

        m.assert_async().await;
        assert_eq!(user.name, "Ayanami");
    }

    #[tokio::test]
    async fn test_logout_is_local() {
        let server = Server::new_async().await;
        let (auth, store) = service(ApiConfig::new(server.url()));
        store
            .replace(&TokenPair::new("abc", Some("xyz".into())))
            .await
            .unwrap();

        auth.logout().await.unwrap();
        assert_eq!(store.get(TokenKind::Access).await, Ok(None));
        assert_eq!(store.get(TokenKind::Refresh).await, Ok(None));
    }
}
