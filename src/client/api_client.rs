use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderValue, ACCEPT};
use http::StatusCode;
use reqwest::Response;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, info_span, warn, Instrument};

use super::{ApiRequest, ClientError, Payload};
use crate::config::{ApiConfig, PayloadEncoding};
use crate::models::{TokenKind, TokenPair};
use crate::store::TokenStore;
use crate::utils::LogThrottle;

const REQUEST_ID_HEADER: &str = "x-request-id";
const REFRESH_WARNING_WINDOW: Duration = Duration::from_secs(30);

/// Receives the end of a session the client could not recover.
///
/// Called after the token store has been cleared because a refresh failed.
#[async_trait]
pub trait SessionListener: Send + Sync {
    async fn session_terminated(&self, reason: &str);
}

/// Body of the backend's health endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    pub version: semver::Version,
}

/// HTTP client bound to one backend and one token store.
pub struct ApiClient {
    http: reqwest::Client,
    config: ApiConfig,
    store: Arc<dyn TokenStore>,
    listener: Option<Arc<dyn SessionListener>>,
    refresh_warnings: LogThrottle,
}

impl ApiClient {
    pub fn new(config: &ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(Duration::from_millis(config.timeout_in_ms))
            .build()?;

        Ok(ApiClient {
            http,
            config: config.clone(),
            store,
            listener: None,
            refresh_warnings: LogThrottle::new(REFRESH_WARNING_WINDOW),
        })
    }

    /// Register who gets told when a failed refresh ends the session.
    pub fn with_listener(mut self, listener: Arc<dyn SessionListener>) -> Self {
        self.listener = Some(listener);
        self
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn TokenStore> {
        &self.store
    }

    fn url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Build and send one attempt of `request`.
    ///
    /// Outbound stage: the bearer header is read from the store on every
    /// attempt, so a retry picks up a token stored by a refresh.
    async fn dispatch(&self, request: &ApiRequest) -> Result<Response, ClientError> {
        let mut builder = self
            .http
            .request(request.method.clone(), self.url(&request.path))
            .header(REQUEST_ID_HEADER, request.request_id.to_string());

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        builder = match &request.payload {
            Payload::Empty => builder,
            Payload::Json(value) => builder.json(value),
            Payload::Form(fields) => builder.form(fields),
        };

        if request.authenticated {
            match self
                .store
                .get(TokenKind::Access)
                .await
                .map_err(ClientError::Storage)?
            {
                Some(token) => builder = builder.bearer_auth(token),
                None => debug!("No access token stored, sending unauthenticated"),
            }
        }

        Ok(builder.send().await?)
    }

    /// Send `request` through the pipeline and return the successful response.
    ///
    /// Inbound stage: a 401 on an authenticated, not yet retried request
    /// triggers exactly one refresh. On refresh success the request is resent
    /// once and its outcome is returned as if it were the first attempt. On
    /// refresh failure the token store is cleared, the listener is notified
    /// and [`ClientError::RefreshExhausted`] is returned.
    pub async fn send(&self, mut request: ApiRequest) -> Result<Response, ClientError> {
        let span = info_span!(
            "api_request",
            request_id = %request.request_id,
            method = %request.method,
            path = %request.path,
        );

        async move {
            let response = self.dispatch(&request).await?;
            if response.status() != StatusCode::UNAUTHORIZED
                || !request.authenticated
                || request.retried
            {
                return error_for_status(response).await;
            }

            let original = ClientError::from_response(response).await;
            let refresh_token = match self
                .store
                .get(TokenKind::Refresh)
                .await
                .map_err(ClientError::Storage)?
            {
                Some(token) => token,
                None => {
                    debug!("Request rejected and no refresh token stored");
                    return Err(original);
                }
            };

            debug!("Request rejected, refreshing access token");
            let pair = match self.request_refresh(&refresh_token).await {
                Ok(pair) => pair,
                Err(e) => return Err(self.terminate(e).await),
            };
            // The stored access token is the rejected one.
            if let Err(e) = self.store.replace(&pair).await {
                return Err(self.terminate(ClientError::Storage(e)).await);
            }

            request.retried = true;
            debug!("Token refreshed, retrying request");
            let response = self.dispatch(&request).await?;
            error_for_status(response).await
        }
        .instrument(span)
        .await
    }

    /// Send and decode a JSON response body.
    pub async fn send_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<T, ClientError> {
        let response = self.send(request).await?;
        decode(response).await
    }

    /// Send and decode a JSON body if there is one (201/204 with no content yields `None`).
    pub async fn send_optional_json<T: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<T>, ClientError> {
        let response = self.send(request).await?;
        if response.status() == StatusCode::NO_CONTENT {
            return Ok(None);
        }
        let bytes = response.bytes().await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        serde_json::from_slice::<Option<T>>(&bytes)
            .map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send and discard the response body.
    pub async fn send_empty(&self, request: ApiRequest) -> Result<(), ClientError> {
        self.send(request).await.map(|_| ())
    }

    /// Exchange a refresh token for a new pair. This call is public: it never
    /// carries a bearer token and never recurses into the refresh flow.
    pub async fn request_refresh(&self, refresh_token: &str) -> Result<TokenPair, ClientError> {
        let request = ApiRequest::post(self.config.endpoints.refresh.clone()).public();
        let request = match self.config.refresh_encoding {
            PayloadEncoding::Json => {
                request.json(&serde_json::json!({ "refresh_token": refresh_token }))?
            }
            PayloadEncoding::Form => request.form(vec![(
                "refresh_token".to_string(),
                refresh_token.to_string(),
            )]),
            PayloadEncoding::Query => request.query("refresh_token", refresh_token),
        };

        let response = self.dispatch(&request).await?;
        let response = error_for_status(response).await?;
        decode(response).await
    }

    async fn terminate(&self, cause: ClientError) -> ClientError {
        if let Some(suppressed) = self.refresh_warnings.should_emit("client.refresh.failed") {
            warn!(
                suppressed_count = suppressed,
                "Token refresh failed, ending session: {}", cause
            );
        }

        if let Err(e) = self.store.clear().await {
            warn!("Failed to clear token store after refresh failure: {}", e);
        }

        let reason = cause.to_string();
        if let Some(listener) = &self.listener {
            listener.session_terminated(&reason).await;
        }
        ClientError::RefreshExhausted(reason)
    }

    /// Query the backend's health endpoint.
    pub async fn health(&self) -> Result<HealthStatus, ClientError> {
        self.send_json(ApiRequest::get("/health").public()).await
    }
}

async fn error_for_status(response: Response) -> Result<Response, ClientError> {
    if response.status().is_success() {
        Ok(response)
    } else {
        Err(ClientError::from_response(response).await)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ClientError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
}
