use http::Method;
use serde::Serialize;
use serde_json::Value;
use uuid::Uuid;

use super::ClientError;

/// Request body variants the pipeline knows how to send (and resend).
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Empty,
    Json(Value),
    Form(Vec<(String, String)>),
}

/// A request description that can be dispatched more than once.
///
/// The pipeline rebuilds the wire request from this on every attempt, so a
/// retry after refresh carries the new bearer token.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) payload: Payload,
    pub(crate) authenticated: bool,
    pub(crate) retried: bool,
    pub(crate) request_id: Uuid,
}

impl ApiRequest {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        ApiRequest {
            method,
            path: path.into(),
            query: Vec::new(),
            payload: Payload::Empty,
            authenticated: true,
            retried: false,
            request_id: Uuid::new_v4(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Send without a bearer token and never enter the refresh flow.
    pub fn public(mut self) -> Self {
        self.authenticated = false;
        self
    }

    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self, ClientError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ClientError::Decode(format!("Failed to encode request body: {}", e)))?;
        self.payload = Payload::Json(value);
        Ok(self)
    }

    pub fn form(mut self, fields: Vec<(String, String)>) -> Self {
        self.payload = Payload::Form(fields);
        self
    }

    pub fn query(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn is_retried(&self) -> bool {
        self.retried
    }

    pub fn request_id(&self) -> Uuid {
        self.request_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let req = ApiRequest::get("/users/me");
        assert_eq!(req.method(), &Method::GET);
        assert!(req.is_authenticated());
        assert!(!req.is_retried());
        assert_eq!(req.payload(), &Payload::Empty);
    }

    #[test]
    fn test_public_json_request() {
        let req = ApiRequest::post("/users")
            .public()
            .json(&serde_json::json!({"email": "a@b.com"}))
            .unwrap()
            .query("page", 2);
        assert!(!req.is_authenticated());
        assert_eq!(req.query, vec![("page".to_string(), "2".to_string())]);
        assert_eq!(
            req.payload(),
            &Payload::Json(serde_json::json!({"email": "a@b.com"}))
        );
    }

    #[test]
    fn test_each_request_gets_its_own_id() {
        assert_ne!(
            ApiRequest::get("/").request_id(),
            ApiRequest::get("/").request_id()
        );
    }
}
