#![allow(dead_code)]

use std::sync::Arc;

use animerec::config::{parse_config, ConfigV1};
use animerec::models::TokenPair;
use animerec::session::Session;
use animerec::startup;
use animerec::state::AppState;
use animerec::store::{MemoryStore, TokenStore};

pub const MEMBER_JSON: &str =
    r#"{"id": 1, "name": "Rei", "email": "a@b.com", "age": 20, "is_admin": false, "is_active": true}"#;

pub const ADMIN_JSON: &str =
    r#"{"id": 7, "name": "Gendo", "email": "root@nerv.jp", "age": 48, "is_admin": true, "is_active": true}"#;

pub fn test_config(base_url: &str) -> ConfigV1 {
    parse_config(&format!(
        r#"
version: "1.0.0"
api:
  base_url: "{}"
  timeout_in_ms: 3000
logging:
  level: "debug"
"#,
        base_url
    ))
    .expect("test config should parse")
}

/// A session over an in-memory store the test can inspect.
pub fn build_session(base_url: &str) -> (Session, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::default());
    let config = test_config(base_url);
    let session = Session::new(&config.api, store.clone()).expect("failed to build session");
    (session, store)
}

/// The full application wired by startup, using the default in-memory store.
pub fn build_app(base_url: &str) -> AppState {
    startup::build(Arc::new(test_config(base_url))).expect("failed to build app")
}

pub async fn seed_tokens(store: &dyn TokenStore, access: &str, refresh: Option<&str>) {
    store
        .replace(&TokenPair::new(access, refresh.map(str::to_string)))
        .await
        .expect("failed to seed tokens");
}
