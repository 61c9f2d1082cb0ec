use std::sync::Arc;

use crate::client::{ApiClient, ApiRequest, ClientError};
use crate::models::{UserSearchResponse, UserStats};

/// Admin dashboard calls. The backend enforces the admin role; a non-admin
/// caller gets a 403 surfaced as [`ClientError::Http`].
#[derive(Clone)]
pub struct AdminService {
    client: Arc<ApiClient>,
}

impl AdminService {
    pub fn new(client: Arc<ApiClient>) -> Self {
        AdminService { client }
    }

    pub async fn search_users(
        &self,
        query: &str,
        page: u32,
        page_size: u32,
    ) -> Result<UserSearchResponse, ClientError> {
        if page == 0 || page_size == 0 {
            return Err(ClientError::Validation(
                "page and page_size start at 1".into(),
            ));
        }
        let request = ApiRequest::get("/admin/users")
            .query("query", query)
            .query("page", page)
            .query("page_size", page_size);
        self.client.send_json(request).await
    }

    pub async fn stats(&self) -> Result<UserStats, ClientError> {
        self.client.send_json(ApiRequest::get("/admin/stats")).await
    }

    pub async fn delete_user(&self, user_id: i64) -> Result<(), ClientError> {
        self.client
            .send_empty(ApiRequest::delete(format!("/admin/users/{}", user_id)))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ApiConfig;
    use crate::store::MemoryStore;
    use mockito::{Matcher, Server};

    fn service(url: String) -> AdminService {
        let client = ApiClient::new(&ApiConfig::new(url), Arc::new(MemoryStore::default())).unwrap();
        AdminService::new(Arc::new(client))
    }

    #[tokio::test]
    async fn test_search_users_sends_paging() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("GET", "/admin/users")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("query".into(), "rei".into()),
                Matcher::UrlEncoded("page".into(), "2".into()),
                Matcher::UrlEncoded("page_size".into(), "10".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"users": [{"id": 3, "email": "rei@example.com", "name": "Rei"}], "total": 11, "page": 2, "page_size": 10, "total_pages": 2}"#,
            )
            .create_async()
            .await;

        let page = service(server.url()).search_users("rei", 2, 10).await.unwrap();
        m.assert_async().await;
        assert_eq!(page.total, 11);
        assert_eq!(page.users[0].id, 3);
    }

    #[tokio::test]
    async fn test_forbidden_surfaces_as_http_error() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", "/admin/stats")
            .with_status(403)
            .with_body(r#"{"detail": "Not enough permissions"}"#)
            .create_async()
            .await;

        let err = service(server.url()).stats().await.unwrap_err();
        assert!(matches!(err, ClientError::Http { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", "/admin/users/42")
            .with_status(204)
            .create_async()
            .await;

        service(server.url()).delete_user(42).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_zero_page_is_rejected() {
        let server = Server::new_async().await;
        assert!(matches!(
            service(server.url()).search_users("x", 0, 10).await,
            Err(ClientError::Validation(_))
        ));
    }
}
