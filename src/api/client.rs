// src/api/client.rs
//! Endpoint wrapper for the Notion API.
//!
//! Builds the five supported calls and hands them to a [`Transport`]. It
//! attaches authentication and versioning headers and nothing else: no
//! retry, no interpretation of the response.

use super::transport::{TlsTransport, Transport};
use super::types::{ApiRequest, ApiResponse};
use crate::constants::{ERROR_BODY_PREVIEW_LENGTH, NOTION_API_PREFIX, NOTION_VERSION};
use crate::json::escape;
use crate::types::{AuthToken, CanonicalId};

/// A thin wrapper around a transport for Notion API requests.
#[derive(Debug, Clone, Default)]
pub struct NotionApiClient<T = TlsTransport> {
    transport: T,
}

impl NotionApiClient<TlsTransport> {
    /// Creates a client that talks to the public API host.
    pub fn new() -> Self {
        Self::with_transport(TlsTransport::new())
    }
}

impl<T: Transport> NotionApiClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self { transport }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `POST /v1/databases/{id}/query`
    pub fn query_database(
        &self,
        database_id: &CanonicalId,
        token: &AuthToken,
        start_cursor: &str,
        data_source_id: &str,
    ) -> ApiResponse {
        let mut fields = Vec::with_capacity(2);
        if !start_cursor.is_empty() {
            fields.push(format!("\"start_cursor\":\"{}\"", escape(start_cursor)));
        }
        if !data_source_id.is_empty() {
            fields.push(format!("\"data_source_id\":\"{}\"", escape(data_source_id)));
        }
        let body = format!("{{{}}}", fields.join(","));

        let path = format!("{}/databases/{}/query", NOTION_API_PREFIX, database_id);
        self.execute(ApiRequest::post(path, body), token)
    }

    /// `GET /v1/databases/{id}`
    pub fn get_database(&self, database_id: &CanonicalId, token: &AuthToken) -> ApiResponse {
        let path = format!("{}/databases/{}", NOTION_API_PREFIX, database_id);
        self.execute(ApiRequest::get(path), token)
    }

    /// `GET /v1/data_sources?database_id={id}`
    pub fn get_data_source(&self, database_id: &CanonicalId, token: &AuthToken) -> ApiResponse {
        let path = format!(
            "{}/data_sources?database_id={}",
            NOTION_API_PREFIX, database_id
        );
        self.execute(ApiRequest::get(path), token)
    }

    /// `POST /v1/pages` with `properties_json` as the page properties.
    pub fn create_page(
        &self,
        database_id: &CanonicalId,
        token: &AuthToken,
        properties_json: &str,
        data_source_id: &str,
    ) -> ApiResponse {
        let mut parent = format!("\"database_id\":\"{}\"", escape(database_id.as_str()));
        if !data_source_id.is_empty() {
            parent.push_str(&format!(",\"data_source_id\":\"{}\"", escape(data_source_id)));
        }
        let body = format!(
            "{{\"parent\":{{{}}},\"properties\":{}}}",
            parent, properties_json
        );

        let path = format!("{}/pages", NOTION_API_PREFIX);
        self.execute(ApiRequest::post(path, body), token)
    }

    /// `PATCH /v1/pages/{id}` replacing the given properties.
    pub fn update_page(
        &self,
        page_id: &CanonicalId,
        token: &AuthToken,
        properties_json: &str,
    ) -> ApiResponse {
        let body = format!("{{\"properties\":{}}}", properties_json);
        let path = format!("{}/pages/{}", NOTION_API_PREFIX, page_id);
        self.execute(ApiRequest::patch(path, body), token)
    }

    fn execute(&self, request: ApiRequest, token: &AuthToken) -> ApiResponse {
        let request = request
            .with_header("Authorization", format!("Bearer {}", token.as_str()))
            .with_header("Notion-Version", NOTION_VERSION);

        log::debug!("{} {}", request.method(), request.path());
        let response = self.transport.send(&request);
        log::debug!(
            "{} {} -> {} ({} bytes)",
            request.method(),
            request.path(),
            response.status_code,
            response.body.len()
        );
        if !response.success {
            log::debug!("Response body: {}", preview(&response.body));
        }
        response
    }
}

/// First `ERROR_BODY_PREVIEW_LENGTH` characters of a body, for logs.
fn preview(body: &str) -> &str {
    match body.char_indices().nth(ERROR_BODY_PREVIEW_LENGTH) {
        Some((end, _)) => &body[..end],
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::HttpMethod;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        requests: RefCell<Vec<ApiRequest>>,
    }

    impl Transport for Recorder {
        fn send(&self, request: &ApiRequest) -> ApiResponse {
            self.requests.borrow_mut().push(request.clone());
            ApiResponse::new(200, "{}")
        }
    }

    fn fixtures() -> (CanonicalId, AuthToken) {
        (
            CanonicalId::resolve("1234567890abcdef1234567890abcdef"),
            AuthToken::new("ntn_test_token").unwrap(),
        )
    }

    fn last(client: &NotionApiClient<Recorder>) -> ApiRequest {
        client
            .transport()
            .requests
            .borrow()
            .last()
            .cloned()
            .unwrap()
    }

    #[test]
    fn test_query_body_fields_only_when_present() {
        let (id, token) = fixtures();
        let client = NotionApiClient::with_transport(Recorder::default());

        client.query_database(&id, &token, "", "");
        let request = last(&client);
        assert_eq!(request.method(), HttpMethod::Post);
        assert_eq!(
            request.path(),
            "/v1/databases/1234567890abcdef1234567890abcdef/query"
        );
        assert_eq!(request.body(), "{}");

        client.query_database(&id, &token, "abc", "");
        assert_eq!(last(&client).body(), r#"{"start_cursor":"abc"}"#);

        client.query_database(&id, &token, "abc", "ds1");
        assert_eq!(
            last(&client).body(),
            r#"{"start_cursor":"abc","data_source_id":"ds1"}"#
        );

        client.query_database(&id, &token, "", "ds1");
        assert_eq!(last(&client).body(), r#"{"data_source_id":"ds1"}"#);
    }

    #[test]
    fn test_auth_and_version_headers() {
        let (id, token) = fixtures();
        let client = NotionApiClient::with_transport(Recorder::default());

        client.get_database(&id, &token);
        let request = last(&client);
        assert_eq!(request.method(), HttpMethod::Get);
        assert_eq!(request.header("Authorization"), Some("Bearer ntn_test_token"));
        assert_eq!(request.header("Notion-Version"), Some(NOTION_VERSION));
        assert_eq!(request.body(), "");
    }

    #[test]
    fn test_data_source_path() {
        let (id, token) = fixtures();
        let client = NotionApiClient::with_transport(Recorder::default());

        client.get_data_source(&id, &token);
        assert_eq!(
            last(&client).path(),
            "/v1/data_sources?database_id=1234567890abcdef1234567890abcdef"
        );
    }

    #[test]
    fn test_create_and_update_page_bodies() {
        let (id, token) = fixtures();
        let client = NotionApiClient::with_transport(Recorder::default());
        let properties = r#"{"Column0":{"title":[]}}"#;

        client.create_page(&id, &token, properties, "");
        let request = last(&client);
        assert_eq!(request.path(), "/v1/pages");
        assert_eq!(
            request.body(),
            r#"{"parent":{"database_id":"1234567890abcdef1234567890abcdef"},"properties":{"Column0":{"title":[]}}}"#
        );

        client.create_page(&id, &token, properties, "ds1");
        assert_eq!(
            last(&client).body(),
            r#"{"parent":{"database_id":"1234567890abcdef1234567890abcdef","data_source_id":"ds1"},"properties":{"Column0":{"title":[]}}}"#
        );

        client.update_page(&id, &token, properties);
        let request = last(&client);
        assert_eq!(request.method(), HttpMethod::Patch);
        assert_eq!(request.path(), "/v1/pages/1234567890abcdef1234567890abcdef");
        assert_eq!(request.body(), r#"{"properties":{"Column0":{"title":[]}}}"#);
    }
}
