// src/api/types.rs
//! Request and response values exchanged with the transport.

use crate::error::{AppError, NotionErrorCode};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One outbound call. Only POST and PATCH carry a body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    body: Option<String>,
}

impl ApiRequest {
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            path: path.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    pub fn post(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn patch(path: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Patch,
            path: path.into(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// The body, or `""` when there is none.
    pub fn body(&self) -> &str {
        self.body.as_deref().unwrap_or("")
    }
}

/// One inbound result.
///
/// `status_code` is 0 when no response was received at all; `success`
/// holds exactly when the status is 2xx.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status_code: u16,
    pub body: String,
    pub success: bool,
}

impl ApiResponse {
    pub fn new(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            status_code,
            body: body.into(),
            success: (200..300).contains(&status_code),
        }
    }

    /// A call that produced no parseable response.
    pub fn transport_failure(description: impl Into<String>) -> Self {
        Self {
            status_code: 0,
            body: description.into(),
            success: false,
        }
    }

    pub fn is_transport_failure(&self) -> bool {
        self.status_code == 0
    }

    /// Returns the body of a successful response, or the failure it carries.
    pub fn into_body(self, context: &'static str) -> Result<String, AppError> {
        if self.success {
            return Ok(self.body);
        }
        if self.is_transport_failure() {
            return Err(AppError::Transport {
                context,
                message: self.body,
            });
        }
        Err(AppError::Http {
            context,
            status: self.status_code,
            code: NotionErrorCode::from_error_body(&self.body, self.status_code),
            body: self.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(ApiResponse::new(200, "").success);
        assert!(ApiResponse::new(299, "").success);
        assert!(!ApiResponse::new(199, "").success);
        assert!(!ApiResponse::new(300, "").success);
        assert!(!ApiResponse::new(302, "").success);
        assert!(!ApiResponse::transport_failure("x").success);
    }

    #[test]
    fn test_into_body_classification() {
        assert_eq!(
            ApiResponse::new(200, "{}").into_body("ctx").unwrap(),
            "{}"
        );

        let err = ApiResponse::transport_failure("Failed to connect to Notion API")
            .into_body("Failed to query Notion database")
            .unwrap_err();
        assert!(matches!(err, AppError::Transport { .. }));

        let err = ApiResponse::new(401, r#"{"code":"unauthorized"}"#)
            .into_body("Failed to query Notion database")
            .unwrap_err();
        match err {
            AppError::Http { status, code, .. } => {
                assert_eq!(status, 401);
                assert_eq!(code, NotionErrorCode::Unauthorized);
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_request_body_only_on_writes() {
        assert_eq!(ApiRequest::get("/v1/databases/x").body(), "");
        assert_eq!(ApiRequest::post("/v1/pages", "{}").body(), "{}");
        let request = ApiRequest::get("/x").with_header("Notion-Version", "v");
        assert_eq!(request.header("notion-version"), Some("v"));
    }
}
