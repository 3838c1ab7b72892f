// tests/common/mod.rs
//! Shared helpers: a transport that replays scripted responses and records
//! every request it was handed.

#![allow(dead_code)]

use notion2table::{
    ApiRequest, ApiResponse, AuthToken, NotionApiClient, StaticToken, Transport,
};
use std::cell::RefCell;
use std::collections::VecDeque;

pub const DATABASE_ID: &str = "1234567890abcdef1234567890abcdef";

#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<ApiResponse>>,
    requests: RefCell<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    pub fn new(responses: impl IntoIterator<Item = ApiResponse>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().collect()),
            requests: RefCell::default(),
        }
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    pub fn remaining(&self) -> usize {
        self.responses.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(&self, request: &ApiRequest) -> ApiResponse {
        self.requests.borrow_mut().push(request.clone());
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| ApiResponse::new(500, r#"{"object":"error","code":"internal_server_error"}"#))
    }
}

pub fn client(responses: impl IntoIterator<Item = ApiResponse>) -> NotionApiClient<ScriptedTransport> {
    NotionApiClient::with_transport(ScriptedTransport::new(responses))
}

pub fn ok(body: &str) -> ApiResponse {
    ApiResponse::new(200, body)
}

pub fn token() -> StaticToken {
    StaticToken(AuthToken::new("ntn_integration_test").expect("test token is valid"))
}
