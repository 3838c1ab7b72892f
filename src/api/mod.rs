// src/api/mod.rs
//! Notion API interaction over a hand-built HTTPS transport.
//!
//! `client` knows the endpoints, `transport` knows the wire, and `types`
//! holds the values passed between them.

pub mod client;
pub mod transport;
mod types;

pub use client::NotionApiClient;
pub use transport::{decode_response, encode_request, TlsTransport, Transport};
pub use types::{ApiRequest, ApiResponse, HttpMethod};
