// src/lib.rs
//! notion2table library: exposes Notion databases as tables of rows.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling**: `AppError`, `NotionErrorCode`, `ValidationError`
//! - **Configuration**: `BridgeConfig`, `CommandLineInput`
//! - **Credentials**: `TokenProvider`, `TokenChain`, `SecretStore`
//! - **Domain types**: `CanonicalId`, `AuthToken`, `LogicalType`, `Value`
//! - **API client**: `NotionApiClient`, `Transport`, `TlsTransport`
//! - **JSON extraction**: `find_string`, `extract_array`, `extract_property`
//! - **Tables**: `TableScan`, `PaginatedReader`, `TableSink`

#[cfg(feature = "bench")]
pub mod api;
#[cfg(not(feature = "bench"))]
mod api;

mod auth;
mod config;
pub mod constants;
mod error;

#[cfg(feature = "bench")]
pub mod json;
#[cfg(not(feature = "bench"))]
mod json;

mod mapping;
mod scan;
mod sink;
mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode, Result};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{Action, BridgeConfig, CommandInput, CommandLineInput};

// --- Credentials ---
pub use crate::auth::{
    AuthError, EnvTokenProvider, Secret, SecretStore, StaticToken, TokenChain, TokenProvider,
};

// --- Domain Types ---
pub use crate::types::{
    AuthToken, CanonicalId, DataChunk, LogicalType, PropertyKind, PropertyName, Row, Value,
};

// --- API Client ---
pub use crate::api::{
    decode_response, encode_request, ApiRequest, ApiResponse, HttpMethod, NotionApiClient,
    TlsTransport, Transport,
};

// --- JSON Extraction ---
pub use crate::json::{
    escape, extract_array, extract_members, extract_objects, extract_property, find_bool,
    find_number, find_string, is_flag_set, locate_value, member_array, member_string,
};

// --- Property Mapping ---
pub use crate::mapping::{
    remote_properties, row_to_properties, ColumnSource, ReadColumn, ReadSchema, RemoteProperty,
};

// --- Tables ---
pub use crate::scan::{PaginatedReader, ReadOptions, RowBatch, ScanCursor, ScanState, TableScan};
pub use crate::sink::{TableSink, WriteOptions};
