// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role.

// ---------------------------------------------------------------------------
// Notion API surface
// ---------------------------------------------------------------------------

/// The only host this crate ever talks to.
pub const NOTION_API_HOST: &str = "api.notion.com";

/// HTTPS port.
pub const NOTION_API_PORT: u16 = 443;

/// Date-stamped API version sent on every request.
pub const NOTION_VERSION: &str = "2025-09-03";

/// Prefix shared by every endpoint path.
pub const NOTION_API_PREFIX: &str = "/v1";

// ---------------------------------------------------------------------------
// Credentials
// ---------------------------------------------------------------------------

/// Environment variable consulted after the secret store.
pub const NOTION_TOKEN_ENV: &str = "NOTION_TOKEN";

/// Secret type name under which the token is registered.
pub const NOTION_SECRET_TYPE: &str = "notion";

/// Key of the token inside a `notion` secret.
pub const NOTION_TOKEN_KEY: &str = "token";

// ---------------------------------------------------------------------------
// Scan boundaries
// ---------------------------------------------------------------------------

/// Rows handed to the caller per pull when no bound is given.
pub const STANDARD_CHUNK_SIZE: usize = 2048;

/// Both the table scan and the write sink run on a single thread.
pub const MAX_SCAN_PARALLELISM: usize = 1;

/// Fixed read schema: column names in output order.
pub const READ_COLUMNS: [&str; 4] = ["id", "title", "created_time", "last_edited_time"];

// ---------------------------------------------------------------------------
// Transport buffers (performance, not correctness)
// ---------------------------------------------------------------------------

/// Initial capacity for a response read buffer.
pub const RESPONSE_BUFFER_CAPACITY: usize = 16 * 1024;

/// Maximum characters shown when previewing response bodies in logs.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
