// src/scan/reader.rs
//! Cursor-driven pagination over a database query.
//!
//! The reader holds at most one page of row objects at a time. Pages are
//! fetched strictly in cursor order, each exactly once, and rows leave in
//! the order the page listed them. A reader is forward-only: once it is
//! exhausted (or has failed) a new one has to be built.

use crate::api::{NotionApiClient, Transport};
use crate::error::AppError;
use crate::json::{is_flag_set, member_array, member_string};
use crate::mapping::ReadSchema;
use crate::types::{AuthToken, CanonicalId, DataChunk, Row};

const QUERY_FAILED: &str = "Failed to query Notion database";

/// Where the reader is in its life cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanState {
    /// Nothing fetched yet.
    Init,
    /// A query is about to be (or being) issued.
    FetchingPage,
    /// Rows of the current page are being handed out.
    Draining,
    /// Terminal.
    Exhausted,
}

/// Pagination position: an opaque cursor plus the remote's has-more flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanCursor {
    pub next_cursor: String,
    pub has_more: bool,
}

impl ScanCursor {
    /// Position before the first page.
    pub fn start() -> Self {
        Self {
            next_cursor: String::new(),
            has_more: true,
        }
    }
}

impl Default for ScanCursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Raw row objects of one fetched page, in response order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowBatch {
    fragments: Vec<String>,
}

impl RowBatch {
    /// Collects the members of the response's top-level `results` array.
    pub fn from_response(body: &str) -> Self {
        Self {
            fragments: member_array(body, "results")
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.fragments.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fragments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

/// Incremental table scan over one database.
pub struct PaginatedReader<'a, T: Transport> {
    client: &'a NotionApiClient<T>,
    database_id: CanonicalId,
    token: AuthToken,
    data_source_id: String,
    schema: ReadSchema,
    cursor: ScanCursor,
    batch: RowBatch,
    position: usize,
    state: ScanState,
    pages_fetched: usize,
}

impl<'a, T: Transport> PaginatedReader<'a, T> {
    pub fn new(
        client: &'a NotionApiClient<T>,
        database_id: CanonicalId,
        token: AuthToken,
        schema: ReadSchema,
    ) -> Self {
        Self {
            client,
            database_id,
            token,
            data_source_id: String::new(),
            schema,
            cursor: ScanCursor::start(),
            batch: RowBatch::default(),
            position: 0,
            state: ScanState::Init,
            pages_fetched: 0,
        }
    }

    /// Restricts queries to one data source of the database.
    pub fn with_data_source(mut self, data_source_id: impl Into<String>) -> Self {
        self.data_source_id = data_source_id.into();
        self
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    pub fn cursor(&self) -> &ScanCursor {
        &self.cursor
    }

    pub fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    pub fn schema(&self) -> &ReadSchema {
        &self.schema
    }

    /// Pulls the next row, fetching pages as needed.
    ///
    /// `Ok(None)` means the scan is exhausted. Any error is fatal: the
    /// reader is exhausted afterwards.
    pub fn next_row(&mut self) -> Result<Option<Row>, AppError> {
        loop {
            match self.state {
                ScanState::Exhausted => return Ok(None),
                ScanState::Init | ScanState::FetchingPage => {
                    if let Err(e) = self.fetch_page() {
                        self.state = ScanState::Exhausted;
                        return Err(e);
                    }
                }
                ScanState::Draining => {
                    if let Some(fragment) = self.batch.get(self.position) {
                        self.position += 1;
                        return Ok(Some(self.schema.project(fragment)));
                    }
                    self.state = if self.cursor.has_more {
                        ScanState::FetchingPage
                    } else {
                        ScanState::Exhausted
                    };
                }
            }
        }
    }

    /// Pulls up to `max_rows` rows. An empty chunk means exhausted.
    pub fn next_chunk(&mut self, max_rows: usize) -> Result<DataChunk, AppError> {
        let mut chunk = DataChunk::new(self.schema.types());
        while chunk.len() < max_rows {
            match self.next_row()? {
                Some(row) => chunk.push(row),
                None => break,
            }
        }
        Ok(chunk)
    }

    fn fetch_page(&mut self) -> Result<(), AppError> {
        self.state = ScanState::FetchingPage;

        let used_cursor = std::mem::take(&mut self.cursor.next_cursor);
        let body = self
            .client
            .query_database(
                &self.database_id,
                &self.token,
                &used_cursor,
                &self.data_source_id,
            )
            .into_body(QUERY_FAILED)?;

        let mut has_more = is_flag_set(&body, "has_more");
        let mut next_cursor = String::new();
        if has_more {
            next_cursor = member_string(&body, "next_cursor")
                .unwrap_or_default()
                .to_string();
            if next_cursor.is_empty() || next_cursor == used_cursor {
                log::warn!(
                    "Query of {} reported more pages without a usable cursor; ending scan",
                    self.database_id
                );
                has_more = false;
                next_cursor.clear();
            }
        }

        self.batch = RowBatch::from_response(&body);
        self.position = 0;
        self.pages_fetched += 1;
        self.cursor = ScanCursor {
            next_cursor,
            has_more,
        };

        log::info!(
            "Fetched page {} of {}: {} rows (has_more: {})",
            self.pages_fetched,
            self.database_id,
            self.batch.len(),
            has_more
        );

        self.state = ScanState::Draining;
        Ok(())
    }
}

impl<T: Transport> Iterator for PaginatedReader<'_, T> {
    type Item = Result<Row, AppError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_row().transpose()
    }
}
