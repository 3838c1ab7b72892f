// src/sink.rs
//! Writing rows into a database, one page per row.

use crate::api::{NotionApiClient, TlsTransport, Transport};
use crate::auth::TokenProvider;
use crate::error::{AppError, Result};
use crate::mapping::row_to_properties;
use crate::types::{AuthToken, CanonicalId, DataChunk, LogicalType, PropertyName, Value};

const WRITE_FAILED: &str = "Failed to write row to Notion";
const UPDATE_FAILED: &str = "Failed to update Notion page";

#[derive(Debug, Clone, Default)]
pub struct WriteOptions {
    /// Parent data source for created pages.
    pub data_source_id: Option<String>,
}

/// A database bound for writing.
///
/// Rows are created one request at a time, in order. There is no
/// transaction: when a row fails, the rows before it stay written.
#[derive(Debug)]
pub struct TableSink<T = TlsTransport> {
    client: NotionApiClient<T>,
    database_id: CanonicalId,
    token: AuthToken,
    data_source_id: String,
    rows_written: usize,
}

impl<T: Transport> TableSink<T> {
    pub fn bind(
        destination: &str,
        provider: &dyn TokenProvider,
        client: NotionApiClient<T>,
        options: WriteOptions,
    ) -> Result<Self> {
        let database_id = CanonicalId::resolve(destination);
        if database_id.as_str().is_empty() {
            return Err(AppError::InvalidInput(
                "destination database id or URL is empty".to_string(),
            ));
        }
        let token = provider.token()?;
        log::info!("Writing to Notion database {}", database_id);

        Ok(Self {
            client,
            database_id,
            token,
            data_source_id: options.data_source_id.unwrap_or_default(),
            rows_written: 0,
        })
    }

    pub fn database_id(&self) -> &CanonicalId {
        &self.database_id
    }

    pub fn rows_written(&self) -> usize {
        self.rows_written
    }

    pub fn client(&self) -> &NotionApiClient<T> {
        &self.client
    }

    /// Creates one page per row of `chunk`, stopping at the first failure.
    pub fn sink(&mut self, chunk: &DataChunk) -> Result<usize> {
        let names: Vec<PropertyName> = (0..chunk.column_count())
            .map(PropertyName::positional)
            .collect();

        for row in &chunk.rows {
            check_width(&chunk.types, row)?;
            let properties = row_to_properties(&names, &chunk.types, row);
            self.client
                .create_page(
                    &self.database_id,
                    &self.token,
                    &properties,
                    &self.data_source_id,
                )
                .into_body(WRITE_FAILED)?;
            self.rows_written += 1;
        }

        log::debug!(
            "Wrote {} rows to {} ({} total)",
            chunk.len(),
            self.database_id,
            self.rows_written
        );
        Ok(chunk.len())
    }

    /// Replaces the properties of an existing page with `row`.
    pub fn update(&self, page: &str, types: &[LogicalType], row: &[Value]) -> Result<()> {
        check_width(types, row)?;
        let page_id = CanonicalId::resolve(page);
        let names: Vec<PropertyName> = (0..types.len()).map(PropertyName::positional).collect();
        let properties = row_to_properties(&names, types, row);

        self.client
            .update_page(&page_id, &self.token, &properties)
            .into_body(UPDATE_FAILED)?;
        log::info!("Updated page {}", page_id);
        Ok(())
    }

    /// Ends the write and reports how many rows were created.
    pub fn finalize(self) -> usize {
        log::info!(
            "Finished writing {} rows to {}",
            self.rows_written,
            self.database_id
        );
        self.rows_written
    }
}

fn check_width(types: &[LogicalType], row: &[Value]) -> Result<()> {
    if row.len() != types.len() {
        return Err(AppError::InvalidInput(format!(
            "row has {} values but {} columns are declared",
            row.len(),
            types.len()
        )));
    }
    Ok(())
}
