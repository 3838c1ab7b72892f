// src/scan/table.rs
//! Binding a database as a readable table.

use super::reader::PaginatedReader;
use crate::api::{NotionApiClient, TlsTransport, Transport};
use crate::auth::TokenProvider;
use crate::constants::MAX_SCAN_PARALLELISM;
use crate::error::{AppError, Result};
use crate::json::{find_string, locate_value, member_array};
use crate::mapping::{remote_properties, ReadSchema, RemoteProperty};
use crate::types::{AuthToken, CanonicalId, PropertyKind};

const SCHEMA_FAILED: &str = "Failed to get Notion database schema";
const DATA_SOURCE_FAILED: &str = "Failed to get Notion data source";

/// What a table read should produce beyond the fixed columns.
#[derive(Debug, Clone, Default)]
pub struct ReadOptions {
    /// Extra property columns, appended after the fixed four.
    pub properties: Vec<(String, PropertyKind)>,
    /// Query this data source instead of the database default.
    pub data_source_id: Option<String>,
    /// Look the data source up at bind time when none is given.
    pub resolve_data_source: bool,
}

/// A database bound for reading.
///
/// Binding checks that the database exists and is reachable with the token.
/// Scans created from it share the bound client, token and schema.
#[derive(Debug)]
pub struct TableScan<T = TlsTransport> {
    client: NotionApiClient<T>,
    database_id: CanonicalId,
    token: AuthToken,
    data_source_id: String,
    schema: ReadSchema,
    remote_properties: Vec<RemoteProperty>,
}

impl<T: Transport> TableScan<T> {
    pub fn bind(
        input: &str,
        provider: &dyn TokenProvider,
        client: NotionApiClient<T>,
        options: ReadOptions,
    ) -> Result<Self> {
        let database_id = CanonicalId::resolve(input);
        if database_id.as_str().is_empty() {
            return Err(AppError::InvalidInput(
                "database id or URL is empty".to_string(),
            ));
        }
        let token = provider.token()?;

        log::info!("Binding Notion database {}", database_id);
        let body = client
            .get_database(&database_id, &token)
            .into_body(SCHEMA_FAILED)
            .map_err(|e| {
                let e = e.into_schema_error();
                if let AppError::RemoteSchema { code, .. } = &e {
                    if code.is_not_found() || code.is_permission_denied() {
                        log::warn!(
                            "Database {} is missing or not shared with this integration",
                            database_id
                        );
                    }
                }
                e
            })?;

        if locate_value(&body, "properties").is_none() {
            log::warn!("Schema of {} has no properties", database_id);
        }
        let remote_properties = remote_properties(&body);
        for property in &remote_properties {
            log::debug!("Remote property {:?} ({})", property.name, property.kind);
        }

        let data_source_id = match options.data_source_id {
            Some(id) => id,
            None if options.resolve_data_source => {
                resolve_data_source(&client, &database_id, &token)?.unwrap_or_default()
            }
            None => String::new(),
        };

        let schema = options
            .properties
            .into_iter()
            .fold(ReadSchema::fixed(), |schema, (name, kind)| {
                schema.with_property(name, kind)
            });

        log::info!(
            "Bound {} with {} output columns ({} remote properties)",
            database_id,
            schema.columns().len(),
            remote_properties.len()
        );

        Ok(Self {
            client,
            database_id,
            token,
            data_source_id,
            schema,
            remote_properties,
        })
    }

    pub fn database_id(&self) -> &CanonicalId {
        &self.database_id
    }

    pub fn data_source_id(&self) -> &str {
        &self.data_source_id
    }

    pub fn schema(&self) -> &ReadSchema {
        &self.schema
    }

    /// Property definitions the remote database reported at bind time.
    pub fn remote_properties(&self) -> &[RemoteProperty] {
        &self.remote_properties
    }

    pub fn max_parallelism(&self) -> usize {
        MAX_SCAN_PARALLELISM
    }

    pub fn client(&self) -> &NotionApiClient<T> {
        &self.client
    }

    /// Starts a fresh scan from the first page.
    pub fn scan(&self) -> PaginatedReader<'_, T> {
        PaginatedReader::new(
            &self.client,
            self.database_id.clone(),
            self.token.clone(),
            self.schema.clone(),
        )
        .with_data_source(self.data_source_id.clone())
    }
}

/// First data source id listed for the database, if any.
fn resolve_data_source<T: Transport>(
    client: &NotionApiClient<T>,
    database_id: &CanonicalId,
    token: &AuthToken,
) -> Result<Option<String>> {
    let body = client
        .get_data_source(database_id, token)
        .into_body(DATA_SOURCE_FAILED)
        .map_err(AppError::into_schema_error)?;

    let listed = member_array(&body, "results");
    let listed = if listed.is_empty() {
        member_array(&body, "data_sources")
    } else {
        listed
    };

    let id = listed
        .first()
        .and_then(|object| find_string(object, "id"))
        .map(str::to_string);
    match &id {
        Some(id) => log::info!("Using data source {} for {}", id, database_id),
        None => log::warn!("No data source listed for {}", database_id),
    }
    Ok(id)
}
