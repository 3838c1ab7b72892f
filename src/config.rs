// src/config.rs
use crate::auth::{EnvTokenProvider, SecretStore, TokenChain};
use crate::constants::{NOTION_SECRET_TYPE, NOTION_TOKEN_KEY, STANDARD_CHUNK_SIZE};
use crate::error::AppError;
use crate::scan::ReadOptions;
use crate::sink::WriteOptions;
use crate::types::{LogicalType, PropertyKind};
use clap::{Parser, Subcommand};

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    #[command(subcommand)]
    pub command: CommandInput,

    /// Notion integration token (takes precedence over NOTION_TOKEN)
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum CommandInput {
    /// Print the pages of a database as tab-separated rows
    Read {
        /// Notion database URL or ID
        input: String,

        /// Stop after this many rows
        #[arg(long)]
        limit: Option<usize>,

        /// Rows pulled per chunk
        #[arg(long, default_value_t = STANDARD_CHUNK_SIZE)]
        chunk_size: usize,

        /// Extra property column, e.g. "Price:number" (repeatable)
        #[arg(long = "property", value_name = "NAME:TYPE")]
        properties: Vec<String>,

        /// Query a specific data source of the database
        #[arg(long)]
        data_source: Option<String>,

        /// Look up the database's data source before querying
        #[arg(long, default_value_t = false)]
        resolve_data_source: bool,
    },

    /// Print the output columns and the remote property definitions
    Schema {
        /// Notion database URL or ID
        input: String,
    },

    /// Create one page per tab-separated line read from stdin
    Write {
        /// Notion database URL or ID
        destination: String,

        /// Column types, comma separated (defaults to VARCHAR for every column)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,

        /// Parent data source for the created pages
        #[arg(long)]
        data_source: Option<String>,
    },

    /// Replace the properties of one page with a tab-separated line from stdin
    Update {
        /// Notion database URL or ID the page belongs to
        destination: String,

        /// Notion page URL or ID
        page: String,

        /// Column types, comma separated (defaults to VARCHAR for every column)
        #[arg(long, value_delimiter = ',')]
        types: Vec<String>,
    },
}

/// A validated command, ready to run.
#[derive(Debug, Clone)]
pub enum Action {
    Read {
        input: String,
        limit: Option<usize>,
        chunk_size: usize,
        options: ReadOptions,
    },
    Schema {
        input: String,
    },
    Write {
        destination: String,
        /// Empty means every column is VARCHAR.
        types: Vec<LogicalType>,
        options: WriteOptions,
    },
    Update {
        destination: String,
        page: String,
        types: Vec<LogicalType>,
    },
}

/// Resolved configuration.
#[derive(Debug, Clone)]
pub struct BridgeConfig {
    pub action: Action,
    pub verbose: bool,
    token_override: Option<String>,
}

impl BridgeConfig {
    /// Validates CLI input into a runnable configuration.
    pub fn resolve(cli: CommandLineInput) -> Result<Self, AppError> {
        let action = match cli.command {
            CommandInput::Read {
                input,
                limit,
                chunk_size,
                properties,
                data_source,
                resolve_data_source,
            } => {
                if chunk_size == 0 {
                    return Err(AppError::InvalidInput(
                        "--chunk-size must be at least 1".to_string(),
                    ));
                }
                let properties = properties
                    .iter()
                    .map(String::as_str)
                    .map(parse_property_spec)
                    .collect::<Result<Vec<_>, _>>()?;
                Action::Read {
                    input,
                    limit,
                    chunk_size,
                    options: ReadOptions {
                        properties,
                        data_source_id: data_source,
                        resolve_data_source,
                    },
                }
            }
            CommandInput::Schema { input } => Action::Schema { input },
            CommandInput::Write {
                destination,
                types,
                data_source,
            } => Action::Write {
                destination,
                types: parse_types(&types)?,
                options: WriteOptions {
                    data_source_id: data_source,
                },
            },
            CommandInput::Update {
                destination,
                page,
                types,
            } => Action::Update {
                destination,
                page,
                types: parse_types(&types)?,
            },
        };

        Ok(Self {
            action,
            verbose: cli.verbose,
            token_override: cli.token,
        })
    }

    /// Token sources in lookup order: `--token`, then the environment.
    pub fn token_chain(&self) -> TokenChain {
        let mut secrets = SecretStore::new();
        if let Some(token) = &self.token_override {
            secrets.create_secret(
                NOTION_SECRET_TYPE,
                Vec::new(),
                [(NOTION_TOKEN_KEY, token.as_str())],
            );
        }

        TokenChain::new()
            .with_provider(secrets)
            .with_provider(EnvTokenProvider::default())
    }
}

/// Parses `NAME:TYPE`. The name may itself contain colons.
fn parse_property_spec(spec: &str) -> Result<(String, PropertyKind), AppError> {
    let (name, kind) = spec.rsplit_once(':').ok_or_else(|| {
        AppError::InvalidInput(format!("expected NAME:TYPE, got {:?}", spec))
    })?;
    if name.is_empty() {
        return Err(AppError::InvalidInput(format!(
            "property name is empty in {:?}",
            spec
        )));
    }
    Ok((name.to_string(), kind.parse()?))
}

fn parse_types(names: &[String]) -> Result<Vec<LogicalType>, AppError> {
    names
        .iter()
        .map(|name| name.parse().map_err(AppError::from))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::TokenProvider;

    fn resolve(args: &[&str]) -> Result<BridgeConfig, AppError> {
        let mut argv = vec!["notion2table"];
        argv.extend_from_slice(args);
        BridgeConfig::resolve(CommandLineInput::parse_from(argv))
    }

    #[test]
    fn test_read_defaults() {
        let config = resolve(&["read", "1234567890abcdef1234567890abcdef"]).unwrap();
        match config.action {
            Action::Read {
                limit,
                chunk_size,
                options,
                ..
            } => {
                assert_eq!(limit, None);
                assert_eq!(chunk_size, STANDARD_CHUNK_SIZE);
                assert!(options.properties.is_empty());
                assert!(!options.resolve_data_source);
            }
            other => panic!("unexpected action: {:?}", other),
        }
        assert!(!config.verbose);
    }

    #[test]
    fn test_read_properties() {
        let config = resolve(&[
            "read",
            "abc",
            "--property",
            "Price:number",
            "--property",
            "Due: date:url",
        ])
        .unwrap();
        let Action::Read { options, .. } = config.action else {
            panic!("expected read");
        };
        assert_eq!(
            options.properties,
            vec![
                ("Price".to_string(), PropertyKind::Number),
                ("Due: date".to_string(), PropertyKind::Url),
            ]
        );
    }

    #[test]
    fn test_bad_property_spec() {
        assert!(matches!(
            resolve(&["read", "abc", "--property", "Price"]),
            Err(AppError::InvalidInput(_))
        ));
        assert!(matches!(
            resolve(&["read", "abc", "--property", "Tags:multi_select"]),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_write_types() {
        let config = resolve(&["write", "abc", "--types", "varchar,bigint,bool", "-v"]).unwrap();
        let Action::Write { types, .. } = config.action else {
            panic!("expected write");
        };
        assert_eq!(
            types,
            vec![LogicalType::Varchar, LogicalType::BigInt, LogicalType::Boolean]
        );
        assert!(config.verbose);
    }

    #[test]
    fn test_token_flag_wins() {
        let config = resolve(&["--token", "ntn_from_flag", "schema", "abc"]).unwrap();
        let token = config.token_chain().token().unwrap();
        assert_eq!(token.as_str(), "ntn_from_flag");
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(resolve(&["read", "abc", "--chunk-size", "0"]).is_err());
    }
}
