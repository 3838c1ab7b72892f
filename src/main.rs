// src/main.rs

use anyhow::{bail, Context};
use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notion2table::{
    constants::STANDARD_CHUNK_SIZE, Action, BridgeConfig, CommandLineInput, DataChunk,
    LogicalType, NotionApiClient, ReadOptions, Row, TableScan, TableSink, TokenChain, Value,
    WriteOptions,
};
use std::fs;
use std::io::{self, BufRead, BufWriter, Write};

/// Sets up logging configuration.
///
/// Console output goes to stderr: stdout carries table rows.
fn setup_logging(verbose: bool) -> anyhow::Result<()> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notion2table.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    let stderr_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Streams a database to stdout as tab-separated rows with a header line.
fn read_table(
    tokens: &TokenChain,
    input: &str,
    limit: Option<usize>,
    chunk_size: usize,
    options: ReadOptions,
) -> anyhow::Result<()> {
    let table = TableScan::bind(input, tokens, NotionApiClient::new(), options)?;
    let mut reader = table.scan();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    writeln!(out, "{}", table.schema().names().join("\t"))?;

    let mut emitted = 0usize;
    loop {
        let want = match limit {
            Some(limit) if emitted >= limit => break,
            Some(limit) => chunk_size.min(limit - emitted),
            None => chunk_size,
        };
        let chunk = reader.next_chunk(want)?;
        if chunk.is_empty() {
            break;
        }
        for row in &chunk.rows {
            writeln!(out, "{}", format_row(row))?;
        }
        emitted += chunk.len();
    }
    out.flush()?;

    log::info!(
        "Read {} rows over {} pages",
        emitted,
        reader.pages_fetched()
    );
    Ok(())
}

/// Prints the output columns, then what the remote database defines.
fn describe_table(tokens: &TokenChain, input: &str) -> anyhow::Result<()> {
    let table = TableScan::bind(input, tokens, NotionApiClient::new(), ReadOptions::default())?;

    println!("Columns of {}:", table.database_id());
    for column in table.schema().columns() {
        println!("  {}\t{}", column.name, column.logical_type);
    }

    println!("Remote properties:");
    for property in table.remote_properties() {
        let readable = if property.property_kind().is_some() {
            ""
        } else {
            " (not readable)"
        };
        println!("  {}\t{}{}", property.name, property.kind, readable);
    }
    Ok(())
}

/// Creates one page per stdin line.
///
/// All of stdin is parsed before the first page is created, so a malformed
/// line leaves the database untouched.
fn write_table(
    tokens: &TokenChain,
    destination: &str,
    types: &[LogicalType],
    options: WriteOptions,
) -> anyhow::Result<()> {
    let mut sink = TableSink::bind(destination, tokens, NotionApiClient::new(), options)?;

    if let Some(input) = read_rows(io::stdin().lock(), types)? {
        let mut rows = input.rows.into_iter();
        loop {
            let mut chunk = DataChunk::new(input.types.clone());
            chunk.rows.extend(rows.by_ref().take(STANDARD_CHUNK_SIZE));
            if chunk.is_empty() {
                break;
            }
            sink.sink(&chunk)?;
        }
    }

    let written = sink.finalize();
    println!("✓ Wrote {} rows to Notion", written);
    Ok(())
}

/// Parses every non-empty tab-separated line. `None` when there are none.
fn read_rows(input: impl BufRead, declared: &[LogicalType]) -> anyhow::Result<Option<DataChunk>> {
    let mut parsed: Option<DataChunk> = None;
    for (index, line) in input.lines().enumerate() {
        let line = line.context("Failed to read stdin")?;
        if line.is_empty() {
            continue;
        }
        let chunk = parsed.get_or_insert_with(|| DataChunk::new(column_types(declared, &line)));
        let row = parse_row(&line, &chunk.types)
            .with_context(|| format!("Invalid input on line {}", index + 1))?;
        chunk.push(row);
    }
    Ok(parsed)
}

/// Replaces the properties of one page with the first stdin line.
fn update_page(
    tokens: &TokenChain,
    destination: &str,
    page: &str,
    types: &[LogicalType],
) -> anyhow::Result<()> {
    let sink = TableSink::bind(
        destination,
        tokens,
        NotionApiClient::new(),
        Default::default(),
    )?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read stdin")?;
    let line = line.trim_end_matches(['\r', '\n']);
    if line.is_empty() {
        bail!("Expected one tab-separated row on stdin");
    }

    let types = column_types(types, line);
    let row = parse_row(line, &types).context("Invalid input row")?;
    sink.update(page, &types, &row)?;
    println!("✓ Updated page {}", page);
    Ok(())
}

/// Declared types, or VARCHAR for every cell of `line`.
fn column_types(declared: &[LogicalType], line: &str) -> Vec<LogicalType> {
    if declared.is_empty() {
        vec![LogicalType::Varchar; line.split('\t').count()]
    } else {
        declared.to_vec()
    }
}

fn parse_row(line: &str, types: &[LogicalType]) -> anyhow::Result<Row> {
    let cells: Vec<&str> = line.split('\t').collect();
    if cells.len() != types.len() {
        bail!(
            "expected {} tab-separated values, found {}",
            types.len(),
            cells.len()
        );
    }
    cells
        .iter()
        .zip(types)
        .map(|(cell, ty)| Value::parse_as(cell, ty).map_err(anyhow::Error::from))
        .collect()
}

fn format_row(row: &[Value]) -> String {
    row.iter()
        .map(|value| match value {
            Value::Null => "\\N".to_string(),
            other => other.to_string().replace(['\t', '\n'], " "),
        })
        .collect::<Vec<_>>()
        .join("\t")
}

fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose)?;

    let config = BridgeConfig::resolve(cli)?;
    let tokens = config.token_chain();

    match config.action {
        Action::Read {
            input,
            limit,
            chunk_size,
            options,
        } => read_table(&tokens, &input, limit, chunk_size, options),
        Action::Schema { input } => describe_table(&tokens, &input),
        Action::Write {
            destination,
            types,
            options,
        } => write_table(&tokens, &destination, &types, options),
        Action::Update {
            destination,
            page,
            types,
        } => update_page(&tokens, &destination, &page, &types),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_rows_parses_every_line() {
        let input = "Milk\t2\n\nEggs\t12\n".as_bytes();
        let types = [LogicalType::Varchar, LogicalType::Integer];
        let chunk = read_rows(input, &types).unwrap().unwrap();

        assert_eq!(chunk.len(), 2);
        assert_eq!(chunk.rows[1][0].to_string(), "Eggs");
    }

    #[test]
    fn test_read_rows_rejects_before_anything_is_written() {
        let input = "Milk\t2\nEggs\ttwelve\nBread\t1\n".as_bytes();
        let types = [LogicalType::Varchar, LogicalType::Integer];
        let err = read_rows(input, &types).unwrap_err();

        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_read_rows_without_declared_types() {
        let chunk = read_rows("a\tb\tc\n".as_bytes(), &[]).unwrap().unwrap();
        assert_eq!(chunk.types, vec![LogicalType::Varchar; 3]);
        assert!(read_rows("".as_bytes(), &[]).unwrap().is_none());
    }

    #[test]
    fn test_format_row_marks_nulls() {
        let row = vec![Value::Null, Value::Varchar("a\tb".to_string())];
        assert_eq!(format_row(&row), "\\N\ta b");
    }
}
