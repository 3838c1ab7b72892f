// src/scan/mod.rs
//! Reading a database as a table: bind once, then pull rows page by page.

mod reader;
mod table;

pub use reader::{PaginatedReader, RowBatch, ScanCursor, ScanState};
pub use table::{ReadOptions, TableScan};
