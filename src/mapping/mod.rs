// src/mapping/mod.rs
//! Property mapping between typed rows and Notion's property JSON.

mod read;
mod write;

pub use read::{remote_properties, ColumnSource, ReadColumn, ReadSchema, RemoteProperty};
pub use write::row_to_properties;
