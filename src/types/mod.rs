use thiserror::Error;

mod domain_types;
mod ids;
mod values;

pub use domain_types::*;
pub use ids::*;
pub use values::*;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid auth token: {reason}")]
    InvalidToken { reason: String },

    #[error("Unknown column type: {0}")]
    UnknownType(String),

    #[error("Unknown property type: {0}")]
    UnknownPropertyKind(String),

    #[error("Invalid value {value:?} for {expected} column")]
    InvalidValue {
        value: String,
        expected: &'static str,
    },
}
