//! Error types for the stats core

use thiserror::Error;

use crate::measure::MeasureType;

/// Main error type for the stats core
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A measure name was looked up before being registered
    #[error("Measure not found: {0}")]
    NotFound(String),

    /// A measure name is already registered with a different type
    #[error("Measure '{name}' is registered as {registered:?}, requested {requested:?}")]
    TypeMismatch {
        /// The contested measure name
        name: String,
        /// The type recorded at first registration
        registered: MeasureType,
        /// The type requested by the conflicting caller
        requested: MeasureType,
    },

    /// An operation was invoked on view data in the wrong state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type alias for stats-core operations
pub type Result<T> = std::result::Result<T, Error>;
