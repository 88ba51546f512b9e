use thiserror::Error;

/// Structural errors raised by the core pipeline.
///
/// Soft "no data" outcomes (unknown country, empty comparison window) are
/// expressed as `None` by the operations that can produce them; only
/// malformed input and empty tables are hard errors.
#[derive(Debug, Error)]
pub enum DataError {
    /// Raw payload is missing or carries unusable required fields.
    #[error("malformed input: {0}")]
    MalformedInput(String),

    /// An operation that needs at least one row was invoked on an empty table.
    #[error("empty dataset: {0}")]
    EmptyDataset(&'static str),
}
