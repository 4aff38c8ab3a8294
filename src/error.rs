//! Error types for the record store and form handling.

use crate::models::Field;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for store and form operations.
pub type Result<T> = std::result::Result<T, PlacementError>;

/// Errors raised by the store and by form validation.
#[derive(Debug, Error)]
pub enum PlacementError {
    /// One or more required form fields were empty.
    #[error("missing required fields: {}", join_fields(.0))]
    MissingFields(Vec<Field>),

    /// The data file exists but could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file could not be written.
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The data file is not well-formed CSV.
    #[error("malformed data file {}: {source}", .path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// The header row does not match the placement schema.
    #[error(
        "unexpected header in {}: expected [{}], found [{}]",
        .path.display(),
        Field::HEADERS.join(", "),
        .found.join(", ")
    )]
    SchemaMismatch { path: PathBuf, found: Vec<String> },
}

impl PlacementError {
    /// True for errors caused by user input rather than the data file.
    pub fn is_user_error(&self) -> bool {
        matches!(self, PlacementError::MissingFields(_))
    }
}

fn join_fields(fields: &[Field]) -> String {
    fields
        .iter()
        .map(|f| f.header())
        .collect::<Vec<_>>()
        .join(", ")
}
