use std::path::PathBuf;

use thiserror::Error;

/// Boxed codec failure so serializers other than JSON can report their own
/// error types.
pub type CodecError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Failures raised by the catalog core.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The backing store could not be read, written, or understood. Fatal to
    /// the operation in progress.
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Book ids are positive; lookups with anything else never reach the scan.
    #[error("Book id must be greater than zero (got {0}).")]
    InvalidArgument(i64),

    #[error("No book with id {0} exists.")]
    NotFound(i64),

    /// The highest id in use leaves no larger positive id to hand out.
    #[error("No book ids are left after {0}.")]
    IdExhausted(i64),
}

/// Everything that can go wrong between the catalog and its durable copy.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("failed to read catalog file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write catalog file {path}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode catalog records")]
    Encode(#[source] CodecError),

    #[error("catalog data is malformed")]
    Decode(#[source] CodecError),
}

/// Loaded records that parse but break the id rules. Reported as
/// [`PersistenceError::Decode`].
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("book id must be greater than zero (got {0})")]
    NonPositiveId(i64),

    #[error("book id {0} appears more than once")]
    DuplicateId(i64),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
