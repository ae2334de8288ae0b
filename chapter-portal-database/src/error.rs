use std::path::PathBuf;

use thiserror::Error;

#[allow(clippy::module_name_repetitions)]
#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("Failed to read fixture {path}: {source}")]
    ReadFixture {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse fixture {name}: {source}")]
    ParseFixture {
        name: &'static str,
        source: serde_path_to_error::Error<serde_json::Error>,
    },
    #[error("Storage file {path} could not be accessed: {source}")]
    Storage {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Storage file {path} is corrupt: {source}")]
    CorruptStorage {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Failed to serialize storage {0}")]
    SerializeStorage(#[from] serde_json::Error),
}
