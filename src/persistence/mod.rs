use crate::store::DatasetSnapshot;
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;
use thiserror::Error;

/// File I/O failures around a persisted dataset. Snapshot *content*
/// problems surface later, from `import_snapshot`, as `StoreError`.
#[derive(Debug, Error)]
pub enum DatasetFileError {
    #[error("failed to access dataset file")]
    Io(#[from] std::io::Error),

    #[error("dataset file is not a valid snapshot document")]
    Json(#[from] serde_json::Error),
}

/// Writes `snapshot` to `path` as pretty-printed JSON. The document is
/// human-inspectable and order-stable.
pub fn save_dataset<P: AsRef<Path>>(
    path: P,
    snapshot: &DatasetSnapshot,
) -> Result<(), DatasetFileError> {
    let writer = BufWriter::new(File::create(path.as_ref())?);
    serde_json::to_writer_pretty(writer, snapshot)?;
    Ok(())
}

/// Reads a snapshot document from `path`. The caller decides what to do
/// with it, usually `LabelledExampleStore::import_snapshot`, which is
/// where validation happens.
pub fn load_dataset<P: AsRef<Path>>(path: P) -> Result<DatasetSnapshot, DatasetFileError> {
    let reader = BufReader::new(File::open(path.as_ref())?);
    Ok(serde_json::from_reader(reader)?)
}
