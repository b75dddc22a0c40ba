//! CSV table I/O for the results directory.

use std::path::Path;

use modalis_common::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Write rows with a header line, creating parent directories.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    tracing::debug!("Wrote {} rows to {:?}", rows.len(), path);
    Ok(())
}

pub fn read_csv<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let mut reader = csv::Reader::from_path(path)?;
    let rows = reader.deserialize().collect::<std::result::Result<Vec<T>, _>>()?;
    tracing::debug!("Read {} rows from {:?}", rows.len(), path);
    Ok(rows)
}
