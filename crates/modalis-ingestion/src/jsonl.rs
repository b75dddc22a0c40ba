//! JSON-lines dump reader.
//!
//! A dataset is a directory of `*.json` files holding one JSON object per
//! line (Open Targets platform layout). Files are visited in name order.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::Context;
use modalis_common::{ModalisError, Result};
use serde::de::DeserializeOwned;

/// Sorted `*.json` files directly under `dir`.
pub fn json_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list dataset directory {:?}", dir))?
    {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Deserialize every non-blank line of every dump file and hand it to
/// `visit`. Returns the number of records visited.
pub fn visit_records<T, F>(dir: &Path, mut visit: F) -> Result<usize>
where
    T: DeserializeOwned,
    F: FnMut(T),
{
    let files = json_files(dir)?;
    let mut n_records = 0usize;

    for (i, path) in files.iter().enumerate() {
        tracing::debug!("Reading json {}/{}: {:?}", i + 1, files.len(), path);
        let reader = BufReader::new(File::open(path)?);

        for (line_no, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let record: T = serde_json::from_str(&line).map_err(|source| ModalisError::Json {
                path: path.clone(),
                line: line_no + 1,
                source,
            })?;
            visit(record);
            n_records += 1;
        }
    }

    tracing::debug!("Visited {} records from {} files in {:?}", n_records, files.len(), dir);
    Ok(n_records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Item {
        id: String,
    }

    #[test]
    fn test_files_visited_in_name_order() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("part-0001.json"), "{\"id\": \"c\"}\n").unwrap();
        std::fs::write(dir.path().join("part-0000.json"), "{\"id\": \"a\"}\n\n{\"id\": \"b\"}\n").unwrap();
        std::fs::write(dir.path().join("_SUCCESS"), "").unwrap();

        let mut ids = Vec::new();
        let n = visit_records(dir.path(), |item: Item| ids.push(item.id)).unwrap();
        assert_eq!(n, 3);
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_malformed_line_reports_location() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("part-0000.json"), "{\"id\": \"a\"}\n{\"id\": \n").unwrap();

        let err = visit_records(dir.path(), |_: Item| {}).unwrap_err();
        match &err {
            ModalisError::Json { path, line, .. } => {
                assert!(path.ends_with("part-0000.json"));
                assert_eq!(*line, 2);
            }
            other => panic!("unexpected error {other:?}"),
        }
        assert!(err.to_string().contains("part-0000.json:2"));
    }

    #[test]
    fn test_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(json_files(&dir.path().join("absent")).is_err());
    }
}
