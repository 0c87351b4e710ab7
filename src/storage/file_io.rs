//! JSON file helpers with atomic writes
//!
//! A store file is either fully written or left untouched: data goes to a
//! sibling temp file first, which is synced and then renamed over the target.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use serde::{de::DeserializeOwned, Serialize};

use crate::error::BudgetError;

fn storage_error(action: &str, path: &Path, err: impl std::fmt::Display) -> BudgetError {
    BudgetError::Storage(format!("Failed to {} {}: {}", action, path.display(), err))
}

/// Read JSON from a file, returning `T::default()` if the file doesn't exist
pub fn read_json<T, P>(path: P) -> Result<T, BudgetError>
where
    T: DeserializeOwned + Default,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if !path.exists() {
        return Ok(T::default());
    }

    let file = File::open(path).map_err(|e| storage_error("open", path, e))?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| storage_error("parse", path, e))
}

/// Write JSON to a file atomically (write to temp, then rename)
pub fn write_json_atomic<T, P>(path: P, data: &T) -> Result<(), BudgetError>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| storage_error("create directory", parent, e))?;
    }

    let temp_path = path.with_extension("json.tmp");
    let file = File::create(&temp_path).map_err(|e| storage_error("create", &temp_path, e))?;

    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, data)
        .map_err(|e| storage_error("serialize", path, e))?;
    writer
        .flush()
        .map_err(|e| storage_error("flush", &temp_path, e))?;
    writer
        .get_ref()
        .sync_all()
        .map_err(|e| storage_error("sync", &temp_path, e))?;

    fs::rename(&temp_path, path).map_err(|e| {
        let _ = fs::remove_file(&temp_path);
        storage_error("replace", path, e)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
    struct Sample {
        name: String,
        value: i64,
    }

    #[test]
    fn test_read_missing_returns_default() {
        let temp_dir = TempDir::new().unwrap();
        let data: Sample = read_json(temp_dir.path().join("missing.json")).unwrap();
        assert_eq!(data, Sample::default());
    }

    #[test]
    fn test_write_then_read_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("sample.json");
        let data = Sample {
            name: "budget".into(),
            value: 3300,
        };

        write_json_atomic(&path, &data).unwrap();

        assert!(path.exists());
        assert!(!path.with_extension("json.tmp").exists());
        let loaded: Sample = read_json(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_corrupt_file_is_a_storage_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.json");
        fs::write(&path, "not json").unwrap();

        let err = read_json::<Sample, _>(&path).unwrap_err();
        assert!(matches!(err, BudgetError::Storage(_)));
    }
}
