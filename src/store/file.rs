//! Directory-backed store: one `<sheet>.json` file per sheet.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::trace;

use super::{CellRef, Sheet, Store, StoreError};

/// Store keeping each sheet as a JSON matrix of strings in a directory.
///
/// Writes go to a temporary file that is renamed over the sheet, so a
/// failed write never leaves a truncated sheet behind.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(Self { dir })
    }

    /// Directory holding the sheet files.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn sheet_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{name}.json"))
    }

    fn load(&self, name: &str) -> Result<Option<Sheet>, StoreError> {
        let path = self.sheet_path(name);
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        serde_json::from_str(&text)
            .map(Some)
            .map_err(|source| StoreError::Json {
                sheet: name.to_string(),
                source,
            })
    }
}

impl Store for FileStore {
    fn read_sheet(&self, name: &str) -> Result<Sheet, StoreError> {
        self.load(name)?
            .ok_or_else(|| StoreError::MissingSheet(name.to_string()))
    }

    fn write_range(&mut self, name: &str, anchor: CellRef, rows: &[Vec<String>]) -> Result<(), StoreError> {
        let mut sheet = self.load(name)?.unwrap_or_default();
        sheet.write(anchor, rows);

        let json = serde_json::to_string_pretty(&sheet).map_err(|source| StoreError::Json {
            sheet: name.to_string(),
            source,
        })?;

        let path = self.sheet_path(name);
        let tmp = self.dir.join(format!(".{name}.json.tmp"));
        fs::write(&tmp, json).map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &path).map_err(|source| StoreError::Io { path, source })?;

        trace!(sheet = name, %anchor, rows = rows.len(), "sheet written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_sheet() {
        let dir = tempdir().unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.read_sheet("answers"),
            Err(StoreError::MissingSheet(name)) if name == "answers"
        ));
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::open(dir.path()).unwrap();
        let rows = vec![vec!["a".to_string(), "b".to_string()]];
        store.write_range("warnings", CellRef::ORIGIN, &rows).unwrap();
        store
            .write_range("warnings", CellRef::new(1, 0), &[vec!["c".to_string()]])
            .unwrap();

        let sheet = store.read_sheet("warnings").unwrap();
        assert_eq!(sheet.rows(), &[vec!["a", "b"], vec!["c"]]);
        assert!(!dir.path().join(".warnings.json.tmp").exists());
    }

    #[test]
    fn test_reads_hand_written_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("answers.json"),
            r#"[["Timestamp", "Code"], ["01/11/2020 10:00:00", "abc"]]"#,
        )
        .unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        let sheet = store.read_sheet("answers").unwrap();
        assert_eq!(sheet.column("Code"), Some(1));
        assert_eq!(sheet.data_rows()[0][1], "abc");
    }

    #[test]
    fn test_malformed_file() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("answers.json"), "{not json").unwrap();
        let store = FileStore::open(dir.path()).unwrap();
        assert!(matches!(store.read_sheet("answers"), Err(StoreError::Json { .. })));
    }
}
