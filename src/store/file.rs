use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::debug;

use crate::error::{PersistenceError, Result};
use crate::models::Book;

use super::{JsonSerializer, Serializer, Store};

/// Whole-file storage. Every write lands in a temporary sibling first and is
/// renamed over the target, so readers only ever see a complete file.
#[derive(Debug, Clone)]
pub struct FileStore<C = JsonSerializer> {
    path: PathBuf,
    codec: C,
}

impl FileStore<JsonSerializer> {
    /// JSON-backed store at `path`. Nothing touches the disk until the first
    /// `read` or `write`.
    pub fn json(path: impl Into<PathBuf>) -> Self {
        Self::new(path, JsonSerializer)
    }
}

impl<C: Serializer> FileStore<C> {
    pub fn new(path: impl Into<PathBuf>, codec: C) -> Self {
        Self {
            path: path.into(),
            codec,
        }
    }

    fn read_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Read {
            path: self.path.clone(),
            source,
        }
    }

    fn write_error(&self, source: io::Error) -> PersistenceError {
        PersistenceError::Write {
            path: self.path.clone(),
            source,
        }
    }

    fn replace_contents(&self, bytes: &[u8]) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|err| self.write_error(err))?;

        let mut staged = NamedTempFile::new_in(dir).map_err(|err| self.write_error(err))?;
        staged
            .write_all(bytes)
            .and_then(|_| staged.as_file().sync_all())
            .map_err(|err| self.write_error(err))?;
        // The staged file is created owner-only; keep the mode of the file it replaces.
        match fs::metadata(&self.path) {
            Ok(existing) => staged
                .as_file()
                .set_permissions(existing.permissions())
                .map_err(|err| self.write_error(err))?,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {}
            Err(err) => return Err(self.write_error(err).into()),
        }
        staged
            .persist(&self.path)
            .map_err(|err| self.write_error(err.error))?;
        Ok(())
    }
}

impl<C: Serializer> Store for FileStore<C> {
    fn read(&mut self) -> Result<Vec<Book>> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "catalog file absent, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.read_error(err).into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            debug!(path = %self.path.display(), "catalog file empty, writing empty set");
            let empty = self.codec.encode(&[])?;
            self.replace_contents(&empty)?;
            return Ok(Vec::new());
        }

        let books = self.codec.decode(&bytes)?;
        debug!(path = %self.path.display(), count = books.len(), "loaded catalog");
        Ok(books)
    }

    fn write(&mut self, books: &[Book]) -> Result<()> {
        let bytes = self.codec.encode(books)?;
        self.replace_contents(&bytes)?;
        debug!(path = %self.path.display(), count = books.len(), "saved catalog");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CatalogError;
    use crate::models::BookStatus;
    use tempfile::tempdir;

    fn sample() -> Vec<Book> {
        vec![
            Book {
                id: 1,
                title: "Dune".to_string(),
                author: "Herbert".to_string(),
                year: 1965,
                status: BookStatus::Available,
            },
            Book {
                id: 4,
                title: "Пикник на обочине".to_string(),
                author: "Стругацкие".to_string(),
                year: 1972,
                status: BookStatus::CheckedOut,
            },
        ]
    }

    #[test]
    fn missing_file_reads_as_empty_without_creating_it() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        let mut store = FileStore::json(&path);

        assert!(store.read().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn empty_file_is_normalized_to_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "").unwrap();
        let mut store = FileStore::json(&path);

        assert!(store.read().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[test]
    fn whitespace_only_file_is_normalized_to_empty_array() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "  \n").unwrap();
        let mut store = FileStore::json(&path);

        assert!(store.read().unwrap().is_empty());
        assert_eq!(fs::read_to_string(&path).unwrap(), "[]");
    }

    #[cfg(unix)]
    #[test]
    fn rewrite_keeps_the_existing_file_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "[]").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        FileStore::json(&path).write(&sample()).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[test]
    fn write_then_read_preserves_order_and_text() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::json(dir.path().join("books.json"));
        let books = sample();

        store.write(&books).unwrap();
        assert_eq!(store.read().unwrap(), books);
    }

    #[test]
    fn write_creates_missing_parent_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("books.json");
        let mut store = FileStore::json(&path);

        store.write(&sample()).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn write_leaves_no_staging_files_behind() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::json(dir.path().join("books.json"));
        store.write(&sample()).unwrap();
        store.write(&[]).unwrap();

        let entries: Vec<_> = fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn malformed_file_is_a_persistence_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("books.json");
        fs::write(&path, "[{\"id\": 1,").unwrap();
        let mut store = FileStore::json(&path);

        let err = store.read().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Persistence(PersistenceError::Decode(_))
        ));
        assert_eq!(fs::read_to_string(&path).unwrap(), "[{\"id\": 1,");
    }

    #[test]
    fn directory_in_place_of_file_is_a_read_error() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::json(dir.path());

        let err = store.read().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::Persistence(PersistenceError::Read { .. })
        ));
    }
}
