//! Where documents come from.
//!
//! A [`Source`] yields named byte streams ([`Store`]s). The reader numbers
//! documents across all stores of a source, so store order matters and is
//! always deterministic.

use std::fmt;
use std::fs::{self, File};
use std::io::{BufRead, BufReader, Cursor, Read};
use std::path::{Path, PathBuf};

use flate2::read::MultiGzDecoder;
use okay_contracts::error::{OkayError, OkayResult};
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A named, buffered input stream.
pub struct Store {
    pub name: String,
    pub reader: Box<dyn BufRead + Send>,
}

impl Store {
    pub fn new(name: impl Into<String>, reader: impl Read + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(BufReader::new(reader)),
        }
    }

    fn buffered(name: impl Into<String>, reader: impl BufRead + Send + 'static) -> Self {
        Self {
            name: name.into(),
            reader: Box::new(reader),
        }
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("name", &self.name).finish_non_exhaustive()
    }
}

pub type Stores = Box<dyn Iterator<Item = OkayResult<Store>> + Send>;

/// Anything that can enumerate stores.
pub trait Source {
    fn stores(&self) -> OkayResult<Stores>;
}

/// A single file, or every regular file directly inside a directory.
///
/// Directory entries are read in sorted path order. Files are opened one at
/// a time as the reader reaches them. A file starting with the gzip magic
/// bytes is decompressed whatever its name.
#[derive(Debug, Clone)]
pub struct FileSystemSource {
    path: PathBuf,
}

impl FileSystemSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// The files this source will read, in order.
    pub fn paths(&self) -> OkayResult<Vec<PathBuf>> {
        if !self.path.is_dir() {
            return Ok(vec![self.path.clone()]);
        }

        let entries = fs::read_dir(&self.path).map_err(|e| io_error(&self.path, e))?;
        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| io_error(&self.path, e))?.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        Ok(paths)
    }
}

impl Source for FileSystemSource {
    fn stores(&self) -> OkayResult<Stores> {
        let paths = self.paths()?;
        debug!(path = %self.path.display(), stores = paths.len(), "listing stores");

        Ok(Box::new(paths.into_iter().map(|path| open_store(&path))))
    }
}

fn open_store(path: &Path) -> OkayResult<Store> {
    let file = File::open(path).map_err(|e| io_error(path, e))?;
    let mut reader = BufReader::new(file);
    let compressed = reader.fill_buf().map_err(|e| io_error(path, e))?.starts_with(&GZIP_MAGIC);
    let name = path.display().to_string();

    if compressed {
        debug!(store = %name, "reading gzip store");
        Ok(Store::new(name, MultiGzDecoder::new(reader)))
    } else {
        Ok(Store::buffered(name, reader))
    }
}

/// In-memory stores, e.g. a buffered stdin or test fixtures.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    stores: Vec<(String, Vec<u8>)>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_store(mut self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> Self {
        self.stores.push((name.into(), contents.into()));
        self
    }
}

impl Source for MemorySource {
    fn stores(&self) -> OkayResult<Stores> {
        let stores: Vec<OkayResult<Store>> = self
            .stores
            .iter()
            .map(|(name, contents)| Ok(Store::new(name.clone(), Cursor::new(contents.clone()))))
            .collect();
        Ok(Box::new(stores.into_iter()))
    }
}

fn io_error(path: &Path, e: std::io::Error) -> OkayError {
    OkayError::Io {
        reason: format!("'{}': {}", path.display(), e),
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Read, Write};

    use flate2::{write::GzEncoder, Compression};

    use super::*;

    fn names(source: &dyn Source) -> Vec<String> {
        source
            .stores()
            .unwrap()
            .map(|store| store.unwrap().name)
            .collect()
    }

    #[test]
    fn test_directory_stores_are_sorted() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.jsonl", "a.jsonl", "c.jsonl"] {
            fs::write(dir.path().join(name), "{}\n").unwrap();
        }
        fs::create_dir(dir.path().join("nested")).unwrap();

        let found = names(&FileSystemSource::new(dir.path()));
        let expected: Vec<String> = ["a.jsonl", "b.jsonl", "c.jsonl"]
            .iter()
            .map(|name| dir.path().join(name).display().to_string())
            .collect();
        assert_eq!(found, expected);
    }

    #[test]
    fn test_single_file_is_one_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hotels.jsonl");
        fs::write(&path, "{\"name\":\"x\"}\n").unwrap();

        let mut stores = FileSystemSource::new(&path).stores().unwrap();
        let mut store = stores.next().unwrap().unwrap();
        assert!(stores.next().is_none());

        let mut contents = String::new();
        store.reader.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "{\"name\":\"x\"}\n");
    }

    /// Compression is detected from the contents, not the file name.
    #[test]
    fn test_gzip_store_is_decompressed() {
        let dir = tempfile::tempdir().unwrap();
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"{\"name\":\"x\"}\n").unwrap();
        fs::write(dir.path().join("hotels.jsonl.gz"), encoder.finish().unwrap()).unwrap();
        fs::write(dir.path().join("plain.data"), "{}\n").unwrap();

        let mut stores = FileSystemSource::new(dir.path()).stores().unwrap();
        let mut contents = String::new();
        stores.next().unwrap().unwrap().reader.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "{\"name\":\"x\"}\n");

        contents.clear();
        stores.next().unwrap().unwrap().reader.read_to_string(&mut contents).unwrap();
        assert_eq!(contents, "{}\n");
    }

    #[test]
    fn test_empty_file_is_not_gzip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.jsonl");
        fs::write(&path, "").unwrap();

        let mut store = FileSystemSource::new(&path).stores().unwrap().next().unwrap().unwrap();
        let mut contents = Vec::new();
        store.reader.read_to_end(&mut contents).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_missing_file_fails_on_open() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSystemSource::new(dir.path().join("absent.jsonl"));
        let err = source.stores().unwrap().next().unwrap().unwrap_err();
        assert!(matches!(err, OkayError::Io { .. }));
    }

    #[test]
    fn test_memory_source_keeps_order() {
        let source = MemorySource::new()
            .with_store("first", "{}")
            .with_store("second", "{}");
        assert_eq!(names(&source), vec!["first", "second"]);
        // stores can be listed more than once
        assert_eq!(names(&source).len(), 2);
    }
}
