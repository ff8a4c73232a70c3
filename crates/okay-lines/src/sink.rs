//! Writing documents back to the file system.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use okay_contracts::error::{OkayError, OkayResult};
use tracing::{debug, warn};

use crate::reader::Document;
use crate::writer::DocumentWriter;

/// Writes documents to files chosen by a mapper from each document's store.
///
/// Consecutive documents mapped to the same path share one open file; a
/// new path closes the current file and creates (truncating) the next one.
/// Call [`finish`](Self::finish) to flush and surface write errors.
pub struct FileSystemSink<W, M>
where
    W: DocumentWriter,
    M: Fn(&str) -> PathBuf,
{
    writer: W,
    mapper: M,
    current: Option<(PathBuf, BufWriter<File>)>,
}

impl<W, M> FileSystemSink<W, M>
where
    W: DocumentWriter,
    M: Fn(&str) -> PathBuf,
{
    pub fn new(writer: W, mapper: M) -> Self {
        Self {
            writer,
            mapper,
            current: None,
        }
    }

    pub fn add(&mut self, document: &Document) -> OkayResult<()> {
        let target = (self.mapper)(&document.store);
        let switch = match &self.current {
            Some((path, _)) => *path != target,
            None => true,
        };
        if switch {
            self.close()?;
            let file = File::create(&target).map_err(|e| io_error(&target, e))?;
            debug!(path = %target.display(), "opened output file");
            self.current = Some((target, BufWriter::new(file)));
        }

        match self.current.as_mut() {
            Some((_, out)) => self.writer.add(out, &document.contents),
            None => Ok(()),
        }
    }

    /// Close the open file, if any.
    pub fn finish(mut self) -> OkayResult<()> {
        self.close()
    }

    fn close(&mut self) -> OkayResult<()> {
        let Some((path, mut out)) = self.current.take() else {
            return Ok(());
        };
        self.writer.end(&mut out)?;
        out.flush().map_err(|e| io_error(&path, e))?;
        debug!(path = %path.display(), "closed output file");
        Ok(())
    }
}

impl<W, M> Drop for FileSystemSink<W, M>
where
    W: DocumentWriter,
    M: Fn(&str) -> PathBuf,
{
    fn drop(&mut self) {
        if let Err(e) = self.close() {
            warn!(error = %e, "failed to close output file");
        }
    }
}

/// A mapper sending every document to `path`.
pub fn single_file(path: impl Into<PathBuf>) -> impl Fn(&str) -> PathBuf {
    let path = path.into();
    move |_| path.clone()
}

/// A mapper writing each store's documents into `dir` under the store's
/// file name.
pub fn into_directory(dir: impl Into<PathBuf>) -> impl Fn(&str) -> PathBuf {
    let dir = dir.into();
    move |store| match Path::new(store).file_name() {
        Some(name) => dir.join(name),
        None => dir.join("documents.jsonl"),
    }
}

fn io_error(path: &Path, e: std::io::Error) -> OkayError {
    OkayError::Io {
        reason: format!("'{}': {}", path.display(), e),
    }
}
