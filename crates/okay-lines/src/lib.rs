//! # okay-lines
//!
//! JSON Lines plumbing around the okay validation engine: read documents
//! from files or directories, then route them to output files.
//!
//! ```rust,ignore
//! use okay_lines::{FileSystemSink, FileSystemSource, JsonLinesReader, JsonLinesWriter};
//!
//! let mut reader = JsonLinesReader::new(FileSystemSource::new("feeds/"));
//! let mut accepted = FileSystemSink::new(JsonLinesWriter, okay_lines::single_file("accepted.jsonl"));
//! for document in reader.documents()? {
//!     accepted.add(&document?)?;
//! }
//! accepted.finish()?;
//! ```

pub mod reader;
pub mod sink;
pub mod source;
pub mod writer;

pub use reader::{Document, Documents, JsonLinesReader};
pub use sink::{into_directory, single_file, FileSystemSink};
pub use source::{FileSystemSource, MemorySource, Source, Store, Stores};
pub use writer::{DocumentWriter, JsonLinesWriter};

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    /// Documents read from a directory and written through a sink come out
    /// unchanged, with malformed lines left behind as messages.
    #[test]
    fn test_directory_to_directory() {
        let input = tempfile::tempdir().unwrap();
        let output = tempfile::tempdir().unwrap();
        fs::write(input.path().join("a.jsonl"), "{\"id\":1}\nnot json\n").unwrap();
        fs::write(input.path().join("b.jsonl"), "\n{\"id\":3,\"tags\":[\"x\"]}\n").unwrap();

        let mut reader = JsonLinesReader::new(FileSystemSource::new(input.path()));
        let mut sink = FileSystemSink::new(JsonLinesWriter, into_directory(output.path()));
        let mut numbers = Vec::new();
        for document in reader.documents().unwrap() {
            let document = document.unwrap();
            numbers.push(document.number);
            sink.add(&document).unwrap();
        }
        sink.finish().unwrap();

        assert_eq!(numbers, vec![1, 3]);
        assert_eq!(reader.messages().len(), 1);
        assert_eq!(
            fs::read_to_string(output.path().join("a.jsonl")).unwrap(),
            "{\"id\":1}\n"
        );
        assert_eq!(
            fs::read_to_string(output.path().join("b.jsonl")).unwrap(),
            "{\"id\":3,\"tags\":[\"x\"]}\n"
        );
    }
}
