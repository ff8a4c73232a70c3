//! Document serialization for sinks.

use std::io::Write;

use okay_contracts::error::{OkayError, OkayResult};
use serde_json::Value;

/// Serializes documents onto an output stream.
pub trait DocumentWriter {
    fn add(&mut self, out: &mut dyn Write, document: &Value) -> OkayResult<()>;

    /// Called once before an output stream is closed.
    fn end(&mut self, _out: &mut dyn Write) -> OkayResult<()> {
        Ok(())
    }
}

/// One compact JSON document per line.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLinesWriter;

impl DocumentWriter for JsonLinesWriter {
    fn add(&mut self, out: &mut dyn Write, document: &Value) -> OkayResult<()> {
        serde_json::to_writer(&mut *out, document).map_err(|e| OkayError::Io {
            reason: format!("failed to write document: {}", e),
        })?;
        out.write_all(b"\n").map_err(|e| OkayError::Io {
            reason: format!("failed to write document: {}", e),
        })
    }
}
