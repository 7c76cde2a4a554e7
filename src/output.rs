//! Flat text output: one line per document
//!
//! Each document's paragraphs are joined with blank lines and written as a
//! single record followed by a newline, in the order documents arrive.

use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{CorpusError, Result};
use crate::pmc::models::DocumentText;
use tracing::{debug, info};

/// Owner of the output file for one run
///
/// Buffered writes are flushed by `finish`; if the writer is dropped early
/// (an error unwinding the run) the buffer is still flushed on drop.
#[derive(Debug)]
pub struct CorpusWriter {
    writer: BufWriter<File>,
    path: PathBuf,
    documents: usize,
}

impl CorpusWriter {
    /// Create (or truncate) the output file
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| {
            CorpusError::io(&format!("Failed to create output file {}", path.display()), e)
        })?;
        Ok(Self::from_file(file, path))
    }

    /// Open the output file for appending, creating it if needed
    pub fn append<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| {
                CorpusError::io(&format!("Failed to open output file {}", path.display()), e)
            })?;
        Ok(Self::from_file(file, path))
    }

    fn from_file(file: File, path: &Path) -> Self {
        debug!(path = %path.display(), "Opened output file");
        Self {
            writer: BufWriter::new(file),
            path: path.to_path_buf(),
            documents: 0,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Documents written so far
    pub fn documents(&self) -> usize {
        self.documents
    }

    /// Write one document's joined text followed by a newline
    pub fn write_document(&mut self, document: &DocumentText) -> Result<()> {
        let text = document.joined();
        writeln!(self.writer, "{text}")
            .map_err(|e| CorpusError::io("Failed to write document", e))?;
        self.documents += 1;
        debug!(pmcid = %document.pmcid, bytes = text.len(), "Wrote document");
        Ok(())
    }

    /// Flush and close the file, returning the number of documents written
    pub fn finish(mut self) -> Result<usize> {
        self.writer
            .flush()
            .map_err(|e| CorpusError::io("Failed to flush output file", e))?;
        info!(
            path = %self.path.display(),
            documents = self.documents,
            "Saved document text"
        );
        Ok(self.documents)
    }
}
