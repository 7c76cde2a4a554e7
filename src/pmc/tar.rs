//! Temporary storage and reading of PMC Open Access article packages
//!
//! A package is a gzip-compressed tar archive holding the article's `.nxml`
//! document alongside figures and supplementary files.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

use crate::error::{CorpusError, Result};
use flate2::read::GzDecoder;
use tar::Archive;
use tempfile::TempPath;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A downloaded package on local disk
///
/// The file is removed when the value is dropped, whether extraction
/// succeeded, failed, or was never attempted.
#[derive(Debug)]
pub struct TempArchive {
    path: TempPath,
}

impl TempArchive {
    /// Create an empty, uniquely named `.tar.gz` file in the system temp directory
    ///
    /// Returns the guard together with an async handle for writing the body.
    pub fn create() -> Result<(Self, tokio::fs::File)> {
        let named = tempfile::Builder::new()
            .prefix("pmc-")
            .suffix(".tar.gz")
            .tempfile()
            .map_err(|e| CorpusError::io("Failed to create temporary file", e))?;

        let (file, path) = named.into_parts();
        debug!(path = %path.display(), "Created temporary archive");

        Ok((Self { path }, tokio::fs::File::from_std(file)))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the `.nxml` document out of this archive
    pub fn read_nxml(&self) -> Result<String> {
        read_nxml_from_archive(&self.path)
    }
}

/// Read the first `.nxml` member of a tar archive, gzip-compressed or plain
pub fn read_nxml_from_archive<P: AsRef<Path>>(archive_path: P) -> Result<String> {
    let archive_path = archive_path.as_ref();

    let mut file = File::open(archive_path)
        .map_err(|e| CorpusError::io("Failed to open tar archive", e))?;

    let mut magic = [0u8; 2];
    let compressed = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        Err(_) => false,
    };
    file.seek(SeekFrom::Start(0))
        .map_err(|e| CorpusError::io("Failed to rewind tar archive", e))?;

    let reader: Box<dyn Read> = if compressed {
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };
    let mut archive = Archive::new(reader);

    for entry in archive
        .entries()
        .map_err(|e| CorpusError::io("Failed to read tar entries", e))?
    {
        let mut entry = entry.map_err(|e| CorpusError::io("Failed to read tar entry", e))?;

        let name = entry
            .path()
            .map_err(|e| CorpusError::io("Failed to get entry path", e))?
            .to_string_lossy()
            .into_owned();

        if !name.ends_with(".nxml") {
            continue;
        }

        debug!(member = %name, "Found NXML member");
        let mut content = String::new();
        entry
            .read_to_string(&mut content)
            .map_err(|e| CorpusError::io(&format!("Failed to read {name}"), e))?;
        return Ok(content);
    }

    Err(CorpusError::ArchiveMissingDocument {
        path: archive_path.display().to_string(),
    })
}
