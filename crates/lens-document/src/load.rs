//! Loading documents from disk together with their structure.

use std::{
    fs,
    path::{Path, PathBuf},
    time::SystemTime,
};

use crate::{DocumentError, StructureCache, build_structure};

/// File metadata carried alongside a document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStat {
    /// Creation time in milliseconds since the Unix epoch (0 when unknown).
    pub ctime: u64,
    /// Modification time in milliseconds since the Unix epoch (0 when unknown).
    pub mtime: u64,
    /// Size in bytes.
    pub size: u64,
}

/// A document read from disk.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    /// Path the document was read from.
    pub path: PathBuf,
    /// Lower-case extension without the dot.
    pub extension: String,
    /// Full file contents.
    pub content: String,
    /// File metadata.
    pub stat: FileStat,
    /// Structural metadata. Plain text and canvas files carry none.
    pub structure: StructureCache,
}

/// Loads a document, detecting type by extension.
///
/// Supported extensions:
/// - `.md`, `.markdown` - structured as markdown
/// - `.txt`, `.canvas` - loaded without structure (`sections` is `None`)
pub fn load_document(path: &Path) -> Result<LoadedDocument, DocumentError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    let structured = match extension.as_str() {
        "md" | "markdown" => true,
        "txt" | "canvas" => false,
        _ => {
            return Err(DocumentError::UnsupportedFileType {
                path: path.to_path_buf(),
                extension,
            });
        }
    };

    let read_err = |source| DocumentError::ReadFile {
        path: path.to_path_buf(),
        source,
    };
    let content = fs::read_to_string(path).map_err(read_err)?;
    let metadata = fs::metadata(path).map_err(read_err)?;

    let structure = if structured {
        build_structure(&content)
    } else {
        StructureCache::default()
    };

    Ok(LoadedDocument {
        path: path.to_path_buf(),
        extension,
        stat: FileStat {
            ctime: metadata.created().map(millis).unwrap_or(0),
            mtime: metadata.modified().map(millis).unwrap_or(0),
            size: metadata.len(),
        },
        content,
        structure,
    })
}

/// Milliseconds since the Unix epoch, saturating at zero for earlier times.
fn millis(time: SystemTime) -> u64 {
    time.duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
        .unwrap_or(0)
}
