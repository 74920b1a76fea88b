//! Scoped side files used during save.

use std::io::{self, Write};
use std::path::Path;
use tempfile::{Builder, NamedTempFile};

/// Suffix of the vector side file (`<name>.<random>.tmp.ps`).
pub const TEMP_SUFFIX: &str = ".tmp.ps";

/// Suffix of a partially written output file.
const PARTIAL_SUFFIX: &str = ".part";

/// Create an empty temp file in the same directory as `target`, named after it.
fn sibling_of(target: &Path, suffix: &str) -> io::Result<NamedTempFile> {
    let dir = match target.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let name = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    Builder::new()
        .prefix(&format!("{}.", name))
        .suffix(suffix)
        .tempfile_in(dir)
}

/// The PostScript side file written before any conversion.
///
/// Deleted on drop unless persisted; lives next to the target so the
/// fallback rename stays on one filesystem.
#[derive(Debug)]
pub struct TempVectorFile {
    file: NamedTempFile,
}

impl TempVectorFile {
    /// Write `contents` to a new side file next to `target`.
    pub fn create_for(target: &Path, contents: &str) -> io::Result<Self> {
        let mut file = sibling_of(target, TEMP_SUFFIX)?;
        file.write_all(contents.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Move the file to `dest`, replacing anything already there.
    /// On failure the side file is still removed.
    pub fn persist(self, dest: &Path) -> io::Result<()> {
        self.file.persist(dest).map(drop).map_err(|e| e.error)
    }

    /// Delete the file now, reporting failure instead of ignoring it.
    pub fn discard(self) -> io::Result<()> {
        self.file.close()
    }
}

/// Write `bytes` to `target` through a sibling file, so a failed write never
/// leaves a truncated file at `target`.
pub fn write_replacing(target: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut file = sibling_of(target, PARTIAL_SUFFIX)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(target).map(drop).map_err(|e| e.error)
}
