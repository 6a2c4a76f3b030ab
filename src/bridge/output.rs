//! Output-file lifetime for the path-level entry points.
//!
//! An `OutputFile` removes whatever it wrote unless `commit` succeeds, so a
//! failed call never leaves a file at the destination that looks like a
//! finished container.

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

use crate::error::HuffmanError;

pub(crate) struct OutputFile {
    sink: Sink,
    final_path: PathBuf,
}

enum Sink {
    /// Uniquely named temp file in the destination's directory; deleted by
    /// its own `Drop` unless persisted.
    Atomic(NamedTempFile),
    InPlace(InPlaceFile),
}

impl OutputFile {
    /// With `atomic`, writes go to a fresh temp file next to `path` and
    /// `commit` renames it onto `path`. Without it, `path` is written in place.
    pub(crate) fn create(path: &Path, atomic: bool) -> Result<Self, HuffmanError> {
        let unwritable = |source| HuffmanError::OutputUnwritable {
            path: path.to_path_buf(),
            source,
        };
        let sink = if atomic {
            Sink::Atomic(NamedTempFile::new_in(output_dir(path)).map_err(unwritable)?)
        } else {
            Sink::InPlace(InPlaceFile {
                file: Some(File::create(path).map_err(unwritable)?),
                path: path.to_path_buf(),
                committed: false,
            })
        };
        Ok(Self {
            sink,
            final_path: path.to_path_buf(),
        })
    }

    pub(crate) fn file(&self) -> Result<&File, HuffmanError> {
        match &self.sink {
            Sink::Atomic(temp) => Ok(temp.as_file()),
            Sink::InPlace(in_place) => in_place.file.as_ref().ok_or_else(|| {
                HuffmanError::InternalError("output file already closed".to_string())
            }),
        }
    }

    pub(crate) fn path(&self) -> &Path {
        &self.final_path
    }

    /// Syncs, closes and (if atomic) renames the file into place.
    pub(crate) fn commit(self) -> Result<(), HuffmanError> {
        let final_path = self.final_path;
        let unwritable = |source| HuffmanError::OutputUnwritable {
            path: final_path.clone(),
            source,
        };
        match self.sink {
            Sink::Atomic(temp) => {
                temp.as_file().sync_all().map_err(unwritable)?;
                temp.persist(&final_path).map_err(|e| unwritable(e.error))?;
            }
            Sink::InPlace(mut in_place) => {
                if let Some(file) = in_place.file.take() {
                    file.sync_all().map_err(unwritable)?;
                }
                in_place.committed = true;
            }
        }
        Ok(())
    }
}

/// A file written directly at its destination, removed on drop unless committed.
struct InPlaceFile {
    file: Option<File>,
    path: PathBuf,
    committed: bool,
}

impl Drop for InPlaceFile {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // Close before removing; some platforms refuse to delete open files.
        drop(self.file.take());
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!(
                    "Could not remove incomplete output '{}': {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// The directory the temp file must live in for the final rename to stay on
/// one filesystem.
fn output_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}
