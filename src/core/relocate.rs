//! Moving finished downloads into the destination tree
//!
//! Exports land in the browser's scratch directory under whatever name
//! Booker gives them. Each one is renamed to
//! `<root>/<Entity>[/<location>]/<Entity>[ <start>[-<end>]].csv`.

use crate::core::wait::is_completed_download;
use crate::domain::{EntityType, RelocateError, Result};
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

const FILE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Destination file name for an export
///
/// The end date is only used together with a start date.
pub fn destination_file_name(
    entity: EntityType,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> String {
    let mut name = entity.as_str().to_string();
    if let Some(start) = start {
        name.push(' ');
        name.push_str(&start.format(FILE_DATE_FORMAT).to_string().replace('/', "_"));
        if let Some(end) = end {
            name.push('-');
            name.push_str(&end.format(FILE_DATE_FORMAT).to_string().replace('/', "_"));
        }
    }
    name.push_str(".csv");
    name
}

/// Destination directory for an export
pub fn destination_dir(root: &Path, entity: EntityType, location: Option<&str>) -> PathBuf {
    let mut dir = root.join(entity.as_str());
    if let Some(location) = location {
        dir.push(location.replace('/', "_"));
    }
    dir
}

/// Full destination path for an export; pure
pub fn destination_path(
    root: &Path,
    entity: EntityType,
    location: Option<&str>,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> PathBuf {
    destination_dir(root, entity, location).join(destination_file_name(entity, start, end))
}

/// Moves exported files out of the scratch download directory
#[derive(Debug, Clone)]
pub struct FileRelocator {
    scratch_dir: PathBuf,
    destination_root: Option<PathBuf>,
}

impl FileRelocator {
    /// Creates a relocator; without a destination root every move is a no-op
    pub fn new(scratch_dir: impl Into<PathBuf>, destination_root: Option<PathBuf>) -> Self {
        Self {
            scratch_dir: scratch_dir.into(),
            destination_root,
        }
    }

    pub fn destination_root(&self) -> Option<&Path> {
        self.destination_root.as_deref()
    }

    /// Moves the single downloaded file for `entity` into place
    ///
    /// Returns the new path, or `None` when no destination root is
    /// configured and the file was left where it is.
    ///
    /// # Errors
    ///
    /// - [`RelocateError::NoFileFound`] if no file name contains the entity name
    /// - [`RelocateError::AmbiguousFile`] if more than one does
    /// - I/O errors from creating the directory or moving the file
    pub fn move_exported_file(
        &self,
        entity: EntityType,
        location: Option<&str>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Option<PathBuf>> {
        let Some(root) = self.destination_root.as_deref() else {
            tracing::debug!(entity = %entity, "No destination configured, leaving export in place");
            return Ok(None);
        };

        tracing::info!(entity = %entity, "Moving exported file");

        let dir = destination_dir(root, entity, location);
        fs::create_dir_all(&dir)?;

        let source = self.find_download(entity)?;
        let dest = dir.join(destination_file_name(entity, start, end));

        tracing::info!(
            source = %source.display(),
            destination = %dest.display(),
            "Relocating export"
        );
        move_file(&source, &dest)?;
        Ok(Some(dest))
    }

    fn find_download(&self, entity: EntityType) -> Result<PathBuf> {
        let mut matches = Vec::new();
        for entry in fs::read_dir(&self.scratch_dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.contains(entity.as_str()) && is_completed_download(&name) {
                matches.push(name);
            }
        }
        matches.sort();

        match matches.len() {
            0 => Err(RelocateError::NoFileFound(entity.to_string()).into()),
            1 => Ok(self.scratch_dir.join(&matches[0])),
            _ => Err(RelocateError::AmbiguousFile {
                entity: entity.to_string(),
                matches,
            }
            .into()),
        }
    }
}

/// Renames `source` to `dest`, copying when they are on different filesystems
fn move_file(source: &Path, dest: &Path) -> Result<()> {
    if fs::rename(source, dest).is_ok() {
        return Ok(());
    }
    fs::copy(source, dest)?;
    fs::remove_file(source)?;
    Ok(())
}
