//! Pre-read checks for user-supplied import files.

use std::path::Path;

use crate::error::{StoreResult, ValidationError};

/// Largest accepted import file.
pub const MAX_IMPORT_BYTES: u64 = 2 * 1024 * 1024;

pub const CALENDAR_TYPES: &[&str] = &[".ics", "text/calendar"];
pub const JSON_TYPES: &[&str] = &[".json", "application/json"];

/// What is known about a file before reading it.
#[derive(Debug, Clone)]
pub struct ImportFile {
    pub name: String,
    pub mime: Option<String>,
    pub size: u64,
}

impl ImportFile {
    pub fn from_path(path: &Path) -> StoreResult<Self> {
        let metadata = std::fs::metadata(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(ImportFile {
            name,
            mime: None,
            size: metadata.len(),
        })
    }

    /// Check size, then type. Entries starting with `.` match the file
    /// extension, anything else must equal the MIME type. Both case-insensitive.
    pub fn validate(&self, allowed: &[&str], max_bytes: u64) -> Result<(), ValidationError> {
        if self.size > max_bytes {
            return Err(ValidationError::FileTooLarge {
                limit_mb: max_bytes as f64 / 1024.0 / 1024.0,
                actual_mb: self.size as f64 / 1024.0 / 1024.0,
            });
        }

        let name = self.name.to_lowercase();
        let mime = self.mime.as_deref().map(str::to_lowercase);
        let accepted = allowed.iter().any(|allowed_type| {
            let allowed_type = allowed_type.to_lowercase();
            if allowed_type.starts_with('.') {
                name.ends_with(&allowed_type)
            } else {
                mime.as_deref() == Some(allowed_type.as_str())
            }
        });

        if !accepted {
            return Err(ValidationError::InvalidFileType(allowed.join(", ")));
        }

        Ok(())
    }
}

/// Validate `path` against the allow-list and size cap, then read it as text.
pub fn read_import_file(path: &Path, allowed: &[&str], max_bytes: u64) -> StoreResult<String> {
    ImportFile::from_path(path)?.validate(allowed, max_bytes)?;
    Ok(std::fs::read_to_string(path)?)
}
