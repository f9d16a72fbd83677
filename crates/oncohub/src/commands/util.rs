//! Shared helpers for command handlers.

use std::path::Path;

use serde::de::DeserializeOwned;

use oncohub_core::{CoreError, Slice, SliceState, UploadDocument};

use crate::error::CliError;

/// Snapshot `slice` after an operation; a failure becomes a CLI error
/// carrying the message the slice stored.
pub fn settled<T>(result: Result<(), CoreError>, slice: &Slice<T>) -> Result<SliceState<T>, CliError>
where
    T: Clone + Default,
{
    let state = slice.snapshot();
    match result {
        Ok(()) => Ok(state),
        Err(err) => Err(CliError::from_core(err, state.error)),
    }
}

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read and parse a JSON file for `--from-file` flags.
pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: path.display().to_string(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Media type from the file extension; unknown kinds are left for
/// validation to reject.
pub fn content_type_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "pdf" => "application/pdf",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "tif" | "tiff" => "image/tiff",
        _ => "application/octet-stream",
    }
}

/// Load a document for upload.
pub fn read_document(path: &Path) -> Result<UploadDocument, CliError> {
    let bytes = std::fs::read(path)?;
    let file_name = path
        .file_name()
        .map_or_else(|| "document".into(), |n| n.to_string_lossy().into_owned());
    Ok(UploadDocument {
        file_name,
        content_type: content_type_for(path).into(),
        bytes,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn content_type_from_extension() {
        assert_eq!(content_type_for(Path::new("scan.PDF")), "application/pdf");
        assert_eq!(content_type_for(Path::new("mri.jpeg")), "image/jpeg");
        assert_eq!(content_type_for(Path::new("notes.docx")), "application/octet-stream");
        assert_eq!(content_type_for(Path::new("README")), "application/octet-stream");
    }

    #[test]
    fn document_keeps_file_name() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blood.png");
        std::fs::write(&path, [0x89, b'P', b'N', b'G']).unwrap();

        let doc = read_document(&path).unwrap();
        assert_eq!(doc.file_name, "blood.png");
        assert_eq!(doc.content_type, "image/png");
        assert_eq!(doc.bytes.len(), 4);
    }
}
