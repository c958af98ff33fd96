//! File attachments for direct costs.
//!
//! All files go up in one multipart PATCH against the direct cost, as
//! fields `attachments[0]`, `attachments[1]`, ... in the order given. The
//! request either succeeds for every file or fails as a whole.

use std::path::{Path, PathBuf};

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use crate::client::{read_json, ProcoreClient};
use crate::error::{json_kind, ProcoreError, Result};
use crate::models::direct_cost_path;
use crate::pagination::Record;

/// MIME type used when the file contents are not recognised.
pub const OCTET_STREAM: &str = "application/octet-stream";

const TEXT_PLAIN: &str = "text/plain";

/// What gets sent for one local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentSpec {
    pub path: PathBuf,
    /// Base name of `path`, sent as the part's file name.
    pub file_name: String,
    /// MIME type inferred from the file contents.
    pub mime_type: String,
}

impl AttachmentSpec {
    pub fn new(path: &Path, contents: &[u8]) -> Self {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "attachment".to_string());

        Self {
            path: path.to_path_buf(),
            file_name,
            mime_type: infer_mime_type(contents).to_string(),
        }
    }
}

/// Infer a MIME type from file contents.
///
/// Known binary signatures win; otherwise non-empty UTF-8 without NUL
/// bytes is `text/plain`, and everything else is `application/octet-stream`.
pub fn infer_mime_type(contents: &[u8]) -> &'static str {
    if let Some(kind) = infer::get(contents) {
        return kind.mime_type();
    }

    if !contents.is_empty() && !contents.contains(&0) && std::str::from_utf8(contents).is_ok() {
        return TEXT_PLAIN;
    }

    OCTET_STREAM
}

/// Multipart field name for the attachment at `index`.
pub fn attachment_field(index: usize) -> String {
    format!("attachments[{index}]")
}

/// Read every file and build the multipart body.
///
/// # Errors
///
/// Returns [`ProcoreError::AttachmentError`] for the first file that cannot
/// be read.
pub async fn build_form<P: AsRef<Path> + Sync>(paths: &[P]) -> Result<(Form, Vec<AttachmentSpec>)> {
    // Plain `filename="..."` for every part, as curl sends it, never RFC 5987 `filename*`.
    let mut form = Form::new().percent_encode_noop();
    let mut specs = Vec::with_capacity(paths.len());

    for (index, path) in paths.iter().enumerate() {
        let path = path.as_ref();
        let contents = tokio::fs::read(path)
            .await
            .map_err(|source| ProcoreError::AttachmentError {
                path: path.to_path_buf(),
                source,
            })?;

        let spec = AttachmentSpec::new(path, &contents);
        tracing::debug!(
            field = %attachment_field(index),
            file = %spec.file_name,
            mime = %spec.mime_type,
            "prepared attachment"
        );

        let part = Part::bytes(contents)
            .file_name(spec.file_name.clone())
            .mime_str(&spec.mime_type)?;
        form = form.part(attachment_field(index), part);
        specs.push(spec);
    }

    Ok((form, specs))
}

/// Attach `paths` to a direct cost and return the updated record.
///
/// # Errors
///
/// Returns an error if `paths` is empty, a file cannot be read, the request
/// fails, or the response is not a JSON object.
#[tracing::instrument(skip(client, paths), fields(files = paths.len()))]
pub async fn upload<P: AsRef<Path> + Sync>(
    client: &ProcoreClient,
    company_id: u64,
    project_id: u64,
    direct_cost_id: u64,
    paths: &[P],
) -> Result<Record> {
    if paths.is_empty() {
        return Err(ProcoreError::InvalidArgument(
            "at least one attachment is required".to_string(),
        ));
    }

    let (form, specs) = build_form(paths).await?;

    let path = direct_cost_path(project_id, direct_cost_id);
    let response = client.patch_multipart(&path, Some(company_id), form).await?;

    match read_json(response).await? {
        Value::Object(record) => {
            tracing::info!(attached = specs.len(), "uploaded attachments");
            Ok(record)
        }
        other => Err(ProcoreError::UnexpectedShape {
            expected: "object",
            found: json_kind(&other),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_HEADER: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0x0D];

    #[test]
    fn test_infer_mime_type() {
        assert_eq!(infer_mime_type(PNG_HEADER), "image/png");
        assert_eq!(infer_mime_type(b"%PDF-1.7\n%\xE2\xE3\xCF\xD3\n"), "application/pdf");
        assert_eq!(infer_mime_type(b"date,amount\n2024-03-15,12.50\n"), "text/plain");
        assert_eq!(infer_mime_type(&[0x00, 0xFF, 0x13, 0x37]), OCTET_STREAM);
        assert_eq!(infer_mime_type(&[]), OCTET_STREAM);
    }

    #[test]
    fn test_spec_uses_base_name() {
        let spec = AttachmentSpec::new(Path::new("/tmp/receipts/march.png"), PNG_HEADER);
        assert_eq!(spec.file_name, "march.png");
        assert_eq!(spec.mime_type, "image/png");
    }

    #[test]
    fn test_attachment_field() {
        assert_eq!(attachment_field(0), "attachments[0]");
        assert_eq!(attachment_field(12), "attachments[12]");
    }

    #[tokio::test]
    async fn test_build_form_reports_unreadable_file() {
        let missing = std::env::temp_dir().join("procore-api-missing-attachment.bin");
        let err = build_form(&[missing.clone()]).await.unwrap_err();
        match err {
            ProcoreError::AttachmentError { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
