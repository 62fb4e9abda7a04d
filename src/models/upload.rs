//! Upload audit record

use serde::Serialize;
use uuid::Uuid;

/// Audit row written after a successful storage upload.
///
/// Writing this row is best-effort: a failure is logged and the upload still
/// counts as successful.
#[derive(Debug, Clone, Serialize)]
pub struct UploadRecord {
    pub file_name: String,
    pub file_path: String,
    pub file_size: i64,
    pub file_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<Uuid>,
}
