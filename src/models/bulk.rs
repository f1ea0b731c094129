//! Bulk operation request and outcome models

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExportRequest {
    pub ids: Vec<Uuid>,
    pub format: ExportFormat,
}

/// One shared set of edited fields applied to every selected customer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BatchFieldUpdates {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl BatchFieldUpdates {
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none() && self.address.is_none()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchUpdateRequest {
    pub ids: Vec<Uuid>,
    pub fields: BatchFieldUpdates,
}

#[derive(Debug, Clone, Deserialize)]
pub struct BatchDeleteRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchFailure {
    pub id: String,
    pub error: String,
}

/// Summary of a batch run; failed items never abort the rest.
#[derive(Debug, Clone, Serialize)]
pub struct BatchOutcome {
    pub succeeded: usize,
    pub failures: Vec<BatchFailure>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportSelection {
    /// Subdirectory name under the parent directory
    pub dir_name: String,
    /// Customer name to record; defaults to the directory name when empty
    #[serde(default)]
    pub customer_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportDirectoryRequest {
    pub parent_dir: String,
    /// When present only these subdirectories are imported, under the given
    /// names; when absent every immediate subdirectory is imported.
    #[serde(default)]
    pub selections: Option<Vec<ImportSelection>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RestoreRequest {
    /// Path of a legacy JSON export to restore customers from
    pub path: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestoreOutcome {
    pub restored: usize,
    /// Rows whose directory already existed
    pub skipped: usize,
    pub failures: Vec<BatchFailure>,
}
