//! Case folder model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseFolder {
    pub id: i64,
    pub customer_id: Uuid,
    pub case_number: String,
    pub description: Option<String>,
    pub path: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCaseFolderRequest {
    pub case_number: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Template whose subfolders are pre-created inside the case folder.
    #[serde(default)]
    pub template_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MoveCaseFolderRequest {
    pub source_customer_id: Uuid,
    pub folder_name: String,
    pub target_customer_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OpenCaseFolderRequest {
    pub customer_id: Uuid,
    pub folder_name: String,
}
