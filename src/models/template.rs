//! Folder template model

use serde::{Deserialize, Serialize};

pub const DEFAULT_TEMPLATE_ID: &str = "default";

/// A named, ordered list of subfolder names applied at case folder creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Template {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub folders: Vec<String>,
}

impl Template {
    /// The template seeded on first startup.
    pub fn default_template() -> Self {
        Self {
            id: DEFAULT_TEMPLATE_ID.to_string(),
            name: "Default Template".to_string(),
            description: Some("Basic folder structure".to_string()),
            folders: vec![
                "Documents".to_string(),
                "Images".to_string(),
                "Notes".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateTemplateRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub folders: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub folders: Option<Vec<String>>,
}
