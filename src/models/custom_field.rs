//! Custom field models
//!
//! User-defined extra attributes attachable to a customer or case folder via
//! a generic definition/value pair of tables.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scalar type of a custom field value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Boolean,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "TEXT",
            FieldType::Number => "NUMBER",
            FieldType::Date => "DATE",
            FieldType::Boolean => "BOOLEAN",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "TEXT" => Some(FieldType::Text),
            "NUMBER" => Some(FieldType::Number),
            "DATE" => Some(FieldType::Date),
            "BOOLEAN" => Some(FieldType::Boolean),
            _ => None,
        }
    }
}

/// Which entity a definition attaches to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum EntityKind {
    Customer,
    Case,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Customer => "CUSTOMER",
            EntityKind::Case => "CASE",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "CUSTOMER" => Some(EntityKind::Customer),
            "CASE" => Some(EntityKind::Case),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldDefinition {
    pub id: Uuid,
    /// Internal name, unique and identifier-shaped
    pub name: String,
    /// Display label shown to users
    pub label: String,
    pub field_type: FieldType,
    pub entity: EntityKind,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateFieldDefinitionRequest {
    pub name: String,
    pub label: String,
    pub field_type: FieldType,
    pub entity: EntityKind,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomFieldValue {
    pub definition_id: Uuid,
    /// Customer UUID or case folder row id, depending on the definition
    pub entity_id: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SetFieldValueRequest {
    pub entity_id: String,
    pub value: Option<String>,
}
