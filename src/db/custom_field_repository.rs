//! Custom field repository
//!
//! Definitions plus a generic value table keyed by (definition, entity);
//! values are upserted on that pair.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    CreateFieldDefinitionRequest, CustomFieldDefinition, CustomFieldValue, EntityKind, FieldType,
};

#[derive(Debug, sqlx::FromRow)]
struct DefinitionRow {
    id: String,
    name: String,
    label: String,
    field_type: String,
    entity: String,
}

#[derive(Debug, sqlx::FromRow)]
struct ValueRow {
    definition_id: String,
    entity_id: String,
    value: Option<String>,
}

pub struct CustomFieldRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomFieldRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_definitions(
        &self,
        entity: Option<EntityKind>,
    ) -> Result<Vec<CustomFieldDefinition>> {
        let mut sql = String::from(
            "SELECT id, name, label, field_type, entity FROM custom_field_definitions",
        );
        if entity.is_some() {
            sql.push_str(" WHERE entity = ?");
        }
        sql.push_str(" ORDER BY name");

        let mut q = sqlx::query_as::<_, DefinitionRow>(&sql);
        if let Some(entity) = entity {
            q = q.bind(entity.as_str());
        }

        let rows = q
            .fetch_all(self.pool)
            .await
            .context("Failed to list custom field definitions")?;

        Ok(rows.into_iter().filter_map(row_to_definition).collect())
    }

    pub async fn get_definition(&self, id: Uuid) -> Result<Option<CustomFieldDefinition>> {
        let row = sqlx::query_as::<_, DefinitionRow>(
            "SELECT id, name, label, field_type, entity FROM custom_field_definitions WHERE id = ?",
        )
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get custom field definition")?;

        Ok(row.and_then(row_to_definition))
    }

    pub async fn insert_definition(
        &self,
        req: &CreateFieldDefinitionRequest,
    ) -> Result<CustomFieldDefinition> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO custom_field_definitions (id, name, label, field_type, entity)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(&req.label)
        .bind(req.field_type.as_str())
        .bind(req.entity.as_str())
        .execute(self.pool)
        .await
        .context("Failed to insert custom field definition")?;

        self.get_definition(id)
            .await?
            .context("Failed to retrieve created custom field definition")
    }

    /// Cascades to the definition's values.
    pub async fn delete_definition(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM custom_field_definitions WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete custom field definition")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn upsert_value(
        &self,
        definition_id: Uuid,
        entity_id: &str,
        value: Option<&str>,
    ) -> Result<CustomFieldValue> {
        sqlx::query(
            r#"
            INSERT INTO custom_field_values (definition_id, entity_id, value)
            VALUES (?, ?, ?)
            ON CONFLICT (definition_id, entity_id) DO UPDATE SET value = excluded.value
            "#,
        )
        .bind(definition_id.to_string())
        .bind(entity_id)
        .bind(value)
        .execute(self.pool)
        .await
        .context("Failed to upsert custom field value")?;

        Ok(CustomFieldValue {
            definition_id,
            entity_id: entity_id.to_string(),
            value: value.map(|v| v.to_string()),
        })
    }

    pub async fn values_for_entity(&self, entity_id: &str) -> Result<Vec<CustomFieldValue>> {
        let rows = sqlx::query_as::<_, ValueRow>(
            "SELECT definition_id, entity_id, value FROM custom_field_values WHERE entity_id = ?",
        )
        .bind(entity_id)
        .fetch_all(self.pool)
        .await
        .context("Failed to list custom field values")?;

        Ok(rows
            .into_iter()
            .map(|row| CustomFieldValue {
                definition_id: Uuid::parse_str(&row.definition_id)
                    .unwrap_or_else(|_| Uuid::nil()),
                entity_id: row.entity_id,
                value: row.value,
            })
            .collect())
    }
}

fn row_to_definition(row: DefinitionRow) -> Option<CustomFieldDefinition> {
    Some(CustomFieldDefinition {
        id: Uuid::parse_str(&row.id).ok()?,
        name: row.name,
        label: row.label,
        field_type: FieldType::parse(&row.field_type)?,
        entity: EntityKind::parse(&row.entity)?,
    })
}
