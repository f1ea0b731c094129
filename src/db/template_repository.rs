//! Folder template repository
//!
//! The ordered subfolder list is persisted as JSON text in the `folders`
//! column.

use anyhow::{Context, Result};
use sqlx::SqlitePool;

use crate::models::{Template, UpdateTemplateRequest};

#[derive(Debug, sqlx::FromRow)]
struct TemplateRow {
    id: String,
    name: String,
    description: Option<String>,
    folders: String,
}

pub struct TemplateRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TemplateRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Template>> {
        let rows = sqlx::query_as::<_, TemplateRow>(
            "SELECT id, name, description, folders FROM templates ORDER BY name",
        )
        .fetch_all(self.pool)
        .await
        .context("Failed to list templates")?;

        Ok(rows.into_iter().map(row_to_template).collect())
    }

    pub async fn get_by_id(&self, id: &str) -> Result<Option<Template>> {
        let row = sqlx::query_as::<_, TemplateRow>(
            "SELECT id, name, description, folders FROM templates WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get template")?;

        Ok(row.map(row_to_template))
    }

    pub async fn insert(&self, template: &Template) -> Result<Template> {
        let folders = serde_json::to_string(&template.folders)
            .context("Failed to serialize template folders")?;

        sqlx::query(
            r#"
            INSERT INTO templates (id, name, description, folders)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(&template.id)
        .bind(&template.name)
        .bind(template.description.as_deref())
        .bind(&folders)
        .execute(self.pool)
        .await
        .context("Failed to insert template")?;

        self.get_by_id(&template.id)
            .await?
            .context("Failed to retrieve created template")
    }

    pub async fn update(
        &self,
        id: &str,
        req: &UpdateTemplateRequest,
    ) -> Result<Option<Template>> {
        let existing = self.get_by_id(id).await?;
        let Some(existing) = existing else {
            return Ok(None);
        };

        let name = req.name.clone().unwrap_or(existing.name);
        let description = req.description.clone().or(existing.description);
        let folders = req.folders.clone().unwrap_or(existing.folders);
        let folders_json =
            serde_json::to_string(&folders).context("Failed to serialize template folders")?;

        sqlx::query("UPDATE templates SET name = ?, description = ?, folders = ? WHERE id = ?")
            .bind(&name)
            .bind(description.as_deref())
            .bind(&folders_json)
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to update template")?;

        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM templates WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to delete template")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM templates")
            .fetch_one(self.pool)
            .await
            .context("Failed to count templates")?;
        Ok(count)
    }
}

fn row_to_template(row: TemplateRow) -> Template {
    Template {
        id: row.id,
        name: row.name,
        description: row.description,
        folders: serde_json::from_str(&row.folders).unwrap_or_default(),
    }
}
