//! Case folder repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_db_timestamp;
use crate::models::CaseFolder;

#[derive(Debug, sqlx::FromRow)]
struct CaseFolderRow {
    id: i64,
    customer_id: String,
    case_number: String,
    description: Option<String>,
    path: String,
    created_at: String,
}

const CASE_FOLDER_COLUMNS: &str = "id, customer_id, case_number, description, path, created_at";

pub struct CaseFolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CaseFolderRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_for_customer(&self, customer_id: Uuid) -> Result<Vec<CaseFolder>> {
        let rows = sqlx::query_as::<_, CaseFolderRow>(&format!(
            "SELECT {} FROM case_folders WHERE customer_id = ? ORDER BY case_number",
            CASE_FOLDER_COLUMNS
        ))
        .bind(customer_id.to_string())
        .fetch_all(self.pool)
        .await
        .context("Failed to list case folders")?;

        Ok(rows.into_iter().map(row_to_case_folder).collect())
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<CaseFolder>> {
        let row = sqlx::query_as::<_, CaseFolderRow>(&format!(
            "SELECT {} FROM case_folders WHERE id = ?",
            CASE_FOLDER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get case folder")?;

        Ok(row.map(row_to_case_folder))
    }

    pub async fn get_by_path(&self, path: &str) -> Result<Option<CaseFolder>> {
        let row = sqlx::query_as::<_, CaseFolderRow>(&format!(
            "SELECT {} FROM case_folders WHERE path = ?",
            CASE_FOLDER_COLUMNS
        ))
        .bind(path)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get case folder by path")?;

        Ok(row.map(row_to_case_folder))
    }

    pub async fn insert(
        &self,
        customer_id: Uuid,
        case_number: &str,
        description: Option<&str>,
        path: &str,
    ) -> Result<CaseFolder> {
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(
            r#"
            INSERT INTO case_folders (customer_id, case_number, description, path, created_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(customer_id.to_string())
        .bind(case_number)
        .bind(description)
        .bind(path)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to insert case folder")?;

        let id = result.last_insert_rowid();
        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created case folder")
    }

    /// Point a case folder at its new owner and filesystem location after a
    /// move. Returns the number of rows affected.
    pub async fn update_owner_and_path(
        &self,
        id: i64,
        customer_id: Uuid,
        path: &str,
    ) -> Result<u64> {
        let result = sqlx::query("UPDATE case_folders SET customer_id = ?, path = ? WHERE id = ?")
            .bind(customer_id.to_string())
            .bind(path)
            .bind(id)
            .execute(self.pool)
            .await
            .context("Failed to update case folder after move")?;

        Ok(result.rows_affected())
    }
}

fn row_to_case_folder(row: CaseFolderRow) -> CaseFolder {
    CaseFolder {
        id: row.id,
        customer_id: Uuid::parse_str(&row.customer_id).unwrap_or_else(|_| Uuid::nil()),
        case_number: row.case_number,
        description: row.description,
        path: row.path,
        created_at: parse_db_timestamp(&row.created_at),
    }
}
