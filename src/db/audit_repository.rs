//! Audit log repository
//!
//! Append-only; the application only ever inserts and lists.

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;

use super::parse_db_timestamp;
use crate::models::{AuditLogEntry, AuditLogQuery};

#[derive(Debug, sqlx::FromRow)]
struct AuditRow {
    id: i64,
    created_at: String,
    actor: String,
    action: String,
    target_id: Option<String>,
    details: Option<String>,
}

pub struct AuditRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuditRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn insert(
        &self,
        actor: &str,
        action: &str,
        target_id: Option<&str>,
        details: Option<&serde_json::Value>,
    ) -> Result<()> {
        let created_at = Utc::now().to_rfc3339();
        let details_str = details.map(|d| d.to_string());

        sqlx::query(
            r#"
            INSERT INTO audit_log (created_at, actor, action, target_id, details)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&created_at)
        .bind(actor)
        .bind(action)
        .bind(target_id)
        .bind(details_str.as_deref())
        .execute(self.pool)
        .await
        .context("Failed to insert audit log entry")?;

        Ok(())
    }

    pub async fn list(&self, query: &AuditLogQuery) -> Result<Vec<AuditLogEntry>> {
        let mut sql = String::from(
            "SELECT id, created_at, actor, action, target_id, details FROM audit_log WHERE 1 = 1",
        );

        if query.action.is_some() {
            sql.push_str(" AND action = ?");
        }
        if query.target_id.is_some() {
            sql.push_str(" AND target_id = ?");
        }

        sql.push_str(" ORDER BY created_at DESC");

        if query.limit.is_some() {
            sql.push_str(" LIMIT ?");
        } else {
            sql.push_str(" LIMIT 100");
        }
        if query.offset.is_some() {
            sql.push_str(" OFFSET ?");
        }

        let mut q = sqlx::query_as::<_, AuditRow>(&sql);
        if let Some(ref action) = query.action {
            q = q.bind(action);
        }
        if let Some(ref target_id) = query.target_id {
            q = q.bind(target_id);
        }
        if let Some(limit) = query.limit {
            q = q.bind(limit as i64);
        }
        if let Some(offset) = query.offset {
            q = q.bind(offset as i64);
        }

        let rows = q
            .fetch_all(self.pool)
            .await
            .context("Failed to list audit log entries")?;

        Ok(rows.into_iter().map(row_to_audit).collect())
    }
}

fn row_to_audit(row: AuditRow) -> AuditLogEntry {
    AuditLogEntry {
        id: row.id,
        created_at: parse_db_timestamp(&row.created_at),
        actor: row.actor,
        action: row.action,
        target_id: row.target_id,
        details: row.details.and_then(|s| serde_json::from_str(&s).ok()),
    }
}
