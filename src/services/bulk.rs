//! Bulk operations over customers
//!
//! Batch flows attempt each item independently and report per-item failures
//! in a summary instead of aborting the whole batch.

use std::path::Path;

use serde_json::json;
use uuid::Uuid;

use crate::db::{AuditRepository, CustomerRepository, DbPool};
use crate::models::{
    BatchFailure, BatchFieldUpdates, BatchOutcome, CreateCustomerRequest, Customer,
    ImportDirectoryRequest, RestoreOutcome, UpdateCustomerRequest,
};
use crate::services::migration::LegacyCustomerRecord;
use crate::services::AUDIT_ACTOR;
use crate::utils::{AppError, AppResult};

pub struct BulkService<'a> {
    pool: &'a DbPool,
}

impl<'a> BulkService<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn export_csv(&self, ids: &[Uuid]) -> AppResult<String> {
        let customers = self.selected(ids).await?;

        let mut out = String::from("ID,Name,Email,Phone,Address,Directory,Created\n");
        for customer in &customers {
            let row = [
                customer.id.to_string(),
                customer.name.clone(),
                customer.email.clone().unwrap_or_default(),
                customer.phone.clone().unwrap_or_default(),
                customer.address.clone().unwrap_or_default(),
                customer.directory.clone(),
                customer.created_at.to_rfc3339(),
            ];
            let escaped: Vec<String> = row.iter().map(|v| csv_escape(v)).collect();
            out.push_str(&escaped.join(","));
            out.push('\n');
        }

        Ok(out)
    }

    pub async fn export_json(&self, ids: &[Uuid]) -> AppResult<Vec<Customer>> {
        self.selected(ids).await
    }

    /// Apply one shared set of edited fields to every selected customer.
    pub async fn batch_update(
        &self,
        ids: &[Uuid],
        fields: &BatchFieldUpdates,
    ) -> AppResult<BatchOutcome> {
        if ids.is_empty() {
            return Err(AppError::validation("No customers selected"));
        }
        if fields.is_empty() {
            return Err(AppError::validation("No fields to update"));
        }

        let update = UpdateCustomerRequest {
            email: fields.email.clone(),
            phone: fields.phone.clone(),
            address: fields.address.clone(),
            ..Default::default()
        };

        let repo = CustomerRepository::new(self.pool);
        let mut outcome = BatchOutcome {
            succeeded: 0,
            failures: Vec::new(),
        };

        for id in ids {
            match repo.update(*id, &update).await {
                Ok(Some(_)) => outcome.succeeded += 1,
                Ok(None) => outcome.failures.push(BatchFailure {
                    id: id.to_string(),
                    error: "Customer not found".to_string(),
                }),
                Err(err) => outcome.failures.push(BatchFailure {
                    id: id.to_string(),
                    error: AppError::from(err).to_string(),
                }),
            }
        }

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.batch_update",
                None,
                Some(&json!({
                    "updated": outcome.succeeded,
                    "failed": outcome.failures.len(),
                })),
            )
            .await;

        Ok(outcome)
    }

    pub async fn batch_delete(&self, ids: &[Uuid]) -> AppResult<BatchOutcome> {
        if ids.is_empty() {
            return Err(AppError::validation("No customers selected"));
        }

        let repo = CustomerRepository::new(self.pool);
        let mut outcome = BatchOutcome {
            succeeded: 0,
            failures: Vec::new(),
        };

        for id in ids {
            match repo.delete(*id).await {
                Ok(true) => outcome.succeeded += 1,
                Ok(false) => outcome.failures.push(BatchFailure {
                    id: id.to_string(),
                    error: "Customer not found".to_string(),
                }),
                Err(err) => outcome.failures.push(BatchFailure {
                    id: id.to_string(),
                    error: AppError::from(err).to_string(),
                }),
            }
        }

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.batch_delete",
                None,
                Some(&json!({
                    "deleted": outcome.succeeded,
                    "failed": outcome.failures.len(),
                })),
            )
            .await;

        Ok(outcome)
    }

    /// Import immediate subdirectories of a parent directory as customers.
    /// With selections, only the named subdirectories are imported, under
    /// the given customer names.
    pub async fn import_from_directory(
        &self,
        req: &ImportDirectoryRequest,
    ) -> AppResult<BatchOutcome> {
        let parent = Path::new(&req.parent_dir);
        if !parent.is_dir() {
            return Err(AppError::filesystem(format!(
                "Selected directory does not exist: {}",
                req.parent_dir
            )));
        }

        let mut subdirs: Vec<String> = std::fs::read_dir(parent)?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().into_string().ok())
            .collect();
        subdirs.sort();

        if subdirs.is_empty() {
            return Err(AppError::validation(
                "No subdirectories found in selected directory",
            ));
        }

        // (directory name, customer name) pairs to import
        let chosen: Vec<(String, String)> = match &req.selections {
            Some(selections) => selections
                .iter()
                .map(|s| {
                    let name = s
                        .customer_name
                        .as_deref()
                        .map(str::trim)
                        .filter(|n| !n.is_empty())
                        .unwrap_or(&s.dir_name);
                    (s.dir_name.clone(), name.to_string())
                })
                .collect(),
            None => subdirs.iter().map(|d| (d.clone(), d.clone())).collect(),
        };

        if chosen.is_empty() {
            return Err(AppError::validation("No directories selected for import"));
        }

        let repo = CustomerRepository::new(self.pool);
        let mut outcome = BatchOutcome {
            succeeded: 0,
            failures: Vec::new(),
        };

        for (dir_name, customer_name) in &chosen {
            if !subdirs.contains(dir_name) {
                outcome.failures.push(BatchFailure {
                    id: dir_name.clone(),
                    error: "Subdirectory not found".to_string(),
                });
                continue;
            }

            let full_path = parent.join(dir_name).to_string_lossy().to_string();
            let create = CreateCustomerRequest {
                name: customer_name.clone(),
                email: None,
                phone: None,
                address: None,
                notes: None,
                directory: full_path,
            };

            match repo.insert(&create).await {
                Ok(_) => outcome.succeeded += 1,
                Err(err) => outcome.failures.push(BatchFailure {
                    id: dir_name.clone(),
                    error: AppError::from(err).to_string(),
                }),
            }
        }

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "bulk.import_directory",
                None,
                Some(&json!({
                    "parent_dir": req.parent_dir,
                    "imported": outcome.succeeded,
                    "failed": outcome.failures.len(),
                })),
            )
            .await;

        Ok(outcome)
    }

    /// Re-add customers from a legacy JSON export. Duplicate directories are
    /// classified as skipped rather than failed.
    pub async fn restore_from_json(&self, path: &str) -> AppResult<RestoreOutcome> {
        let file = Path::new(path);
        if !file.is_file() {
            return Err(AppError::filesystem(format!(
                "Restore file does not exist: {}",
                path
            )));
        }

        let contents = std::fs::read_to_string(file)?;
        let records: Vec<LegacyCustomerRecord> = serde_json::from_str(&contents)?;

        let repo = CustomerRepository::new(self.pool);
        let mut outcome = RestoreOutcome {
            restored: 0,
            skipped: 0,
            failures: Vec::new(),
        };

        for record in &records {
            let Some(create) = record.to_create_request() else {
                outcome.failures.push(BatchFailure {
                    id: record.id.clone().unwrap_or_default(),
                    error: "Missing name or directory".to_string(),
                });
                continue;
            };

            match repo.insert(&create).await {
                Ok(_) => outcome.restored += 1,
                Err(err) => match AppError::from(err) {
                    AppError::Conflict(_) => outcome.skipped += 1,
                    other => outcome.failures.push(BatchFailure {
                        id: record.id.clone().unwrap_or_default(),
                        error: other.to_string(),
                    }),
                },
            }
        }

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "bulk.restore",
                None,
                Some(&json!({
                    "path": path,
                    "restored": outcome.restored,
                    "skipped": outcome.skipped,
                    "failed": outcome.failures.len(),
                })),
            )
            .await;

        Ok(outcome)
    }

    async fn selected(&self, ids: &[Uuid]) -> AppResult<Vec<Customer>> {
        if ids.is_empty() {
            return Err(AppError::validation(
                "Please select at least one customer to export",
            ));
        }
        let customers = CustomerRepository::new(self.pool).list_by_ids(ids).await?;
        Ok(customers)
    }
}

/// Quote a CSV value when it contains separators, quotes or newlines.
fn csv_escape(value: &str) -> String {
    if value.contains(',') || value.contains('"') || value.contains('\n') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
