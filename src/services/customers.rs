//! Customer operations
//!
//! Validation, audit logging and the directory-creation side effect live
//! here; SQL stays in the repositories.

use std::path::Path;

use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::db::{AuditRepository, CustomerRepository, DbPool};
use crate::models::{CreateCustomerRequest, Customer, CustomerFilter, UpdateCustomerRequest};
use crate::services::AUDIT_ACTOR;
use crate::utils::fs::sanitize_directory_name;
use crate::utils::{AppError, AppResult};

/// Result of a rename: renaming to the current name is an explicit no-op,
/// not an error.
#[derive(Debug)]
pub enum RenameOutcome {
    Renamed(Customer),
    Unchanged(Customer),
}

pub struct CustomerService<'a> {
    pool: &'a DbPool,
}

impl<'a> CustomerService<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &CustomerFilter) -> AppResult<Vec<Customer>> {
        let customers = CustomerRepository::new(self.pool).list(filter).await?;
        Ok(customers)
    }

    pub async fn get(&self, id: Uuid) -> AppResult<Option<Customer>> {
        let customer = CustomerRepository::new(self.pool).get_by_id(id).await?;
        Ok(customer)
    }

    pub async fn add(&self, req: &CreateCustomerRequest) -> AppResult<Customer> {
        if req.name.trim().is_empty() {
            return Err(AppError::validation("Customer name is required"));
        }
        if req.directory.trim().is_empty() {
            return Err(AppError::validation("Customer directory is required"));
        }
        req.validate()?;

        let customer = CustomerRepository::new(self.pool).insert(req).await?;

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.create",
                Some(&customer.id.to_string()),
                Some(&json!({ "name": customer.name, "directory": customer.directory })),
            )
            .await;

        Ok(customer)
    }

    pub async fn update(&self, id: Uuid, req: &UpdateCustomerRequest) -> AppResult<Customer> {
        if req.is_empty() {
            return Err(AppError::bad_request("No update data provided"));
        }
        if let Some(ref name) = req.name {
            if name.trim().is_empty() {
                return Err(AppError::validation("Customer name cannot be empty"));
            }
        }
        req.validate()?;

        let updated = CustomerRepository::new(self.pool)
            .update(id, req)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))?;

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.update",
                Some(&id.to_string()),
                Some(&json!({ "fields": updated_field_names(req) })),
            )
            .await;

        Ok(updated)
    }

    pub async fn rename(&self, id: Uuid, new_name: &str) -> AppResult<RenameOutcome> {
        let trimmed = new_name.trim();
        if trimmed.is_empty() {
            return Err(AppError::validation("Customer name cannot be empty"));
        }

        let repo = CustomerRepository::new(self.pool);
        let current = repo
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))?;

        if current.name == trimmed {
            return Ok(RenameOutcome::Unchanged(current));
        }

        let renamed = repo
            .update_name(id, trimmed)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))?;

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.rename",
                Some(&id.to_string()),
                Some(&json!({ "from": current.name, "to": trimmed })),
            )
            .await;

        Ok(RenameOutcome::Renamed(renamed))
    }

    /// Case folders go with the customer via the foreign-key cascade.
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let deleted = CustomerRepository::new(self.pool).delete(id).await?;
        if !deleted {
            return Err(AppError::not_found("Customer not found"));
        }

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(AUDIT_ACTOR, "customer.delete", Some(&id.to_string()), None)
            .await;

        Ok(())
    }

    /// Create a directory for a customer under a parent path, sanitizing the
    /// suggested name.
    pub async fn create_directory(
        &self,
        parent_dir: &str,
        suggested_name: &str,
    ) -> AppResult<String> {
        if parent_dir.trim().is_empty() {
            return Err(AppError::validation("Parent directory is required"));
        }
        let name = sanitize_directory_name(suggested_name.trim());
        if name.is_empty() {
            return Err(AppError::validation("Directory name is required"));
        }

        let parent = Path::new(parent_dir);
        if !parent.is_dir() {
            return Err(AppError::filesystem(format!(
                "Parent directory does not exist: {}",
                parent_dir
            )));
        }

        let new_dir = parent.join(&name);
        std::fs::create_dir_all(&new_dir)?;

        let path = new_dir.to_string_lossy().to_string();
        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "customer.create_directory",
                None,
                Some(&json!({ "path": path })),
            )
            .await;

        Ok(path)
    }
}

fn updated_field_names(req: &UpdateCustomerRequest) -> Vec<&'static str> {
    let mut fields = Vec::new();
    if req.name.is_some() {
        fields.push("name");
    }
    if req.email.is_some() {
        fields.push("email");
    }
    if req.phone.is_some() {
        fields.push("phone");
    }
    if req.address.is_some() {
        fields.push("address");
    }
    if req.notes.is_some() {
        fields.push("notes");
    }
    fields
}
