//! Case folder operations
//!
//! Creation and moves touch both the filesystem and the database; the
//! database row is authoritative, so a failed row write undoes the
//! filesystem change rather than leaving an orphaned folder.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use crate::db::{
    AuditRepository, CaseFolderRepository, CustomerRepository, DbPool, TemplateRepository,
};
use crate::models::{
    CaseFolder, CreateCaseFolderRequest, Customer, MoveCaseFolderRequest, Template,
};
use crate::services::AUDIT_ACTOR;
use crate::utils::fs::{
    case_folder_name, open_directory, sanitize_case_number, update_case_info_after_move,
    write_case_info,
};
use crate::utils::validation::validate_case_number;
use crate::utils::{AppError, AppResult};

pub struct CaseFolderService<'a> {
    pool: &'a DbPool,
}

impl<'a> CaseFolderService<'a> {
    pub fn new(pool: &'a DbPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, customer_id: Uuid) -> AppResult<Vec<CaseFolder>> {
        self.require_customer(customer_id).await?;
        let folders = CaseFolderRepository::new(self.pool)
            .list_for_customer(customer_id)
            .await?;
        Ok(folders)
    }

    pub async fn create(
        &self,
        customer_id: Uuid,
        req: &CreateCaseFolderRequest,
    ) -> AppResult<CaseFolder> {
        // Validation happens before any filesystem or database mutation.
        validate_case_number(&req.case_number).map_err(AppError::validation)?;

        let customer = self.require_customer(customer_id).await?;
        let customer_dir = Path::new(&customer.directory);
        if !customer_dir.is_dir() {
            return Err(AppError::filesystem(format!(
                "Customer directory not found: {}",
                customer.directory
            )));
        }

        let template = self.resolve_template(req.template_id.as_deref()).await?;

        let case_number = sanitize_case_number(&req.case_number);
        let description = req.description.clone().unwrap_or_default();
        let folder_name = case_folder_name(&case_number, &description);

        let case_path = customer_dir.join(&folder_name);
        if case_path.exists() {
            return Err(AppError::conflict(format!(
                "Case folder already exists: {}",
                folder_name
            )));
        }

        std::fs::create_dir_all(&case_path)?;

        if let Some(ref template) = template {
            for subfolder in &template.folders {
                if let Err(err) = std::fs::create_dir_all(case_path.join(subfolder)) {
                    warn!(
                        subfolder = %subfolder,
                        error = %err,
                        "Failed to create template subfolder"
                    );
                }
            }
        }

        write_case_info(
            &case_path,
            &case_number,
            &description,
            &customer.name,
            template.as_ref().map(|t| t.name.as_str()),
        );

        let path_str = case_path.to_string_lossy().to_string();
        let inserted = CaseFolderRepository::new(self.pool)
            .insert(
                customer_id,
                &case_number,
                req.description.as_deref(),
                &path_str,
            )
            .await;

        let folder = match inserted {
            Ok(folder) => folder,
            Err(db_err) => {
                // Undo the directory so the filesystem matches the database.
                if let Err(cleanup_err) = std::fs::remove_dir_all(&case_path) {
                    return Err(AppError::internal(format!(
                        "Case folder record failed and directory cleanup failed, \
                         state is inconsistent at {}: {}; cleanup: {}",
                        path_str, db_err, cleanup_err
                    )));
                }
                return Err(db_err.into());
            }
        };

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "case_folder.create",
                Some(&folder.id.to_string()),
                Some(&json!({
                    "customer_id": customer_id.to_string(),
                    "case_number": case_number,
                    "path": path_str,
                })),
            )
            .await;

        Ok(folder)
    }

    pub async fn move_folder(&self, req: &MoveCaseFolderRequest) -> AppResult<CaseFolder> {
        let source = self.require_customer(req.source_customer_id).await?;
        let target = self.require_customer(req.target_customer_id).await?;

        let source_dir = Path::new(&source.directory);
        if !source_dir.is_dir() {
            return Err(AppError::filesystem(format!(
                "Source customer directory not found: {}",
                source.directory
            )));
        }
        let target_dir = Path::new(&target.directory);
        if !target_dir.is_dir() {
            return Err(AppError::filesystem(format!(
                "Target customer directory not found: {}",
                target.directory
            )));
        }

        let source_path = source_dir.join(&req.folder_name);
        if !source_path.exists() {
            return Err(AppError::not_found(format!(
                "Case folder not found: {}",
                req.folder_name
            )));
        }

        let target_path = target_dir.join(&req.folder_name);
        if target_path.exists() {
            return Err(AppError::conflict(
                "A case folder with the same name already exists for the target customer",
            ));
        }

        let repo = CaseFolderRepository::new(self.pool);
        let record = repo
            .get_by_path(&source_path.to_string_lossy())
            .await?
            .ok_or_else(|| AppError::not_found("Case folder record not found"))?;

        std::fs::rename(&source_path, &target_path)?;

        let target_path_str = target_path.to_string_lossy().to_string();
        if let Err(db_err) = repo
            .update_owner_and_path(record.id, req.target_customer_id, &target_path_str)
            .await
        {
            return Err(rollback_move(&source_path, &target_path, db_err));
        }

        update_case_info_after_move(&target_path, &target.name, &source.name);

        let audit = AuditRepository::new(self.pool);
        let _ = audit
            .insert(
                AUDIT_ACTOR,
                "case_folder.move",
                Some(&record.id.to_string()),
                Some(&json!({
                    "folder_name": req.folder_name,
                    "from": source.id.to_string(),
                    "to": target.id.to_string(),
                })),
            )
            .await;

        repo.get_by_id(record.id)
            .await?
            .ok_or_else(|| AppError::internal("Case folder vanished after move"))
    }

    pub async fn open(&self, customer_id: Uuid, folder_name: &str) -> AppResult<()> {
        let customer = self.require_customer(customer_id).await?;
        let case_path = PathBuf::from(&customer.directory).join(folder_name);
        if !case_path.exists() {
            return Err(AppError::not_found(format!(
                "Case folder does not exist: {}",
                folder_name
            )));
        }
        open_directory(&case_path)
    }

    async fn require_customer(&self, id: Uuid) -> AppResult<Customer> {
        CustomerRepository::new(self.pool)
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("Customer not found"))
    }

    async fn resolve_template(&self, template_id: Option<&str>) -> AppResult<Option<Template>> {
        let Some(template_id) = template_id else {
            return Ok(None);
        };
        let template = TemplateRepository::new(self.pool)
            .get_by_id(template_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Template not found: {}", template_id)))?;
        Ok(Some(template))
    }
}

/// Move the folder back after a failed row update. The database error wins;
/// a failed rollback upgrades it to an inconsistent-state error.
fn rollback_move(source_path: &Path, target_path: &Path, db_err: anyhow::Error) -> AppError {
    match std::fs::rename(target_path, source_path) {
        Ok(()) => {
            warn!(
                folder = %target_path.display(),
                error = %db_err,
                "Case folder move rolled back after database failure"
            );
            db_err.into()
        }
        Err(rollback_err) => AppError::internal(format!(
            "Case folder move failed and rollback failed, folder is at {} but the \
             record was not updated: {}; rollback: {}",
            target_path.display(),
            db_err,
            rollback_err
        )),
    }
}
