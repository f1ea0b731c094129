//! One-time legacy JSON migration
//!
//! Earlier releases kept customers and templates in flat JSON files. On
//! startup, when the customers table is empty and the legacy file exists,
//! its rows are imported best-effort: bad rows are skipped and counted, and
//! the two phases (customers, templates) are not one transaction.

use std::path::Path;

use anyhow::Result;
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

use crate::config::LegacyDataConfig;
use crate::db::{AuditRepository, CustomerRepository, DbPool, TemplateRepository};
use crate::models::{CreateCustomerRequest, Template};
use crate::services::AUDIT_ACTOR;

/// A customer row as the legacy JSON files spelled it. Every field is
/// optional; rows without a name or directory are skipped.
#[derive(Debug, Clone, Deserialize)]
pub struct LegacyCustomerRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub directory: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl LegacyCustomerRecord {
    pub fn to_create_request(&self) -> Option<CreateCustomerRequest> {
        let name = self.name.as_deref()?.trim();
        let directory = self.directory.as_deref()?.trim();
        if name.is_empty() || directory.is_empty() {
            return None;
        }
        Some(CreateCustomerRequest {
            name: name.to_string(),
            email: self.email.clone().filter(|e| !e.is_empty()),
            phone: self.phone.clone().filter(|p| !p.is_empty()),
            address: self.address.clone().filter(|a| !a.is_empty()),
            notes: self.notes.clone().filter(|n| !n.is_empty()),
            directory: directory.to_string(),
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
struct LegacyTemplateRecord {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    folders: Vec<String>,
}

/// Seed the default template and run the legacy JSON import when needed.
pub async fn run_startup_migration(pool: &DbPool, legacy: &LegacyDataConfig) -> Result<()> {
    seed_default_template(pool).await?;

    let customer_repo = CustomerRepository::new(pool);
    if customer_repo.count().await? > 0 {
        return Ok(());
    }
    let customers_file = Path::new(&legacy.customers_file);
    if !customers_file.is_file() {
        return Ok(());
    }

    info!(file = %customers_file.display(), "Migrating legacy customer data");

    let (migrated, skipped) = migrate_customers(&customer_repo, customers_file).await;
    let templates = migrate_templates(pool, Path::new(&legacy.templates_file)).await;

    let audit = AuditRepository::new(pool);
    let _ = audit
        .insert(
            AUDIT_ACTOR,
            "migration.legacy_json",
            None,
            Some(&json!({
                "customers_migrated": migrated,
                "customers_skipped": skipped,
                "templates_migrated": templates,
            })),
        )
        .await;

    info!(
        customers = migrated,
        skipped = skipped,
        templates = templates,
        "Legacy migration finished"
    );

    Ok(())
}

async fn seed_default_template(pool: &DbPool) -> Result<()> {
    let repo = TemplateRepository::new(pool);
    if repo.count().await? == 0 {
        repo.insert(&Template::default_template()).await?;
        info!("Seeded default folder template");
    }
    Ok(())
}

async fn migrate_customers(
    repo: &CustomerRepository<'_>,
    customers_file: &Path,
) -> (usize, usize) {
    let records: Vec<LegacyCustomerRecord> = match std::fs::read_to_string(customers_file)
        .map_err(anyhow::Error::from)
        .and_then(|s| serde_json::from_str(&s).map_err(anyhow::Error::from))
    {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "Failed to read legacy customers file, skipping migration");
            return (0, 0);
        }
    };

    let mut migrated = 0;
    let mut skipped = 0;
    for record in &records {
        let Some(create) = record.to_create_request() else {
            skipped += 1;
            continue;
        };
        match repo.insert(&create).await {
            Ok(_) => migrated += 1,
            Err(err) => {
                warn!(
                    name = %create.name,
                    error = %err,
                    "Skipping legacy customer row"
                );
                skipped += 1;
            }
        }
    }

    (migrated, skipped)
}

async fn migrate_templates(pool: &DbPool, templates_file: &Path) -> usize {
    if !templates_file.is_file() {
        return 0;
    }

    let records: Vec<LegacyTemplateRecord> = match std::fs::read_to_string(templates_file)
        .map_err(anyhow::Error::from)
        .and_then(|s| serde_json::from_str(&s).map_err(anyhow::Error::from))
    {
        Ok(records) => records,
        Err(err) => {
            warn!(error = %err, "Failed to read legacy templates file, skipping");
            return 0;
        }
    };

    let repo = TemplateRepository::new(pool);
    let mut migrated = 0;
    for record in records {
        let (Some(id), Some(name)) = (record.id, record.name) else {
            continue;
        };
        let template = Template {
            id,
            name,
            description: record.description,
            folders: record.folders,
        };
        match repo.insert(&template).await {
            Ok(_) => migrated += 1,
            Err(err) => {
                warn!(template = %template.id, error = %err, "Skipping legacy template row");
            }
        }
    }

    migrated
}
