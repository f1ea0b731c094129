//! Customer repository

use anyhow::{Context, Result};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

use super::parse_db_timestamp;
use crate::models::{CreateCustomerRequest, Customer, CustomerFilter, UpdateCustomerRequest};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    notes: Option<String>,
    directory: String,
    created_at: String,
    updated_at: Option<String>,
}

const CUSTOMER_COLUMNS: &str =
    "id, name, email, phone, address, notes, directory, created_at, updated_at";

pub struct CustomerRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CustomerRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self, filter: &CustomerFilter) -> Result<Vec<Customer>> {
        let mut sql = format!("SELECT {} FROM customers", CUSTOMER_COLUMNS);
        if filter.search.is_some() {
            sql.push_str(" WHERE name LIKE ? OR email LIKE ? OR directory LIKE ?");
        }
        sql.push_str(" ORDER BY name");

        let mut q = sqlx::query_as::<_, CustomerRow>(&sql);
        if let Some(ref search) = filter.search {
            let pattern = format!("%{}%", search);
            q = q.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
        }

        let rows = q
            .fetch_all(self.pool)
            .await
            .context("Failed to list customers")?;

        Ok(rows.into_iter().map(row_to_customer).collect())
    }

    /// Fetch a selected id set in one query (bulk export).
    pub async fn list_by_ids(&self, ids: &[Uuid]) -> Result<Vec<Customer>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let placeholders = vec!["?"; ids.len()].join(", ");
        let sql = format!(
            "SELECT {} FROM customers WHERE id IN ({}) ORDER BY name",
            CUSTOMER_COLUMNS, placeholders
        );

        let mut q = sqlx::query_as::<_, CustomerRow>(&sql);
        for id in ids {
            q = q.bind(id.to_string());
        }

        let rows = q
            .fetch_all(self.pool)
            .await
            .context("Failed to list customers by id")?;

        Ok(rows.into_iter().map(row_to_customer).collect())
    }

    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE id = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(id.to_string())
        .fetch_optional(self.pool)
        .await
        .context("Failed to get customer")?;

        Ok(row.map(row_to_customer))
    }

    pub async fn get_by_directory(&self, directory: &str) -> Result<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(&format!(
            "SELECT {} FROM customers WHERE directory = ?",
            CUSTOMER_COLUMNS
        ))
        .bind(directory)
        .fetch_optional(self.pool)
        .await
        .context("Failed to get customer by directory")?;

        Ok(row.map(row_to_customer))
    }

    pub async fn insert(&self, req: &CreateCustomerRequest) -> Result<Customer> {
        let id = Uuid::new_v4();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO customers (id, name, email, phone, address, notes, directory, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.to_string())
        .bind(&req.name)
        .bind(req.email.as_deref())
        .bind(req.phone.as_deref())
        .bind(req.address.as_deref())
        .bind(req.notes.as_deref())
        .bind(&req.directory)
        .bind(&now)
        .execute(self.pool)
        .await
        .context("Failed to insert customer")?;

        self.get_by_id(id)
            .await?
            .context("Failed to retrieve created customer")
    }

    /// Apply a partial update via a dynamically built SET clause; bumps
    /// `updated_at`. Returns `None` when the customer does not exist.
    pub async fn update(
        &self,
        id: Uuid,
        req: &UpdateCustomerRequest,
    ) -> Result<Option<Customer>> {
        if self.get_by_id(id).await?.is_none() {
            return Ok(None);
        }

        let mut sets: Vec<&str> = Vec::new();
        if req.name.is_some() {
            sets.push("name = ?");
        }
        if req.email.is_some() {
            sets.push("email = ?");
        }
        if req.phone.is_some() {
            sets.push("phone = ?");
        }
        if req.address.is_some() {
            sets.push("address = ?");
        }
        if req.notes.is_some() {
            sets.push("notes = ?");
        }
        sets.push("updated_at = ?");

        let sql = format!("UPDATE customers SET {} WHERE id = ?", sets.join(", "));
        let now = Utc::now().to_rfc3339();

        let mut q = sqlx::query(&sql);
        if let Some(ref name) = req.name {
            q = q.bind(name);
        }
        if let Some(ref email) = req.email {
            q = q.bind(email);
        }
        if let Some(ref phone) = req.phone {
            q = q.bind(phone);
        }
        if let Some(ref address) = req.address {
            q = q.bind(address);
        }
        if let Some(ref notes) = req.notes {
            q = q.bind(notes);
        }
        q.bind(&now)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to update customer")?;

        self.get_by_id(id).await
    }

    /// Rename only; used by the explicit rename flow.
    pub async fn update_name(&self, id: Uuid, name: &str) -> Result<Option<Customer>> {
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE customers SET name = ?, updated_at = ? WHERE id = ?")
            .bind(name)
            .bind(&now)
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to rename customer")?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?")
            .bind(id.to_string())
            .execute(self.pool)
            .await
            .context("Failed to delete customer")?;

        Ok(result.rows_affected() > 0)
    }

    pub async fn count(&self) -> Result<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM customers")
            .fetch_one(self.pool)
            .await
            .context("Failed to count customers")?;
        Ok(count)
    }
}

fn row_to_customer(row: CustomerRow) -> Customer {
    Customer {
        id: Uuid::parse_str(&row.id).unwrap_or_else(|_| Uuid::nil()),
        name: row.name,
        email: row.email,
        phone: row.phone,
        address: row.address,
        notes: row.notes,
        directory: row.directory,
        created_at: parse_db_timestamp(&row.created_at),
        updated_at: row.updated_at.as_deref().map(parse_db_timestamp),
    }
}
