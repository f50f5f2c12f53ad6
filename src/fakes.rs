//! In-memory stores for tests.

use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Mutex,
};

use async_trait::async_trait;
use time::OffsetDateTime;

use crate::accounts::repo::{AccountStore, ConstraintViolation, StoreError};
use crate::accounts::repo_types::{AccountRow, NewAccount, UniqueField};
use crate::catalog::repo::CatalogStore;
use crate::catalog::repo_types::TableColumn;
use crate::catalog::value::ColumnValue;

#[derive(Default)]
pub struct MemoryAccountStore {
    rows: Mutex<Vec<AccountRow>>,
    next_violation: Mutex<Option<ConstraintViolation>>,
}

impl MemoryAccountStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }

    pub fn fail_next_insert_with_violation(&self, constraint: Option<&str>, message: &str) {
        *self.next_violation.lock().unwrap() = Some(ConstraintViolation {
            constraint: constraint.map(str::to_owned),
            message: message.into(),
        });
    }
}

fn value_of(row: &AccountRow, field: UniqueField) -> &str {
    match field {
        UniqueField::Username => &row.username,
        UniqueField::Email => &row.email,
        UniqueField::Phone => &row.phone,
    }
}

fn new_value_of(account: &NewAccount, field: UniqueField) -> &str {
    match field {
        UniqueField::Username => &account.username,
        UniqueField::Email => &account.email,
        UniqueField::Phone => &account.phone,
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    async fn insert(&self, account: &NewAccount) -> Result<AccountRow, StoreError> {
        if let Some(v) = self.next_violation.lock().unwrap().take() {
            return Err(StoreError::UniqueViolation(v));
        }
        let mut rows = self.rows.lock().unwrap();
        // same index order as the migration
        for field in UniqueField::PRIORITY {
            let wanted = new_value_of(account, field);
            if rows.iter().any(|r| value_of(r, field) == wanted) {
                let constraint = format!("users_{}_key", field.column());
                return Err(StoreError::UniqueViolation(ConstraintViolation {
                    message: format!(
                        "duplicate key value violates unique constraint \"{constraint}\""
                    ),
                    constraint: Some(constraint),
                }));
            }
        }
        let row = AccountRow {
            id: rows.len() as i64 + 1,
            name: account.name.clone(),
            username: account.username.clone(),
            email: account.email.clone(),
            phone: account.phone.clone(),
            dob: account.dob,
            password_hash: account.password_hash.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        rows.push(row.clone());
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<AccountRow>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|r| r.username == username).cloned())
    }

    async fn exists(&self, field: UniqueField, value: &str) -> anyhow::Result<bool> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().any(|r| value_of(r, field) == value))
    }
}

pub fn column(name: &str, data_type: &str, is_identity: bool) -> TableColumn {
    TableColumn {
        name: name.into(),
        data_type: data_type.into(),
        is_identity,
        udt_schema: "pg_catalog".into(),
        udt_name: data_type.into(),
    }
}

type InsertedRow = (String, Vec<(String, ColumnValue)>);

#[derive(Default)]
pub struct MemoryCatalog {
    tables: Vec<(String, Vec<TableColumn>)>,
    inserted: Mutex<Vec<InsertedRow>>,
    reject_inserts: Option<String>,
    column_lookups: AtomicUsize,
}

impl MemoryCatalog {
    pub fn with_table(mut self, name: &str, columns: Vec<TableColumn>) -> Self {
        self.tables.push((name.to_string(), columns));
        self
    }

    pub fn rejecting_inserts(mut self, cause: &str) -> Self {
        self.reject_inserts = Some(cause.to_string());
        self
    }

    pub fn inserted(&self) -> Vec<InsertedRow> {
        self.inserted.lock().unwrap().clone()
    }

    pub fn column_lookups(&self) -> usize {
        self.column_lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn table_names(&self) -> anyhow::Result<Vec<String>> {
        Ok(self.tables.iter().map(|(n, _)| n.clone()).collect())
    }

    async fn table_exists(&self, table: &str) -> anyhow::Result<bool> {
        Ok(self.tables.iter().any(|(n, _)| n == table))
    }

    async fn columns(&self, table: &str) -> anyhow::Result<Vec<TableColumn>> {
        self.column_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .tables
            .iter()
            .find(|(n, _)| n == table)
            .map(|(_, cols)| cols.clone())
            .unwrap_or_default())
    }

    async fn insert_row(
        &self,
        table: &str,
        row: &[(TableColumn, ColumnValue)],
    ) -> anyhow::Result<u64> {
        if let Some(cause) = &self.reject_inserts {
            anyhow::bail!("error returned from database: {cause}");
        }
        let values = row
            .iter()
            .map(|(c, v)| (c.name.clone(), v.clone()))
            .collect();
        self.inserted.lock().unwrap().push((table.to_string(), values));
        Ok(1)
    }
}
