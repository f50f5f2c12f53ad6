use anyhow::Context;
use async_trait::async_trait;
use sqlx::{postgres::PgDatabaseError, PgPool};
use thiserror::Error;

use crate::accounts::repo_types::{AccountRow, NewAccount, UniqueField};

/// A unique-constraint rejection as reported by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConstraintViolation {
    pub constraint: Option<String>,
    pub message: String,
}

impl ConstraintViolation {
    /// Column the violation is attributed to, checked in `UniqueField::PRIORITY` order.
    /// The constraint name is authoritative; the message text is only a fallback.
    pub fn field(&self) -> Option<UniqueField> {
        let by_constraint = self.constraint.as_deref().and_then(|name| {
            UniqueField::PRIORITY
                .into_iter()
                .find(|f| name.contains(f.column()))
        });
        by_constraint
            .or_else(|| {
                // postgres detail: "Key (email)=(a@b.c) already exists."
                UniqueField::PRIORITY
                    .into_iter()
                    .find(|f| self.message.contains(&format!("({})", f.column())))
            })
            .or_else(|| {
                UniqueField::PRIORITY
                    .into_iter()
                    .find(|f| self.message.contains(f.column()))
            })
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("unique constraint violated: {}", .0.message)]
    UniqueViolation(ConstraintViolation),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &e {
            if db.is_unique_violation() {
                let message = match db
                    .try_downcast_ref::<PgDatabaseError>()
                    .and_then(|pg| pg.detail())
                {
                    Some(detail) => format!("{} {}", db.message(), detail),
                    None => db.message().to_string(),
                };
                return StoreError::UniqueViolation(ConstraintViolation {
                    constraint: db.constraint().map(str::to_owned),
                    message,
                });
            }
        }
        StoreError::Other(anyhow::Error::new(e).context("account store"))
    }
}

#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Persist a new account; the write is rolled back on any failure.
    async fn insert(&self, account: &NewAccount) -> Result<AccountRow, StoreError>;
    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<AccountRow>>;
    async fn exists(&self, field: UniqueField, value: &str) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgAccountStore {
    db: PgPool,
}

impl PgAccountStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn insert(&self, account: &NewAccount) -> Result<AccountRow, StoreError> {
        let mut tx = self.db.begin().await.context("begin registration tx")?;
        // dropping `tx` without commit rolls the insert back
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO users (name, username, dob, email, phone, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, name, username, email, phone, dob, password_hash, created_at
            "#,
        )
        .bind(&account.name)
        .bind(&account.username)
        .bind(account.dob)
        .bind(&account.email)
        .bind(&account.phone)
        .bind(&account.password_hash)
        .fetch_one(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(row)
    }

    async fn find_by_username(&self, username: &str) -> anyhow::Result<Option<AccountRow>> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, name, username, email, phone, dob, password_hash, created_at
            FROM users
            WHERE username = $1
            "#,
        )
        .bind(username)
        .fetch_optional(&self.db)
        .await
        .context("find account by username")?;
        Ok(row)
    }

    async fn exists(&self, field: UniqueField, value: &str) -> anyhow::Result<bool> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM users WHERE {} = $1)",
            field.column()
        );
        let found = sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .fetch_one(&self.db)
            .await
            .with_context(|| format!("check {} availability", field.column()))?;
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn violation(constraint: Option<&str>, message: &str) -> ConstraintViolation {
        ConstraintViolation {
            constraint: constraint.map(str::to_owned),
            message: message.into(),
        }
    }

    #[test]
    fn constraint_name_identifies_the_column() {
        assert_eq!(
            violation(Some("users_email_key"), "").field(),
            Some(UniqueField::Email)
        );
        assert_eq!(
            violation(Some("users_phone_key"), "").field(),
            Some(UniqueField::Phone)
        );
        assert_eq!(
            violation(Some("users_username_key"), "").field(),
            Some(UniqueField::Username)
        );
    }

    #[test]
    fn constraint_name_wins_over_message_text() {
        // the submitted value mentions another column
        let v = violation(
            Some("users_phone_key"),
            "duplicate key value violates unique constraint \"users_phone_key\" Key (phone)=(username-email) already exists.",
        );
        assert_eq!(v.field(), Some(UniqueField::Phone));
    }

    #[test]
    fn falls_back_to_postgres_detail() {
        let v = violation(
            None,
            "duplicate key value violates unique constraint \"uq_1\" Key (email)=(username@example.com) already exists.",
        );
        assert_eq!(v.field(), Some(UniqueField::Email));
    }

    #[test]
    fn falls_back_to_plain_message_in_priority_order() {
        let v = violation(
            None,
            "Violation of UNIQUE KEY constraint 'UQ_users_phone'. Cannot insert duplicate key; see username index",
        );
        assert_eq!(v.field(), Some(UniqueField::Username));
        let v = violation(None, "Violation of UNIQUE KEY constraint 'UQ_users_phone'.");
        assert_eq!(v.field(), Some(UniqueField::Phone));
    }

    #[test]
    fn unknown_constraint_is_unattributed() {
        let v = violation(Some("users_pkey"), "duplicate key value violates unique constraint \"users_pkey\"");
        assert_eq!(v.field(), None);
    }

    #[test]
    fn non_database_errors_are_not_violations() {
        let err = StoreError::from(sqlx::Error::RowNotFound);
        assert!(matches!(err, StoreError::Other(_)));
    }
}
