use lazy_static::lazy_static;
use regex::Regex;
use time::Date;
use tracing::{info, warn};

use crate::{
    accounts::{
        dto::AccountOut,
        password::{hash_password, verify_password},
        repo::{AccountStore, StoreError},
        repo_types::{NewAccount, UniqueField},
    },
    error::AppError,
};

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Registration input as accepted at the boundary.
#[derive(Debug, Clone)]
pub struct Registration {
    pub name: String,
    pub username: String,
    pub dob: Option<Date>,
    pub email: String,
    pub phone: String,
    pub password: String,
}

pub async fn create_account(
    store: &dyn AccountStore,
    reg: Registration,
) -> Result<AccountOut, AppError> {
    if reg.password.is_empty() {
        return Err(AppError::Validation("Password must not be empty".into()));
    }

    let password_hash = hash_password(&reg.password)?;
    let new = NewAccount {
        name: reg.name,
        username: reg.username,
        dob: reg.dob,
        email: reg.email,
        phone: reg.phone,
        password_hash,
    };

    match store.insert(&new).await {
        Ok(row) => {
            info!(account_id = row.id, username = %row.username, "account created");
            Ok(row.into())
        }
        Err(StoreError::UniqueViolation(v)) => match v.field() {
            Some(field) => {
                warn!(field = field.column(), "registration rejected: duplicate value");
                Err(AppError::DuplicateField(field))
            }
            None => {
                warn!(constraint = ?v.constraint, message = %v.message, "unattributed unique violation");
                Err(AppError::RegistrationFailed)
            }
        },
        Err(StoreError::Other(e)) => Err(AppError::Internal(e)),
    }
}

/// `None` for both an unknown username and a wrong password.
pub async fn authenticate(
    store: &dyn AccountStore,
    username: &str,
    password: &str,
) -> Result<Option<AccountOut>, AppError> {
    let Some(row) = store.find_by_username(username).await? else {
        return Ok(None);
    };
    if verify_password(password, &row.password_hash)? {
        Ok(Some(row.into()))
    } else {
        Ok(None)
    }
}

pub async fn field_available(
    store: &dyn AccountStore,
    field: UniqueField,
    value: &str,
) -> Result<bool, AppError> {
    Ok(!store.exists(field, value).await?)
}
