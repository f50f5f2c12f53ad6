use serde::{Deserialize, Serialize};
use time::Date;

use super::repo_types::AccountRow;

time::serde::format_description!(iso_date, Date, "[year]-[month]-[day]");

/// Request body for registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub username: String,
    #[serde(default, with = "iso_date::option")]
    pub dob: Option<Date>,
    pub email: String,
    pub phone: String,
    pub password: String,
}

/// Request body for login.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Account as returned to clients. Carries no credential material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountOut {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    #[serde(with = "iso_date::option")]
    pub dob: Option<Date>,
}

impl From<AccountRow> for AccountOut {
    fn from(r: AccountRow) -> Self {
        Self {
            id: r.id,
            name: r.name,
            username: r.username,
            email: r.email,
            phone: r.phone,
            dob: r.dob,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UsernameQuery {
    pub username: String,
}

#[derive(Debug, Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct PhoneQuery {
    pub phone: String,
}

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
}
