use sqlx::FromRow;
use time::{Date, OffsetDateTime};

/// Account record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct AccountRow {
    pub id: i64,
    pub name: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<Date>,
    pub password_hash: String, // argon2 PHC string
    pub created_at: OffsetDateTime,
}

/// Values written by a registration; the hash is already derived.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub username: String,
    pub dob: Option<Date>,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// Account columns carrying a unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueField {
    Username,
    Email,
    Phone,
}

impl UniqueField {
    /// Order in which a violation is attributed to a column.
    pub const PRIORITY: [UniqueField; 3] =
        [UniqueField::Username, UniqueField::Email, UniqueField::Phone];

    pub fn column(self) -> &'static str {
        match self {
            UniqueField::Username => "username",
            UniqueField::Email => "email",
            UniqueField::Phone => "phone",
        }
    }

    pub fn duplicate_message(self) -> &'static str {
        match self {
            UniqueField::Username => "Username already exists.",
            UniqueField::Email => "Email already registered.",
            UniqueField::Phone => "Phone number already registered.",
        }
    }
}
