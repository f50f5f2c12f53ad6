use serde::Serialize;
use sqlx::FromRow;

/// One column of a live table, as described by `information_schema.columns`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct TableColumn {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: String,
    /// Identity, generated-always, or sequence-backed: never caller supplied.
    pub is_identity: bool,
    #[serde(skip)]
    pub udt_schema: String,
    #[serde(skip)]
    pub udt_name: String,
}

impl TableColumn {
    pub fn is_date(&self) -> bool {
        self.data_type == "date"
    }
}
