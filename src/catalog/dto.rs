use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct TableSchemaQuery {
    pub table_name: String,
}

#[derive(Debug, Serialize)]
pub struct TablesResponse {
    pub tables: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct InsertResponse {
    pub message: String,
    pub table: String,
    pub columns: Vec<String>,
}
