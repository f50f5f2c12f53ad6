use std::collections::HashMap;

use tracing::{info, warn};

use crate::{
    catalog::{
        repo::CatalogStore,
        repo_types::TableColumn,
        value::{ColumnValue, RowPayload},
    },
    error::AppError,
};

pub async fn list_matching_tables(
    store: &dyn CatalogStore,
    prefix: &str,
) -> Result<Vec<String>, AppError> {
    let names = store.table_names().await?;
    Ok(names.into_iter().filter(|n| n.starts_with(prefix)).collect())
}

pub async fn describe_table(
    store: &dyn CatalogStore,
    table: &str,
) -> Result<Vec<TableColumn>, AppError> {
    if !store.table_exists(table).await? {
        return Err(AppError::TableNotFound(table.to_string()));
    }
    Ok(store.columns(table).await?)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertOutcome {
    pub rows: u64,
    pub columns: Vec<String>,
}

/// Keep payload entries naming a real, non-identity column, in payload order.
/// Only kept entries are converted; dropped keys may hold any JSON.
pub fn insertable_values(
    columns: &[TableColumn],
    payload: RowPayload,
) -> Result<Vec<(TableColumn, ColumnValue)>, AppError> {
    let writable: HashMap<&str, &TableColumn> = columns
        .iter()
        .filter(|c| !c.is_identity)
        .map(|c| (c.name.as_str(), c))
        .collect();

    payload
        .into_iter()
        .filter_map(|(key, raw)| writable.get(key.as_str()).map(|&col| (col, raw)))
        .map(|(col, raw)| {
            ColumnValue::from_json(&raw)
                .map(|value| (col.clone(), value.for_column(col)))
                .ok_or_else(|| {
                    AppError::Validation(format!("Unsupported value for column '{}'", col.name))
                })
        })
        .collect()
}

pub async fn insert_row(
    store: &dyn CatalogStore,
    table: &str,
    payload: RowPayload,
) -> Result<InsertOutcome, AppError> {
    if !store.table_exists(table).await? {
        warn!(table, "insert into unknown table");
        return Err(AppError::TableNotFound(table.to_string()));
    }

    let columns = store.columns(table).await?;
    let supplied = payload.len();
    let row = insertable_values(&columns, payload)?;
    if row.is_empty() {
        warn!(table, supplied, "no insertable columns in payload");
        return Err(AppError::NoValidColumns);
    }

    let rows = store.insert_row(table, &row).await.map_err(|e| {
        warn!(table, error = %format!("{e:#}"), "generic insert failed");
        AppError::InsertFailed(format!("{e:#}"))
    })?;

    let columns: Vec<String> = row.into_iter().map(|(c, _)| c.name).collect();
    info!(table, rows, dropped = supplied - columns.len(), "row inserted");
    Ok(InsertOutcome { rows, columns })
}
