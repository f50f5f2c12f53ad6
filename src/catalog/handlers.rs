use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::{Map, Value};
use tracing::instrument;

use crate::{
    catalog::{
        dto::{InsertResponse, TableSchemaQuery, TablesResponse},
        repo_types::TableColumn,
        services::{describe_table, insert_row, list_matching_tables},
        value::RowPayload,
    },
    error::AppError,
    state::AppState,
};

pub fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/get-table-schema", get(get_table_schema))
        .route("/company-tables", get(company_tables))
        .route("/insert-data/:table_name", post(insert_data))
}

#[instrument(skip(state))]
pub async fn get_table_schema(
    State(state): State<AppState>,
    Query(q): Query<TableSchemaQuery>,
) -> Result<Json<Vec<TableColumn>>, AppError> {
    let columns = describe_table(state.catalog.as_ref(), &q.table_name).await?;
    Ok(Json(columns))
}

#[instrument(skip(state))]
pub async fn company_tables(
    State(state): State<AppState>,
) -> Result<Json<TablesResponse>, AppError> {
    let prefix = &state.config.catalog.company_table_prefix;
    let tables = list_matching_tables(state.catalog.as_ref(), prefix).await?;
    Ok(Json(TablesResponse { tables }))
}

#[instrument(skip(state, body))]
pub async fn insert_data(
    State(state): State<AppState>,
    Path(table_name): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> Result<Json<InsertResponse>, AppError> {
    let outcome = insert_row(state.catalog.as_ref(), &table_name, RowPayload::from(body)).await?;
    Ok(Json(InsertResponse {
        message: format!("Data inserted successfully into '{table_name}'"),
        table: table_name,
        columns: outcome.columns,
    }))
}
