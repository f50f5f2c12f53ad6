use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::catalog::{repo_types::TableColumn, sql::insert_statement, value::ColumnValue};

#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Base tables of the configured schema, in catalog order.
    async fn table_names(&self) -> anyhow::Result<Vec<String>>;
    async fn table_exists(&self, table: &str) -> anyhow::Result<bool>;
    async fn columns(&self, table: &str) -> anyhow::Result<Vec<TableColumn>>;
    /// Single-row insert inside a transaction; nothing is committed on error.
    async fn insert_row(
        &self,
        table: &str,
        row: &[(TableColumn, ColumnValue)],
    ) -> anyhow::Result<u64>;
}

#[derive(Clone)]
pub struct PgCatalogStore {
    db: PgPool,
    schema: String,
}

impl PgCatalogStore {
    pub fn new(db: PgPool, schema: impl Into<String>) -> Self {
        Self {
            db,
            schema: schema.into(),
        }
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn table_names(&self) -> anyhow::Result<Vec<String>> {
        let names = sqlx::query_scalar::<_, String>(
            r#"
            SELECT table_name::text
            FROM information_schema.tables
            WHERE table_schema = $1 AND table_type = 'BASE TABLE'
            "#,
        )
        .bind(&self.schema)
        .fetch_all(&self.db)
        .await
        .context("list catalog tables")?;
        Ok(names)
    }

    async fn table_exists(&self, table: &str) -> anyhow::Result<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM information_schema.tables
                WHERE table_schema = $1 AND table_name = $2 AND table_type = 'BASE TABLE'
            )
            "#,
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_one(&self.db)
        .await
        .with_context(|| format!("check table {table} exists"))?;
        Ok(exists)
    }

    async fn columns(&self, table: &str) -> anyhow::Result<Vec<TableColumn>> {
        let cols = sqlx::query_as::<_, TableColumn>(
            r#"
            SELECT column_name::text AS name,
                   CASE WHEN data_type = 'USER-DEFINED' THEN udt_name::text
                        ELSE data_type::text END AS data_type,
                   COALESCE(is_identity = 'YES'
                            OR is_generated = 'ALWAYS'
                            OR column_default LIKE 'nextval(%', false) AS is_identity,
                   udt_schema::text AS udt_schema,
                   udt_name::text AS udt_name
            FROM information_schema.columns
            WHERE table_schema = $1 AND table_name = $2
            ORDER BY ordinal_position
            "#,
        )
        .bind(&self.schema)
        .bind(table)
        .fetch_all(&self.db)
        .await
        .with_context(|| format!("describe table {table}"))?;
        Ok(cols)
    }

    async fn insert_row(
        &self,
        table: &str,
        row: &[(TableColumn, ColumnValue)],
    ) -> anyhow::Result<u64> {
        let sql = insert_statement(&self.schema, table, row.iter().map(|(c, _)| c));
        debug!(%sql, "generic insert");

        let mut query = sqlx::query(&sql);
        for (_, value) in row {
            query = match value {
                ColumnValue::Null => query.bind(None::<String>),
                ColumnValue::Bool(v) => query.bind(*v),
                ColumnValue::Int(v) => query.bind(*v),
                ColumnValue::Float(v) => query.bind(*v),
                ColumnValue::Text(v) => query.bind(v.clone()),
                ColumnValue::Date(v) => query.bind(*v),
            };
        }

        let mut tx = self.db.begin().await.context("begin insert tx")?;
        let done = query
            .execute(&mut *tx)
            .await
            .with_context(|| format!("insert into {table}"))?;
        tx.commit().await.context("commit insert")?;
        Ok(done.rows_affected())
    }
}
