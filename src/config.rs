use std::net::SocketAddr;

use anyhow::Context;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct DbConfig {
    pub url: String,
    pub max_connections: u32,
    pub run_migrations: bool,
}

/// Where the introspection and generic-insert endpoints look.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    pub schema: String,
    pub company_table_prefix: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub db: DbConfig,
    pub catalog: CatalogConfig,
    pub host: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let url = match get("DATABASE_URL") {
            Some(url) => url,
            None => database_url_from_parts(&get)?,
        };

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().context("DB_MAX_CONNECTIONS")?,
            None => 10,
        };
        let run_migrations = get("RUN_MIGRATIONS")
            .map(|v| !matches!(v.to_ascii_lowercase().as_str(), "0" | "false" | "no" | "off"))
            .unwrap_or(true);

        let catalog = CatalogConfig {
            schema: get("CATALOG_SCHEMA").unwrap_or_else(|| "public".into()),
            company_table_prefix: get("COMPANY_TABLE_PREFIX").unwrap_or_else(|| "company_".into()),
        };

        let port = match get("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT")?,
            None => 8080,
        };

        Ok(Self {
            db: DbConfig {
                url,
                max_connections,
                run_migrations,
            },
            catalog,
            host: get("APP_HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
        })
    }

    pub fn listen_addr(&self) -> anyhow::Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))?;
        Ok(addr)
    }
}

// Split connection parameters, as deployments without a single URL provide them.
fn database_url_from_parts<F>(get: &F) -> anyhow::Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    let host = get("DB_HOST").context("DATABASE_URL or DB_HOST must be set")?;
    let port = get("DB_PORT").unwrap_or_else(|| "5432".into());
    let name = get("DB_NAME").context("DB_NAME must be set when DATABASE_URL is not")?;
    let user = get("DB_USER").context("DB_USER must be set when DATABASE_URL is not")?;
    let password = get("DB_PASSWORD").unwrap_or_default();
    Ok(format!("postgres://{user}:{password}@{host}:{port}/{name}"))
}
