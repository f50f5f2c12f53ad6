mod accounts;
mod app;
mod catalog;
mod config;
mod error;
#[cfg(test)]
mod fakes;
mod state;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "insurance_backend=debug,axum=info,tower_http=info,sqlx=warn".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config).await?;

    if app_state.config.db.run_migrations {
        if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
            tracing::warn!(error = %e, "migration failed; continuing");
        }
    }

    let config = app_state.config.clone();
    app::serve(app::build_app(app_state), &config).await
}
