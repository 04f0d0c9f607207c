//src/main.rs

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

mod common;
mod config;
mod db;
mod handlers;
mod middleware;
mod models;
mod nfe;
mod services;

use crate::config::{AppState, Settings};
use crate::db::FiscalRepository;
use crate::middleware::auth::auth_guard;

pub fn build_router(app_state: AppState, max_upload_bytes: usize) -> Router {
    // Rotas fiscais (protegidas pelo middleware)
    let fiscal_routes = Router::new()
        .route("/nfe/import", post(handlers::fiscal::import_nfe_batch))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/fiscal", fiscal_routes)
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let settings = Settings::from_env()?;
    let db_pool = config::connect_database(&settings).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!().run(&db_pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    let store = Arc::new(FiscalRepository::new(db_pool));
    let app_state = AppState::new(store, settings.jwt_secret.clone());
    let app = build_router(app_state, settings.max_upload_bytes);

    // Inicia o servidor
    let listener = TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
