// src/config.rs

use crate::{
    db::FiscalStore,
    services::{auth::AuthService, nfe_import_service::NfeImportService},
};
use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

/// Configuração lida do ambiente (e do arquivo .env, se existir).
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,
    pub db_max_connections: u32,
    pub max_upload_bytes: usize,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

        let db_max_connections = match env::var("DB_MAX_CONNECTIONS") {
            Ok(value) => value.parse().context("DB_MAX_CONNECTIONS deve ser um número")?,
            Err(_) => 5,
        };

        // 50 XMLs de NF-e passam fácil do limite padrão de 2 MB do axum
        let max_upload_mb: usize = match env::var("MAX_UPLOAD_MB") {
            Ok(value) => value.parse().context("MAX_UPLOAD_MB deve ser um número")?,
            Err(_) => 50,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            server_addr,
            db_max_connections,
            max_upload_bytes: max_upload_mb * 1024 * 1024,
        })
    }
}

pub async fn connect_database(settings: &Settings) -> anyhow::Result<PgPool> {
    let db_pool = PgPoolOptions::new()
        .max_connections(settings.db_max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(&settings.database_url)
        .await?; // <-- Se falhar, retorna um Err em vez de dar panic ou exit

    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");
    Ok(db_pool)
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub auth_service: AuthService,
    pub nfe_import_service: NfeImportService,
}

impl AppState {
    // --- Monta o gráfico de dependências ---
    pub fn new(store: Arc<dyn FiscalStore>, jwt_secret: String) -> Self {
        Self {
            auth_service: AuthService::new(jwt_secret),
            nfe_import_service: NfeImportService::new(store),
        }
    }
}
