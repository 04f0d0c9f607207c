// src/handlers/fiscal.rs

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthenticatedUser,
    models::nfe_import::{BatchImportResponse, NfeFile},
    services::nfe_import_service::check_batch_size,
};

// ---
// Validação Customizada: tamanho do lote
// ---
fn validate_batch_size(files: &Vec<NfeFile>) -> Result<(), ValidationError> {
    check_batch_size(files.len()).map_err(|e| {
        let mut err = ValidationError::new("batch_size");
        err.message = Some(e.to_string().into());
        err
    })
}

#[derive(Debug, Deserialize, Validate)]
pub struct ImportNfePayload {
    #[validate(custom(function = "validate_batch_size"))]
    #[serde(default)]
    pub files: Vec<NfeFile>,
}

// POST /api/fiscal/nfe/import
pub async fn import_nfe_batch(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    payload: Result<Json<ImportNfePayload>, JsonRejection>,
) -> Result<Json<BatchImportResponse>, AppError> {
    let Json(payload) = payload?;
    payload.validate()?;

    tracing::info!("Usuário {} enviou {} XML(s) para importação.", user.id, payload.files.len());

    let response = app_state
        .nfe_import_service
        .import_batch(&payload.files)
        .await?;

    Ok(Json(response))
}
