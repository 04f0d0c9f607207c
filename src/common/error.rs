use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::{nfe::xml::MAX_XML_DEPTH, services::nfe_import_service::MAX_BATCH_FILES};

// Erros da aplicação. As mensagens de `Display` são as que voltam no campo
// "erro" de cada arquivo do lote, por isso estão no idioma do usuário.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Corpo da requisição inválido: {0}")]
    InvalidPayload(#[from] JsonRejection),

    // --- Erros de lote (rejeitam a requisição inteira) ---
    #[error("Nenhum arquivo enviado para importação.")]
    EmptyBatch,

    #[error("Máximo de {max} arquivos por importação (recebidos: {0}).", max = MAX_BATCH_FILES)]
    BatchTooLarge(usize),

    // --- Erros por arquivo ---
    #[error("XML inválido: número da nota (nNF) não encontrado.")]
    MissingInvoiceNumber,

    #[error("XML inválido: CNPJ/CPF do emitente não encontrado.")]
    MissingSupplierTaxId,

    #[error("XML inválido: chave de acesso não encontrada.")]
    MissingAccessKey,

    #[error("XML inválido: chave de acesso \"{0}\" deve ter 44 dígitos.")]
    InvalidAccessKey(String),

    #[error("XML inválido: mais de {max} níveis de aninhamento.", max = MAX_XML_DEPTH)]
    XmlTooDeep,

    #[error("A nota fiscal {0} já foi importada.")]
    DuplicateInvoice(String),

    #[error("Não foi possível ler o XML: {0}")]
    XmlParse(#[from] quick_xml::Error),

    // --- Autenticação ---
    #[error("Token inválido")]
    InvalidToken,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            ref e @ (AppError::InvalidPayload(_) | AppError::EmptyBatch | AppError::BatchTooLarge(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ref e @ (AppError::MissingInvoiceNumber
            | AppError::MissingSupplierTaxId
            | AppError::MissingAccessKey
            | AppError::InvalidAccessKey(_)
            | AppError::XmlTooDeep
            | AppError::XmlParse(_)) => (StatusCode::UNPROCESSABLE_ENTITY, e.to_string()),
            ref e @ AppError::DuplicateInvoice(_) => (StatusCode::CONFLICT, e.to_string()),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),

            // Banco e erros internos viram 500; o detalhe vai só para o log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.".to_string())
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
