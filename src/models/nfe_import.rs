// src/models/nfe_import.rs

use serde::{Deserialize, Serialize};

/// Um XML enviado para importação.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NfeFile {
    pub name: String,
    pub content: String,
}

/// Resumo de uma nota importada com sucesso.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImportOutcome {
    #[serde(rename = "numeroNota")]
    pub invoice_number: String,
    #[serde(rename = "fornecedor")]
    pub supplier_name: String,
    #[serde(rename = "itens")]
    pub item_count: usize,
    #[serde(rename = "duplicatas")]
    pub installment_count: usize,
    #[serde(rename = "cancelada")]
    pub cancelled: bool,
}

/// Resultado de um arquivo dentro do lote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileImportResult {
    #[serde(rename = "arquivo")]
    pub file_name: String,
    #[serde(rename = "sucesso")]
    pub success: bool,
    #[serde(flatten)]
    pub outcome: Option<ImportOutcome>,
    #[serde(rename = "erro", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileImportResult {
    pub fn imported(file_name: String, outcome: ImportOutcome) -> Self {
        Self { file_name, success: true, outcome: Some(outcome), error: None }
    }

    pub fn failed(file_name: String, error: String) -> Self {
        Self { file_name, success: false, outcome: None, error: Some(error) }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BatchImportResponse {
    pub total: usize,
    #[serde(rename = "sucesso")]
    pub succeeded: usize,
    #[serde(rename = "falha")]
    pub failed: usize,
    #[serde(rename = "resultados")]
    pub results: Vec<FileImportResult>,
}

impl BatchImportResponse {
    pub fn from_results(results: Vec<FileImportResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}
