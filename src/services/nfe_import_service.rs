// src/services/nfe_import_service.rs

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::Mutex;

use crate::{
    common::error::AppError,
    db::FiscalStore,
    models::{
        fiscal::{EntryType, InvoiceStatus, NewInvoice, PaymentCondition},
        nfe_import::{BatchImportResponse, FileImportResult, ImportOutcome, NfeFile},
    },
    nfe::{
        header::{is_valid_access_key, NfeHeader}, installments::parse_installments, issuer::NfeIssuer, items::parse_items,
        non_empty, xml::XmlElement,
    },
    services::supplier_service::SupplierService,
};

/// Limite de arquivos por requisição de importação.
pub const MAX_BATCH_FILES: usize = 50;

#[derive(Clone)]
pub struct NfeImportService {
    store: Arc<dyn FiscalStore>,
    supplier_service: SupplierService,
    // Um lote por vez: a checagem de fornecedor/chave não é atômica
    batch_lock: Arc<Mutex<()>>,
}

impl NfeImportService {
    pub fn new(store: Arc<dyn FiscalStore>) -> Self {
        Self {
            supplier_service: SupplierService::new(store.clone()),
            store,
            batch_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Importa um lote de XMLs, um arquivo de cada vez, na ordem recebida.
    ///
    /// Só o tamanho do lote derruba a requisição inteira. Erros de um arquivo
    /// ficam no resultado daquele arquivo e o lote continua; o que já foi
    /// gravado não é desfeito.
    pub async fn import_batch(&self, files: &[NfeFile]) -> Result<BatchImportResponse, AppError> {
        check_batch_size(files.len())?;

        let _guard = self.batch_lock.lock().await;
        let entry_date = Utc::now().date_naive();

        tracing::info!("📥 Importando lote com {} XML(s) de NF-e.", files.len());

        let mut results = Vec::with_capacity(files.len());
        for file in files {
            let result = match self.import_document(&file.content, entry_date).await {
                Ok(outcome) => {
                    tracing::info!(
                        "✅ {}: nota {} de {} importada ({} itens).",
                        file.name, outcome.invoice_number, outcome.supplier_name, outcome.item_count
                    );
                    FileImportResult::imported(file.name.clone(), outcome)
                }
                Err(e) => {
                    tracing::warn!("⚠️ {}: {}", file.name, e);
                    FileImportResult::failed(file.name.clone(), e.to_string())
                }
            };
            results.push(result);
        }

        let response = BatchImportResponse::from_results(results);
        tracing::info!(
            "📦 Lote finalizado: {} sucesso(s), {} falha(s).",
            response.succeeded, response.failed
        );

        Ok(response)
    }

    /// Importa um único XML: nota, fornecedor (se novo) e itens.
    pub async fn import_document(
        &self,
        raw_xml: &str,
        entry_date: NaiveDate,
    ) -> Result<ImportOutcome, AppError> {
        let doc = XmlElement::parse(raw_xml)?;

        let header = NfeHeader::parse(&doc);
        let issuer = NfeIssuer::parse(&doc);
        let items = parse_items(&doc);
        let installments = parse_installments(&doc);

        // 1. Validações (nada é gravado se falhar)
        if header.invoice_number.is_empty() {
            return Err(AppError::MissingInvoiceNumber);
        }
        if issuer.tax_id.is_empty() {
            return Err(AppError::MissingSupplierTaxId);
        }
        if header.access_key.is_empty() {
            return Err(AppError::MissingAccessKey);
        }
        if !is_valid_access_key(&header.access_key) {
            return Err(AppError::InvalidAccessKey(header.access_key));
        }

        // 2. Nota já importada?
        if self.store.find_invoice_by_access_key(&header.access_key).await?.is_some() {
            return Err(AppError::DuplicateInvoice(header.invoice_number));
        }

        // 3. Fornecedor
        let supplier = self.supplier_service.resolve_or_create(&issuer).await?;

        // 4. Nota
        let status = header.status();
        let installment_count = installments.len();
        let next_due_date = installments.first().and_then(|inst| inst.due_date);

        let new_invoice = NewInvoice {
            supplier_id: supplier.id,
            invoice_number: header.invoice_number,
            series: non_empty(header.series),
            issue_date: header.issue_date,
            entry_date,
            access_key: header.access_key,
            entry_type: EntryType::Resale,
            totals: header.totals,
            installments,
            payment_condition: PaymentCondition::from_installment_count(installment_count),
            installment_count: installment_count as i32,
            next_due_date,
            status,
            raw_xml: raw_xml.to_string(),
        };
        let invoice = self.store.create_invoice(&new_invoice).await?;

        // 5. Itens, todos de uma vez
        let created_items = self.store.bulk_create_line_items(invoice.id, &items).await?;

        Ok(ImportOutcome {
            invoice_number: invoice.invoice_number,
            supplier_name: supplier.name,
            item_count: created_items.len(),
            installment_count,
            cancelled: status == InvoiceStatus::Cancelled,
        })
    }
}

pub fn check_batch_size(count: usize) -> Result<(), AppError> {
    if count == 0 {
        return Err(AppError::EmptyBatch);
    }
    if count > MAX_BATCH_FILES {
        return Err(AppError::BatchTooLarge(count));
    }
    Ok(())
}
