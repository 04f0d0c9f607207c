// src/db/fiscal_store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::fiscal::{Invoice, LineItem, NewInvoice, NewLineItem, NewSupplier, Supplier},
};

/// Tudo o que a importação de NF-e precisa do armazenamento:
/// busca por campo, criação e criação em lote.
///
/// Nenhum registro é alterado depois de criado.
#[async_trait]
pub trait FiscalStore: Send + Sync {
    async fn find_invoice_by_access_key(&self, access_key: &str) -> Result<Option<Invoice>, AppError>;

    async fn find_supplier_by_tax_id(&self, tax_id: &str) -> Result<Option<Supplier>, AppError>;

    async fn create_supplier(&self, supplier: &NewSupplier) -> Result<Supplier, AppError>;

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError>;

    async fn bulk_create_line_items(
        &self,
        invoice_id: Uuid,
        items: &[NewLineItem],
    ) -> Result<Vec<LineItem>, AppError>;
}
