// src/db/memory_store.rs
//
// FiscalStore em memória, usado pelos testes da importação.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex,
};

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FiscalStore,
    models::fiscal::{Invoice, LineItem, NewInvoice, NewLineItem, NewSupplier, Supplier},
};

#[derive(Default)]
struct Tables {
    suppliers: Vec<Supplier>,
    invoices: Vec<Invoice>,
    items: Vec<LineItem>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    fail_line_items: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Faz o próximo `bulk_create_line_items` falhar (simula erro do banco).
    pub fn fail_line_items(&self) {
        self.fail_line_items.store(true, Ordering::SeqCst);
    }

    pub fn suppliers(&self) -> Vec<Supplier> {
        self.tables.lock().unwrap().suppliers.clone()
    }

    pub fn invoices(&self) -> Vec<Invoice> {
        self.tables.lock().unwrap().invoices.clone()
    }

    pub fn line_items(&self) -> Vec<LineItem> {
        self.tables.lock().unwrap().items.clone()
    }
}

#[async_trait]
impl FiscalStore for MemoryStore {
    async fn find_invoice_by_access_key(&self, access_key: &str) -> Result<Option<Invoice>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.invoices.iter().find(|i| i.access_key == access_key).cloned())
    }

    async fn find_supplier_by_tax_id(&self, tax_id: &str) -> Result<Option<Supplier>, AppError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.suppliers.iter().find(|s| s.tax_id == tax_id).cloned())
    }

    async fn create_supplier(&self, supplier: &NewSupplier) -> Result<Supplier, AppError> {
        let created = Supplier {
            id: Uuid::new_v4(),
            name: supplier.name.clone(),
            tax_id: supplier.tax_id.clone(),
            phone: supplier.phone.clone(),
            email: supplier.email.clone(),
            address: supplier.address.clone(),
            category: supplier.category,
            status: supplier.status,
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().suppliers.push(created.clone());
        Ok(created)
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        let created = Invoice {
            id: Uuid::new_v4(),
            supplier_id: invoice.supplier_id,
            invoice_number: invoice.invoice_number.clone(),
            series: invoice.series.clone(),
            issue_date: invoice.issue_date,
            entry_date: invoice.entry_date,
            access_key: invoice.access_key.clone(),
            entry_type: invoice.entry_type,
            totals: invoice.totals.clone(),
            installments: invoice.installments.clone(),
            payment_condition: invoice.payment_condition,
            installment_count: invoice.installment_count,
            next_due_date: invoice.next_due_date,
            status: invoice.status,
            raw_xml: invoice.raw_xml.clone(),
            created_at: Utc::now(),
        };
        self.tables.lock().unwrap().invoices.push(created.clone());
        Ok(created)
    }

    async fn bulk_create_line_items(
        &self,
        invoice_id: Uuid,
        items: &[NewLineItem],
    ) -> Result<Vec<LineItem>, AppError> {
        if self.fail_line_items.swap(false, Ordering::SeqCst) {
            return Err(AppError::DatabaseError(sqlx::Error::Protocol(
                "conexão com o banco perdida".into(),
            )));
        }

        let mut tables = self.tables.lock().unwrap();
        if !tables.invoices.iter().any(|i| i.id == invoice_id) {
            return Err(anyhow!("nota {invoice_id} não existe").into());
        }

        let created: Vec<LineItem> = items
            .iter()
            .map(|item| LineItem {
                id: Uuid::new_v4(),
                invoice_id,
                item_number: item.item_number,
                product_code: item.product_code.clone(),
                description: item.description.clone(),
                ncm: item.ncm.clone(),
                cfop: item.cfop.clone(),
                tax_code: item.tax_code.clone(),
                tax_origin: item.tax_origin.clone(),
                unit: item.unit.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total: item.total,
                ean: item.ean.clone(),
                icms_rate: item.icms_rate,
                icms_value: item.icms_value,
                ipi_rate: item.ipi_rate,
                ipi_value: item.ipi_value,
                processed: false,
                created_at: Utc::now(),
            })
            .collect();
        tables.items.extend(created.iter().cloned());
        Ok(created)
    }
}
