// src/models/fiscal.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// --- ENUMS (Mapeando os tipos do Postgres) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fiscal_invoice_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    Pending,   // Autorizada (cStat 100 ou qualquer outro)
    Cancelled, // Cancelada (cStat 101)
}

impl InvoiceStatus {
    /// Código de status do protocolo de autorização da SEFAZ.
    pub fn from_protocol_code(code: &str) -> Self {
        if code.trim() == "101" {
            InvoiceStatus::Cancelled
        } else {
            InvoiceStatus::Pending
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_condition", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentCondition {
    None,            // Sem duplicatas
    Cash,            // À vista (1 duplicata)
    InstallmentPlan, // A prazo (2 ou mais)
}

impl PaymentCondition {
    pub fn from_installment_count(count: usize) -> Self {
        match count {
            0 => PaymentCondition::None,
            1 => PaymentCondition::Cash,
            _ => PaymentCondition::InstallmentPlan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "fiscal_entry_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryType {
    Resale, // Compra para revenda
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "supplier_category", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierCategory {
    Parts, // Peças
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "supplier_status", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SupplierStatus {
    Active,
}

// --- FORNECEDOR ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Supplier {
    pub id: Uuid,
    pub name: String,
    pub tax_id: String, // CNPJ ou CPF do emitente
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub category: SupplierCategory,
    pub status: SupplierStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewSupplier {
    pub name: String,
    pub tax_id: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub category: SupplierCategory,
    pub status: SupplierStatus,
}

// --- NOTA FISCAL ---

/// Totais do grupo ICMSTot. Ausente ou ilegível vira zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
    pub total_products: Decimal,  // vProd
    pub total_icms: Decimal,      // vICMS
    pub total_ipi: Decimal,       // vIPI
    pub total_freight: Decimal,   // vFrete
    pub total_insurance: Decimal, // vSeg
    pub total_discount: Decimal,  // vDesc
    pub total_other: Decimal,     // vOutro
    pub total_invoice: Decimal,   // vNF
}

/// Duplicata (parcela) embutida na nota, gravada como JSONB.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Installment {
    pub number: String,
    pub due_date: Option<NaiveDate>,
    pub value: Decimal,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: Uuid,
    pub supplier_id: Uuid,
    pub invoice_number: String,
    pub series: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub entry_date: NaiveDate,
    pub access_key: String,
    pub entry_type: EntryType,

    #[sqlx(flatten)]
    #[serde(flatten)]
    pub totals: InvoiceTotals,

    #[sqlx(json)]
    pub installments: Vec<Installment>,
    pub payment_condition: PaymentCondition,
    pub installment_count: i32,
    pub next_due_date: Option<NaiveDate>,

    pub status: InvoiceStatus,

    #[serde(skip_serializing)] // XML original fica só no banco (auditoria/reimpressão)
    pub raw_xml: String,

    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewInvoice {
    pub supplier_id: Uuid,
    pub invoice_number: String,
    pub series: Option<String>,
    pub issue_date: Option<NaiveDate>,
    pub entry_date: NaiveDate,
    pub access_key: String,
    pub entry_type: EntryType,
    pub totals: InvoiceTotals,
    pub installments: Vec<Installment>,
    pub payment_condition: PaymentCondition,
    pub installment_count: i32,
    pub next_due_date: Option<NaiveDate>,
    pub status: InvoiceStatus,
    pub raw_xml: String,
}

// --- ITENS DA NOTA ---

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub id: Uuid,
    pub invoice_id: Uuid,
    pub item_number: i32,
    pub product_code: String,
    pub description: String,
    pub ncm: Option<String>,
    pub cfop: Option<String>,
    pub tax_code: Option<String>,   // CST ou CSOSN
    pub tax_origin: Option<String>, // orig
    pub unit: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub ean: Option<String>,
    pub icms_rate: Decimal,
    pub icms_value: Decimal,
    pub ipi_rate: Decimal,
    pub ipi_value: Decimal,
    // Marcado depois pela rotina de estoque
    pub processed: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewLineItem {
    pub item_number: i32,
    pub product_code: String,
    pub description: String,
    pub ncm: Option<String>,
    pub cfop: Option<String>,
    pub tax_code: Option<String>,
    pub tax_origin: Option<String>,
    pub unit: Option<String>,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub ean: Option<String>,
    pub icms_rate: Decimal,
    pub icms_value: Decimal,
    pub ipi_rate: Decimal,
    pub ipi_value: Decimal,
}
