// src/db/fiscal_repo.rs

use async_trait::async_trait;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::FiscalStore,
    models::fiscal::{Invoice, LineItem, NewInvoice, NewLineItem, NewSupplier, Supplier},
};

// O repositório fiscal: tabelas 'suppliers', 'fiscal_invoices' e 'fiscal_invoice_items'
#[derive(Clone)]
pub struct FiscalRepository {
    pool: PgPool,
}

impl FiscalRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl FiscalStore for FiscalRepository {
    async fn find_invoice_by_access_key(&self, access_key: &str) -> Result<Option<Invoice>, AppError> {
        let invoice = sqlx::query_as::<_, Invoice>(
            "SELECT * FROM fiscal_invoices WHERE access_key = $1",
        )
        .bind(access_key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(invoice)
    }

    async fn find_supplier_by_tax_id(&self, tax_id: &str) -> Result<Option<Supplier>, AppError> {
        let supplier = sqlx::query_as::<_, Supplier>(
            "SELECT * FROM suppliers WHERE tax_id = $1",
        )
        .bind(tax_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(supplier)
    }

    async fn create_supplier(&self, supplier: &NewSupplier) -> Result<Supplier, AppError> {
        let created = sqlx::query_as::<_, Supplier>(
            r#"
            INSERT INTO suppliers (name, tax_id, phone, email, address, category, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(&supplier.name)
        .bind(&supplier.tax_id)
        .bind(&supplier.phone)
        .bind(&supplier.email)
        .bind(&supplier.address)
        .bind(supplier.category)
        .bind(supplier.status)
        .fetch_one(&self.pool)
        .await?;

        Ok(created)
    }

    async fn create_invoice(&self, invoice: &NewInvoice) -> Result<Invoice, AppError> {
        sqlx::query_as::<_, Invoice>(
            r#"
            INSERT INTO fiscal_invoices (
                supplier_id, invoice_number, series, issue_date, entry_date, access_key, entry_type,
                total_products, total_icms, total_ipi, total_freight, total_insurance,
                total_discount, total_other, total_invoice,
                installments, payment_condition, installment_count, next_due_date,
                status, raw_xml
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15,
                    $16, $17, $18, $19, $20, $21)
            RETURNING *
            "#,
        )
        .bind(invoice.supplier_id)
        .bind(&invoice.invoice_number)
        .bind(&invoice.series)
        .bind(invoice.issue_date)
        .bind(invoice.entry_date)
        .bind(&invoice.access_key)
        .bind(invoice.entry_type)
        .bind(invoice.totals.total_products)
        .bind(invoice.totals.total_icms)
        .bind(invoice.totals.total_ipi)
        .bind(invoice.totals.total_freight)
        .bind(invoice.totals.total_insurance)
        .bind(invoice.totals.total_discount)
        .bind(invoice.totals.total_other)
        .bind(invoice.totals.total_invoice)
        .bind(Json(&invoice.installments))
        .bind(invoice.payment_condition)
        .bind(invoice.installment_count)
        .bind(invoice.next_due_date)
        .bind(invoice.status)
        .bind(&invoice.raw_xml)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Duas importações simultâneas da mesma chave: o banco desempata
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::DuplicateInvoice(invoice.invoice_number.clone());
                }
            }
            e.into()
        })
    }

    async fn bulk_create_line_items(
        &self,
        invoice_id: Uuid,
        items: &[NewLineItem],
    ) -> Result<Vec<LineItem>, AppError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut query_builder: QueryBuilder<Postgres> = QueryBuilder::new(
            "INSERT INTO fiscal_invoice_items (
                invoice_id, item_number, product_code, description, ncm, cfop,
                tax_code, tax_origin, unit, quantity, unit_price, total, ean,
                icms_rate, icms_value, ipi_rate, ipi_value
            ) ",
        );

        query_builder.push_values(items, |mut b, item| {
            b.push_bind(invoice_id)
                .push_bind(item.item_number)
                .push_bind(&item.product_code)
                .push_bind(&item.description)
                .push_bind(&item.ncm)
                .push_bind(&item.cfop)
                .push_bind(&item.tax_code)
                .push_bind(&item.tax_origin)
                .push_bind(&item.unit)
                .push_bind(item.quantity)
                .push_bind(item.unit_price)
                .push_bind(item.total)
                .push_bind(&item.ean)
                .push_bind(item.icms_rate)
                .push_bind(item.icms_value)
                .push_bind(item.ipi_rate)
                .push_bind(item.ipi_value);
        });
        query_builder.push(" RETURNING *");

        let created = query_builder
            .build_query_as::<LineItem>()
            .fetch_all(&self.pool)
            .await?;

        Ok(created)
    }
}
