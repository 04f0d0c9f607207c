// src/services/supplier_service.rs

use std::sync::Arc;

use crate::{
    common::error::AppError,
    db::FiscalStore,
    models::fiscal::Supplier,
    nfe::issuer::NfeIssuer,
};

#[derive(Clone)]
pub struct SupplierService {
    store: Arc<dyn FiscalStore>,
}

impl SupplierService {
    pub fn new(store: Arc<dyn FiscalStore>) -> Self {
        Self { store }
    }

    /// Busca o fornecedor pelo CNPJ/CPF do emitente; se não existir, cria.
    ///
    /// A busca e a criação não são atômicas: quem chama precisa garantir que
    /// duas notas do mesmo emitente não sejam processadas ao mesmo tempo.
    pub async fn resolve_or_create(&self, issuer: &NfeIssuer) -> Result<Supplier, AppError> {
        if let Some(existing) = self.store.find_supplier_by_tax_id(&issuer.tax_id).await? {
            return Ok(existing);
        }

        let created = self.store.create_supplier(&issuer.to_new_supplier()).await?;
        tracing::info!("🏭 Fornecedor {} ({}) cadastrado.", created.name, created.tax_id);

        Ok(created)
    }
}
