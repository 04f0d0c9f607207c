// src/nfe/issuer.rs

use super::{non_empty, xml::XmlElement};
use crate::models::fiscal::{NewSupplier, SupplierCategory, SupplierStatus};

/// Dados do emitente (grupo <emit>), que vira o fornecedor.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NfeIssuer {
    pub name: String,
    pub tax_id: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl NfeIssuer {
    pub fn parse(doc: &XmlElement) -> Self {
        let Some(emit) = doc.block("emit") else {
            return Self::default();
        };

        // Produtor rural e MEI podem emitir com CPF
        let mut tax_id = emit.scalar("CNPJ");
        if tax_id.is_empty() {
            tax_id = emit.scalar("CPF");
        }

        let (phone, address) = match emit.block("enderEmit") {
            Some(ender) => (ender.scalar("fone"), compose_address(ender)),
            None => (String::new(), String::new()),
        };

        Self {
            name: emit.scalar("xNome"),
            tax_id,
            email: emit.scalar("email"),
            phone,
            address,
        }
    }

    pub fn to_new_supplier(&self) -> NewSupplier {
        NewSupplier {
            name: self.name.clone(),
            tax_id: self.tax_id.clone(),
            phone: non_empty(self.phone.clone()),
            email: non_empty(self.email.clone()),
            address: non_empty(self.address.clone()),
            category: SupplierCategory::Parts,
            status: SupplierStatus::Active,
        }
    }
}

/// "Rua X, 120 - Centro - Campinas/SP", pulando as partes vazias.
fn compose_address(ender: &XmlElement) -> String {
    let street = [ender.scalar("xLgr"), ender.scalar("nro")]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

    let city = [ender.scalar("xMun"), ender.scalar("UF")]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("/");

    [street, ender.scalar("xBairro"), city]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" - ")
}
