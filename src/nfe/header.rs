// src/nfe/header.rs

use chrono::NaiveDate;

use super::{parse_date, parse_decimal, xml::XmlElement};
use crate::models::fiscal::{InvoiceStatus, InvoiceTotals};

/// Campos de cabeçalho da NF-e (ide, protocolo e totais).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NfeHeader {
    pub invoice_number: String,
    pub series: String,
    pub issue_date: Option<NaiveDate>,
    pub access_key: String,
    pub protocol_status: String,
    pub totals: InvoiceTotals,
}

impl NfeHeader {
    pub fn parse(doc: &XmlElement) -> Self {
        let (invoice_number, series, issue_date) = match doc.block("ide") {
            Some(ide) => {
                // Layout 3.10+ usa dhEmi; o layout 2.00 usava dEmi
                let mut emitted = ide.scalar("dhEmi");
                if emitted.is_empty() {
                    emitted = ide.scalar("dEmi");
                }
                (ide.scalar("nNF"), ide.scalar("serie"), parse_date(&emitted))
            }
            None => (String::new(), String::new(), None),
        };

        // protNFe -> infProt -> cStat
        let info_prot = doc
            .block("protNFe")
            .and_then(|prot| prot.block("infProt"));

        let protocol_status = info_prot.map(|info| info.scalar("cStat")).unwrap_or_default();

        let mut access_key = info_prot.map(|info| info.scalar("chNFe")).unwrap_or_default();
        if access_key.is_empty() {
            // Sem protocolo: a chave também está no atributo Id="NFe<44 dígitos>"
            access_key = doc
                .block("infNFe")
                .and_then(|inf| inf.attr("Id"))
                .map(|id| id.trim().trim_start_matches("NFe").to_string())
                .unwrap_or_default();
        }

        // Os itens (det/prod) também têm vProd, vFrete, vDesc e vêm antes de
        // <total>, então "primeira ocorrência no documento" pegaria o valor do
        // primeiro item. Os totais vêm do grupo ICMSTot; sem ele, aí sim vale a
        // primeira ocorrência.
        let totals_scope = doc.block("ICMSTot").unwrap_or(doc);
        let totals = InvoiceTotals {
            total_products: parse_decimal(&totals_scope.scalar("vProd")),
            total_icms: parse_decimal(&totals_scope.scalar("vICMS")),
            total_ipi: parse_decimal(&totals_scope.scalar("vIPI")),
            total_freight: parse_decimal(&totals_scope.scalar("vFrete")),
            total_insurance: parse_decimal(&totals_scope.scalar("vSeg")),
            total_discount: parse_decimal(&totals_scope.scalar("vDesc")),
            total_other: parse_decimal(&totals_scope.scalar("vOutro")),
            total_invoice: parse_decimal(&totals_scope.scalar("vNF")),
        };

        Self { invoice_number, series, issue_date, access_key, protocol_status, totals }
    }

    pub fn status(&self) -> InvoiceStatus {
        InvoiceStatus::from_protocol_code(&self.protocol_status)
    }
}

/// Chave de acesso: exatamente 44 dígitos.
pub fn is_valid_access_key(key: &str) -> bool {
    key.len() == 44 && key.bytes().all(|b| b.is_ascii_digit())
}
