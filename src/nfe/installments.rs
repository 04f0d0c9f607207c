// src/nfe/installments.rs

use rust_decimal::Decimal;

use super::{parse_date, parse_decimal, xml::XmlElement};
use crate::models::fiscal::Installment;

/// Duplicatas (cobr/dup) na ordem do documento.
/// Descarta as que não têm número ou têm valor zerado/negativo.
pub fn parse_installments(doc: &XmlElement) -> Vec<Installment> {
    doc.blocks("dup")
        .into_iter()
        .map(|dup| Installment {
            number: dup.scalar("nDup"),
            due_date: parse_date(&dup.scalar("dVenc")),
            value: parse_decimal(&dup.scalar("vDup")),
        })
        .filter(|inst| !inst.number.is_empty() && inst.value > Decimal::ZERO)
        .collect()
}
