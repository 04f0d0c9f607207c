// src/nfe/items.rs

use rust_decimal::Decimal;

use super::{non_empty, parse_decimal, xml::XmlElement};
use crate::models::fiscal::NewLineItem;

/// Grupos de ICMS, na ordem em que são procurados.
/// Só o primeiro presente no item é considerado.
pub const ICMS_REGIME_TAGS: [&str; 15] = [
    "ICMS00", "ICMS10", "ICMS20", "ICMS30", "ICMS40", "ICMS51", "ICMS60", "ICMS70", "ICMS90",
    "ICMSSN101", "ICMSSN102", "ICMSSN201", "ICMSSN202", "ICMSSN500", "ICMSSN900",
];

const NO_BARCODE: &str = "SEM GTIN";

/// ICMS de um item, vindo do grupo de regime encontrado.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IcmsInfo {
    pub regime_tag: Option<&'static str>,
    pub tax_code: String, // CST ou CSOSN
    pub origin: String,
    pub rate: Decimal,
    pub value: Decimal,
}

impl IcmsInfo {
    pub fn parse(imposto: &XmlElement) -> Self {
        let Some(icms) = imposto.block("ICMS") else {
            return Self::default();
        };

        for tag in ICMS_REGIME_TAGS {
            if let Some(group) = icms.block(tag) {
                let mut tax_code = group.scalar("CST");
                if tax_code.is_empty() {
                    tax_code = group.scalar("CSOSN");
                }
                return Self {
                    regime_tag: Some(tag),
                    tax_code,
                    origin: group.scalar("orig"),
                    rate: parse_decimal(&group.scalar("pICMS")),
                    value: parse_decimal(&group.scalar("vICMS")),
                };
            }
        }

        Self::default()
    }
}

/// Lê todos os <det> do documento.
pub fn parse_items(doc: &XmlElement) -> Vec<NewLineItem> {
    doc.blocks("det")
        .into_iter()
        .enumerate()
        .map(|(index, det)| parse_item(det, index))
        .collect()
}

fn parse_item(det: &XmlElement, index: usize) -> NewLineItem {
    let item_number = det
        .attr("nItem")
        .and_then(|n| n.trim().parse::<i32>().ok())
        .unwrap_or(index as i32 + 1);

    let empty = XmlElement::default();
    let prod = det.block("prod").unwrap_or(&empty);
    let imposto = det.block("imposto").unwrap_or(&empty);

    let icms = IcmsInfo::parse(imposto);

    let (ipi_rate, ipi_value) = match imposto.block("IPI") {
        Some(ipi) => (
            parse_decimal(&ipi.scalar("pIPI")),
            parse_decimal(&ipi.scalar("vIPI")),
        ),
        None => (Decimal::ZERO, Decimal::ZERO),
    };

    let mut ean = prod.scalar("cEAN");
    if ean.eq_ignore_ascii_case(NO_BARCODE) {
        ean.clear();
    }

    NewLineItem {
        item_number,
        product_code: prod.scalar("cProd"),
        description: prod.scalar("xProd"),
        ncm: non_empty(prod.scalar("NCM")),
        cfop: non_empty(prod.scalar("CFOP")),
        tax_code: non_empty(icms.tax_code),
        tax_origin: non_empty(icms.origin),
        unit: non_empty(prod.scalar("uCom")),
        quantity: parse_decimal(&prod.scalar("qCom")),
        unit_price: parse_decimal(&prod.scalar("vUnCom")),
        total: parse_decimal(&prod.scalar("vProd")),
        ean: non_empty(ean),
        icms_rate: icms.rate,
        icms_value: icms.value,
        ipi_rate,
        ipi_value,
    }
}
