// src/nfe.rs
//
// Leitura do XML da NF-e (modelo 55), sem validação de schema.

pub mod header;
pub mod installments;
pub mod issuer;
pub mod items;
pub mod xml;

#[cfg(test)]
pub mod fixtures;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Valores monetários da NF-e usam ponto decimal. Vazio ou ilegível vira zero.
pub fn parse_decimal(raw: &str) -> Decimal {
    Decimal::from_str(raw.trim()).unwrap_or(Decimal::ZERO)
}

/// Aceita "2024-03-15" e "2024-03-15T10:30:00-03:00" (só a parte da data).
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let date_part = raw.trim().split('T').next().unwrap_or_default();
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimals_default_to_zero() {
        assert_eq!(parse_decimal("1000.00"), Decimal::new(100000, 2));
        assert_eq!(parse_decimal(""), Decimal::ZERO);
        assert_eq!(parse_decimal("abc"), Decimal::ZERO);
    }

    #[test]
    fn dates_drop_the_time_component() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15);
        assert_eq!(parse_date("2024-03-15T10:30:00-03:00"), expected);
        assert_eq!(parse_date("2024-03-15"), expected);
        assert_eq!(parse_date(""), None);
    }
}
