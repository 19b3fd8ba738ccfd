use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a decimal stored as TEXT, falling back to zero on corrupt data.
pub(crate) fn parse_decimal(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e) => {
            log::error!(
                "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
                field_name,
                value_str,
                e
            );
            Decimal::ZERO
        }
    }
}

pub(crate) fn parse_optional_decimal(value: Option<&str>, field_name: &str) -> Option<Decimal> {
    value.map(|s| parse_decimal(s, field_name))
}
