use chrono::{NaiveDate, NaiveDateTime};
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::quotes_calculator::LinePricing;
use super::quotes_errors::{QuoteError, Result};
use crate::clients::Client;
use crate::prospects::Prospect;
use crate::utils::decimals::{parse_decimal, parse_optional_decimal};

/// Domain model for a quote, fully assembled: resolved counterparty, owned
/// lines and recomputed totals.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub id: String,
    pub quote_number: String,
    pub subject: String,
    /// Exactly one of `client` / `prospect` is set.
    pub client: Option<Client>,
    pub prospect: Option<Prospect>,
    pub due_date: Option<NaiveDate>,
    pub delivery_delay: Option<String>,
    pub delivery_mode: Option<String>,
    pub payment_mode: Option<String>,
    pub lines: Vec<QuoteLine>,
    /// Always the sum of the persisted lines' totals, never caller-authored.
    pub total_incl_tax: Decimal,
    pub total_weight_kg: Decimal,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Domain model for a single quote line with its derived pricing fields.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct QuoteLine {
    pub id: String,
    pub quote_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub tax_rate: Decimal,
    pub tax_amount: Decimal,
    pub eco_fee: Decimal,
    pub unit_price_incl_tax: Decimal,
    pub total_incl_tax: Decimal,
    pub weight_kg: Option<Decimal>,
}

/// Input model for creating a quote
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuote {
    /// Quote number; generated (`DEV-YYYYMMDD-NNNN`) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote_number: Option<String>,
    pub subject: String,
    pub client_id: Option<String>,
    pub prospect_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub delivery_delay: Option<String>,
    pub delivery_mode: Option<String>,
    pub payment_mode: Option<String>,
    #[serde(default)]
    pub lines: Vec<NewQuoteLine>,
}

impl NewQuote {
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(QuoteError::InvalidData(
                "Quote subject cannot be empty".to_string(),
            ));
        }
        for line in &self.lines {
            line.validate()?;
        }
        Ok(())
    }
}

/// Input model for a whole-quote update. `lines: Some(..)` replaces the
/// persisted line set wholesale; `None` leaves it untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteUpdate {
    /// New quote number; `None` keeps the current one.
    pub quote_number: Option<String>,
    pub subject: String,
    pub client_id: Option<String>,
    pub prospect_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub delivery_delay: Option<String>,
    pub delivery_mode: Option<String>,
    pub payment_mode: Option<String>,
    pub lines: Option<Vec<NewQuoteLine>>,
}

impl QuoteUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.subject.trim().is_empty() {
            return Err(QuoteError::InvalidData(
                "Quote subject cannot be empty".to_string(),
            ));
        }
        if let Some(lines) = &self.lines {
            for line in lines {
                line.validate()?;
            }
        }
        Ok(())
    }
}

/// Input model for a quote line. Only the source fields are accepted; every
/// derived field is computed from the referenced product.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewQuoteLine {
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// VAT rate as a decimal fraction; defaults to the standard rate.
    pub tax_rate: Option<Decimal>,
}

impl NewQuoteLine {
    pub fn validate(&self) -> Result<()> {
        if self.product_id.trim().is_empty() {
            return Err(QuoteError::InvalidData(
                "Quote line product ID cannot be empty".to_string(),
            ));
        }
        if self.quantity < 1 {
            return Err(QuoteError::InvalidData(
                "Quote line quantity must be at least 1".to_string(),
            ));
        }
        if self.unit_price < Decimal::ZERO {
            return Err(QuoteError::InvalidData(
                "Quote line unit price cannot be negative".to_string(),
            ));
        }
        if let Some(rate) = self.tax_rate {
            if rate < Decimal::ZERO {
                return Err(QuoteError::InvalidData(
                    "Quote line tax rate cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Database model for quotes
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::quotes)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteDB {
    pub id: String,
    pub quote_number: String,
    pub subject: String,
    pub client_id: Option<String>,
    pub prospect_id: Option<String>,
    pub due_date: Option<NaiveDate>,
    pub delivery_delay: Option<String>,
    pub delivery_mode: Option<String>,
    pub payment_mode: Option<String>,
    pub total_incl_tax: String,
    pub total_weight_kg: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Database model for quote lines
#[derive(
    Queryable,
    Identifiable,
    Insertable,
    AsChangeset,
    Selectable,
    PartialEq,
    Serialize,
    Deserialize,
    Debug,
    Clone,
)]
#[diesel(table_name = crate::schema::quote_lines)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct QuoteLineDB {
    pub id: String,
    pub quote_id: String,
    pub product_id: String,
    pub quantity: i32,
    pub unit_price: String,
    pub tax_rate: String,
    pub tax_amount: String,
    pub eco_fee: String,
    pub unit_price_incl_tax: String,
    pub total_incl_tax: String,
    pub weight_kg: Option<String>,
}

impl QuoteDB {
    /// Builds an insertable quote shell; totals start at zero until the first
    /// aggregation pass.
    pub fn new_shell(
        quote_number: String,
        new_quote: &NewQuote,
        client_id: Option<String>,
        prospect_id: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            quote_number,
            subject: new_quote.subject.clone(),
            client_id,
            prospect_id,
            due_date: new_quote.due_date,
            delivery_delay: new_quote.delivery_delay.clone(),
            delivery_mode: new_quote.delivery_mode.clone(),
            payment_mode: new_quote.payment_mode.clone(),
            total_incl_tax: Decimal::ZERO.to_string(),
            total_weight_kg: Decimal::ZERO.to_string(),
            created_at: now,
            updated_at: now,
        }
    }
}

impl QuoteLineDB {
    /// Builds an insertable line from validated input and computed pricing.
    pub fn from_pricing(
        quote_id: &str,
        line: &NewQuoteLine,
        tax_rate: Decimal,
        pricing: &LinePricing,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            quote_id: quote_id.to_string(),
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price.to_string(),
            tax_rate: tax_rate.to_string(),
            tax_amount: pricing.tax_amount.to_string(),
            eco_fee: pricing.eco_fee.to_string(),
            unit_price_incl_tax: pricing.unit_price_incl_tax.to_string(),
            total_incl_tax: pricing.total_incl_tax.to_string(),
            weight_kg: pricing.weight_kg.map(|d| d.to_string()),
        }
    }
}

impl From<QuoteLineDB> for QuoteLine {
    fn from(db: QuoteLineDB) -> Self {
        Self {
            unit_price: parse_decimal(&db.unit_price, "unit_price"),
            tax_rate: parse_decimal(&db.tax_rate, "tax_rate"),
            tax_amount: parse_decimal(&db.tax_amount, "tax_amount"),
            eco_fee: parse_decimal(&db.eco_fee, "eco_fee"),
            unit_price_incl_tax: parse_decimal(&db.unit_price_incl_tax, "unit_price_incl_tax"),
            total_incl_tax: parse_decimal(&db.total_incl_tax, "total_incl_tax"),
            weight_kg: parse_optional_decimal(db.weight_kg.as_deref(), "weight_kg"),
            id: db.id,
            quote_id: db.quote_id,
            product_id: db.product_id,
            quantity: db.quantity,
        }
    }
}

impl Quote {
    /// Assembles the domain quote from its row, resolved counterparty and lines.
    pub fn from_parts(
        db: QuoteDB,
        client: Option<Client>,
        prospect: Option<Prospect>,
        lines: Vec<QuoteLine>,
    ) -> Self {
        Self {
            total_incl_tax: parse_decimal(&db.total_incl_tax, "total_incl_tax"),
            total_weight_kg: parse_decimal(&db.total_weight_kg, "total_weight_kg"),
            id: db.id,
            quote_number: db.quote_number,
            subject: db.subject,
            client,
            prospect,
            due_date: db.due_date,
            delivery_delay: db.delivery_delay,
            delivery_mode: db.delivery_mode,
            payment_mode: db.payment_mode,
            lines,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample_line() -> NewQuoteLine {
        NewQuoteLine {
            product_id: "prod-1".to_string(),
            quantity: 3,
            unit_price: dec!(100.00),
            tax_rate: Some(dec!(0.19)),
        }
    }

    #[test]
    fn new_quote_requires_subject() {
        let quote = NewQuote {
            quote_number: None,
            subject: "   ".to_string(),
            client_id: Some("cli-1".to_string()),
            prospect_id: None,
            due_date: None,
            delivery_delay: None,
            delivery_mode: None,
            payment_mode: None,
            lines: vec![],
        };

        assert!(matches!(
            quote.validate(),
            Err(QuoteError::InvalidData(_))
        ));
    }

    #[test]
    fn line_quantity_must_be_positive() {
        let mut line = sample_line();
        line.quantity = 0;
        assert!(matches!(line.validate(), Err(QuoteError::InvalidData(_))));

        line.quantity = 1;
        assert!(line.validate().is_ok());
    }

    #[test]
    fn line_unit_price_cannot_be_negative() {
        let mut line = sample_line();
        line.unit_price = dec!(-0.01);
        assert!(matches!(line.validate(), Err(QuoteError::InvalidData(_))));
    }

    #[test]
    fn line_round_trips_through_db_model() {
        use crate::quotes::quotes_calculator::LinePricing;

        let pricing = LinePricing {
            tax_amount: dec!(19.00),
            eco_fee: dec!(0),
            unit_price_incl_tax: dec!(119.00),
            total_incl_tax: dec!(357.00),
            weight_kg: Some(dec!(7.5)),
        };
        let db = QuoteLineDB::from_pricing("quote-1", &sample_line(), dec!(0.19), &pricing);
        let line = QuoteLine::from(db);

        assert_eq!(line.quote_id, "quote-1");
        assert_eq!(line.total_incl_tax, dec!(357.00));
        assert_eq!(line.weight_kg, Some(dec!(7.5)));
    }
}
