use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::products_errors::{ProductError, Result};
use crate::utils::decimals::parse_optional_decimal;

/// Domain model representing a catalog product
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub code: String,
    pub label: String,
    pub category: Option<String>,
    /// Weight of a single unit; quotes carry no weight for weightless products.
    pub unit_weight_kg: Option<Decimal>,
    pub is_active: bool,
    /// Eco-fee flagged products take a flat surcharge on every quote line.
    pub has_eco_fee: bool,
    pub wholesale_price: Option<Decimal>,
    pub retail_price: Option<Decimal>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub code: String,
    pub label: String,
    pub category: Option<String>,
    pub unit_weight_kg: Option<Decimal>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub has_eco_fee: bool,
    pub wholesale_price: Option<Decimal>,
    pub retail_price: Option<Decimal>,
}

fn default_true() -> bool {
    true
}

impl NewProduct {
    pub fn validate(&self) -> Result<()> {
        if self.code.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product code cannot be empty".to_string(),
            ));
        }
        if self.label.trim().is_empty() {
            return Err(ProductError::InvalidData(
                "Product label cannot be empty".to_string(),
            ));
        }
        for (name, value) in [
            ("unit weight", self.unit_weight_kg),
            ("wholesale price", self.wholesale_price),
            ("retail price", self.retail_price),
        ] {
            if let Some(v) = value {
                if v < Decimal::ZERO {
                    return Err(ProductError::InvalidData(format!(
                        "Product {} cannot be negative",
                        name
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Database model for products
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
#[diesel(table_name = crate::schema::products)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductDB {
    pub id: String,
    pub code: String,
    pub label: String,
    pub category: Option<String>,
    pub unit_weight_kg: Option<String>,
    pub is_active: bool,
    pub has_eco_fee: bool,
    pub wholesale_price: Option<String>,
    pub retail_price: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<NewProduct> for ProductDB {
    fn from(domain: NewProduct) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            code: domain.code,
            label: domain.label,
            category: domain.category,
            unit_weight_kg: domain.unit_weight_kg.map(|d| d.to_string()),
            is_active: domain.is_active,
            has_eco_fee: domain.has_eco_fee,
            wholesale_price: domain.wholesale_price.map(|d| d.to_string()),
            retail_price: domain.retail_price.map(|d| d.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ProductDB> for Product {
    fn from(db: ProductDB) -> Self {
        Self {
            unit_weight_kg: parse_optional_decimal(db.unit_weight_kg.as_deref(), "unit_weight_kg"),
            wholesale_price: parse_optional_decimal(
                db.wholesale_price.as_deref(),
                "wholesale_price",
            ),
            retail_price: parse_optional_decimal(db.retail_price.as_deref(), "retail_price"),
            id: db.id,
            code: db.code,
            label: db.label,
            category: db.category,
            is_active: db.is_active,
            has_eco_fee: db.has_eco_fee,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
