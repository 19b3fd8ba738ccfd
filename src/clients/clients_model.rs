use chrono::NaiveDateTime;
use diesel::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::clients_errors::{ClientError, Result};
use crate::utils::decimals::parse_optional_decimal;

/// Domain model representing a client account
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub name: String,
    pub account_number: String,
    pub tax_id: Option<String>,
    pub annual_revenue: Option<Decimal>,
    pub is_tax_exempt: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewClient {
    pub name: String,
    /// Account number; generated (`CLI-YYYYMMDD-NNNN`) when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    pub tax_id: Option<String>,
    pub annual_revenue: Option<Decimal>,
    #[serde(default)]
    pub is_tax_exempt: bool,
}

impl NewClient {
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidData(
                "Client name cannot be empty".to_string(),
            ));
        }
        if let Some(revenue) = self.annual_revenue {
            if revenue < Decimal::ZERO {
                return Err(ClientError::InvalidData(
                    "Annual revenue cannot be negative".to_string(),
                ));
            }
        }
        Ok(())
    }
}

/// Input model for updating an existing client
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientUpdate {
    pub id: String,
    pub name: String,
    pub tax_id: Option<String>,
    pub annual_revenue: Option<Decimal>,
    pub is_tax_exempt: bool,
}

impl ClientUpdate {
    pub fn validate(&self) -> Result<()> {
        if self.id.trim().is_empty() {
            return Err(ClientError::InvalidData(
                "Client ID is required for updates".to_string(),
            ));
        }
        if self.name.trim().is_empty() {
            return Err(ClientError::InvalidData(
                "Client name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for clients
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
#[diesel(table_name = crate::schema::clients)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ClientDB {
    pub id: String,
    pub name: String,
    pub account_number: String,
    pub tax_id: Option<String>,
    pub annual_revenue: Option<String>,
    pub is_tax_exempt: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl ClientDB {
    /// Builds an insertable row from validated input and a resolved account number.
    pub fn from_new(new_client: &NewClient, account_number: String) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new_client.name.clone(),
            account_number,
            tax_id: new_client.tax_id.clone(),
            annual_revenue: new_client.annual_revenue.map(|d| d.to_string()),
            is_tax_exempt: new_client.is_tax_exempt,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ClientDB> for Client {
    fn from(db: ClientDB) -> Self {
        let annual_revenue = parse_optional_decimal(db.annual_revenue.as_deref(), "annual_revenue");
        Self {
            id: db.id,
            name: db.name,
            account_number: db.account_number,
            tax_id: db.tax_id,
            annual_revenue,
            is_tax_exempt: db.is_tax_exempt,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
