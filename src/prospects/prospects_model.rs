use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use super::prospects_errors::{ProspectError, Result};

/// Domain model representing a prospect (a not-yet-converted counterparty)
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Prospect {
    pub id: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Input model for creating a new prospect
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProspect {
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
}

impl NewProspect {
    pub fn validate(&self) -> Result<()> {
        if self.company_name.trim().is_empty() {
            return Err(ProspectError::InvalidData(
                "Prospect company name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Database model for prospects
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
#[diesel(table_name = crate::schema::prospects)]
#[diesel(treat_none_as_null = true)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProspectDB {
    pub id: String,
    pub company_name: String,
    pub contact_name: Option<String>,
    pub city: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<NewProspect> for ProspectDB {
    fn from(domain: NewProspect) -> Self {
        let now = chrono::Utc::now().naive_utc();
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            company_name: domain.company_name,
            contact_name: domain.contact_name,
            city: domain.city,
            created_at: now,
            updated_at: now,
        }
    }
}

impl From<ProspectDB> for Prospect {
    fn from(db: ProspectDB) -> Self {
        Self {
            id: db.id,
            company_name: db.company_name,
            contact_name: db.contact_name,
            city: db.city,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}
