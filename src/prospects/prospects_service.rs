use log::debug;
use std::sync::Arc;

use super::prospects_errors::{ProspectError, Result};
use super::prospects_model::{NewProspect, Prospect, ProspectDB};
use super::prospects_repository::ProspectRepository;
use crate::db::{get_connection, DbPool};

/// Service for managing prospects
pub struct ProspectService {
    pool: Arc<DbPool>,
}

impl ProspectService {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }

    pub fn create_prospect(&self, new_prospect: NewProspect) -> Result<Prospect> {
        debug!(
            "Creating prospect with company name: {}",
            new_prospect.company_name
        );

        new_prospect.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;

        let row = ProspectDB::from(new_prospect);
        ProspectRepository::insert(&mut conn, &row)
    }

    pub fn get_prospect(&self, prospect_id: &str) -> Result<Prospect> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;
        ProspectRepository::find_by_id(&mut conn, prospect_id)
    }

    pub fn list_prospects(&self) -> Result<Vec<Prospect>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;
        ProspectRepository::list(&mut conn)
    }

    pub fn delete_prospect(&self, prospect_id: &str) -> Result<()> {
        debug!("Deleting prospect with ID: {}", prospect_id);

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;
        ProspectRepository::delete(&mut conn, prospect_id)?;
        Ok(())
    }
}
