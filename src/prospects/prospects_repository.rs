use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::prospects_errors::{ProspectError, Result};
use super::prospects_model::{Prospect, ProspectDB};
use crate::schema::prospects;

/// Connection-scoped queries for prospect records.
pub struct ProspectRepository;

impl ProspectRepository {
    pub fn insert(conn: &mut SqliteConnection, row: &ProspectDB) -> Result<Prospect> {
        diesel::insert_into(prospects::table)
            .values(row)
            .execute(conn)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;

        Ok(row.clone().into())
    }

    pub fn find_by_id(conn: &mut SqliteConnection, prospect_id: &str) -> Result<Prospect> {
        let prospect_db = prospects::table
            .find(prospect_id)
            .select(ProspectDB::as_select())
            .first::<ProspectDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ProspectError::NotFound(format!("Prospect with id {} not found", prospect_id))
                }
                _ => ProspectError::DatabaseError(e.to_string()),
            })?;

        Ok(prospect_db.into())
    }

    pub fn list(conn: &mut SqliteConnection) -> Result<Vec<Prospect>> {
        prospects::table
            .select(ProspectDB::as_select())
            .order(prospects::company_name.asc())
            .load::<ProspectDB>(conn)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Prospect::from).collect())
    }

    pub fn delete(conn: &mut SqliteConnection, prospect_id: &str) -> Result<usize> {
        let affected = diesel::delete(prospects::table.find(prospect_id))
            .execute(conn)
            .map_err(|e| ProspectError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ProspectError::NotFound(format!(
                "Prospect with id {} not found",
                prospect_id
            )));
        }

        Ok(affected)
    }
}
