use diesel::Connection;
use log::debug;
use std::sync::Arc;

use super::clients_errors::{ClientError, Result};
use super::clients_model::{Client, ClientDB, ClientUpdate, NewClient};
use super::clients_repository::ClientRepository;
use crate::constants::MAX_NUMBER_ATTEMPTS;
use crate::db::{get_connection, DbPool};
use crate::utils::IdGenerator;

/// Service for managing client accounts
pub struct ClientService {
    pool: Arc<DbPool>,
    id_generator: Arc<IdGenerator>,
}

impl ClientService {
    pub fn new(pool: Arc<DbPool>, id_generator: Arc<IdGenerator>) -> Self {
        Self { pool, id_generator }
    }

    /// Creates a client, generating an account number when none is supplied.
    pub fn create_client(&self, new_client: NewClient) -> Result<Client> {
        debug!("Creating client with name: {}", new_client.name);

        new_client.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, ClientError, _>(|tx_conn| {
            let account_number = match new_client.account_number.as_deref() {
                Some(number) if !number.is_empty() => {
                    if ClientRepository::account_number_exists(tx_conn, number)? {
                        return Err(ClientError::Duplicate(format!(
                            "Client already exists with account number '{}'",
                            number
                        )));
                    }
                    number.to_string()
                }
                _ => self.next_account_number(tx_conn)?,
            };

            let row = ClientDB::from_new(&new_client, account_number);
            ClientRepository::insert(tx_conn, &row)
        })
    }

    pub fn update_client(&self, update: ClientUpdate) -> Result<Client> {
        debug!("Updating client with ID: {}", update.id);

        update.validate()?;

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        conn.transaction::<_, ClientError, _>(|tx_conn| {
            let existing = ClientRepository::find_row(tx_conn, &update.id)?;

            let row = ClientDB {
                id: existing.id,
                name: update.name.clone(),
                account_number: existing.account_number,
                tax_id: update.tax_id.clone(),
                annual_revenue: update.annual_revenue.map(|d| d.to_string()),
                is_tax_exempt: update.is_tax_exempt,
                created_at: existing.created_at,
                updated_at: chrono::Utc::now().naive_utc(),
            };

            ClientRepository::update(tx_conn, &row)
        })
    }

    pub fn get_client(&self, client_id: &str) -> Result<Client> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;
        ClientRepository::find_by_id(&mut conn, client_id)
    }

    pub fn get_by_account_number(&self, number: &str) -> Result<Client> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;
        ClientRepository::find_by_account_number(&mut conn, number)
    }

    pub fn list_clients(&self) -> Result<Vec<Client>> {
        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;
        ClientRepository::list(&mut conn)
    }

    pub fn delete_client(&self, client_id: &str) -> Result<()> {
        debug!("Deleting client with ID: {}", client_id);

        let mut conn = get_connection(&self.pool)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;
        ClientRepository::delete(&mut conn, client_id)?;
        Ok(())
    }

    /// Uniqueness gate: draws fresh candidates until one is unused.
    fn next_account_number(
        &self,
        conn: &mut diesel::sqlite::SqliteConnection,
    ) -> Result<String> {
        for _ in 0..MAX_NUMBER_ATTEMPTS {
            let candidate = self.id_generator.client_account_number();
            if !ClientRepository::account_number_exists(conn, &candidate)? {
                return Ok(candidate);
            }
        }
        Err(ClientError::Duplicate(
            "Could not allocate an unused client account number".to_string(),
        ))
    }
}
