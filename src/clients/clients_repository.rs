use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::clients_errors::{ClientError, Result};
use super::clients_model::{Client, ClientDB};
use crate::schema::clients;

/// Connection-scoped queries for client records. All functions take the caller's
/// connection so they compose inside a surrounding transaction.
pub struct ClientRepository;

impl ClientRepository {
    pub fn insert(conn: &mut SqliteConnection, row: &ClientDB) -> Result<Client> {
        diesel::insert_into(clients::table)
            .values(row)
            .execute(conn)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        Ok(row.clone().into())
    }

    pub fn find_by_id(conn: &mut SqliteConnection, client_id: &str) -> Result<Client> {
        Self::find_row(conn, client_id).map(Client::from)
    }

    pub(crate) fn find_row(conn: &mut SqliteConnection, client_id: &str) -> Result<ClientDB> {
        clients::table
            .find(client_id)
            .select(ClientDB::as_select())
            .first::<ClientDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    ClientError::NotFound(format!("Client with id {} not found", client_id))
                }
                _ => ClientError::DatabaseError(e.to_string()),
            })
    }

    pub fn find_by_account_number(conn: &mut SqliteConnection, number: &str) -> Result<Client> {
        let client_db = clients::table
            .filter(clients::account_number.eq(number))
            .select(ClientDB::as_select())
            .first::<ClientDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => ClientError::NotFound(format!(
                    "Client with account number {} not found",
                    number
                )),
                _ => ClientError::DatabaseError(e.to_string()),
            })?;

        Ok(client_db.into())
    }

    pub fn account_number_exists(conn: &mut SqliteConnection, number: &str) -> Result<bool> {
        select(exists(
            clients::table.filter(clients::account_number.eq(number)),
        ))
        .get_result(conn)
        .map_err(|e| ClientError::DatabaseError(e.to_string()))
    }

    pub fn list(conn: &mut SqliteConnection) -> Result<Vec<Client>> {
        clients::table
            .select(ClientDB::as_select())
            .order(clients::name.asc())
            .load::<ClientDB>(conn)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))
            .map(|results| results.into_iter().map(Client::from).collect())
    }

    pub fn update(conn: &mut SqliteConnection, row: &ClientDB) -> Result<Client> {
        diesel::update(clients::table.find(&row.id))
            .set(row)
            .execute(conn)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        Self::find_by_id(conn, &row.id)
    }

    pub fn delete(conn: &mut SqliteConnection, client_id: &str) -> Result<usize> {
        let affected = diesel::delete(clients::table.find(client_id))
            .execute(conn)
            .map_err(|e| ClientError::DatabaseError(e.to_string()))?;

        if affected == 0 {
            return Err(ClientError::NotFound(format!(
                "Client with id {} not found",
                client_id
            )));
        }

        Ok(affected)
    }
}
