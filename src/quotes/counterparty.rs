use diesel::sqlite::SqliteConnection;

use super::quotes_errors::{QuoteError, Result};
use crate::clients::{Client, ClientRepository};
use crate::prospects::{Prospect, ProspectRepository};

/// The resolved counterparty of a quote: a client account or a prospect,
/// never both.
#[derive(Debug, Clone)]
pub enum Counterparty {
    Client(Client),
    Prospect(Prospect),
}

impl Counterparty {
    /// Splits into the optional pair stored on the quote row.
    pub fn into_parts(self) -> (Option<Client>, Option<Prospect>) {
        match self {
            Counterparty::Client(client) => (Some(client), None),
            Counterparty::Prospect(prospect) => (None, Some(prospect)),
        }
    }

    pub fn client_id(&self) -> Option<String> {
        match self {
            Counterparty::Client(client) => Some(client.id.clone()),
            Counterparty::Prospect(_) => None,
        }
    }

    pub fn prospect_id(&self) -> Option<String> {
        match self {
            Counterparty::Client(_) => None,
            Counterparty::Prospect(prospect) => Some(prospect.id.clone()),
        }
    }
}

/// Enforces the exclusive-or counterparty rule and resolves the one present
/// reference to its full record, so downstream code never re-resolves.
pub(crate) fn resolve(
    conn: &mut SqliteConnection,
    client_id: Option<&str>,
    prospect_id: Option<&str>,
) -> Result<Counterparty> {
    match (non_empty(client_id), non_empty(prospect_id)) {
        (None, None) => Err(QuoteError::InvalidOperation(
            "Either a client or a prospect must be specified".to_string(),
        )),
        (Some(_), Some(_)) => Err(QuoteError::InvalidOperation(
            "Cannot specify both a client and a prospect".to_string(),
        )),
        (Some(client_id), None) => {
            let client = ClientRepository::find_by_id(conn, client_id)?;
            Ok(Counterparty::Client(client))
        }
        (None, Some(prospect_id)) => {
            let prospect = ProspectRepository::find_by_id(conn, prospect_id)?;
            Ok(Counterparty::Prospect(prospect))
        }
    }
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|value| !value.trim().is_empty())
}
