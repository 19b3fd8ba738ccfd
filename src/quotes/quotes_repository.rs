use chrono::NaiveDate;
use diesel::dsl::{exists, select};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use super::quotes_calculator::QuoteTotals;
use super::quotes_errors::{QuoteError, Result};
use super::quotes_model::{QuoteDB, QuoteLineDB};
use crate::schema::{quote_lines, quotes};

/// Connection-scoped queries for quotes and their lines. All functions take
/// the caller's connection so a whole lifecycle operation shares one
/// transaction.
pub struct QuoteRepository;

impl QuoteRepository {
    // --- quotes ---

    pub fn insert_quote(conn: &mut SqliteConnection, row: &QuoteDB) -> Result<()> {
        diesel::insert_into(quotes::table)
            .values(row)
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn update_quote(conn: &mut SqliteConnection, row: &QuoteDB) -> Result<()> {
        diesel::update(quotes::table.find(&row.id))
            .set(row)
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn find_quote(conn: &mut SqliteConnection, quote_id: &str) -> Result<QuoteDB> {
        quotes::table
            .find(quote_id)
            .select(QuoteDB::as_select())
            .first::<QuoteDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    QuoteError::NotFound(format!("Quote with id {} not found", quote_id))
                }
                _ => QuoteError::DatabaseError(e.to_string()),
            })
    }

    pub fn find_by_number(conn: &mut SqliteConnection, number: &str) -> Result<QuoteDB> {
        quotes::table
            .filter(quotes::quote_number.eq(number))
            .select(QuoteDB::as_select())
            .first::<QuoteDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    QuoteError::NotFound(format!("Quote with number {} not found", number))
                }
                _ => QuoteError::DatabaseError(e.to_string()),
            })
    }

    pub fn number_exists(conn: &mut SqliteConnection, number: &str) -> Result<bool> {
        select(exists(
            quotes::table.filter(quotes::quote_number.eq(number)),
        ))
        .get_result(conn)
        .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_all(conn: &mut SqliteConnection) -> Result<Vec<QuoteDB>> {
        quotes::table
            .select(QuoteDB::as_select())
            .order(quotes::created_at.desc())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_by_client(conn: &mut SqliteConnection, client_id: &str) -> Result<Vec<QuoteDB>> {
        quotes::table
            .filter(quotes::client_id.eq(client_id))
            .select(QuoteDB::as_select())
            .order(quotes::created_at.desc())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_by_prospect(
        conn: &mut SqliteConnection,
        prospect_id: &str,
    ) -> Result<Vec<QuoteDB>> {
        quotes::table
            .filter(quotes::prospect_id.eq(prospect_id))
            .select(QuoteDB::as_select())
            .order(quotes::created_at.desc())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    /// Case-insensitive contains-match on the subject (SQLite `LIKE`).
    pub fn search_by_subject(conn: &mut SqliteConnection, fragment: &str) -> Result<Vec<QuoteDB>> {
        let pattern = format!("%{}%", fragment);
        quotes::table
            .filter(quotes::subject.like(pattern))
            .select(QuoteDB::as_select())
            .order(quotes::created_at.desc())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_by_due_date(conn: &mut SqliteConnection, date: NaiveDate) -> Result<Vec<QuoteDB>> {
        quotes::table
            .filter(quotes::due_date.eq(date))
            .select(QuoteDB::as_select())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_due_after(conn: &mut SqliteConnection, date: NaiveDate) -> Result<Vec<QuoteDB>> {
        quotes::table
            .filter(quotes::due_date.gt(date))
            .select(QuoteDB::as_select())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn list_due_before(conn: &mut SqliteConnection, date: NaiveDate) -> Result<Vec<QuoteDB>> {
        quotes::table
            .filter(quotes::due_date.lt(date))
            .select(QuoteDB::as_select())
            .load::<QuoteDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    /// Writes recomputed totals back onto the quote row.
    pub fn save_totals(
        conn: &mut SqliteConnection,
        quote_id: &str,
        totals: &QuoteTotals,
    ) -> Result<()> {
        diesel::update(quotes::table.find(quote_id))
            .set((
                quotes::total_incl_tax.eq(totals.total_incl_tax.to_string()),
                quotes::total_weight_kg.eq(totals.total_weight_kg.to_string()),
                quotes::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn delete_quote(conn: &mut SqliteConnection, quote_id: &str) -> Result<usize> {
        diesel::delete(quotes::table.find(quote_id))
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    // --- lines ---

    pub fn insert_line(conn: &mut SqliteConnection, row: &QuoteLineDB) -> Result<()> {
        diesel::insert_into(quote_lines::table)
            .values(row)
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))?;
        Ok(())
    }

    pub fn find_line(conn: &mut SqliteConnection, line_id: &str) -> Result<QuoteLineDB> {
        quote_lines::table
            .find(line_id)
            .select(QuoteLineDB::as_select())
            .first::<QuoteLineDB>(conn)
            .map_err(|e| match e {
                diesel::result::Error::NotFound => {
                    QuoteError::NotFound(format!("Quote line with id {} not found", line_id))
                }
                _ => QuoteError::DatabaseError(e.to_string()),
            })
    }

    pub fn lines_for_quote(conn: &mut SqliteConnection, quote_id: &str) -> Result<Vec<QuoteLineDB>> {
        quote_lines::table
            .filter(quote_lines::quote_id.eq(quote_id))
            .select(QuoteLineDB::as_select())
            .load::<QuoteLineDB>(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn delete_line(conn: &mut SqliteConnection, line_id: &str) -> Result<usize> {
        diesel::delete(quote_lines::table.find(line_id))
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    pub fn delete_lines_for_quote(conn: &mut SqliteConnection, quote_id: &str) -> Result<usize> {
        diesel::delete(quote_lines::table.filter(quote_lines::quote_id.eq(quote_id)))
            .execute(conn)
            .map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }
}
