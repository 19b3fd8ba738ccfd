use chrono::NaiveDate;
use diesel::sqlite::SqliteConnection;
use diesel::Connection;
use log::{debug, info};
use std::sync::Arc;

use super::counterparty::{self, Counterparty};
use super::quotes_calculator::{aggregate_totals, price_line};
use super::quotes_errors::{QuoteError, Result};
use super::quotes_model::{NewQuote, NewQuoteLine, Quote, QuoteDB, QuoteLine, QuoteLineDB, QuoteUpdate};
use super::quotes_repository::QuoteRepository;
use crate::clients::ClientRepository;
use crate::constants::{DEFAULT_TAX_RATE, MAX_NUMBER_ATTEMPTS};
use crate::db::{get_connection, DbPool};
use crate::products::ProductRepository;
use crate::prospects::ProspectRepository;
use crate::utils::IdGenerator;

/// Orchestrates the quote lifecycle: number allocation, counterparty
/// resolution, line pricing and total aggregation. Every mutating operation
/// runs inside one transaction; a failure anywhere rolls the whole operation
/// back.
pub struct QuoteService {
    pool: Arc<DbPool>,
    id_generator: Arc<IdGenerator>,
}

impl QuoteService {
    pub fn new(pool: Arc<DbPool>, id_generator: Arc<IdGenerator>) -> Self {
        Self { pool, id_generator }
    }

    /// Creates a quote with its initial line set.
    pub fn create_quote(&self, new_quote: NewQuote) -> Result<Quote> {
        info!("Creating quote with subject: {}", new_quote.subject);

        new_quote.validate()?;

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            let quote_number =
                self.resolve_quote_number(tx_conn, new_quote.quote_number.as_deref())?;

            let counterparty = counterparty::resolve(
                tx_conn,
                new_quote.client_id.as_deref(),
                new_quote.prospect_id.as_deref(),
            )?;

            let row = QuoteDB::new_shell(
                quote_number,
                &new_quote,
                counterparty.client_id(),
                counterparty.prospect_id(),
            );
            QuoteRepository::insert_quote(tx_conn, &row)?;

            for line in &new_quote.lines {
                Self::insert_priced_line(tx_conn, &row.id, line)?;
            }

            Self::finish(tx_conn, &row.id, Some(counterparty))
        })
    }

    /// Whole-quote update; `lines: Some(..)` replaces the persisted line set.
    pub fn update_quote(&self, quote_id: &str, update: QuoteUpdate) -> Result<Quote> {
        info!("Updating quote with ID: {}", quote_id);

        update.validate()?;

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            let existing = QuoteRepository::find_quote(tx_conn, quote_id)?;

            let quote_number = match update.quote_number.as_deref() {
                Some(number) if number != existing.quote_number => {
                    if QuoteRepository::number_exists(tx_conn, number)? {
                        return Err(QuoteError::DuplicateNumber(format!(
                            "Quote number already exists: {}",
                            number
                        )));
                    }
                    number.to_string()
                }
                _ => existing.quote_number.clone(),
            };

            let counterparty = counterparty::resolve(
                tx_conn,
                update.client_id.as_deref(),
                update.prospect_id.as_deref(),
            )?;

            let row = QuoteDB {
                id: existing.id.clone(),
                quote_number,
                subject: update.subject.clone(),
                client_id: counterparty.client_id(),
                prospect_id: counterparty.prospect_id(),
                due_date: update.due_date,
                delivery_delay: update.delivery_delay.clone(),
                delivery_mode: update.delivery_mode.clone(),
                payment_mode: update.payment_mode.clone(),
                total_incl_tax: existing.total_incl_tax.clone(),
                total_weight_kg: existing.total_weight_kg.clone(),
                created_at: existing.created_at,
                updated_at: chrono::Utc::now().naive_utc(),
            };
            QuoteRepository::update_quote(tx_conn, &row)?;

            if let Some(lines) = &update.lines {
                QuoteRepository::delete_lines_for_quote(tx_conn, quote_id)?;
                for line in lines {
                    Self::insert_priced_line(tx_conn, quote_id, line)?;
                }
            }

            Self::finish(tx_conn, quote_id, Some(counterparty))
        })
    }

    /// Adds one priced line and refreshes the quote totals.
    pub fn add_line(&self, quote_id: &str, new_line: NewQuoteLine) -> Result<Quote> {
        info!("Adding line to quote with ID: {}", quote_id);

        new_line.validate()?;

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            QuoteRepository::find_quote(tx_conn, quote_id)?;
            Self::insert_priced_line(tx_conn, quote_id, &new_line)?;
            Self::finish(tx_conn, quote_id, None)
        })
    }

    /// Removes one line; the line must belong to the given quote.
    pub fn remove_line(&self, quote_id: &str, line_id: &str) -> Result<Quote> {
        info!(
            "Removing line with ID: {} from quote with ID: {}",
            line_id, quote_id
        );

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            QuoteRepository::find_quote(tx_conn, quote_id)?;
            let line = QuoteRepository::find_line(tx_conn, line_id)?;

            if line.quote_id != quote_id {
                return Err(QuoteError::InvalidOperation(format!(
                    "Quote line {} does not belong to quote {}",
                    line_id, quote_id
                )));
            }

            QuoteRepository::delete_line(tx_conn, line_id)?;
            Self::finish(tx_conn, quote_id, None)
        })
    }

    /// Recomputes totals from the persisted lines without touching them.
    pub fn recalculate(&self, quote_id: &str) -> Result<Quote> {
        debug!("Recalculating totals for quote with ID: {}", quote_id);

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            QuoteRepository::find_quote(tx_conn, quote_id)?;
            Self::finish(tx_conn, quote_id, None)
        })
    }

    /// Deletes a quote together with all of its lines.
    pub fn delete_quote(&self, quote_id: &str) -> Result<()> {
        info!("Deleting quote with ID: {}", quote_id);

        let mut conn = self.conn()?;
        conn.transaction::<_, QuoteError, _>(|tx_conn| {
            QuoteRepository::find_quote(tx_conn, quote_id)?;
            QuoteRepository::delete_lines_for_quote(tx_conn, quote_id)?;
            QuoteRepository::delete_quote(tx_conn, quote_id)?;
            Ok(())
        })
    }

    // --- finders ---

    pub fn get_quote(&self, quote_id: &str) -> Result<Quote> {
        let mut conn = self.conn()?;
        let row = QuoteRepository::find_quote(&mut conn, quote_id)?;
        Self::assemble(&mut conn, row)
    }

    pub fn get_by_number(&self, number: &str) -> Result<Quote> {
        let mut conn = self.conn()?;
        let row = QuoteRepository::find_by_number(&mut conn, number)?;
        Self::assemble(&mut conn, row)
    }

    /// All quotes, newest first.
    pub fn list_quotes(&self) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        let rows = QuoteRepository::list_all(&mut conn)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn list_by_client(&self, client_id: &str) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        ClientRepository::find_by_id(&mut conn, client_id)?;
        let rows = QuoteRepository::list_by_client(&mut conn, client_id)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn list_by_prospect(&self, prospect_id: &str) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        ProspectRepository::find_by_id(&mut conn, prospect_id)?;
        let rows = QuoteRepository::list_by_prospect(&mut conn, prospect_id)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn search_by_subject(&self, fragment: &str) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        let rows = QuoteRepository::search_by_subject(&mut conn, fragment)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn list_by_due_date(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        let rows = QuoteRepository::list_by_due_date(&mut conn, date)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn list_due_after(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        let rows = QuoteRepository::list_due_after(&mut conn, date)?;
        Self::assemble_all(&mut conn, rows)
    }

    pub fn list_due_before(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        let mut conn = self.conn()?;
        let rows = QuoteRepository::list_due_before(&mut conn, date)?;
        Self::assemble_all(&mut conn, rows)
    }

    // --- helpers ---

    fn conn(&self) -> Result<crate::db::DbConnection> {
        get_connection(&self.pool).map_err(|e| QuoteError::DatabaseError(e.to_string()))
    }

    /// Uniqueness gate for quote numbers. A caller-supplied number is checked
    /// once and conflicts are rejected; generated candidates are redrawn until
    /// an unused one comes up.
    fn resolve_quote_number(
        &self,
        conn: &mut SqliteConnection,
        supplied: Option<&str>,
    ) -> Result<String> {
        match supplied {
            Some(number) if !number.trim().is_empty() => {
                if QuoteRepository::number_exists(conn, number)? {
                    return Err(QuoteError::DuplicateNumber(format!(
                        "Quote number already exists: {}",
                        number
                    )));
                }
                Ok(number.to_string())
            }
            _ => {
                for _ in 0..MAX_NUMBER_ATTEMPTS {
                    let candidate = self.id_generator.quote_number();
                    if !QuoteRepository::number_exists(conn, &candidate)? {
                        return Ok(candidate);
                    }
                }
                Err(QuoteError::DuplicateNumber(
                    "Could not allocate an unused quote number".to_string(),
                ))
            }
        }
    }

    /// Resolves the product, computes the derived fields and persists the line.
    fn insert_priced_line(
        conn: &mut SqliteConnection,
        quote_id: &str,
        line: &NewQuoteLine,
    ) -> Result<QuoteLine> {
        let product = ProductRepository::find_by_id(conn, &line.product_id)?;
        let tax_rate = line.tax_rate.unwrap_or(DEFAULT_TAX_RATE);
        let pricing = price_line(line.unit_price, line.quantity, tax_rate, &product);

        let row = QuoteLineDB::from_pricing(quote_id, line, tax_rate, &pricing);
        QuoteRepository::insert_line(conn, &row)?;

        Ok(row.into())
    }

    /// Recomputes and persists the quote totals from its current lines, then
    /// returns the assembled quote. A counterparty already resolved by the
    /// caller is reused instead of being looked up again.
    fn finish(
        conn: &mut SqliteConnection,
        quote_id: &str,
        counterparty: Option<Counterparty>,
    ) -> Result<Quote> {
        let lines: Vec<QuoteLine> = QuoteRepository::lines_for_quote(conn, quote_id)?
            .into_iter()
            .map(QuoteLine::from)
            .collect();

        let totals = aggregate_totals(&lines);
        QuoteRepository::save_totals(conn, quote_id, &totals)?;

        let row = QuoteRepository::find_quote(conn, quote_id)?;
        match counterparty {
            Some(counterparty) => {
                let (client, prospect) = counterparty.into_parts();
                Ok(Quote::from_parts(row, client, prospect, lines))
            }
            None => Self::assemble_with_lines(conn, row, lines),
        }
    }

    /// Assembles a domain quote from its row, loading lines and counterparty.
    fn assemble(conn: &mut SqliteConnection, row: QuoteDB) -> Result<Quote> {
        let lines: Vec<QuoteLine> = QuoteRepository::lines_for_quote(conn, &row.id)?
            .into_iter()
            .map(QuoteLine::from)
            .collect();
        Self::assemble_with_lines(conn, row, lines)
    }

    fn assemble_all(conn: &mut SqliteConnection, rows: Vec<QuoteDB>) -> Result<Vec<Quote>> {
        rows.into_iter()
            .map(|row| Self::assemble(conn, row))
            .collect()
    }

    fn assemble_with_lines(
        conn: &mut SqliteConnection,
        row: QuoteDB,
        lines: Vec<QuoteLine>,
    ) -> Result<Quote> {
        let client = match row.client_id.as_deref() {
            Some(id) => Some(ClientRepository::find_by_id(conn, id)?),
            None => None,
        };
        let prospect = match row.prospect_id.as_deref() {
            Some(id) => Some(ProspectRepository::find_by_id(conn, id)?),
            None => None,
        };

        Ok(Quote::from_parts(row, client, prospect, lines))
    }
}
