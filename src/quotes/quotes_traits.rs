use chrono::NaiveDate;

use super::quotes_errors::Result;
use super::quotes_model::{NewQuote, NewQuoteLine, Quote, QuoteUpdate};
use super::quotes_service::QuoteService;

/// Trait for quote lifecycle operations, the seam consumed by the transport
/// layer.
pub trait QuoteServiceTrait: Send + Sync {
    fn create_quote(&self, new_quote: NewQuote) -> Result<Quote>;
    fn update_quote(&self, quote_id: &str, update: QuoteUpdate) -> Result<Quote>;
    fn add_line(&self, quote_id: &str, new_line: NewQuoteLine) -> Result<Quote>;
    fn remove_line(&self, quote_id: &str, line_id: &str) -> Result<Quote>;
    fn recalculate(&self, quote_id: &str) -> Result<Quote>;
    fn delete_quote(&self, quote_id: &str) -> Result<()>;

    fn get_quote(&self, quote_id: &str) -> Result<Quote>;
    fn get_by_number(&self, number: &str) -> Result<Quote>;
    fn list_quotes(&self) -> Result<Vec<Quote>>;
    fn list_by_client(&self, client_id: &str) -> Result<Vec<Quote>>;
    fn list_by_prospect(&self, prospect_id: &str) -> Result<Vec<Quote>>;
    fn search_by_subject(&self, fragment: &str) -> Result<Vec<Quote>>;
    fn list_by_due_date(&self, date: NaiveDate) -> Result<Vec<Quote>>;
    fn list_due_after(&self, date: NaiveDate) -> Result<Vec<Quote>>;
    fn list_due_before(&self, date: NaiveDate) -> Result<Vec<Quote>>;
}

impl QuoteServiceTrait for QuoteService {
    fn create_quote(&self, new_quote: NewQuote) -> Result<Quote> {
        QuoteService::create_quote(self, new_quote)
    }

    fn update_quote(&self, quote_id: &str, update: QuoteUpdate) -> Result<Quote> {
        QuoteService::update_quote(self, quote_id, update)
    }

    fn add_line(&self, quote_id: &str, new_line: NewQuoteLine) -> Result<Quote> {
        QuoteService::add_line(self, quote_id, new_line)
    }

    fn remove_line(&self, quote_id: &str, line_id: &str) -> Result<Quote> {
        QuoteService::remove_line(self, quote_id, line_id)
    }

    fn recalculate(&self, quote_id: &str) -> Result<Quote> {
        QuoteService::recalculate(self, quote_id)
    }

    fn delete_quote(&self, quote_id: &str) -> Result<()> {
        QuoteService::delete_quote(self, quote_id)
    }

    fn get_quote(&self, quote_id: &str) -> Result<Quote> {
        QuoteService::get_quote(self, quote_id)
    }

    fn get_by_number(&self, number: &str) -> Result<Quote> {
        QuoteService::get_by_number(self, number)
    }

    fn list_quotes(&self) -> Result<Vec<Quote>> {
        QuoteService::list_quotes(self)
    }

    fn list_by_client(&self, client_id: &str) -> Result<Vec<Quote>> {
        QuoteService::list_by_client(self, client_id)
    }

    fn list_by_prospect(&self, prospect_id: &str) -> Result<Vec<Quote>> {
        QuoteService::list_by_prospect(self, prospect_id)
    }

    fn search_by_subject(&self, fragment: &str) -> Result<Vec<Quote>> {
        QuoteService::search_by_subject(self, fragment)
    }

    fn list_by_due_date(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        QuoteService::list_by_due_date(self, date)
    }

    fn list_due_after(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        QuoteService::list_due_after(self, date)
    }

    fn list_due_before(&self, date: NaiveDate) -> Result<Vec<Quote>> {
        QuoteService::list_due_before(self, date)
    }
}
