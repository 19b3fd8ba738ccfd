// Module declarations
pub(crate) mod counterparty;
pub(crate) mod quotes_calculator;
pub(crate) mod quotes_errors;
pub(crate) mod quotes_model;
pub(crate) mod quotes_repository;
pub(crate) mod quotes_service;
pub(crate) mod quotes_traits;

// Re-export the public interface
pub use counterparty::Counterparty;
pub use quotes_calculator::{aggregate_totals, price_line, LinePricing, QuoteTotals};
pub use quotes_model::{
    NewQuote, NewQuoteLine, Quote, QuoteDB, QuoteLine, QuoteLineDB, QuoteUpdate,
};
pub use quotes_repository::QuoteRepository;
pub use quotes_service::QuoteService;
pub use quotes_traits::QuoteServiceTrait;

// Re-export error types for convenience
pub use quotes_errors::{QuoteError, Result};
