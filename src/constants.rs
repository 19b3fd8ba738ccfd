use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Standard VAT rate applied when a quote line does not carry its own rate.
pub const DEFAULT_TAX_RATE: Decimal = dec!(0.19);

/// Flat surcharge rate applied to eco-fee flagged products.
pub const ECO_FEE_RATE: Decimal = dec!(0.05);

/// Prefix for generated quote numbers (`DEV-YYYYMMDD-NNNN`).
pub const QUOTE_NUMBER_PREFIX: &str = "DEV";

/// Prefix for generated client account numbers (`CLI-YYYYMMDD-NNNN`).
pub const CLIENT_ACCOUNT_PREFIX: &str = "CLI";

/// Exclusive upper bound of the random number suffix.
pub const NUMBER_SUFFIX_BOUND: u32 = 10_000;

/// How many fresh candidates a uniqueness gate tries before giving up.
pub const MAX_NUMBER_ATTEMPTS: u32 = 16;
