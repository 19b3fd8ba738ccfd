use std::sync::Mutex;

use chrono::Local;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::constants::{CLIENT_ACCOUNT_PREFIX, NUMBER_SUFFIX_BOUND, QUOTE_NUMBER_PREFIX};

/// Generates human-readable business numbers in the form `PREFIX-YYYYMMDD-NNNN`.
///
/// The generator only produces candidates; it never checks them against
/// persisted numbers. Callers gate candidates for uniqueness and ask for a
/// fresh one on collision.
pub struct IdGenerator {
    rng: Mutex<StdRng>,
}

impl IdGenerator {
    /// Creates a generator seeded from OS entropy.
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Creates a deterministic generator for tests.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Candidate quote number, e.g. `DEV-20260512-0832`.
    pub fn quote_number(&self) -> String {
        self.numbered(QUOTE_NUMBER_PREFIX)
    }

    /// Candidate client account number, e.g. `CLI-20260512-4417`.
    pub fn client_account_number(&self) -> String {
        self.numbered(CLIENT_ACCOUNT_PREFIX)
    }

    fn numbered(&self, prefix: &str) -> String {
        let date_str = Local::now().format("%Y%m%d");
        let suffix = self.rng.lock().unwrap().gen_range(0..NUMBER_SUFFIX_BOUND);
        format!("{}-{}-{:04}", prefix, date_str, suffix)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
