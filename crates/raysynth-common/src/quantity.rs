//! Resource quantity parsing
//!
//! Compute templates hold whole numbers, so the only quantity strings read
//! back are the counts in a persisted template record.

use crate::Error;

/// Parse a whole-number quantity such as a core or GPU count
pub fn parse_count(qty: &str, field: &str) -> Result<u32, Error> {
    qty.trim()
        .parse::<u32>()
        .map_err(|e| Error::invalid_quantity(field, qty, e.to_string()))
}
