//! Identifiers for optimizer runs.
//!
//! The process gets one ULID at first use, and every `/optimize` call gets a fresh
//! one so the three weighted solves of a request can be correlated in the logs.

use once_cell::sync::Lazy;
use ulid::Ulid;

static PROCESS_RUN_ID: Lazy<String> = Lazy::new(|| Ulid::new().to_string());

/// Process-level id, stable for the lifetime of the process.
#[inline]
pub fn process() -> &'static str {
    &PROCESS_RUN_ID
}

/// Fresh, time-ordered id for a single optimizer run.
#[inline]
pub fn generate() -> String {
    Ulid::new().to_string()
}
