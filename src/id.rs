//! Document identifier generation.
//!
//! Identifiers combine the registration time in Unix milliseconds with a
//! 9-character random alphanumeric suffix: `doc_1717430400123_x7Kq2mPwa`.
//! The suffix space (62^9) makes collisions under identical timestamps
//! negligible, and `thread_rng` is per-thread, so concurrent registrations
//! never share RNG state.

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};

/// Length of the random suffix.
const SUFFIX_LEN: usize = 9;

/// Generate a fresh document identifier.
pub fn generate_doc_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: String = thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SUFFIX_LEN)
        .map(char::from)
        .collect();
    format!("doc_{}_{}", millis, suffix)
}
