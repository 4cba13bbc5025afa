//! Identifier generation
//!
//! Row identifiers encode the creation time in milliseconds as a fixed-width
//! string in the dialect alphabet, followed by a short random suffix, so they
//! sort lexicographically in creation order (same-millisecond ties break
//! randomly). Column/view/filter identifiers are a literal prefix plus a short
//! random suffix. Nothing here guarantees uniqueness; collision detection and
//! retry belong to the manager.

use crate::dialect::{
    Dialect, COLUMN_ID_PREFIX, FILTER_ID_PREFIX, ROW_SUFFIX_WIDTH, SHORT_SUFFIX_WIDTH,
    VIEW_ID_PREFIX,
};
use chrono::Utc;
use rand::Rng;

/// Identifier kind discriminator, used in retry-exhaustion errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Column,
    View,
    Filter,
    Row,
}

/// Encode `value` in the given alphabet as a zero-padded string of at least
/// `width` digits. Values too large for `width` grow instead of truncating;
/// callers pick widths large enough for their expected range.
pub fn encode_fixed(alphabet: &str, value: u64, width: usize) -> String {
    let digits: Vec<char> = alphabet.chars().collect();
    let base = digits.len() as u64;
    let mut out: Vec<char> = Vec::new();
    let mut n = value;
    while n > 0 {
        out.push(digits[(n % base) as usize]);
        n /= base;
    }
    while out.len() < width {
        out.push(digits[0]);
    }
    out.iter().rev().collect()
}

/// Draw `len` characters uniformly at random from the alphabet.
pub fn random_suffix(alphabet: &str, len: usize) -> String {
    let digits: Vec<char> = alphabet.chars().collect();
    let mut rng = rand::thread_rng();
    (0..len).map(|_| digits[rng.gen_range(0..digits.len())]).collect()
}

/// Source of candidate identifiers.
///
/// The manager owns one of these behind a `Box<dyn IdSource>`; tests swap in
/// a scripted source to force collisions deterministically.
pub trait IdSource {
    fn next_column_id(&mut self) -> String;
    fn next_view_id(&mut self) -> String;
    fn next_filter_id(&mut self) -> String;
    fn next_row_id(&mut self) -> String;
}

/// Default identifier source: random suffixes from the dialect alphabet and
/// wall-clock timestamps for row IDs.
#[derive(Debug, Clone)]
pub struct RandomIdSource {
    dialect: Dialect,
}

impl RandomIdSource {
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }
}

impl IdSource for RandomIdSource {
    fn next_column_id(&mut self) -> String {
        format!(
            "{COLUMN_ID_PREFIX}{}",
            random_suffix(self.dialect.alphabet, SHORT_SUFFIX_WIDTH)
        )
    }

    fn next_view_id(&mut self) -> String {
        format!(
            "{VIEW_ID_PREFIX}{}",
            random_suffix(self.dialect.alphabet, SHORT_SUFFIX_WIDTH)
        )
    }

    fn next_filter_id(&mut self) -> String {
        format!(
            "{FILTER_ID_PREFIX}{}",
            random_suffix(self.dialect.alphabet, SHORT_SUFFIX_WIDTH)
        )
    }

    fn next_row_id(&mut self) -> String {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let mut id = encode_fixed(self.dialect.alphabet, millis, self.dialect.row_time_width);
        id.push_str(&random_suffix(self.dialect.alphabet, ROW_SUFFIX_WIDTH));
        id
    }
}

// =============================================================================
// TESTS
// =============================================================================
