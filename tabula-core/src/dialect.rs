//! Dialect configuration for the two TABULA wire formats
//!
//! The two dialects share one data model and differ only in identifier
//! alphabet, row-ID width, version literal, and whether row IDs carry an
//! enforced shape. All dialect-dependent behavior is driven by a [`Dialect`]
//! value rather than branching on a variant flag.

use once_cell::sync::Lazy;
use regex::Regex;

/// Literal prefix for column identifiers.
pub const COLUMN_ID_PREFIX: &str = "col_";
/// Literal prefix for view identifiers.
pub const VIEW_ID_PREFIX: &str = "view_";
/// Literal prefix for filter identifiers.
pub const FILTER_ID_PREFIX: &str = "flt_";

/// Number of random characters in a column/view/filter identifier.
pub const SHORT_SUFFIX_WIDTH: usize = 3;
/// Number of random characters appended to a row identifier.
pub const ROW_SUFFIX_WIDTH: usize = 3;

/// Wire-format dialect: alphabet, widths, version literal, and the
/// precompiled identifier patterns derived from them.
#[derive(Debug, Clone)]
pub struct Dialect {
    /// Short name used in log events.
    pub name: &'static str,
    /// Identifier alphabet, in digit order (index 0 is the zero digit).
    pub alphabet: &'static str,
    /// Exact version literal a valid document must carry.
    pub version: &'static str,
    /// Fixed width of the encoded-timestamp prefix of a row identifier.
    pub row_time_width: usize,
    /// Whether row identifiers are validated against their fixed shape.
    /// One wire format never constrained row IDs; that asymmetry is
    /// dialect configuration, not something to unify.
    pub enforce_row_id_shape: bool,

    column_id_re: Regex,
    view_id_re: Regex,
    filter_id_re: Regex,
    row_id_re: Regex,
}

static BASE36: Lazy<Dialect> = Lazy::new(|| {
    Dialect::build(
        "base36",
        "0123456789abcdefghijklmnopqrstuvwxyz",
        "0-9a-z",
        "tabula-1.0.0",
        9,
        true,
    )
});

static CROCKFORD32: Lazy<Dialect> = Lazy::new(|| {
    Dialect::build(
        "crockford32",
        "0123456789ABCDEFGHJKMNPQRSTVWXYZ",
        "0-9A-HJKMNP-TV-Z",
        "1.0.0",
        10,
        false,
    )
});

impl Dialect {
    /// Lowercase base-36 dialect: 12-character row IDs (9 time + 3 random),
    /// version literal `tabula-1.0.0`, row-ID shape enforced.
    pub fn base36() -> Dialect {
        BASE36.clone()
    }

    /// Crockford base-32 dialect (I, L, O, U excluded): 13-character row IDs
    /// (10 time + 3 random), version literal `1.0.0`, row-ID shape unenforced.
    pub fn crockford32() -> Dialect {
        CROCKFORD32.clone()
    }

    fn build(
        name: &'static str,
        alphabet: &'static str,
        class: &'static str,
        version: &'static str,
        row_time_width: usize,
        enforce_row_id_shape: bool,
    ) -> Dialect {
        let short = |prefix: &str| format!("^{prefix}[{class}]{{{SHORT_SUFFIX_WIDTH}}}$");
        let row_len = row_time_width + ROW_SUFFIX_WIDTH;
        Dialect {
            name,
            alphabet,
            version,
            row_time_width,
            enforce_row_id_shape,
            column_id_re: compile(&short(COLUMN_ID_PREFIX)),
            view_id_re: compile(&short(VIEW_ID_PREFIX)),
            filter_id_re: compile(&short(FILTER_ID_PREFIX)),
            row_id_re: compile(&format!("^[{class}]{{{row_len}}}$")),
        }
    }

    /// Total length of a row identifier.
    pub fn row_id_len(&self) -> usize {
        self.row_time_width + ROW_SUFFIX_WIDTH
    }

    pub fn is_column_id(&self, id: &str) -> bool {
        self.column_id_re.is_match(id)
    }

    pub fn is_view_id(&self, id: &str) -> bool {
        self.view_id_re.is_match(id)
    }

    pub fn is_filter_id(&self, id: &str) -> bool {
        self.filter_id_re.is_match(id)
    }

    pub fn is_row_id(&self, id: &str) -> bool {
        self.row_id_re.is_match(id)
    }

    pub fn column_id_pattern(&self) -> &str {
        self.column_id_re.as_str()
    }

    pub fn view_id_pattern(&self) -> &str {
        self.view_id_re.as_str()
    }

    pub fn filter_id_pattern(&self) -> &str {
        self.filter_id_re.as_str()
    }

    pub fn row_id_pattern(&self) -> &str {
        self.row_id_re.as_str()
    }
}

fn compile(pattern: &str) -> Regex {
    // Patterns are assembled from static alphabet classes above.
    Regex::new(pattern).expect("dialect identifier pattern must compile")
}

// =============================================================================
// TESTS
// =============================================================================
