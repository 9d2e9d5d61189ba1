/// Column-name constants for the survey table schema.
/// Single source of truth - exported to Python via PyO3.

// ── Survey columns ──────────────────────────────────────────────────────────
pub mod survey {
    pub const ROUTE: &str = "Route";
    pub const YEAR: &str = "Year";
    pub const AOU: &str = "AOU";
    pub const FIRST: &str = "First";
    pub const SECOND: &str = "Second";
    pub const THIRD: &str = "Third";
    pub const FOURTH: &str = "Fourth";
    pub const FIFTH: &str = "Fifth";
    pub const STOPS: &str = "Stops";
    pub const COUNT: &str = "Count";

    /// Key columns, in output order.
    pub const KEY: [&str; 3] = [ROUTE, YEAR, AOU];

    /// Auxiliary count columns carried through verbatim.
    pub const AUX: [&str; super::AUX_FIELD_COUNT] =
        [FIRST, SECOND, THIRD, FOURTH, FIFTH, STOPS, COUNT];

    /// Full header; order and literal text are significant.
    pub const HEADER: [&str; super::COLUMN_COUNT] = [
        ROUTE, YEAR, AOU, FIRST, SECOND, THIRD, FOURTH, FIFTH, STOPS, COUNT,
    ];
}

// ── Payload conventions ─────────────────────────────────────────────────────
pub const AUX_FIELD_COUNT: usize = 7;
pub const COLUMN_COUNT: usize = 3 + AUX_FIELD_COUNT;

/// Text written into every auxiliary column of a synthesized row.
pub const ZERO_COUNT: &str = "0";
