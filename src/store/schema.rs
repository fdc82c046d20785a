/// Amounts are stored as TEXT so decimals round-trip exactly. Older files
/// written with REAL amounts still load; see `decimal_column`.
pub(crate) const SCHEMA_V1: &str = r#"
CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER NOT NULL
);

CREATE TABLE IF NOT EXISTS expenses (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    amount      TEXT NOT NULL,
    category    TEXT NOT NULL DEFAULT '',
    description TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS budget (
    id      INTEGER PRIMARY KEY CHECK (id = 1),
    amount  TEXT NOT NULL
);
"#;

pub(crate) const CURRENT_VERSION: i32 = 1;

/// Singleton key of the budget row.
pub(crate) const BUDGET_ID: i64 = 1;

/// Migrations from version N to N+1.
/// Each entry is (from_version, sql).
pub(crate) const MIGRATIONS: &[(i32, &str)] = &[
    // (1, "ALTER TABLE expenses ADD COLUMN spent_on TEXT NOT NULL DEFAULT '';"),
];
