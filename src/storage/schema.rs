//! Database schema definitions

/// SQL to create the violations table
pub const CREATE_VIOLATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS violations (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    plate_number TEXT NOT NULL,
    vehicle_type TEXT NOT NULL,
    violation_type TEXT NOT NULL,
    location TEXT NOT NULL,
    fine_amount REAL NOT NULL,
    date_time TEXT NOT NULL,
    officer_name TEXT NOT NULL,
    status TEXT NOT NULL DEFAULT 'Pending',
    notes TEXT NOT NULL DEFAULT '',
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
"#;

/// SQL to create the users table
pub const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    email TEXT NOT NULL UNIQUE,
    password TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'officer',
    created_at TEXT NOT NULL
)
"#;

/// SQL to create indexes
pub const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_violations_plate ON violations(plate_number)",
    "CREATE INDEX IF NOT EXISTS idx_violations_status ON violations(status)",
    "CREATE INDEX IF NOT EXISTS idx_violations_date ON violations(date_time)",
];

/// All schema creation statements
pub fn all_schema_statements() -> Vec<&'static str> {
    let mut stmts = vec![CREATE_VIOLATIONS_TABLE, CREATE_USERS_TABLE];
    stmts.extend(CREATE_INDEXES.iter().copied());
    stmts
}
