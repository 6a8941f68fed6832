//! SQLite storage implementation

use std::path::Path;

use chrono::Local;
use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;

use super::schema;
use crate::auth::User;
use crate::validate::ViolationInput;
use crate::violation::{Status, VehicleType, Violation, ViolationType};
use crate::{Error, Result};

/// Timestamp format shared by date_time, created_at and updated_at
pub const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

const VIOLATION_COLUMNS: &str = "id, plate_number, vehicle_type, violation_type, location, \
     fine_amount, date_time, officer_name, status, notes, created_at, updated_at";

/// SQLite-backed record store for violations and user accounts.
///
/// Owns its connection for the process lifetime; callers construct one
/// store and pass it by reference to whatever needs it.
pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Open a database file (creates if doesn't exist)
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Open an in-memory database (for testing)
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let store = Self { conn };
        store.initialize_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn initialize_schema(&self) -> Result<()> {
        for stmt in schema::all_schema_statements() {
            self.conn.execute(stmt, [])?;
        }
        Ok(())
    }

    fn now(&self) -> String {
        Local::now().format(DATETIME_FORMAT).to_string()
    }

    // ========== Violation Operations ==========

    /// Insert a new violation and return its assigned id.
    ///
    /// The plate is normalized to uppercase and the record is stamped
    /// with the current time. Single statement, auto-committed.
    pub fn create_violation(&self, input: &ViolationInput) -> Result<i64> {
        let now = self.now();
        self.conn.execute(
            r#"
            INSERT INTO violations
            (plate_number, vehicle_type, violation_type, location,
             fine_amount, date_time, officer_name, status, notes, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
            params![
                input.plate_number.to_uppercase(),
                input.vehicle_type.as_str(),
                input.violation_type.as_str(),
                input.location,
                input.fine_amount,
                now,
                input.officer_name,
                input.status.as_str(),
                input.notes,
                now,
                now,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get all violations, newest first (id breaks timestamp ties)
    pub fn get_all(&self) -> Result<Vec<Violation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM violations ORDER BY date_time DESC, id DESC",
            VIOLATION_COLUMNS
        ))?;

        let violations = stmt
            .query_map([], |row| self.row_to_violation(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(violations)
    }

    /// Get a violation by id, with every persisted field
    pub fn get_by_id(&self, id: i64) -> Result<Option<Violation>> {
        self.conn
            .query_row(
                &format!("SELECT {} FROM violations WHERE id = ?1", VIOLATION_COLUMNS),
                [id],
                |row| self.row_to_violation(row),
            )
            .optional()
            .map_err(Into::into)
    }

    /// Case-insensitive substring search over plate, violation type,
    /// location and officer name. An empty term returns everything.
    pub fn search(&self, term: &str) -> Result<Vec<Violation>> {
        if term.trim().is_empty() {
            return self.get_all();
        }

        let pattern = format!("%{}%", term.trim());
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM violations
             WHERE plate_number LIKE ?1
                OR violation_type LIKE ?1
                OR location LIKE ?1
                OR officer_name LIKE ?1
             ORDER BY date_time DESC, id DESC",
            VIOLATION_COLUMNS
        ))?;

        let violations = stmt
            .query_map([pattern], |row| self.row_to_violation(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(violations)
    }

    /// Get violations with an exact status, newest first
    pub fn get_by_status(&self, status: Status) -> Result<Vec<Violation>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM violations WHERE status = ?1 ORDER BY date_time DESC, id DESC",
            VIOLATION_COLUMNS
        ))?;

        let violations = stmt
            .query_map([status.as_str()], |row| self.row_to_violation(row))?
            .filter_map(|r| r.ok())
            .collect();

        Ok(violations)
    }

    /// Replace all mutable fields of the violation with the given id.
    ///
    /// id, date_time and created_at are untouched; updated_at is
    /// refreshed. Returns false when no such id exists.
    pub fn update_violation(&self, id: i64, input: &ViolationInput) -> Result<bool> {
        let affected = self.conn.execute(
            r#"
            UPDATE violations
            SET plate_number = ?1, vehicle_type = ?2, violation_type = ?3,
                location = ?4, fine_amount = ?5, officer_name = ?6,
                status = ?7, notes = ?8, updated_at = ?9
            WHERE id = ?10
            "#,
            params![
                input.plate_number.to_uppercase(),
                input.vehicle_type.as_str(),
                input.violation_type.as_str(),
                input.location,
                input.fine_amount,
                input.officer_name,
                input.status.as_str(),
                input.notes,
                self.now(),
                id,
            ],
        )?;
        Ok(affected > 0)
    }

    /// Update only the status of a violation
    pub fn update_status(&self, id: i64, status: Status) -> Result<bool> {
        let affected = self.conn.execute(
            "UPDATE violations SET status = ?1, updated_at = ?2 WHERE id = ?3",
            params![status.as_str(), self.now(), id],
        )?;
        Ok(affected > 0)
    }

    /// Delete a violation. Returns false when no such id exists.
    pub fn delete_violation(&self, id: i64) -> Result<bool> {
        let affected = self
            .conn
            .execute("DELETE FROM violations WHERE id = ?1", [id])?;
        Ok(affected > 0)
    }

    /// Count all violations
    pub fn count_violations(&self) -> Result<usize> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM violations", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Count violations with an exact status
    pub fn count_by_status(&self, status: Status) -> Result<usize> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM violations WHERE status = ?1",
            [status.as_str()],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    /// Compute the aggregate snapshot: totals, per-status counts,
    /// revenue from paid fines, and the top-5 frequency lists.
    pub fn statistics(&self) -> Result<ViolationStats> {
        let revenue: f64 = self.conn.query_row(
            "SELECT COALESCE(SUM(fine_amount), 0.0) FROM violations WHERE status = ?1",
            [Status::Paid.as_str()],
            |row| row.get(0),
        )?;

        Ok(ViolationStats {
            total: self.count_violations()?,
            pending: self.count_by_status(Status::Pending)?,
            paid: self.count_by_status(Status::Paid)?,
            cancelled: self.count_by_status(Status::Cancelled)?,
            under_review: self.count_by_status(Status::UnderReview)?,
            revenue,
            top_violation_types: self.top_by_column("violation_type")?,
            top_plates: self.top_by_column("plate_number")?,
        })
    }

    fn top_by_column(&self, column: &str) -> Result<Vec<(String, usize)>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {col}, COUNT(*) as count FROM violations
             GROUP BY {col} ORDER BY count DESC LIMIT 5",
            col = column
        ))?;

        let rows = stmt
            .query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as usize))
            })?
            .filter_map(|r| r.ok())
            .collect();

        Ok(rows)
    }

    /// Helper to convert a row to a Violation
    fn row_to_violation(&self, row: &rusqlite::Row) -> rusqlite::Result<Violation> {
        let vehicle_str: String = row.get(2)?;
        let violation_str: String = row.get(3)?;
        let status_str: String = row.get(8)?;

        let vehicle_type: VehicleType = vehicle_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(2, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let violation_type: ViolationType = violation_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
        })?;

        let status: Status = status_str.parse().map_err(|e: Error| {
            rusqlite::Error::FromSqlConversionFailure(8, rusqlite::types::Type::Text, Box::new(e))
        })?;

        Ok(Violation {
            id: row.get(0)?,
            plate_number: row.get(1)?,
            vehicle_type,
            violation_type,
            location: row.get(4)?,
            fine_amount: row.get(5)?,
            date_time: row.get(6)?,
            officer_name: row.get(7)?,
            status,
            notes: row.get(9)?,
            created_at: row.get(10)?,
            updated_at: row.get(11)?,
        })
    }

    // ========== User Operations ==========

    /// Insert a user row. The password must already be hashed.
    ///
    /// A unique-constraint rejection on username or email propagates as
    /// a storage error; the auth layer maps it to a duplicate-account
    /// outcome.
    pub fn insert_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        role: &str,
    ) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO users (username, email, password, role, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![username, email, password_hash, role, self.now()],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Look up a user by username
    pub fn find_user_by_username(&self, username: &str) -> Result<Option<User>> {
        self.conn
            .query_row(
                "SELECT id, username, email, password, role, created_at
                 FROM users WHERE username = ?1",
                [username],
                |row| {
                    Ok(User {
                        id: row.get(0)?,
                        username: row.get(1)?,
                        email: row.get(2)?,
                        password: row.get(3)?,
                        role: row.get(4)?,
                        created_at: row.get(5)?,
                    })
                },
            )
            .optional()
            .map_err(Into::into)
    }
}

/// Aggregate snapshot over the violations table
#[derive(Debug, Clone, Serialize)]
pub struct ViolationStats {
    pub total: usize,
    pub pending: usize,
    pub paid: usize,
    pub cancelled: usize,
    pub under_review: usize,
    /// Sum of fine_amount over paid violations
    pub revenue: f64,
    pub top_violation_types: Vec<(String, usize)>,
    pub top_plates: Vec<(String, usize)>,
}

impl std::fmt::Display for ViolationStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Violation Statistics:")?;
        writeln!(f, "  Total: {}", self.total)?;
        writeln!(
            f,
            "  Pending: {}, Paid: {}, Cancelled: {}, Under Review: {}",
            self.pending, self.paid, self.cancelled, self.under_review
        )?;
        writeln!(f, "  Revenue (paid fines): ${:.2}", self.revenue)?;
        if !self.top_violation_types.is_empty() {
            writeln!(f, "  Top violation types:")?;
            for (label, count) in &self.top_violation_types {
                writeln!(f, "    {} ({})", label, count)?;
            }
        }
        if !self.top_plates.is_empty() {
            writeln!(f, "  Top plates:")?;
            for (plate, count) in &self.top_plates {
                writeln!(f, "    {} ({})", plate, count)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input(plate: &str) -> ViolationInput {
        ViolationInput::new(
            plate,
            VehicleType::Car,
            ViolationType::Speeding,
            "Main St",
            150.00,
            "Officer Smith",
        )
        .unwrap()
    }

    #[test]
    fn test_create_and_get_by_id() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store.create_violation(&sample_input("abc123")).unwrap();
        let violation = store.get_by_id(id).unwrap().unwrap();

        assert_eq!(violation.id, id);
        assert_eq!(violation.plate_number, "ABC123");
        assert_eq!(violation.vehicle_type, VehicleType::Car);
        assert_eq!(violation.violation_type, ViolationType::Speeding);
        assert_eq!(violation.location, "Main St");
        assert_eq!(violation.fine_amount, 150.00);
        assert_eq!(violation.officer_name, "Officer Smith");
        assert_eq!(violation.status, Status::Pending);
        assert_eq!(violation.notes, "");
        assert!(!violation.date_time.is_empty());
        assert_eq!(violation.date_time, violation.created_at);
    }

    #[test]
    fn test_get_by_id_missing() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_by_id(999).unwrap().is_none());
    }

    #[test]
    fn test_get_all_empty() {
        let store = SqliteStore::open_in_memory().unwrap();
        assert!(store.get_all().unwrap().is_empty());
    }

    #[test]
    fn test_get_all_newest_first() {
        let store = SqliteStore::open_in_memory().unwrap();

        let a = store.create_violation(&sample_input("AAA111")).unwrap();
        let b = store.create_violation(&sample_input("BBB222")).unwrap();
        let c = store.create_violation(&sample_input("CCC333")).unwrap();

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 3);
        // Equal timestamps fall back to id descending
        assert_eq!(all.iter().map(|v| v.id).collect::<Vec<_>>(), vec![c, b, a]);
    }

    #[test]
    fn test_search_matches_subset() {
        let store = SqliteStore::open_in_memory().unwrap();

        store.create_violation(&sample_input("ABC123")).unwrap();
        store
            .create_violation(
                &ViolationInput::new(
                    "XYZ789",
                    VehicleType::Motorcycle,
                    ViolationType::IllegalParking,
                    "5th Ave",
                    75.00,
                    "Officer Jones",
                )
                .unwrap(),
            )
            .unwrap();

        // case-insensitive plate match
        let results = store.search("abc").unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].plate_number, "ABC123");

        // location and officer are searched too
        assert_eq!(store.search("5th").unwrap().len(), 1);
        assert_eq!(store.search("jones").unwrap().len(), 1);

        // violation type text
        assert_eq!(store.search("parking").unwrap().len(), 1);

        // no match is an empty list, not an error
        assert!(store.search("zzzzz").unwrap().is_empty());
    }

    #[test]
    fn test_search_empty_term_is_get_all() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_violation(&sample_input("AAA111")).unwrap();
        store.create_violation(&sample_input("BBB222")).unwrap();

        assert_eq!(store.search("").unwrap(), store.get_all().unwrap());
        assert_eq!(store.search("   ").unwrap(), store.get_all().unwrap());
    }

    #[test]
    fn test_get_by_status() {
        let store = SqliteStore::open_in_memory().unwrap();

        let a = store.create_violation(&sample_input("AAA111")).unwrap();
        store.create_violation(&sample_input("BBB222")).unwrap();
        store.update_status(a, Status::Paid).unwrap();

        let paid = store.get_by_status(Status::Paid).unwrap();
        assert_eq!(paid.len(), 1);
        assert_eq!(paid[0].id, a);

        let pending = store.get_by_status(Status::Pending).unwrap();
        assert_eq!(pending.len(), 1);

        assert!(store.get_by_status(Status::Cancelled).unwrap().is_empty());
    }

    #[test]
    fn test_update_roundtrip() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store.create_violation(&sample_input("abc123")).unwrap();
        let original = store.get_by_id(id).unwrap().unwrap();

        let updated_input = ViolationInput::new(
            "abc123",
            VehicleType::Car,
            ViolationType::Speeding,
            "Elm St",
            200.00,
            "Officer Smith",
        )
        .unwrap()
        .with_status(Status::Paid)
        .with_notes("school zone")
        .unwrap();

        assert!(store.update_violation(id, &updated_input).unwrap());

        let updated = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(updated.id, original.id);
        assert_eq!(updated.date_time, original.date_time);
        assert_eq!(updated.created_at, original.created_at);
        assert_eq!(updated.location, "Elm St");
        assert_eq!(updated.fine_amount, 200.00);
        assert_eq!(updated.status, Status::Paid);
        assert_eq!(updated.notes, "school zone");
    }

    #[test]
    fn test_update_missing_id() {
        let store = SqliteStore::open_in_memory().unwrap();
        store.create_violation(&sample_input("AAA111")).unwrap();

        assert!(!store.update_violation(999, &sample_input("BBB222")).unwrap());
        assert!(!store.update_status(999, Status::Paid).unwrap());

        // the store is unchanged
        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].plate_number, "AAA111");
        assert_eq!(all[0].status, Status::Pending);
    }

    #[test]
    fn test_delete_idempotence() {
        let store = SqliteStore::open_in_memory().unwrap();
        let id = store.create_violation(&sample_input("AAA111")).unwrap();

        assert!(store.delete_violation(id).unwrap());
        assert!(!store.delete_violation(id).unwrap());
        assert!(store.get_by_id(id).unwrap().is_none());
    }

    #[test]
    fn test_statistics_scenario() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store
            .create_violation(
                &ViolationInput::new(
                    "ABC123",
                    VehicleType::Car,
                    ViolationType::Speeding,
                    "Main St",
                    1200.00,
                    "Officer A",
                )
                .unwrap(),
            )
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.paid, 0);
        assert_eq!(stats.revenue, 0.0);

        assert!(store.update_status(id, Status::Paid).unwrap());

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total, 1);
        assert_eq!(stats.paid, 1);
        assert!((stats.revenue - 1200.00).abs() < 1e-9);

        assert!(store.delete_violation(id).unwrap());
        assert!(store.get_all().unwrap().is_empty());

        let stats = store.statistics().unwrap();
        assert_eq!(stats.total, 0);
        assert_eq!(stats.revenue, 0.0);
    }

    #[test]
    fn test_statistics_top_lists() {
        let store = SqliteStore::open_in_memory().unwrap();

        for _ in 0..3 {
            store.create_violation(&sample_input("AAA111")).unwrap();
        }
        store
            .create_violation(
                &ViolationInput::new(
                    "BBB222",
                    VehicleType::Truck,
                    ViolationType::Overloading,
                    "Dock Rd",
                    200.00,
                    "Officer Jones",
                )
                .unwrap(),
            )
            .unwrap();

        let stats = store.statistics().unwrap();
        assert_eq!(stats.top_violation_types[0], ("Speeding".to_string(), 3));
        assert_eq!(stats.top_plates[0], ("AAA111".to_string(), 3));
        assert_eq!(stats.top_violation_types.len(), 2);
    }

    #[test]
    fn test_file_backed_store_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("violog.db");

        let id = {
            let store = SqliteStore::open(&db_path).unwrap();
            store.create_violation(&sample_input("ABC123")).unwrap()
        };

        let store = SqliteStore::open(&db_path).unwrap();
        let violation = store.get_by_id(id).unwrap().unwrap();
        assert_eq!(violation.plate_number, "ABC123");
    }

    #[test]
    fn test_user_insert_and_lookup() {
        let store = SqliteStore::open_in_memory().unwrap();

        let id = store
            .insert_user("smith", "smith@precinct.test", "deadbeef", "officer")
            .unwrap();

        let user = store.find_user_by_username("smith").unwrap().unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email, "smith@precinct.test");
        assert_eq!(user.role, "officer");

        assert!(store.find_user_by_username("nobody").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_username_rejected_by_schema() {
        let store = SqliteStore::open_in_memory().unwrap();

        store
            .insert_user("smith", "smith@precinct.test", "deadbeef", "officer")
            .unwrap();
        let result = store.insert_user("smith", "other@precinct.test", "deadbeef", "officer");
        assert!(matches!(result, Err(Error::Storage(_))));
    }
}
