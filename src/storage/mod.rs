//! Storage Layer - SQLite-backed persistence
//!
//! System of record is SQLite with tables:
//! - violations(plate_number, vehicle_type, violation_type, location, fine_amount, date_time, officer_name, status, notes)
//! - users(username, email, password, role)

pub mod schema;
pub mod sqlite;

pub use sqlite::{SqliteStore, ViolationStats};
