//! # Violog - Traffic Violation Records Manager
//!
//! SQLite-backed record store for traffic violations.
//!
//! Violog provides:
//! - A typed violation record with fixed vehicle/violation/status sets
//! - Boundary validation that turns raw form strings into typed input
//! - SQLite-backed CRUD, substring search, status filtering and statistics
//! - Officer accounts with hashed-password registration and login

pub mod auth;
pub mod config;
pub mod storage;
pub mod ui;
pub mod validate;
pub mod violation;

// Re-exports for convenient access
pub use auth::{Authenticator, User};
pub use storage::{SqliteStore, ViolationStats};
pub use validate::ViolationInput;
pub use violation::{Status, VehicleType, Violation, ViolationType};

/// Result type alias for Violog operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for Violog operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Account already exists: {0}")]
    DuplicateUser(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
