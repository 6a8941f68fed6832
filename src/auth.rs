//! Officer accounts - registration and login
//!
//! Passwords are stored as one-way SHA-256 digests; plaintext never
//! reaches the users table. Login failure is a single outcome whether
//! the username or the password was wrong.

use std::sync::OnceLock;

use regex::Regex;
use sha2::{Digest, Sha256};

use crate::storage::SqliteStore;
use crate::{Error, Result};

pub const DEFAULT_ROLE: &str = "officer";
pub const MIN_PASSWORD_LEN: usize = 8;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"))
}

/// Compute the stored digest for a password
pub fn password_hash(password: &str) -> String {
    format!("{:x}", Sha256::digest(password.as_bytes()))
}

/// A user account row
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// SHA-256 hex digest of the password
    pub password: String,
    pub role: String,
    pub created_at: String,
}

/// Registration and login over a borrowed store
pub struct Authenticator<'a> {
    store: &'a SqliteStore,
}

impl<'a> Authenticator<'a> {
    pub fn new(store: &'a SqliteStore) -> Self {
        Self { store }
    }

    /// Register a new account and return its id.
    ///
    /// The password is hashed before it is handed to the store. An
    /// existing username or email is a duplicate-account outcome, not a
    /// storage error.
    pub fn register(&self, username: &str, email: &str, password: &str, role: &str) -> Result<i64> {
        let username = username.trim();
        let email = email.trim();

        if username.is_empty() {
            return Err(Error::Validation("username is required".into()));
        }
        if !email_regex().is_match(email) {
            return Err(Error::Validation(format!("invalid email address: {}", email)));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(Error::Validation(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.store.find_user_by_username(username)?.is_some() {
            return Err(Error::DuplicateUser(username.to_string()));
        }

        self.store
            .insert_user(username, email, &password_hash(password), role)
            .map_err(|e| match e {
                // unique constraint on email (username was pre-checked)
                Error::Storage(rusqlite::Error::SqliteFailure(f, _))
                    if f.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    Error::DuplicateUser(email.to_string())
                }
                other => other,
            })
    }

    /// Authenticate a username/password pair.
    ///
    /// Returns the full user record on a digest match; otherwise
    /// [`Error::InvalidCredentials`], identical in shape for an unknown
    /// username and a wrong password.
    pub fn login(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .store
            .find_user_by_username(username.trim())?
            .ok_or(Error::InvalidCredentials)?;

        if user.password != password_hash(password) {
            return Err(Error::InvalidCredentials);
        }

        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_user() -> SqliteStore {
        let store = SqliteStore::open_in_memory().unwrap();
        Authenticator::new(&store)
            .register("smith", "smith@precinct.test", "correct horse", DEFAULT_ROLE)
            .unwrap();
        store
    }

    #[test]
    fn test_register_and_login() {
        let store = store_with_user();
        let auth = Authenticator::new(&store);

        let user = auth.login("smith", "correct horse").unwrap();
        assert_eq!(user.username, "smith");
        assert_eq!(user.role, DEFAULT_ROLE);
    }

    #[test]
    fn test_password_never_stored_plaintext() {
        let store = store_with_user();
        let user = store.find_user_by_username("smith").unwrap().unwrap();

        assert_ne!(user.password, "correct horse");
        assert_eq!(user.password, password_hash("correct horse"));
    }

    #[test]
    fn test_login_failure_shape_is_uniform() {
        let store = store_with_user();
        let auth = Authenticator::new(&store);

        let wrong_password = auth.login("smith", "wrong").unwrap_err();
        let unknown_user = auth.login("nobody", "correct horse").unwrap_err();

        assert!(matches!(wrong_password, Error::InvalidCredentials));
        assert!(matches!(unknown_user, Error::InvalidCredentials));
        assert_eq!(wrong_password.to_string(), unknown_user.to_string());
    }

    #[test]
    fn test_duplicate_username() {
        let store = store_with_user();
        let auth = Authenticator::new(&store);

        let err = auth
            .register("smith", "other@precinct.test", "some password", DEFAULT_ROLE)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateUser(_)));
    }

    #[test]
    fn test_duplicate_email() {
        let store = store_with_user();
        let auth = Authenticator::new(&store);

        let err = auth
            .register("jones", "smith@precinct.test", "some password", DEFAULT_ROLE)
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateUser(_)));
    }

    #[test]
    fn test_register_validation() {
        let store = SqliteStore::open_in_memory().unwrap();
        let auth = Authenticator::new(&store);

        assert!(
            auth.register("", "a@b.test", "long enough", DEFAULT_ROLE)
                .is_err()
        );
        assert!(
            auth.register("jones", "not-an-email", "long enough", DEFAULT_ROLE)
                .is_err()
        );
        assert!(
            auth.register("jones", "a@b.test", "short", DEFAULT_ROLE)
                .is_err()
        );
    }
}
