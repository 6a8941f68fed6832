//! Boundary validation - raw form strings to typed input
//!
//! The presentation layer collects everything as text. Nothing reaches
//! the store until it has passed through [`ViolationInput`], so the store
//! only ever sees typed, range-checked values.

use crate::violation::{Status, VehicleType, ViolationType};
use crate::{Error, Result};

pub const MAX_PLATE_LEN: usize = 20;
pub const MAX_LOCATION_LEN: usize = 255;
pub const MAX_OFFICER_LEN: usize = 100;
pub const MAX_NOTES_LEN: usize = 1000;
pub const MAX_FINE_AMOUNT: f64 = 999_999.99;

/// A validated violation payload, ready for the store.
///
/// Carries every mutable field of a [`crate::Violation`]; the store owns
/// id and timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct ViolationInput {
    pub plate_number: String,
    pub vehicle_type: VehicleType,
    pub violation_type: ViolationType,
    pub location: String,
    pub fine_amount: f64,
    pub officer_name: String,
    pub status: Status,
    pub notes: String,
}

impl ViolationInput {
    /// Build a validated input from typed values.
    ///
    /// Status defaults to Pending and notes to empty; use
    /// [`Self::with_status`] and [`Self::with_notes`] to override.
    pub fn new(
        plate_number: impl Into<String>,
        vehicle_type: VehicleType,
        violation_type: ViolationType,
        location: impl Into<String>,
        fine_amount: f64,
        officer_name: impl Into<String>,
    ) -> Result<Self> {
        let plate_number = required_text("plate number", plate_number.into(), MAX_PLATE_LEN)?;
        let location = required_text("location", location.into(), MAX_LOCATION_LEN)?;
        let officer_name = required_text("officer name", officer_name.into(), MAX_OFFICER_LEN)?;
        let fine_amount = check_fine(fine_amount)?;

        Ok(Self {
            plate_number,
            vehicle_type,
            violation_type,
            location,
            fine_amount,
            officer_name,
            status: Status::default(),
            notes: String::new(),
        })
    }

    /// Set the status
    pub fn with_status(mut self, status: Status) -> Self {
        self.status = status;
        self
    }

    /// Set the notes, enforcing the length limit
    pub fn with_notes(mut self, notes: impl Into<String>) -> Result<Self> {
        let notes = notes.into().trim().to_string();
        if notes.chars().count() > MAX_NOTES_LEN {
            return Err(Error::Validation(format!(
                "notes exceeds {} characters",
                MAX_NOTES_LEN
            )));
        }
        self.notes = notes;
        Ok(self)
    }

    /// Parse raw form strings into a validated input.
    ///
    /// This is the full string boundary: enum labels go through their
    /// `FromStr` impls and the fine amount must be a positive number.
    pub fn parse(
        plate_number: &str,
        vehicle_type: &str,
        violation_type: &str,
        location: &str,
        fine_amount: &str,
        officer_name: &str,
        status: &str,
        notes: &str,
    ) -> Result<Self> {
        let vehicle_type: VehicleType = vehicle_type.parse()?;
        let violation_type: ViolationType = violation_type.parse()?;
        let status: Status = status.parse()?;

        let fine_amount: f64 = fine_amount
            .trim()
            .parse()
            .map_err(|_| Error::Validation(format!("fine amount is not a number: {}", fine_amount)))?;

        Self::new(
            plate_number,
            vehicle_type,
            violation_type,
            location,
            fine_amount,
            officer_name,
        )?
        .with_notes(notes)
        .map(|input| input.with_status(status))
    }
}

fn required_text(field: &str, value: String, max_len: usize) -> Result<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        return Err(Error::Validation(format!("{} is required", field)));
    }
    if value.chars().count() > max_len {
        return Err(Error::Validation(format!(
            "{} exceeds {} characters",
            field, max_len
        )));
    }
    Ok(value)
}

fn check_fine(amount: f64) -> Result<f64> {
    if !amount.is_finite() {
        return Err(Error::Validation("fine amount is not a number".into()));
    }
    // Two-decimal precision is part of the persisted contract
    let rounded = (amount * 100.0).round() / 100.0;
    if rounded <= 0.0 {
        return Err(Error::Validation("fine amount must be greater than zero".into()));
    }
    if rounded > MAX_FINE_AMOUNT {
        return Err(Error::Validation(format!(
            "fine amount exceeds {:.2}",
            MAX_FINE_AMOUNT
        )));
    }
    Ok(rounded)
}
