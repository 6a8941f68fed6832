//! Violation types - the record and its fixed enumerations
//!
//! A violation carries three closed sets:
//! - `VehicleType`: what was driven
//! - `ViolationType`: what rule was broken
//! - `Status`: where the record is in its lifecycle
//!
//! Every enumeration maps to and from the exact label persisted in the
//! database, so the stored text round-trips unchanged.

use crate::{Error, Result};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Lifecycle status of a violation record.
///
/// Any status may be set at any time; there is no enforced transition
/// graph beyond membership in this set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    #[default]
    Pending,
    Paid,
    Cancelled,
    UnderReview,
}

impl Status {
    /// Get the label persisted in the `status` column
    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Paid => "Paid",
            Status::Cancelled => "Cancelled",
            Status::UnderReview => "Under Review",
        }
    }

    /// Get all statuses
    pub fn all() -> &'static [Status] {
        &[
            Status::Pending,
            Status::Paid,
            Status::Cancelled,
            Status::UnderReview,
        ]
    }
}

impl FromStr for Status {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(Status::Pending),
            "paid" => Ok(Status::Paid),
            "cancelled" | "canceled" => Ok(Status::Cancelled),
            "under review" | "under-review" | "review" => Ok(Status::UnderReview),
            _ => Err(Error::Validation(format!("Unknown status: {}", s))),
        }
    }
}

/// Vehicle categories accepted by the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VehicleType {
    Car,
    Motorcycle,
    Truck,
    Bus,
    Van,
    Suv,
    PickupTruck,
    Bicycle,
}

impl VehicleType {
    /// Get the label persisted in the `vehicle_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleType::Car => "Car",
            VehicleType::Motorcycle => "Motorcycle",
            VehicleType::Truck => "Truck",
            VehicleType::Bus => "Bus",
            VehicleType::Van => "Van",
            VehicleType::Suv => "SUV",
            VehicleType::PickupTruck => "Pickup Truck",
            VehicleType::Bicycle => "Bicycle",
        }
    }

    /// Get all vehicle types
    pub fn all() -> &'static [VehicleType] {
        &[
            VehicleType::Car,
            VehicleType::Motorcycle,
            VehicleType::Truck,
            VehicleType::Bus,
            VehicleType::Van,
            VehicleType::Suv,
            VehicleType::PickupTruck,
            VehicleType::Bicycle,
        ]
    }
}

impl FromStr for VehicleType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        for kind in Self::all() {
            if normalized == kind.as_str().to_lowercase() {
                return Ok(*kind);
            }
        }
        match normalized.as_str() {
            "pickup" | "pickup-truck" => Ok(VehicleType::PickupTruck),
            "bike" => Ok(VehicleType::Bicycle),
            _ => Err(Error::Validation(format!("Unknown vehicle type: {}", s))),
        }
    }
}

/// Violation categories accepted by the form.
///
/// The set mirrors the citation book: each entry carries a default fine
/// suggestion used when the officer does not supply an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ViolationType {
    Speeding,
    IllegalParking,
    RunningRedLight,
    NoLicense,
    NoRegistration,
    Dui,
    RecklessDriving,
    NoInsurance,
    ExpiredLicense,
    ImproperLaneChange,
    NoSeatbelt,
    PhoneWhileDriving,
    IllegalUTurn,
    Overloading,
    TintedWindows,
    ModifiedExhaust,
    NoHelmet,
    Other,
}

impl ViolationType {
    /// Get the label persisted in the `violation_type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            ViolationType::Speeding => "Speeding",
            ViolationType::IllegalParking => "Illegal Parking",
            ViolationType::RunningRedLight => "Running Red Light",
            ViolationType::NoLicense => "No License",
            ViolationType::NoRegistration => "No Registration",
            ViolationType::Dui => "DUI (Driving Under Influence)",
            ViolationType::RecklessDriving => "Reckless Driving",
            ViolationType::NoInsurance => "No Insurance",
            ViolationType::ExpiredLicense => "Expired License",
            ViolationType::ImproperLaneChange => "Improper Lane Change",
            ViolationType::NoSeatbelt => "No Seatbelt",
            ViolationType::PhoneWhileDriving => "Using Phone While Driving",
            ViolationType::IllegalUTurn => "Illegal U-Turn",
            ViolationType::Overloading => "Overloading",
            ViolationType::TintedWindows => "Tinted Windows",
            ViolationType::ModifiedExhaust => "Modified Exhaust",
            ViolationType::NoHelmet => "No Helmet (Motorcycle)",
            ViolationType::Other => "Other",
        }
    }

    /// Suggested fine when no amount is supplied
    pub fn default_fine(&self) -> f64 {
        match self {
            ViolationType::Speeding => 150.00,
            ViolationType::IllegalParking => 50.00,
            ViolationType::RunningRedLight => 200.00,
            ViolationType::NoLicense => 300.00,
            ViolationType::NoRegistration => 250.00,
            ViolationType::Dui => 1000.00,
            ViolationType::RecklessDriving => 500.00,
            ViolationType::NoInsurance => 400.00,
            ViolationType::ExpiredLicense => 100.00,
            ViolationType::ImproperLaneChange => 75.00,
            ViolationType::NoSeatbelt => 100.00,
            ViolationType::PhoneWhileDriving => 150.00,
            ViolationType::IllegalUTurn => 75.00,
            ViolationType::Overloading => 200.00,
            ViolationType::TintedWindows => 100.00,
            ViolationType::ModifiedExhaust => 150.00,
            ViolationType::NoHelmet => 100.00,
            ViolationType::Other => 100.00,
        }
    }

    /// Get all violation types
    pub fn all() -> &'static [ViolationType] {
        &[
            ViolationType::Speeding,
            ViolationType::IllegalParking,
            ViolationType::RunningRedLight,
            ViolationType::NoLicense,
            ViolationType::NoRegistration,
            ViolationType::Dui,
            ViolationType::RecklessDriving,
            ViolationType::NoInsurance,
            ViolationType::ExpiredLicense,
            ViolationType::ImproperLaneChange,
            ViolationType::NoSeatbelt,
            ViolationType::PhoneWhileDriving,
            ViolationType::IllegalUTurn,
            ViolationType::Overloading,
            ViolationType::TintedWindows,
            ViolationType::ModifiedExhaust,
            ViolationType::NoHelmet,
            ViolationType::Other,
        ]
    }
}

impl FromStr for ViolationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        for kind in Self::all() {
            if normalized == kind.as_str().to_lowercase() {
                return Ok(*kind);
            }
        }
        match normalized.as_str() {
            "parking" => Ok(ViolationType::IllegalParking),
            "red light" | "red-light" => Ok(ViolationType::RunningRedLight),
            "dui" => Ok(ViolationType::Dui),
            "phone" => Ok(ViolationType::PhoneWhileDriving),
            "u-turn" | "uturn" => Ok(ViolationType::IllegalUTurn),
            "no helmet" => Ok(ViolationType::NoHelmet),
            _ => Err(Error::Validation(format!("Unknown violation type: {}", s))),
        }
    }
}

macro_rules! impl_label_traits {
    ($($ty:ty),*) => {$(
        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.as_str())
            }
        }

        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(D::Error::custom)
            }
        }
    )*};
}

impl_label_traits!(Status, VehicleType, ViolationType);

/// A violation record as persisted in the store.
///
/// `id`, `date_time`, `created_at` and `updated_at` are owned by the
/// store; everything else comes from a validated [`crate::ViolationInput`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Store-assigned identifier, stable for the record's lifetime
    pub id: i64,
    /// License plate, always uppercase
    pub plate_number: String,
    pub vehicle_type: VehicleType,
    pub violation_type: ViolationType,
    pub location: String,
    /// Fine in currency units, two fractional digits
    pub fine_amount: f64,
    /// When the violation was recorded (creation time, immutable)
    pub date_time: String,
    pub officer_name: String,
    pub status: Status,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

impl Violation {
    /// One-line summary for list output
    pub fn short_description(&self) -> String {
        format!(
            "#{} {} - {} ({})",
            self.id, self.plate_number, self.violation_type, self.status
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_roundtrip() {
        for status in Status::all() {
            let parsed: Status = status.as_str().parse().unwrap();
            assert_eq!(*status, parsed);
        }
    }

    #[test]
    fn test_status_aliases() {
        assert_eq!(Status::from_str("canceled").unwrap(), Status::Cancelled);
        assert_eq!(Status::from_str("under-review").unwrap(), Status::UnderReview);
        assert_eq!(Status::from_str("PAID").unwrap(), Status::Paid);
        assert!(Status::from_str("archived").is_err());
    }

    #[test]
    fn test_status_default() {
        assert_eq!(Status::default(), Status::Pending);
    }

    #[test]
    fn test_vehicle_type_roundtrip() {
        for kind in VehicleType::all() {
            let parsed: VehicleType = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_vehicle_type_aliases() {
        assert_eq!(VehicleType::from_str("suv").unwrap(), VehicleType::Suv);
        assert_eq!(VehicleType::from_str("pickup").unwrap(), VehicleType::PickupTruck);
        assert_eq!(VehicleType::from_str("bike").unwrap(), VehicleType::Bicycle);
    }

    #[test]
    fn test_violation_type_roundtrip() {
        for kind in ViolationType::all() {
            let parsed: ViolationType = kind.as_str().parse().unwrap();
            assert_eq!(*kind, parsed);
        }
    }

    #[test]
    fn test_violation_type_aliases() {
        assert_eq!(ViolationType::from_str("dui").unwrap(), ViolationType::Dui);
        assert_eq!(
            ViolationType::from_str("red light").unwrap(),
            ViolationType::RunningRedLight
        );
        assert_eq!(
            ViolationType::from_str("illegal parking").unwrap(),
            ViolationType::IllegalParking
        );
    }

    #[test]
    fn test_default_fines() {
        assert_eq!(ViolationType::Speeding.default_fine(), 150.00);
        assert_eq!(ViolationType::Dui.default_fine(), 1000.00);
        assert_eq!(ViolationType::Other.default_fine(), 100.00);
    }

    #[test]
    fn test_serde_uses_labels() {
        let json = serde_json::to_string(&Status::UnderReview).unwrap();
        assert_eq!(json, "\"Under Review\"");
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Status::UnderReview);
    }
}
