// 🚗 Car Entity - Chassis number is identity, everything else is value
//
// A car is never deleted. Each lifecycle operation produces a new value for
// the same chassis number, and the ledger keeps every value it ever held.

use serde::{Deserialize, Serialize};

/// Owner assigned to a freshly created car when no config overrides it.
pub const DEFAULT_OWNER: &str = "Manufacturer";

// ============================================================================
// CAR STATUS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarStatus {
    /// Built and on the books, not yet sold
    Active,

    /// Ownership transferred
    Sold,

    /// Sold and carrying a registration
    Registered,

    /// Taken off the road
    Scrapped,
}

impl CarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CarStatus::Active => "Active",
            CarStatus::Sold => "Sold",
            CarStatus::Registered => "Registered",
            CarStatus::Scrapped => "Scrapped",
        }
    }
}

impl std::fmt::Display for CarStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CAR RECORD
// ============================================================================

/// Car record as stored on the ledger (JSON, camelCase).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    /// Ledger key - NEVER changes
    pub chassis_number: String,

    pub owner: String,
    pub status: CarStatus,

    pub registration_number: Option<String>,

    /// Stored exactly as supplied (e.g. "31DEC2025")
    pub registration_expiry: Option<String>,
}

impl Car {
    /// New car in the initial `Active` state.
    pub fn new(chassis_number: String, owner: String) -> Self {
        Car {
            chassis_number,
            owner,
            status: CarStatus::Active,
            registration_number: None,
            registration_expiry: None,
        }
    }

    pub fn transfer(&mut self, new_owner: String) {
        self.owner = new_owner;
        self.status = CarStatus::Sold;
    }

    pub fn sell_and_register(
        &mut self,
        new_owner: String,
        registration_number: String,
        registration_expiry: String,
    ) {
        self.owner = new_owner;
        self.status = CarStatus::Registered;
        self.registration_number = Some(registration_number);
        self.registration_expiry = Some(registration_expiry);
    }

    /// Registration fields are left as they were; history shows the last plate.
    pub fn scrap(&mut self) {
        self.status = CarStatus::Scrapped;
    }

    pub fn is_scrapped(&self) -> bool {
        self.status == CarStatus::Scrapped
    }

    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(self)
    }

    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Car> {
        serde_json::from_slice(bytes)
    }
}

impl std::fmt::Display for Car {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} owner={} status={} registration={} expiry={}",
            self.chassis_number,
            self.owner,
            self.status,
            self.registration_number.as_deref().unwrap_or("-"),
            self.registration_expiry.as_deref().unwrap_or("-"),
        )
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_car_is_active_and_unregistered() {
        let car = Car::new("1000".to_string(), DEFAULT_OWNER.to_string());

        assert_eq!(car.chassis_number, "1000");
        assert_eq!(car.owner, "Manufacturer");
        assert_eq!(car.status, CarStatus::Active);
        assert!(car.registration_number.is_none());
        assert!(car.registration_expiry.is_none());
    }

    #[test]
    fn test_transfer_marks_sold() {
        let mut car = Car::new("1000".to_string(), DEFAULT_OWNER.to_string());
        car.transfer("Rahul".to_string());

        assert_eq!(car.owner, "Rahul");
        assert_eq!(car.status, CarStatus::Sold);
    }

    #[test]
    fn test_scrapped_car_can_be_registered_again() {
        let mut car = Car::new("1000".to_string(), DEFAULT_OWNER.to_string());
        car.sell_and_register("Vaibhav".to_string(), "TS071".to_string(), "31DEC2025".to_string());
        car.scrap();

        assert!(car.is_scrapped());
        assert_eq!(car.registration_number.as_deref(), Some("TS071"));

        car.sell_and_register("Jyothi".to_string(), "TS071".to_string(), "31DEC2025".to_string());
        assert_eq!(car.owner, "Jyothi");
        assert_eq!(car.status, CarStatus::Registered);
    }

    #[test]
    fn test_json_uses_camel_case_field_names() {
        let car = Car::new("1000".to_string(), DEFAULT_OWNER.to_string());
        let json: serde_json::Value = serde_json::from_slice(&car.to_bytes().unwrap()).unwrap();

        assert_eq!(json["chassisNumber"], "1000");
        assert_eq!(json["status"], "Active");
        assert!(json["registrationNumber"].is_null());
    }
}
