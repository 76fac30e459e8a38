use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::enums::Gender;
use super::ModelError;

const MAX_AGE: u32 = 150;

/// Registration form for a new patient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub age: String,
    pub gender: String,
    pub contact_no: String,
    pub email: String,
    pub state: String,
    pub district: String,
    pub city: String,
    pub pincode: String,
    pub existing_conditions: Vec<String>,
}

impl NewPatient {
    /// Check the fields the registration form marks as required.
    pub fn validate(&self) -> Result<(), ModelError> {
        let required = [
            ("First name", &self.first_name),
            ("Last name", &self.last_name),
            ("Age", &self.age),
            ("Contact number", &self.contact_no),
            ("District", &self.district),
            ("City", &self.city),
            ("Pincode", &self.pincode),
        ];
        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(ModelError::MissingField(field));
            }
        }

        self.parsed_age()?;

        if !self.gender.trim().is_empty() {
            self.gender.trim().parse::<Gender>()?;
        }

        Ok(())
    }

    pub fn parsed_age(&self) -> Result<u32, ModelError> {
        let age: u32 = self.age.trim().parse().map_err(|_| ModelError::InvalidField {
            field: "Age",
            reason: format!("'{}' is not a whole number", self.age.trim()),
        })?;
        if age > MAX_AGE {
            return Err(ModelError::InvalidField {
                field: "Age",
                reason: format!("{age} exceeds {MAX_AGE}"),
            });
        }
        Ok(age)
    }
}

/// A registered patient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientRecord {
    pub id: String,
    pub mrn: String,
    pub user_id: String,
    #[serde(flatten)]
    pub details: NewPatient,
    pub registration_date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl PatientRecord {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.details.first_name, self.details.last_name)
    }

    /// Age as an integer; `None` for legacy records with a free-text age.
    pub fn age(&self) -> Option<u32> {
        self.details.parsed_age().ok()
    }
}
