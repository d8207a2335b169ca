//! Core data types for the profile store
//!
//! This module defines the types persisted in the storage area:
//! - `PatientProfile`: the one record stored per identifying key
//! - `Gender`: the closed set of gender choices offered by the intake form

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Gender choices offered by the intake form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Gender {
    Male,
    Female,
    Other,
}

impl Gender {
    /// Every choice, in the order the form offers them
    pub const ALL: [Gender; 3] = [Gender::Male, Gender::Female, Gender::Other];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Gender::ALL
            .into_iter()
            .find(|gender| gender.as_str() == s)
            .ok_or_else(|| {
                format!(
                    "Invalid gender: '{}'. Must be one of: Male, Female, Other",
                    s
                )
            })
    }
}

/// A stored patient profile
///
/// Serialized with camelCase field names, the layout the storage area has
/// always held. Doctor name and specialty are copied in at creation time
/// from the doctor directory rather than looked up on read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientProfile {
    /// Identifying key; may be empty
    #[serde(default)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    pub gender: Gender,
    /// Absent when the patient left it blank; stored values are kept as
    /// written, so older entries may hold an empty string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_number: Option<String>,
    pub symptoms: String,
    pub doctor_id: String,
    #[serde(default)]
    pub doctor_name: String,
    #[serde(default)]
    pub doctor_specialty: String,
    pub created_at: DateTime<Utc>,
}

impl PatientProfile {
    /// "First Last", trimmed
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    /// Contact number, treating a blank value as absent
    pub fn contact(&self) -> Option<&str> {
        self.contact_number
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_json(contact: &str) -> String {
        format!(
            r#"{{
                "email": "a@x.com",
                "firstName": "Jane",
                "lastName": "Doe",
                "age": 30,
                "gender": "Female",
                {}
                "symptoms": "cough",
                "doctorId": "d1",
                "doctorName": "Dr. Alice Carter",
                "doctorSpecialty": "Cardiology",
                "createdAt": "2024-03-01T10:15:30.123Z"
            }}"#,
            contact
        )
    }

    #[test]
    fn test_gender_parse() {
        assert_eq!("Male".parse::<Gender>().unwrap(), Gender::Male);
        assert_eq!(" Other ".parse::<Gender>().unwrap(), Gender::Other);
        assert!("male".parse::<Gender>().is_err());
        assert!("".parse::<Gender>().is_err());

        for gender in Gender::ALL {
            assert_eq!(gender.to_string().parse::<Gender>().unwrap(), gender);
        }
    }

    #[test]
    fn test_deserialize_stored_layout() {
        let profile: PatientProfile =
            serde_json::from_str(&sample_json(r#""contactNumber": "+1 555 123 4567","#)).unwrap();

        assert_eq!(profile.first_name, "Jane");
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.contact_number.as_deref(), Some("+1 555 123 4567"));
        assert_eq!(profile.doctor_specialty, "Cardiology");
        assert_eq!(profile.full_name(), "Jane Doe");
    }

    #[test]
    fn test_blank_contact_number_counts_as_absent() {
        let profile: PatientProfile =
            serde_json::from_str(&sample_json(r#""contactNumber": "","#)).unwrap();
        assert_eq!(profile.contact_number.as_deref(), Some(""));
        assert_eq!(profile.contact(), None);

        let profile: PatientProfile = serde_json::from_str(&sample_json("")).unwrap();
        assert_eq!(profile.contact_number, None);
        assert_eq!(profile.contact(), None);
    }

    #[test]
    fn test_contact_number_survives_serialization_as_written() {
        let base: PatientProfile = serde_json::from_str(&sample_json("")).unwrap();

        for contact in [None, Some(""), Some("+1 555 123 4567")] {
            let profile = PatientProfile {
                contact_number: contact.map(str::to_string),
                ..base.clone()
            };
            let json = serde_json::to_string(&profile).unwrap();
            let back: PatientProfile = serde_json::from_str(&json).unwrap();
            assert_eq!(back, profile);
        }
    }

    #[test]
    fn test_serialize_uses_camel_case() {
        let profile: PatientProfile = serde_json::from_str(&sample_json("")).unwrap();
        let value = serde_json::to_value(&profile).unwrap();

        assert_eq!(value["firstName"], "Jane");
        assert_eq!(value["doctorName"], "Dr. Alice Carter");
        assert!(value.get("contactNumber").is_none());
        assert!(value.get("first_name").is_none());
    }
}
