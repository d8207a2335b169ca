//! Intake form
//!
//! Raw patient-details input as typed by the patient, and the rules that turn
//! it into a [`PatientProfile`].

use crate::doctors::find_doctor;
use crate::intake::IntakeError;
use crate::storage::{Gender, PatientProfile};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Patient details exactly as entered
///
/// Every field is kept as text so that validation, not deserialization,
/// decides what is acceptable. A JSON `null` reads as a blank field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct IntakeForm {
    #[serde(deserialize_with = "null_as_blank")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_blank")]
    pub last_name: String,
    #[serde(deserialize_with = "text_or_number")]
    pub age: String,
    #[serde(deserialize_with = "null_as_blank")]
    pub gender: String,
    #[serde(deserialize_with = "null_as_blank")]
    pub contact_number: String,
    #[serde(deserialize_with = "null_as_blank")]
    pub symptoms: String,
    #[serde(deserialize_with = "null_as_blank")]
    pub doctor_id: String,
}

impl IntakeForm {
    /// Form with first and last name taken from the sign-up full name
    ///
    /// The first whitespace-separated word becomes the first name; the
    /// remaining words, joined by single spaces, become the last name.
    pub fn prefilled(full_name: &str) -> Self {
        let mut parts = full_name.split_whitespace();
        let first_name = parts.next().unwrap_or_default().to_string();
        let last_name = parts.collect::<Vec<_>>().join(" ");

        Self {
            first_name,
            last_name,
            ..Default::default()
        }
    }

    /// Fill blank first and last names from the sign-up full name
    pub fn with_default_names(mut self, full_name: &str) -> Self {
        let defaults = Self::prefilled(full_name);
        if self.first_name.trim().is_empty() {
            self.first_name = defaults.first_name;
        }
        if self.last_name.trim().is_empty() {
            self.last_name = defaults.last_name;
        }
        self
    }

    /// Check the form without building a profile
    pub fn validate(&self) -> Result<(), IntakeError> {
        self.parse().map(|_| ())
    }

    /// Build the profile to store for `email`
    ///
    /// Doctor name and specialty are copied from the directory. An unknown
    /// doctor id is kept as entered with empty name and specialty.
    pub fn into_profile(
        &self,
        email: &str,
        created_at: DateTime<Utc>,
    ) -> Result<PatientProfile, IntakeError> {
        let (age, gender) = self.parse()?;
        let doctor = find_doctor(self.doctor_id.trim());

        if doctor.is_none() {
            tracing::debug!(doctor_id = %self.doctor_id, "Unknown doctor id on intake form");
        }

        let contact_number = Some(self.contact_number.trim())
            .filter(|c| !c.is_empty())
            .map(str::to_string);

        Ok(PatientProfile {
            email: email.to_string(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            age,
            gender,
            contact_number,
            symptoms: self.symptoms.trim().to_string(),
            doctor_id: self.doctor_id.trim().to_string(),
            doctor_name: doctor.map(|d| d.name.to_string()).unwrap_or_default(),
            doctor_specialty: doctor.map(|d| d.specialty.to_string()).unwrap_or_default(),
            created_at,
        })
    }

    fn missing_required(&self) -> bool {
        [
            &self.first_name,
            &self.last_name,
            &self.age,
            &self.gender,
            &self.symptoms,
            &self.doctor_id,
        ]
        .iter()
        .any(|field| field.trim().is_empty())
    }

    fn parse(&self) -> Result<(u32, Gender), IntakeError> {
        if self.missing_required() {
            return Err(IntakeError::MissingFields);
        }

        let age = self
            .age
            .trim()
            .parse::<u32>()
            .map_err(|_| IntakeError::InvalidAge(self.age.clone()))?;

        let gender = self
            .gender
            .parse::<Gender>()
            .map_err(|_| IntakeError::InvalidGender(self.gender.clone()))?;

        Ok((age, gender))
    }
}

fn null_as_blank<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept the age as either a JSON string or a JSON number
fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Number(n) => Ok(n.to_string()),
        serde_json::Value::Null => Ok(String::new()),
        other => Err(serde::de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn complete_form() -> IntakeForm {
        IntakeForm {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            age: "30".to_string(),
            gender: "Female".to_string(),
            contact_number: String::new(),
            symptoms: "cough".to_string(),
            doctor_id: "d1".to_string(),
        }
    }

    fn created_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 10, 15, 30).unwrap()
    }

    #[test]
    fn test_prefilled_splits_full_name() {
        let form = IntakeForm::prefilled("  Jane   van der  Berg ");
        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.last_name, "van der Berg");

        let form = IntakeForm::prefilled("Cher");
        assert_eq!(form.first_name, "Cher");
        assert_eq!(form.last_name, "");

        let form = IntakeForm::prefilled("");
        assert_eq!(form, IntakeForm::default());
    }

    #[test]
    fn test_default_names_only_fill_blanks() {
        let form = IntakeForm {
            last_name: "Smith".to_string(),
            ..Default::default()
        }
        .with_default_names("Jane Doe");

        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.last_name, "Smith");
    }

    #[test]
    fn test_complete_form_builds_denormalized_profile() {
        let profile = complete_form().into_profile("a@x.com", created_at()).unwrap();

        assert_eq!(profile.email, "a@x.com");
        assert_eq!(profile.age, 30);
        assert_eq!(profile.gender, Gender::Female);
        assert_eq!(profile.contact_number, None);
        assert_eq!(profile.doctor_name, "Dr. Alice Carter");
        assert_eq!(profile.doctor_specialty, "Cardiology");
        assert_eq!(profile.created_at, created_at());
    }

    #[test]
    fn test_each_required_field_is_enforced() {
        let clears: [fn(&mut IntakeForm); 6] = [
            |f: &mut IntakeForm| f.first_name.clear(),
            |f: &mut IntakeForm| f.last_name.clear(),
            |f: &mut IntakeForm| f.age.clear(),
            |f: &mut IntakeForm| f.gender.clear(),
            |f: &mut IntakeForm| f.symptoms = "   ".to_string(),
            |f: &mut IntakeForm| f.doctor_id.clear(),
        ];

        for clear in clears {
            let mut form = complete_form();
            clear(&mut form);
            let err = form.validate().unwrap_err();
            assert!(matches!(err, IntakeError::MissingFields));
            assert_eq!(err.to_string(), "Please fill in all required fields.");
        }
    }

    #[test]
    fn test_contact_number_is_optional() {
        let mut form = complete_form();
        form.contact_number = " +1 555 123 4567 ".to_string();

        let profile = form.into_profile("a@x.com", created_at()).unwrap();
        assert_eq!(profile.contact_number.as_deref(), Some("+1 555 123 4567"));
    }

    #[test]
    fn test_invalid_age() {
        for age in ["-1", "abc", "30.5"] {
            let mut form = complete_form();
            form.age = age.to_string();
            assert!(matches!(form.validate(), Err(IntakeError::InvalidAge(_))));
        }

        let mut form = complete_form();
        form.age = "0".to_string();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_invalid_gender() {
        let mut form = complete_form();
        form.gender = "Unknown".to_string();
        assert!(matches!(
            form.validate(),
            Err(IntakeError::InvalidGender(_))
        ));
    }

    #[test]
    fn test_unknown_doctor_denormalizes_to_empty() {
        let mut form = complete_form();
        form.doctor_id = "d42".to_string();

        let profile = form.into_profile("a@x.com", created_at()).unwrap();
        assert_eq!(profile.doctor_id, "d42");
        assert_eq!(profile.doctor_name, "");
        assert_eq!(profile.doctor_specialty, "");
    }

    #[test]
    fn test_deserialize_age_as_number_or_text() {
        let form: IntakeForm =
            serde_json::from_str(r#"{"firstName": "Jane", "age": 30}"#).unwrap();
        assert_eq!(form.age, "30");
        assert_eq!(form.last_name, "");

        let form: IntakeForm = serde_json::from_str(r#"{"age": "41"}"#).unwrap();
        assert_eq!(form.age, "41");

        assert!(serde_json::from_str::<IntakeForm>(r#"{"age": [1]}"#).is_err());
    }

    #[test]
    fn test_deserialize_null_fields_as_blank() {
        let form: IntakeForm = serde_json::from_str(
            r#"{"firstName": "Jane", "contactNumber": null, "symptoms": null, "age": null}"#,
        )
        .unwrap();

        assert_eq!(form.first_name, "Jane");
        assert_eq!(form.contact_number, "");
        assert_eq!(form.symptoms, "");
        assert!(matches!(form.validate(), Err(IntakeError::MissingFields)));
    }
}
