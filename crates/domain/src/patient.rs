use crate::shared::{attributes::Attributes, entity::ID};
use regex::Regex;
use std::{collections::BTreeMap, sync::OnceLock};
use thiserror::Error;

pub const MEMBER_ID_COLUMN: &str = "Member ID";
pub const FIRST_NAME_COLUMN: &str = "First Name";
pub const EMAIL_ADDRESS_COLUMN: &str = "Email Address";
pub const CONSENT_COLUMN: &str = "CONSENT";

/// The only consent flag value that counts as consent. Matched exactly,
/// so `y`, `yes` or `Y ` are all treated as no consent.
pub const CONSENT_GIVEN: &str = "Y";
const CONSENT_NOT_GIVEN: &str = "N";

/// Syntax an email address must have for the patient to be reminded.
/// Kept as a plain pattern string so that the document store can evaluate
/// the same expression server side.
pub const EMAIL_PATTERN: &str =
    r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*$";

/// One row of the patient flat file, column name -> raw value
pub type PatientRecord = BTreeMap<String, String>;

pub fn email_regex() -> &'static Regex {
    static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
    EMAIL_REGEX.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("EMAIL_PATTERN to be a valid regex"))
}

pub fn is_valid_email(email_address: &str) -> bool {
    email_regex().is_match(email_address)
}

pub fn consent_from_flag(flag: &str) -> bool {
    flag == CONSENT_GIVEN
}

pub fn consent_to_flag(consent: bool) -> &'static str {
    if consent {
        CONSENT_GIVEN
    } else {
        CONSENT_NOT_GIVEN
    }
}

/// A `Patient` as loaded from the patient flat file. The reminder
/// pipeline only ever reads patients, it never changes them.
#[derive(Debug, Clone, PartialEq)]
pub struct Patient {
    pub id: ID,
    /// Unique across the whole patient collection
    pub member_id: String,
    /// May be empty
    pub first_name: String,
    /// May be empty or malformed, in which case the patient is never reminded
    pub email_address: String,
    /// Raw value of the consent column, kept as it was in the file
    pub consent_flag: String,
    pub attributes: Attributes,
}

#[derive(Error, Debug, PartialEq)]
pub enum InvalidPatientError {
    #[error("Patient record is missing a value for the `{0}` column")]
    MissingColumn(&'static str),
}

impl Patient {
    pub fn new(member_id: &str, first_name: &str, email_address: &str, email_consent: bool) -> Self {
        Self {
            id: Default::default(),
            member_id: member_id.into(),
            first_name: first_name.into(),
            email_address: email_address.into(),
            consent_flag: consent_to_flag(email_consent).into(),
            attributes: Default::default(),
        }
    }

    pub fn from_record(mut record: PatientRecord) -> Result<Self, InvalidPatientError> {
        let member_id = match record.remove(MEMBER_ID_COLUMN) {
            Some(member_id) if !member_id.trim().is_empty() => member_id.trim().to_string(),
            _ => return Err(InvalidPatientError::MissingColumn(MEMBER_ID_COLUMN)),
        };
        let first_name = record.remove(FIRST_NAME_COLUMN).unwrap_or_default();
        let email_address = record.remove(EMAIL_ADDRESS_COLUMN).unwrap_or_default();
        let consent_flag = record.remove(CONSENT_COLUMN).unwrap_or_default();

        Ok(Self {
            id: Default::default(),
            member_id,
            first_name,
            email_address,
            consent_flag,
            attributes: record,
        })
    }

    pub fn email_consent(&self) -> bool {
        consent_from_flag(&self.consent_flag)
    }

    pub fn has_valid_email(&self) -> bool {
        is_valid_email(&self.email_address)
    }

    /// Whether this patient should get email reminders
    pub fn is_eligible(&self) -> bool {
        self.email_consent() && self.has_valid_email()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(columns: &[(&str, &str)]) -> PatientRecord {
        columns
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn accepts_valid_email_addresses() {
        let valid = [
            "john@example.com",
            "john.doe+meds@mail.example.co.uk",
            "o'brien@hospital",
            "a_b-c@x-y.z",
        ];
        for email in &valid {
            assert!(is_valid_email(email), "{} should be valid", email);
        }
    }

    #[test]
    fn rejects_invalid_email_addresses() {
        let invalid = [
            "",
            "bad@@x",
            "no-at-sign",
            "@example.com",
            "john@",
            "john@example..com",
            "john@exa_mple.com",
            "john doe@example.com",
            "john@example.com ",
        ];
        for email in &invalid {
            assert!(!is_valid_email(email), "{} should be invalid", email);
        }
    }

    #[test]
    fn consent_is_an_exact_match() {
        assert!(consent_from_flag("Y"));
        for flag in &["y", "N", "", "Yes", " Y", "Y "] {
            assert!(!consent_from_flag(flag));
        }
    }

    #[test]
    fn builds_patient_from_record() {
        let patient = Patient::from_record(record(&[
            ("Member ID", "1001"),
            ("First Name", "Ada"),
            ("Email Address", "ada@example.com"),
            ("CONSENT", "Y"),
            ("Last Name", "Lovelace"),
        ]))
        .unwrap();

        assert_eq!(patient.member_id, "1001");
        assert_eq!(patient.first_name, "Ada");
        assert_eq!(patient.email_address, "ada@example.com");
        assert!(patient.email_consent());
        assert_eq!(patient.attributes.get("Last Name").unwrap(), "Lovelace");
        assert!(!patient.attributes.contains_key("CONSENT"));
        assert!(patient.is_eligible());
    }

    #[test]
    fn missing_columns_default_to_empty() {
        let patient = Patient::from_record(record(&[("Member ID", "1002")])).unwrap();
        assert_eq!(patient.first_name, "");
        assert_eq!(patient.email_address, "");
        assert!(!patient.email_consent());
        assert_eq!(patient.consent_flag, "");
        assert!(!patient.is_eligible());
    }

    #[test]
    fn rejects_record_without_member_id() {
        let res = Patient::from_record(record(&[("Member ID", " "), ("CONSENT", "Y")]));
        assert_eq!(
            res.unwrap_err(),
            InvalidPatientError::MissingColumn(MEMBER_ID_COLUMN)
        );
        assert!(Patient::from_record(record(&[("First Name", "Ada")])).is_err());
    }

    #[test]
    fn keeps_raw_consent_flag() {
        let patient = Patient::from_record(record(&[
            ("Member ID", "1003"),
            ("Email Address", "ada@example.com"),
            ("CONSENT", "Y "),
        ]))
        .unwrap();
        assert_eq!(patient.consent_flag, "Y ");
        assert!(!patient.email_consent());
        assert!(!patient.is_eligible());
    }

    #[test]
    fn eligibility_needs_both_consent_and_valid_email() {
        assert!(Patient::new("1", "A", "a@example.com", true).is_eligible());
        assert!(!Patient::new("2", "B", "b@example.com", false).is_eligible());
        assert!(!Patient::new("3", "C", "", true).is_eligible());
        assert!(!Patient::new("4", "D", "bad@@x", true).is_eligible());
    }
}
