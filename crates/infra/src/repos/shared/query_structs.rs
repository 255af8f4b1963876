use patient_reminders_domain::{email_regex, Patient};
use regex::Regex;

/// How a single string field of a stored document should match
#[derive(Debug, Clone)]
pub enum FieldMatch {
    Exact(String),
    Pattern(Regex),
}

impl FieldMatch {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Exact(expected) => value == expected,
            Self::Pattern(regex) => regex.is_match(value),
        }
    }
}

/// Query on the patients collection. Every field that is set must match.
#[derive(Debug, Clone, Default)]
pub struct PatientQuery {
    pub consent: Option<bool>,
    pub email_address: Option<FieldMatch>,
    pub first_name: Option<FieldMatch>,
}

impl PatientQuery {
    /// Patients that consented to email reminders and have a
    /// syntactically valid email address
    pub fn email_consenting() -> Self {
        Self {
            consent: Some(true),
            email_address: Some(FieldMatch::Pattern(email_regex().clone())),
            first_name: None,
        }
    }

    pub fn consenting_without_email() -> Self {
        Self {
            consent: Some(true),
            email_address: Some(FieldMatch::Exact(String::new())),
            first_name: None,
        }
    }

    pub fn missing_first_name() -> Self {
        Self {
            first_name: Some(FieldMatch::Exact(String::new())),
            ..Default::default()
        }
    }

    pub fn matches(&self, patient: &Patient) -> bool {
        if let Some(consent) = self.consent {
            if patient.email_consent() != consent {
                return false;
            }
        }
        if let Some(email_address) = &self.email_address {
            if !email_address.matches(&patient.email_address) {
                return false;
            }
        }
        if let Some(first_name) = &self.first_name {
            if !first_name.matches(&patient.first_name) {
                return false;
            }
        }
        true
    }
}
