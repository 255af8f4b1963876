mod patient;
mod reminder;
mod shared;

pub use patient::{
    email_regex, InvalidPatientError, Patient, PatientRecord, CONSENT_COLUMN, CONSENT_GIVEN,
    EMAIL_ADDRESS_COLUMN, EMAIL_PATTERN, FIRST_NAME_COLUMN, MEMBER_ID_COLUMN,
};
pub use reminder::{generate_reminders, ReminderLabel, ScheduledReminder, MILLIS_PER_DAY};
pub use shared::attributes::Attributes;
pub use shared::entity::ID;
