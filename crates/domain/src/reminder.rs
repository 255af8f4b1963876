use crate::{patient::Patient, shared::entity::ID};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub const MILLIS_PER_DAY: i64 = 24 * 60 * 60 * 1000;

/// Which step of the four day follow up a `ScheduledReminder` is
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ReminderLabel {
    #[serde(rename = "Day 1")]
    Day1,
    #[serde(rename = "Day 2")]
    Day2,
    #[serde(rename = "Day 3")]
    Day3,
    #[serde(rename = "Day 4")]
    Day4,
}

impl ReminderLabel {
    /// All labels in ascending day order
    pub const ALL: [ReminderLabel; 4] = [Self::Day1, Self::Day2, Self::Day3, Self::Day4];

    pub fn day(&self) -> i64 {
        match self {
            Self::Day1 => 1,
            Self::Day2 => 2,
            Self::Day3 => 3,
            Self::Day4 => 4,
        }
    }

    /// Offset from the generation instant at which this reminder is due
    pub fn offset_millis(&self) -> i64 {
        self.day() * MILLIS_PER_DAY
    }
}

impl Display for ReminderLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Day {}", self.day())
    }
}

/// A `ScheduledReminder` is a single email that should be sent to a
/// patient at `remind_at`. Never changed after it has been generated.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduledReminder {
    pub id: ID,
    pub label: ReminderLabel,
    /// Timestamp in millis at which the reminder should be dispatched
    pub remind_at: i64,
    /// Email address of the patient
    pub recipient: String,
}

/// Creates the four day reminder schedule for every given patient.
///
/// `generated_at` is captured once per pipeline run, so every patient in the
/// same run shares the same anchor. Patient order is kept and within a
/// patient the reminders come in ascending day order. Patients are expected
/// to be eligible already, their email addresses are not validated again.
pub fn generate_reminders(patients: &[Patient], generated_at: i64) -> Vec<ScheduledReminder> {
    patients
        .iter()
        .flat_map(|patient| {
            ReminderLabel::ALL.into_iter().map(move |label| ScheduledReminder {
                id: Default::default(),
                label,
                remind_at: generated_at + label.offset_millis(),
                recipient: patient.email_address.clone(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const GENERATED_AT: i64 = 1613862000000;

    fn patients() -> Vec<Patient> {
        vec![
            Patient::new("1", "Ada", "ada@example.com", true),
            Patient::new("2", "Alan", "alan@example.com", true),
            Patient::new("3", "", "grace@example.com", true),
        ]
    }

    #[test]
    fn generates_four_reminders_per_patient() {
        let reminders = generate_reminders(&patients(), GENERATED_AT);
        assert_eq!(reminders.len(), 12);
        for patient in patients() {
            let count = reminders
                .iter()
                .filter(|r| r.recipient == patient.email_address)
                .count();
            assert_eq!(count, 4);
        }
    }

    #[test]
    fn reminders_are_spaced_one_day_apart() {
        let reminders = generate_reminders(&patients()[..1], GENERATED_AT);
        assert_eq!(reminders[0].remind_at, GENERATED_AT + MILLIS_PER_DAY);
        for pair in reminders.windows(2) {
            assert_eq!(pair[1].remind_at - pair[0].remind_at, MILLIS_PER_DAY);
        }
        assert_eq!(reminders[3].remind_at, GENERATED_AT + 4 * 86_400_000);
    }

    #[test]
    fn keeps_patient_order_and_ascending_labels() {
        let reminders = generate_reminders(&patients(), GENERATED_AT);
        let recipients = reminders
            .chunks(4)
            .map(|chunk| chunk[0].recipient.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            recipients,
            vec!["ada@example.com", "alan@example.com", "grace@example.com"]
        );
        for chunk in reminders.chunks(4) {
            let labels = chunk.iter().map(|r| r.label).collect::<Vec<_>>();
            assert_eq!(labels, ReminderLabel::ALL.to_vec());
            assert!(chunk.iter().all(|r| r.recipient == chunk[0].recipient));
        }
    }

    #[test]
    fn no_patients_gives_no_reminders() {
        assert!(generate_reminders(&[], GENERATED_AT).is_empty());
    }

    #[test]
    fn labels_display_their_day() {
        let names = ReminderLabel::ALL
            .iter()
            .map(|label| label.to_string())
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["Day 1", "Day 2", "Day 3", "Day 4"]);
    }
}
