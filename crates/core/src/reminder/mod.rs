pub mod get_eligible_patients;
pub mod schedule_reminders;
