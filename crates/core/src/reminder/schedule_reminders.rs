use crate::{
    error::PipelineError,
    shared::usecase::{execute, UseCase},
};
use patient_reminders_domain::{generate_reminders, Patient, ScheduledReminder};
use patient_reminders_infra::ReminderContext;
use tracing::info;

/// Generates the reminder schedule for the given eligible patients and
/// stores it. Nothing is returned for dispatching unless the reminders
/// were stored, or the run is a dry run.
pub async fn schedule_reminders(
    ctx: &ReminderContext,
    patients: Vec<Patient>,
) -> Result<ScheduledReminders, PipelineError> {
    let usecase = ScheduleRemindersUseCase {
        patients,
        dry_run: ctx.config.dry_run,
    };

    execute(usecase, ctx)
        .await
        .map_err(|UseCaseError::StorageError| {
            PipelineError::StoreAccess("Unable to store the scheduled reminders".into())
        })
}

#[derive(Debug)]
pub struct ScheduleRemindersUseCase {
    pub patients: Vec<Patient>,
    /// Skip storing the reminders
    pub dry_run: bool,
}

#[derive(Debug)]
pub struct ScheduledReminders {
    pub reminders: Vec<ScheduledReminder>,
    /// Number of reminders written to the store, 0 for a dry run
    pub inserted: u64,
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for ScheduleRemindersUseCase {
    type Response = ScheduledReminders;

    type Error = UseCaseError;

    const NAME: &'static str = "ScheduleReminders";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let generated_at = ctx.sys.get_timestamp_millis();
        let reminders = generate_reminders(&self.patients, generated_at);

        let inserted = if self.dry_run {
            info!(
                "Dry run, {} generated reminders are not stored",
                reminders.len()
            );
            0
        } else {
            ctx.repos
                .reminders
                .bulk_insert(&reminders)
                .await
                .map_err(|_| UseCaseError::StorageError)?
        };

        Ok(ScheduledReminders {
            reminders,
            inserted,
        })
    }
}
