mod dispatch;
mod error;
mod patient;
mod reminder;
mod shared;

pub use dispatch::{
    DispatchOutcome, DispatchReceipt, DispatchScheduler, DispatchStatus, DispatchSummary,
};
pub use error::{PipelineError, ShutdownError};
pub use patient::get_patient_data_issues::PatientDataIssues;
pub use patient::load_patients::LoadedPatients;
use patient::{get_patient_data_issues::get_patient_data_issues, load_patients::load_patients};
use patient_reminders_infra::ReminderContext;
use reminder::{
    get_eligible_patients::get_eligible_patients, schedule_reminders::schedule_reminders,
};
pub use shared::store::run_with_store;
use tracing::{info, warn};

/// What a single pipeline run did
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub patients_loaded: u64,
    pub eligible_patients: usize,
    pub reminders_inserted: u64,
    pub dispatch: DispatchSummary,
}

pub struct Application {
    context: ReminderContext,
}

impl Application {
    pub fn new(context: ReminderContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &ReminderContext {
        &self.context
    }

    /// Loads the patient file, schedules and stores the reminders of every
    /// eligible patient and then waits until each reminder has been
    /// dispatched. The store is released before waiting on the dispatches.
    pub async fn run(&self) -> Result<RunReport, PipelineError> {
        let ctx = &self.context;

        let (patients_loaded, eligible_patients, reminders_inserted, receipt) =
            run_with_store(ctx, async {
                let loaded = load_patients(ctx).await?;
                info!(
                    "Loaded {} of {} patients from {}",
                    loaded.inserted,
                    loaded.parsed,
                    ctx.config.patients_file_path.display()
                );

                let issues = get_patient_data_issues(ctx).await?;
                if !issues.missing_first_name.is_empty() {
                    warn!(
                        "Patients without a first name: {:?}",
                        issues.missing_first_name
                    );
                }
                if !issues.missing_email_address.is_empty() {
                    warn!(
                        "Patients that consented but have no email address: {:?}",
                        issues.missing_email_address
                    );
                }

                let patients = get_eligible_patients(ctx).await?;
                let eligible_patients = patients.len();
                let scheduled = schedule_reminders(ctx, patients).await?;
                info!(
                    "Inserted {} reminders for {} eligible patients",
                    scheduled.inserted, eligible_patients
                );

                let mut scheduler = DispatchScheduler::start(ctx);
                let receipt = scheduler.arm(scheduled.reminders);
                scheduler.close();

                Ok::<_, PipelineError>((
                    loaded.inserted,
                    eligible_patients,
                    scheduled.inserted,
                    receipt,
                ))
            })
            .await?;

        info!("Waiting for {} reminders to be dispatched", receipt.armed());
        let dispatch = receipt.wait().await;
        info!(
            "Dispatched reminders, {} sent and {} failed",
            dispatch.sent, dispatch.failed
        );

        Ok(RunReport {
            patients_loaded,
            eligible_patients,
            reminders_inserted,
            dispatch,
        })
    }

    /// Drops every collection of the record store
    pub async fn reset(&self) -> Result<(), PipelineError> {
        let ctx = &self.context;
        run_with_store(ctx, async {
            ctx.repos
                .store
                .drop_database()
                .await
                .map_err(|e| PipelineError::StoreAccess(e.to_string()))?;
            info!("The record store has been reset");
            Ok::<_, PipelineError>(())
        })
        .await
    }
}
