use crate::error::{PipelineError, ShutdownError};
use patient_reminders_infra::ReminderContext;
use std::future::Future;
use tracing::{error, info};

/// Runs `f` and then releases the record store, whatever `f` returned.
/// A failing release is logged as a `ShutdownError` and the result of `f`
/// is returned untouched.
pub async fn run_with_store<F, T>(ctx: &ReminderContext, f: F) -> Result<T, PipelineError>
where
    F: Future<Output = Result<T, PipelineError>>,
{
    let res = f.await;

    match ctx.repos.store.close().await {
        Ok(()) => info!("Released the record store"),
        Err(e) => error!("{}", ShutdownError(e.to_string())),
    }

    res
}
