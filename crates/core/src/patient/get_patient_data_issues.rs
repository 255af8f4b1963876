use crate::{
    error::PipelineError,
    shared::usecase::{execute, UseCase},
};
use patient_reminders_infra::{PatientQuery, ReminderContext};

/// Member ids of stored patients whose data is incomplete
pub async fn get_patient_data_issues(
    ctx: &ReminderContext,
) -> Result<PatientDataIssues, PipelineError> {
    execute(GetPatientDataIssuesUseCase, ctx)
        .await
        .map_err(|UseCaseError::StorageError| {
            PipelineError::StoreAccess("Unable to query the patients".into())
        })
}

#[derive(Debug)]
pub struct GetPatientDataIssuesUseCase;

#[derive(Debug, Default, PartialEq)]
pub struct PatientDataIssues {
    pub missing_first_name: Vec<String>,
    /// Consented to reminders but never gave an email address
    pub missing_email_address: Vec<String>,
}

impl PatientDataIssues {
    pub fn is_empty(&self) -> bool {
        self.missing_first_name.is_empty() && self.missing_email_address.is_empty()
    }
}

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetPatientDataIssuesUseCase {
    type Response = PatientDataIssues;

    type Error = UseCaseError;

    const NAME: &'static str = "GetPatientDataIssues";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        Ok(PatientDataIssues {
            missing_first_name: member_ids(ctx, PatientQuery::missing_first_name()).await?,
            missing_email_address: member_ids(ctx, PatientQuery::consenting_without_email())
                .await?,
        })
    }
}

async fn member_ids(ctx: &ReminderContext, query: PatientQuery) -> Result<Vec<String>, UseCaseError> {
    let patients = ctx
        .repos
        .patients
        .find_by_query(&query)
        .await
        .map_err(|_| UseCaseError::StorageError)?;
    Ok(patients.into_iter().map(|p| p.member_id).collect())
}
