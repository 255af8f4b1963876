use crate::{
    error::PipelineError,
    shared::usecase::{execute, UseCase},
};
use patient_reminders_domain::Patient;
use patient_reminders_infra::{PatientQuery, ReminderContext};

/// Stored patients that should get email reminders. Patients without
/// consent or without a valid email address are left out silently.
pub async fn get_eligible_patients(ctx: &ReminderContext) -> Result<Vec<Patient>, PipelineError> {
    execute(GetEligiblePatientsUseCase, ctx)
        .await
        .map_err(|UseCaseError::StorageError| {
            PipelineError::StoreAccess("Unable to query the eligible patients".into())
        })
}

#[derive(Debug)]
pub struct GetEligiblePatientsUseCase;

#[derive(Debug)]
pub enum UseCaseError {
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for GetEligiblePatientsUseCase {
    type Response = Vec<Patient>;

    type Error = UseCaseError;

    const NAME: &'static str = "GetEligiblePatients";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let patients = ctx
            .repos
            .patients
            .find_by_query(&PatientQuery::email_consenting())
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        // The store runs the email pattern with its own regex engine
        Ok(patients.into_iter().filter(|p| p.is_eligible()).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_reminders_infra::{IPatientRepo, PatientQuery};
    use std::sync::Arc;

    struct BrokenPatientRepo;

    #[async_trait::async_trait]
    impl IPatientRepo for BrokenPatientRepo {
        async fn bulk_insert(&self, _patients: &[Patient]) -> anyhow::Result<u64> {
            Err(anyhow::anyhow!("store is down"))
        }

        async fn find_by_query(&self, _query: &PatientQuery) -> anyhow::Result<Vec<Patient>> {
            Err(anyhow::anyhow!("store is down"))
        }

        async fn find_by_member_ids(&self, _member_ids: &[String]) -> anyhow::Result<Vec<Patient>> {
            Err(anyhow::anyhow!("store is down"))
        }
    }

    #[tokio::test]
    async fn keeps_consenting_patients_with_valid_email() {
        let ctx = ReminderContext::create_inmemory();
        ctx.repos
            .patients
            .bulk_insert(&[
                Patient::new("1", "Ada", "ada@example.com", true),
                Patient::new("2", "Alan", "alan@example.com", false),
                Patient::new("3", "Grace", "", true),
                Patient::new("4", "Linus", "bad@@x", true),
                Patient::new("5", "Barbara", "barbara@example.com", true),
            ])
            .await
            .unwrap();

        let eligible = GetEligiblePatientsUseCase.execute(&ctx).await.unwrap();
        let member_ids = eligible
            .iter()
            .map(|p| p.member_id.as_str())
            .collect::<Vec<_>>();
        assert_eq!(member_ids, vec!["1", "5"]);
    }

    #[tokio::test]
    async fn surfaces_storage_errors() {
        let mut ctx = ReminderContext::create_inmemory();
        ctx.repos.patients = Arc::new(BrokenPatientRepo);

        let res = get_eligible_patients(&ctx).await;
        assert!(matches!(res, Err(PipelineError::StoreAccess(_))));
    }
}
