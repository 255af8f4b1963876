use crate::{
    error::PipelineError,
    shared::usecase::{execute, UseCase},
};
use patient_reminders_infra::{read_patient_file, PatientFileError, ReminderContext};
use std::{collections::HashSet, path::PathBuf};
use tracing::info;

fn error_handler(e: UseCaseError) -> PipelineError {
    match e {
        UseCaseError::InvalidFile(e) => PipelineError::Ingestion(e.to_string()),
        UseCaseError::StorageError => {
            PipelineError::StoreAccess("Unable to store the patients".into())
        }
    }
}

/// Reads the configured patient file into the Patients collection
pub async fn load_patients(ctx: &ReminderContext) -> Result<LoadedPatients, PipelineError> {
    let usecase = LoadPatientsUseCase {
        path: ctx.config.patients_file_path.clone(),
    };

    execute(usecase, ctx).await.map_err(error_handler)
}

#[derive(Debug)]
pub struct LoadPatientsUseCase {
    pub path: PathBuf,
}

#[derive(Debug, PartialEq)]
pub struct LoadedPatients {
    /// Patients found in the file
    pub parsed: usize,
    pub inserted: u64,
    /// Member ids that were already in the store from an earlier run
    pub skipped_member_ids: Vec<String>,
}

#[derive(Debug)]
pub enum UseCaseError {
    InvalidFile(PatientFileError),
    StorageError,
}

#[async_trait::async_trait(?Send)]
impl UseCase for LoadPatientsUseCase {
    type Response = LoadedPatients;

    type Error = UseCaseError;

    const NAME: &'static str = "LoadPatients";

    async fn execute(&mut self, ctx: &ReminderContext) -> Result<Self::Response, Self::Error> {
        let patients = read_patient_file(&self.path)
            .await
            .map_err(UseCaseError::InvalidFile)?;
        let parsed = patients.len();

        let member_ids = patients
            .iter()
            .map(|p| p.member_id.clone())
            .collect::<Vec<_>>();
        let existing = ctx
            .repos
            .patients
            .find_by_member_ids(&member_ids)
            .await
            .map_err(|_| UseCaseError::StorageError)?
            .into_iter()
            .map(|p| p.member_id)
            .collect::<HashSet<_>>();

        let (skipped, new_patients): (Vec<_>, Vec<_>) = patients
            .into_iter()
            .partition(|p| existing.contains(&p.member_id));
        let skipped_member_ids = skipped.into_iter().map(|p| p.member_id).collect::<Vec<_>>();
        if !skipped_member_ids.is_empty() {
            info!(
                "{} patients were already stored and are skipped",
                skipped_member_ids.len()
            );
        }

        let inserted = ctx
            .repos
            .patients
            .bulk_insert(&new_patients)
            .await
            .map_err(|_| UseCaseError::StorageError)?;

        Ok(LoadedPatients {
            parsed,
            inserted,
            skipped_member_ids,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use patient_reminders_domain::Patient;
    use patient_reminders_infra::PatientQuery;

    fn write_file(name: &str, content: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "patient_reminders_{}_{}.csv",
            name,
            std::process::id()
        ));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[tokio::test]
    async fn loads_patients_from_file() {
        let ctx = ReminderContext::create_inmemory();
        let path = write_file(
            "loads",
            "Member ID|First Name|Email Address|CONSENT\n1|Ada|ada@example.com|Y\n2|Alan||N\n",
        );
        let mut usecase = LoadPatientsUseCase { path };

        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res.parsed, 2);
        assert_eq!(res.inserted, 2);
        assert!(res.skipped_member_ids.is_empty());

        let stored = ctx
            .repos
            .patients
            .find_by_query(&PatientQuery::default())
            .await
            .unwrap();
        assert_eq!(stored.len(), 2);
    }

    #[tokio::test]
    async fn skips_already_stored_patients() {
        let ctx = ReminderContext::create_inmemory();
        ctx.repos
            .patients
            .bulk_insert(&[Patient::new("1", "Ada", "ada@example.com", true)])
            .await
            .unwrap();
        let path = write_file(
            "skips",
            "Member ID|First Name|Email Address|CONSENT\n1|Ada|ada@example.com|Y\n2|Alan||N\n",
        );
        let mut usecase = LoadPatientsUseCase { path };

        let res = usecase.execute(&ctx).await.unwrap();
        assert_eq!(res.inserted, 1);
        assert_eq!(res.skipped_member_ids, vec!["1".to_string()]);
    }

    #[tokio::test]
    async fn rejects_missing_file() {
        let ctx = ReminderContext::create_inmemory();
        let mut usecase = LoadPatientsUseCase {
            path: "does/not/exist.csv".into(),
        };

        let res = usecase.execute(&ctx).await;
        assert!(matches!(res, Err(UseCaseError::InvalidFile(_))));
        assert!(matches!(
            error_handler(res.unwrap_err()),
            PipelineError::Ingestion(_)
        ));
    }
}
