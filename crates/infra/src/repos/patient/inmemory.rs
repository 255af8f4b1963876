use super::IPatientRepo;
use crate::repos::shared::{inmemory_repo::*, query_structs::PatientQuery};
use patient_reminders_domain::Patient;

pub struct InMemoryPatientRepo {
    patients: std::sync::Mutex<Vec<Patient>>,
}

impl InMemoryPatientRepo {
    pub fn new() -> Self {
        Self {
            patients: std::sync::Mutex::new(Vec::new()),
        }
    }

    pub fn clear(&self) {
        clear(&self.patients);
    }
}

impl Default for InMemoryPatientRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IPatientRepo for InMemoryPatientRepo {
    async fn bulk_insert(&self, patients: &[Patient]) -> anyhow::Result<u64> {
        Ok(insert_many(patients, &self.patients))
    }

    async fn find_by_query(&self, query: &PatientQuery) -> anyhow::Result<Vec<Patient>> {
        Ok(find_by(&self.patients, |p| query.matches(p)))
    }

    async fn find_by_member_ids(&self, member_ids: &[String]) -> anyhow::Result<Vec<Patient>> {
        Ok(find_by(&self.patients, |p| member_ids.contains(&p.member_id)))
    }
}
