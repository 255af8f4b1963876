mod inmemory;
mod mongo;

pub use inmemory::InMemoryPatientRepo;
pub use mongo::MongoPatientRepo;
use patient_reminders_domain::Patient;

use super::shared::query_structs::PatientQuery;

#[async_trait::async_trait]
pub trait IPatientRepo: Send + Sync {
    /// Returns the number of patients written
    async fn bulk_insert(&self, patients: &[Patient]) -> anyhow::Result<u64>;
    async fn find_by_query(&self, query: &PatientQuery) -> anyhow::Result<Vec<Patient>>;
    async fn find_by_member_ids(&self, member_ids: &[String]) -> anyhow::Result<Vec<Patient>>;
}
