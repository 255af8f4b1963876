mod inmemory;
mod mongo;

pub use inmemory::InMemoryReminderRepo;
pub use mongo::MongoReminderRepo;
use patient_reminders_domain::ScheduledReminder;

#[async_trait::async_trait]
pub trait IReminderRepo: Send + Sync {
    /// Appends the reminders and returns how many were written.
    /// Reminders are never deduplicated.
    async fn bulk_insert(&self, reminders: &[ScheduledReminder]) -> anyhow::Result<u64>;
    async fn find_by_recipient(&self, recipient: &str) -> anyhow::Result<Vec<ScheduledReminder>>;
    async fn count(&self) -> anyhow::Result<u64>;
}
