use super::IReminderRepo;
use crate::repos::shared::inmemory_repo::*;
use patient_reminders_domain::ScheduledReminder;

pub struct InMemoryReminderRepo {
    reminders: std::sync::Mutex<Vec<ScheduledReminder>>,
}

impl InMemoryReminderRepo {
    pub fn new() -> Self {
        Self {
            reminders: std::sync::Mutex::new(vec![]),
        }
    }

    pub fn clear(&self) {
        clear(&self.reminders);
    }
}

impl Default for InMemoryReminderRepo {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl IReminderRepo for InMemoryReminderRepo {
    async fn bulk_insert(&self, reminders: &[ScheduledReminder]) -> anyhow::Result<u64> {
        Ok(insert_many(reminders, &self.reminders))
    }

    async fn find_by_recipient(&self, recipient: &str) -> anyhow::Result<Vec<ScheduledReminder>> {
        Ok(find_by(&self.reminders, |reminder| reminder.recipient == recipient))
    }

    async fn count(&self) -> anyhow::Result<u64> {
        Ok(count(&self.reminders))
    }
}
