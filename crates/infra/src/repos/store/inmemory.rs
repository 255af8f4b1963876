use super::IStoreConnection;
use crate::repos::{patient::InMemoryPatientRepo, reminder::InMemoryReminderRepo};
use std::sync::Arc;
use tracing::info;

pub struct InMemoryStoreConnection {
    patients: Arc<InMemoryPatientRepo>,
    reminders: Arc<InMemoryReminderRepo>,
}

impl InMemoryStoreConnection {
    pub fn new(patients: Arc<InMemoryPatientRepo>, reminders: Arc<InMemoryReminderRepo>) -> Self {
        Self {
            patients,
            reminders,
        }
    }
}

#[async_trait::async_trait]
impl IStoreConnection for InMemoryStoreConnection {
    async fn close(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn drop_database(&self) -> anyhow::Result<()> {
        self.patients.clear();
        self.reminders.clear();
        info!("Inmemory store has been cleared");
        Ok(())
    }
}
