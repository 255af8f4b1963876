mod patient;
mod reminder;
mod shared;
mod store;

pub use patient::{IPatientRepo, InMemoryPatientRepo, MongoPatientRepo};
pub use reminder::{IReminderRepo, InMemoryReminderRepo, MongoReminderRepo};
pub use shared::query_structs::{FieldMatch, PatientQuery};
pub use store::{IStoreConnection, InMemoryStoreConnection, MongoStoreConnection};

use crate::config::{Config, MongoConfig};
use mongodb::{bson::doc, options::ClientOptions, Client};
use std::sync::Arc;
use tracing::info;

#[derive(Clone)]
pub struct Repos {
    pub patients: Arc<dyn IPatientRepo>,
    pub reminders: Arc<dyn IReminderRepo>,
    pub store: Arc<dyn IStoreConnection>,
}

impl Repos {
    pub async fn create_mongodb(mongodb: &MongoConfig, config: &Config) -> anyhow::Result<Self> {
        let client_options = ClientOptions::parse(&mongodb.connection_string).await?;
        let client = Client::with_options(client_options)?;
        let db = client.database(&mongodb.db_name);

        // This is needed to make sure that db is ready before the pipeline runs
        info!("DB CHECKING CONNECTION ...");
        db.run_command(doc! { "ping": 1 }, None).await?;
        info!("DB CHECKING CONNECTION ... [done]");

        Ok(Self {
            patients: Arc::new(MongoPatientRepo::new(&db, &config.patients_collection)),
            reminders: Arc::new(MongoReminderRepo::new(&db, &config.reminders_collection)),
            store: Arc::new(MongoStoreConnection::new(client, db)),
        })
    }

    pub fn create_inmemory() -> Self {
        let patients = Arc::new(InMemoryPatientRepo::new());
        let reminders = Arc::new(InMemoryReminderRepo::new());
        Self {
            store: Arc::new(InMemoryStoreConnection::new(
                patients.clone(),
                reminders.clone(),
            )),
            patients,
            reminders,
        }
    }
}
