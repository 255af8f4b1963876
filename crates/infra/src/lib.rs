mod config;
mod repos;
mod services;
mod system;

pub use config::{Config, MailConfig, MongoConfig};
pub use repos::{
    FieldMatch, IPatientRepo, IReminderRepo, IStoreConnection, InMemoryPatientRepo,
    InMemoryReminderRepo, InMemoryStoreConnection, MongoPatientRepo, MongoReminderRepo,
    MongoStoreConnection, PatientQuery, Repos,
};
pub use services::mail::{HttpMailSender, IMailSender, InMemoryMailSender, SentMail};
pub use services::patient_file::{
    parse_patient_records, parse_patients, read_patient_file, PatientFileError,
};
use std::sync::Arc;
pub use system::{ISys, RealSys, StaticTimeSys};
use tracing::info;

#[derive(Clone)]
pub struct ReminderContext {
    pub repos: Repos,
    pub config: Config,
    pub sys: Arc<dyn ISys>,
    pub mail: Arc<dyn IMailSender>,
}

impl ReminderContext {
    /// Context backed by the inmemory store that only logs the mails it sends
    pub fn create_inmemory() -> Self {
        Self {
            repos: Repos::create_inmemory(),
            config: Config::default(),
            sys: Arc::new(RealSys {}),
            mail: Arc::new(InMemoryMailSender::new()),
        }
    }

    async fn create(config: Config, force_inmemory: bool) -> anyhow::Result<Self> {
        let repos = match &config.mongodb {
            Some(mongodb) if !force_inmemory => Repos::create_mongodb(mongodb, &config).await?,
            _ => {
                info!("Using the inmemory store");
                Repos::create_inmemory()
            }
        };

        let mail: Arc<dyn IMailSender> = match &config.mail.api_url {
            Some(api_url) => Arc::new(HttpMailSender::new(
                api_url.clone(),
                config.mail.api_token.clone(),
                config.mail.sender.clone(),
            )),
            None => {
                info!("No mail api configured, mails will only be logged");
                Arc::new(InMemoryMailSender::new())
            }
        };

        Ok(Self {
            repos,
            config,
            sys: Arc::new(RealSys {}),
            mail,
        })
    }
}

/// Will setup the infrastructure context given the environment
pub async fn setup_context(force_inmemory: bool) -> anyhow::Result<ReminderContext> {
    ReminderContext::create(Config::new(), force_inmemory).await
}
