use std::path::PathBuf;
use tracing::{info, warn};
use url::Url;

const DEFAULT_PATIENTS_FILE_PATH: &str = "public/patients.csv";
const DEFAULT_PATIENTS_COLLECTION: &str = "Patients";
const DEFAULT_REMINDERS_COLLECTION: &str = "Emails";
const DEFAULT_MAIL_SENDER: &str = "humancare@humancaresystems.com";
const DEFAULT_MAIL_SUBJECT: &str = "Follow up from Human Care Systems";
const DEFAULT_MAIL_BODY: &str = "Remember to take your medicine";

#[derive(Debug, Clone)]
pub struct Config {
    /// Pipe delimited flat file with one patient per row
    pub patients_file_path: PathBuf,
    /// When this is `None` the inmemory store is used
    pub mongodb: Option<MongoConfig>,
    pub patients_collection: String,
    pub reminders_collection: String,
    pub mail: MailConfig,
    /// Skip persisting the generated reminders. They are still dispatched.
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct MongoConfig {
    pub connection_string: String,
    pub db_name: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    /// Endpoint of the mail api. When this is `None` mails are only logged.
    pub api_url: Option<Url>,
    pub api_token: Option<String>,
    pub sender: String,
    pub subject: String,
    pub body: String,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the `Config` from any key value source, `Config::new` uses
    /// the environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let patients_file_path = lookup("PATIENTS_FILE_PATH")
            .unwrap_or_else(|| {
                info!(
                    "Did not find PATIENTS_FILE_PATH environment variable. Falling back to: {}",
                    DEFAULT_PATIENTS_FILE_PATH
                );
                DEFAULT_PATIENTS_FILE_PATH.into()
            })
            .into();

        let mongodb = match (
            lookup("MONGODB_CONNECTION_STRING"),
            lookup("MONGODB_NAME"),
        ) {
            (Some(connection_string), Some(db_name)) => Some(MongoConfig {
                connection_string,
                db_name,
            }),
            _ => {
                info!("MONGODB_CONNECTION_STRING and MONGODB_NAME env vars was not provided. Going to use inmemory store.");
                None
            }
        };

        let api_url = match lookup("MAIL_API_URL") {
            Some(raw) => match Url::parse(&raw) {
                Ok(url) if url.scheme() == "https" || url.scheme() == "http" => Some(url),
                _ => {
                    warn!(
                        "The given MAIL_API_URL: {} is not a valid http(s) url, mails will only be logged.",
                        raw
                    );
                    None
                }
            },
            None => None,
        };

        let dry_run = match lookup("DRY_RUN") {
            Some(raw) => match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" | "" => false,
                _ => {
                    warn!(
                        "The given DRY_RUN: {} is not valid, falling back to: false.",
                        raw
                    );
                    false
                }
            },
            None => false,
        };

        Self {
            patients_file_path,
            mongodb,
            patients_collection: lookup("PATIENTS_COLLECTION")
                .unwrap_or_else(|| DEFAULT_PATIENTS_COLLECTION.into()),
            reminders_collection: lookup("REMINDERS_COLLECTION")
                .unwrap_or_else(|| DEFAULT_REMINDERS_COLLECTION.into()),
            mail: MailConfig {
                api_url,
                api_token: lookup("MAIL_API_TOKEN"),
                sender: lookup("MAIL_SENDER").unwrap_or_else(|| DEFAULT_MAIL_SENDER.into()),
                subject: lookup("MAIL_SUBJECT").unwrap_or_else(|| DEFAULT_MAIL_SUBJECT.into()),
                body: lookup("MAIL_BODY").unwrap_or_else(|| DEFAULT_MAIL_BODY.into()),
            },
            dry_run,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}
