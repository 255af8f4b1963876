use patient_reminders_core::Application;
use patient_reminders_infra::{IMailSender, ReminderContext, StaticTimeSys};
use std::{
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tokio::time::Instant;

pub const NOW: i64 = 1613862000000;

pub const HEADER: &str = "Member ID|First Name|Last Name|Email Address|CONSENT";

#[derive(Debug, Clone)]
pub struct MailCall {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub at: Instant,
}

/// Remembers every send attempt. The first attempt for `fail_once_for`
/// fails, every other attempt succeeds.
#[derive(Default)]
pub struct RecordingMailSender {
    calls: Mutex<Vec<MailCall>>,
    fail_once_for: Option<String>,
}

impl RecordingMailSender {
    pub fn failing_once_for(recipient: &str) -> Self {
        Self {
            fail_once_for: Some(recipient.into()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<MailCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, recipient: &str) -> Vec<MailCall> {
        self.calls()
            .into_iter()
            .filter(|c| c.recipient == recipient)
            .collect()
    }
}

#[async_trait::async_trait]
impl IMailSender for RecordingMailSender {
    async fn send(&self, recipient: &str, subject: &str, body: &str) -> anyhow::Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let first_attempt = !calls.iter().any(|c| c.recipient == recipient);
        calls.push(MailCall {
            recipient: recipient.into(),
            subject: subject.into(),
            body: body.into(),
            at: Instant::now(),
        });
        if first_attempt && self.fail_once_for.as_deref() == Some(recipient) {
            return Err(anyhow::anyhow!("Mailbox of {} is unavailable", recipient));
        }
        Ok(())
    }
}

pub struct TestApp {
    pub app: Application,
    pub mail: Arc<RecordingMailSender>,
}

impl TestApp {
    pub fn ctx(&self) -> &ReminderContext {
        self.app.context()
    }
}

/// Writes the rows below `HEADER` into a patient file unique to `name`
pub fn write_patient_file(name: &str, rows: &[&str]) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "patient_reminders_it_{}_{}.csv",
        name,
        std::process::id()
    ));
    let mut content = String::from(HEADER);
    for row in rows {
        content.push('\n');
        content.push_str(row);
    }
    std::fs::write(&path, content).expect("Expected to write the patient file");
    path
}

/// Application on the inmemory store with a frozen clock that reads
/// patients from `patients_file`
pub fn spawn_app(patients_file: PathBuf, mail: RecordingMailSender) -> TestApp {
    let mail = Arc::new(mail);
    let mut ctx = ReminderContext::create_inmemory();
    ctx.config.patients_file_path = patients_file;
    ctx.sys = Arc::new(StaticTimeSys(NOW));
    ctx.mail = mail.clone();

    TestApp {
        app: Application::new(ctx),
        mail,
    }
}
