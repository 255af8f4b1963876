mod telemetry;

use patient_reminders_core::{Application, PipelineError};
use patient_reminders_infra::setup_context;
use std::{process::ExitCode, str::FromStr};
use telemetry::{get_subscriber, init_subscriber};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    /// Ingest the patient file, schedule and dispatch the reminders
    Run,
    /// Drop the database
    Reset,
    /// Same as `Run` on the inmemory store
    InMemory,
}

impl FromStr for Command {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "run" => Ok(Self::Run),
            "reset" => Ok(Self::Reset),
            "inmemory" => Ok(Self::InMemory),
            _ => Err(PipelineError::Configuration(format!(
                "Unknown command: {}, expected one of: run, reset, inmemory",
                s
            ))),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    openssl_probe::init_ssl_cert_env_vars();

    let subscriber = get_subscriber("patient_reminders".into(), "info".into());
    if let Err(e) = init_subscriber(subscriber) {
        eprintln!("Unable to setup logging: {}", e);
    }

    match run(std::env::args().nth(1)).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::from(e.exit_code())
        }
    }
}

async fn run(arg: Option<String>) -> Result<(), PipelineError> {
    let command = match arg {
        Some(arg) => arg.parse()?,
        None => Command::Run,
    };

    let context = setup_context(command == Command::InMemory)
        .await
        .map_err(|e| PipelineError::StoreAccess(e.to_string()))?;
    let app = Application::new(context);

    match command {
        Command::Reset => app.reset().await,
        Command::Run | Command::InMemory => {
            let report = app.run().await?;
            info!(
                "Inserted {} reminders, {} sent and {} failed",
                report.reminders_inserted, report.dispatch.sent, report.dispatch.failed
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_commands() {
        assert_eq!("run".parse::<Command>().unwrap(), Command::Run);
        assert_eq!("reset".parse::<Command>().unwrap(), Command::Reset);
        assert_eq!("inmemory".parse::<Command>().unwrap(), Command::InMemory);
        let err = "migrate".parse::<Command>().unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }
}
