use thiserror::Error;

/// Failures that abort a pipeline run
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Invalid configuration. Error message: `{0}`")]
    Configuration(String),
    #[error("Unable to ingest the patient file. Error message: `{0}`")]
    Ingestion(String),
    #[error("Unable to access the record store. Error message: `{0}`")]
    StoreAccess(String),
}

impl PipelineError {
    /// Process exit code for this failure, a successful run exits with 0
    pub fn exit_code(&self) -> u8 {
        match *self {
            Self::Configuration(_) => 2,
            Self::Ingestion(_) => 3,
            Self::StoreAccess(_) => 4,
        }
    }
}

/// The record store could not be released at the end of a run. Only ever
/// logged, it never changes the outcome of the run.
#[derive(Error, Debug)]
#[error("Unable to release the record store. Error message: `{0}`")]
pub struct ShutdownError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_are_distinct() {
        assert_eq!(PipelineError::Configuration("".into()).exit_code(), 2);
        assert_eq!(PipelineError::Ingestion("".into()).exit_code(), 3);
        assert_eq!(PipelineError::StoreAccess("".into()).exit_code(), 4);
    }
}
