use patient_reminders_domain::{InvalidPatientError, Patient, PatientRecord};
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
};
use thiserror::Error;

const SEPARATOR: char = '|';

#[derive(Error, Debug)]
pub enum PatientFileError {
    #[error("Unable to read patient file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Patient file has no header row")]
    MissingHeader,
    #[error("Invalid patient on line {line}: {source}")]
    InvalidPatient {
        line: usize,
        source: InvalidPatientError,
    },
    #[error("Member ID {member_id} on line {line} was already used on line {first_line}")]
    DuplicateMemberId {
        member_id: String,
        line: usize,
        first_line: usize,
    },
}

/// Splits the content of a pipe delimited patient file into records.
///
/// The first non empty line names the columns. Every following non empty
/// line becomes one record, numbered by its 1-based line in the file.
/// Missing trailing values are left out of the record and surplus values
/// are ignored. Values are kept exactly as written, only column names are
/// trimmed.
fn numbered_records(content: &str) -> Result<Vec<(usize, PatientRecord)>, PatientFileError> {
    let mut lines = content
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim_end_matches('\r')))
        .filter(|(_, line)| !line.trim().is_empty());

    let header = match lines.next() {
        Some((_, header)) => header
            .split(SEPARATOR)
            .map(|column| column.trim().to_string())
            .collect::<Vec<_>>(),
        None => return Err(PatientFileError::MissingHeader),
    };

    Ok(lines
        .map(|(line, row)| {
            let record = header
                .iter()
                .cloned()
                .zip(row.split(SEPARATOR).map(String::from))
                .collect::<PatientRecord>();
            (line, record)
        })
        .collect())
}

pub fn parse_patient_records(content: &str) -> Result<Vec<PatientRecord>, PatientFileError> {
    Ok(numbered_records(content)?
        .into_iter()
        .map(|(_, record)| record)
        .collect())
}

/// Parses the content of a patient file into `Patient`s. Every record needs
/// a member id and member ids must be unique within the file.
pub fn parse_patients(content: &str) -> Result<Vec<Patient>, PatientFileError> {
    let mut first_seen: HashMap<String, usize> = HashMap::new();
    let mut patients = Vec::new();

    for (line, record) in numbered_records(content)? {
        let patient = Patient::from_record(record)
            .map_err(|source| PatientFileError::InvalidPatient { line, source })?;
        if let Some(first_line) = first_seen.get(&patient.member_id) {
            return Err(PatientFileError::DuplicateMemberId {
                member_id: patient.member_id,
                line,
                first_line: *first_line,
            });
        }
        first_seen.insert(patient.member_id.clone(), line);
        patients.push(patient);
    }

    Ok(patients)
}

pub async fn read_patient_file(path: &Path) -> Result<Vec<Patient>, PatientFileError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| PatientFileError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    parse_patients(&content)
}
