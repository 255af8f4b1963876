pub mod mail;
pub mod patient_file;
