pub mod get_patient_data_issues;
pub mod load_patients;
