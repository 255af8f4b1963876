use std::collections::BTreeMap;

/// Columns of a patient record that the reminder pipeline does not
/// interpret but keeps so that the stored document mirrors the input row.
pub type Attributes = BTreeMap<String, String>;
