use super::IPatientRepo;
use crate::repos::shared::mongo_repo;
use crate::repos::shared::query_structs::{FieldMatch, PatientQuery};
use mongo_repo::MongoDocument;
use mongodb::{
    bson::{doc, oid::ObjectId, Bson, Document},
    Collection, Database,
};
use patient_reminders_domain::{
    Attributes, Patient, CONSENT_COLUMN, CONSENT_GIVEN, EMAIL_ADDRESS_COLUMN, FIRST_NAME_COLUMN,
    MEMBER_ID_COLUMN, ID,
};
use serde::{Deserialize, Serialize};

pub struct MongoPatientRepo {
    collection: Collection<Document>,
}

impl MongoPatientRepo {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

fn field_match_to_bson(field_match: &FieldMatch) -> Bson {
    match field_match {
        FieldMatch::Exact(value) => Bson::String(value.clone()),
        FieldMatch::Pattern(regex) => Bson::Document(doc! { "$regex": regex.as_str() }),
    }
}

fn query_to_filter(query: &PatientQuery) -> Document {
    let mut filter = Document::new();
    match query.consent {
        Some(true) => {
            filter.insert(CONSENT_COLUMN, CONSENT_GIVEN);
        }
        Some(false) => {
            filter.insert(CONSENT_COLUMN, doc! { "$ne": CONSENT_GIVEN });
        }
        None => {}
    }
    if let Some(email_address) = &query.email_address {
        filter.insert(EMAIL_ADDRESS_COLUMN, field_match_to_bson(email_address));
    }
    if let Some(first_name) = &query.first_name {
        filter.insert(FIRST_NAME_COLUMN, field_match_to_bson(first_name));
    }
    filter
}

#[async_trait::async_trait]
impl IPatientRepo for MongoPatientRepo {
    async fn bulk_insert(&self, patients: &[Patient]) -> anyhow::Result<u64> {
        mongo_repo::bulk_insert::<_, PatientMongo>(&self.collection, patients).await
    }

    async fn find_by_query(&self, query: &PatientQuery) -> anyhow::Result<Vec<Patient>> {
        mongo_repo::find_many_by::<_, PatientMongo>(&self.collection, query_to_filter(query)).await
    }

    async fn find_by_member_ids(&self, member_ids: &[String]) -> anyhow::Result<Vec<Patient>> {
        let filter = doc! {
            MEMBER_ID_COLUMN: {
                "$in": member_ids.to_vec()
            }
        };
        mongo_repo::find_many_by::<_, PatientMongo>(&self.collection, filter).await
    }
}

/// Keeps the column names of the patient flat file as field names
#[derive(Debug, Serialize, Deserialize)]
struct PatientMongo {
    _id: ObjectId,
    #[serde(rename = "Member ID")]
    member_id: String,
    #[serde(rename = "First Name", default)]
    first_name: String,
    #[serde(rename = "Email Address", default)]
    email_address: String,
    #[serde(rename = "CONSENT", default)]
    consent: String,
    #[serde(flatten)]
    attributes: Attributes,
}

impl MongoDocument<Patient> for PatientMongo {
    fn to_domain(self) -> anyhow::Result<Patient> {
        Ok(Patient {
            id: ID::from(self._id),
            member_id: self.member_id,
            first_name: self.first_name,
            email_address: self.email_address,
            consent_flag: self.consent,
            attributes: self.attributes,
        })
    }

    fn from_domain(patient: &Patient) -> Self {
        Self {
            _id: *patient.id.inner_ref(),
            member_id: patient.member_id.clone(),
            first_name: patient.first_name.clone(),
            email_address: patient.email_address.clone(),
            consent: patient.consent_flag.clone(),
            attributes: patient.attributes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn translates_email_consenting_query() {
        let filter = query_to_filter(&PatientQuery::email_consenting());
        assert_eq!(filter.get_str(CONSENT_COLUMN).unwrap(), "Y");
        let email_filter = filter.get_document(EMAIL_ADDRESS_COLUMN).unwrap();
        assert_eq!(
            email_filter.get_str("$regex").unwrap(),
            patient_reminders_domain::EMAIL_PATTERN
        );
        assert!(!filter.contains_key(FIRST_NAME_COLUMN));
    }

    #[test]
    fn translates_exact_matches() {
        let filter = query_to_filter(&PatientQuery::missing_first_name());
        assert_eq!(filter.get_str(FIRST_NAME_COLUMN).unwrap(), "");
        assert_eq!(filter.len(), 1);
    }

    #[test]
    fn translates_missing_consent_query() {
        let filter = query_to_filter(&PatientQuery {
            consent: Some(false),
            ..Default::default()
        });
        let consent_filter = filter.get_document(CONSENT_COLUMN).unwrap();
        assert_eq!(consent_filter.get_str("$ne").unwrap(), "Y");
    }

    #[test]
    fn document_keeps_raw_consent_flag() {
        let mut patient = Patient::new("1002", "Alan", "alan@example.com", false);
        patient.consent_flag = "y".into();
        let doc = mongodb::bson::to_document(&PatientMongo::from_domain(&patient)).unwrap();
        assert_eq!(doc.get_str("CONSENT").unwrap(), "y");
    }

    #[test]
    fn document_keeps_flat_file_columns() {
        let mut patient = Patient::new("1001", "Ada", "ada@example.com", true);
        patient
            .attributes
            .insert("Last Name".into(), "Lovelace".into());
        let doc = mongodb::bson::to_document(&PatientMongo::from_domain(&patient)).unwrap();
        assert_eq!(doc.get_str("Member ID").unwrap(), "1001");
        assert_eq!(doc.get_str("CONSENT").unwrap(), "Y");
        assert_eq!(doc.get_str("Last Name").unwrap(), "Lovelace");

        let raw: PatientMongo = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(raw.to_domain().unwrap(), patient);
    }
}
