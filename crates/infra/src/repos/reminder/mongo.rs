use super::IReminderRepo;
use crate::repos::shared::mongo_repo;
use mongo_repo::MongoDocument;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};
use patient_reminders_domain::{ReminderLabel, ScheduledReminder, ID};
use serde::{Deserialize, Serialize};

pub struct MongoReminderRepo {
    collection: Collection<Document>,
}

impl MongoReminderRepo {
    pub fn new(db: &Database, collection_name: &str) -> Self {
        Self {
            collection: db.collection(collection_name),
        }
    }
}

#[async_trait::async_trait]
impl IReminderRepo for MongoReminderRepo {
    async fn bulk_insert(&self, reminders: &[ScheduledReminder]) -> anyhow::Result<u64> {
        mongo_repo::bulk_insert::<_, ReminderMongo>(&self.collection, reminders).await
    }

    async fn find_by_recipient(&self, recipient: &str) -> anyhow::Result<Vec<ScheduledReminder>> {
        let filter = doc! {
            "Email Address": recipient
        };
        mongo_repo::find_many_by::<_, ReminderMongo>(&self.collection, filter).await
    }

    async fn count(&self) -> anyhow::Result<u64> {
        mongo_repo::count_by(&self.collection, doc! {}).await
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ReminderMongo {
    _id: ObjectId,
    #[serde(rename = "Name")]
    label: ReminderLabel,
    /// Timestamp in millis
    scheduled_date: i64,
    #[serde(rename = "Email Address")]
    recipient: String,
}

impl MongoDocument<ScheduledReminder> for ReminderMongo {
    fn to_domain(self) -> anyhow::Result<ScheduledReminder> {
        Ok(ScheduledReminder {
            id: ID::from(self._id),
            label: self.label,
            remind_at: self.scheduled_date,
            recipient: self.recipient,
        })
    }

    fn from_domain(reminder: &ScheduledReminder) -> Self {
        Self {
            _id: *reminder.id.inner_ref(),
            label: reminder.label,
            scheduled_date: reminder.remind_at,
            recipient: reminder.recipient.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_uses_reminder_field_names() {
        let reminder = ScheduledReminder {
            id: Default::default(),
            label: ReminderLabel::Day2,
            remind_at: 1613862000000,
            recipient: "ada@example.com".into(),
        };
        let doc = mongodb::bson::to_document(&ReminderMongo::from_domain(&reminder)).unwrap();
        assert_eq!(doc.get_str("Name").unwrap(), "Day 2");
        assert_eq!(doc.get_i64("scheduled_date").unwrap(), 1613862000000);
        assert_eq!(doc.get_str("Email Address").unwrap(), "ada@example.com");

        let raw: ReminderMongo = mongodb::bson::from_document(doc).unwrap();
        assert_eq!(raw.to_domain().unwrap(), reminder);
    }
}
