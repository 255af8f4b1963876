use super::IStoreConnection;
use mongodb::{Client, Database};
use tracing::info;

pub struct MongoStoreConnection {
    client: Client,
    db: Database,
}

impl MongoStoreConnection {
    pub fn new(client: Client, db: Database) -> Self {
        Self { client, db }
    }
}

#[async_trait::async_trait]
impl IStoreConnection for MongoStoreConnection {
    async fn close(&self) -> anyhow::Result<()> {
        // `shutdown` waits for all in flight operations and closes the pool
        self.client.clone().shutdown().await;
        Ok(())
    }

    async fn drop_database(&self) -> anyhow::Result<()> {
        self.db.drop(None).await?;
        info!("{} has been cleared", self.db.name());
        Ok(())
    }
}
