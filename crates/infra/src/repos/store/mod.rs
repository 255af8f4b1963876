mod inmemory;
mod mongo;

pub use inmemory::InMemoryStoreConnection;
pub use mongo::MongoStoreConnection;

/// The connection to the record store that all repositories share
#[async_trait::async_trait]
pub trait IStoreConnection: Send + Sync {
    /// Releases the connection. Repositories must not be used afterwards.
    async fn close(&self) -> anyhow::Result<()>;
    /// Removes every collection of the database
    async fn drop_database(&self) -> anyhow::Result<()>;
}
