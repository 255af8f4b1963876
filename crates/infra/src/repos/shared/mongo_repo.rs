use anyhow::Result;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::{self, Document},
    Collection,
};
use serde::{de::DeserializeOwned, Serialize};

pub trait MongoDocument<E>: Serialize + DeserializeOwned {
    fn to_domain(self) -> Result<E>;
    fn from_domain(entity: &E) -> Self;
}

fn entity_to_persistence<E, D: MongoDocument<E>>(entity: &E) -> Result<Document> {
    let raw = D::from_domain(entity);
    Ok(bson::to_document(&raw)?)
}

fn persistence_to_entity<E, D: MongoDocument<E>>(doc: Document) -> Result<E> {
    let raw: D = bson::from_document(doc)?;
    raw.to_domain()
}

/// Inserts all the entities with a single `insert_many` and returns how many
/// documents were written. An empty batch never reaches the database.
pub async fn bulk_insert<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    entities: &[E],
) -> Result<u64> {
    if entities.is_empty() {
        return Ok(0);
    }
    let docs = entities
        .iter()
        .map(entity_to_persistence::<E, D>)
        .collect::<Result<Vec<_>>>()?;
    let res = collection.insert_many(docs, None).await?;
    Ok(res.inserted_ids.len() as u64)
}

pub async fn find_many_by<E, D: MongoDocument<E>>(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Vec<E>> {
    let mut cursor = collection.find(filter, None).await?;
    let mut entities = vec![];
    while let Some(document) = cursor.try_next().await? {
        entities.push(persistence_to_entity::<E, D>(document)?);
    }
    Ok(entities)
}

pub async fn count_by(collection: &Collection<Document>, filter: Document) -> Result<u64> {
    Ok(collection.count_documents(filter, None).await?)
}
