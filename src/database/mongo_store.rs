use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::{Collection, Database};

use super::store::{UpdateOutcome, UserStore, Window};
use crate::models::Filter;
use crate::utils::error::AppError;

/// Coleção de usuários no MongoDB
pub struct MongoUserStore {
    database: Database,
    collection: Collection<Document>,
}

impl MongoUserStore {
    pub fn new(database: Database, collection_name: &str) -> Self {
        let collection = database.collection::<Document>(collection_name);
        Self { database, collection }
    }
}

#[async_trait]
impl UserStore for MongoUserStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn ping(&self) -> Result<(), AppError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn find(&self, filter: &Filter, window: Option<Window>) -> Result<Vec<Document>, AppError> {
        // _id crescente = ordem de inserção
        let mut find = self.collection.find(filter.to_document()).sort(doc! { "_id": 1 });
        if let Some(w) = window {
            let limit = i64::try_from(w.limit).unwrap_or(i64::MAX);
            find = find.skip(w.skip).limit(limit);
        }

        let cursor = find.await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        Ok(self.collection.count_documents(filter.to_document()).await?)
    }

    async fn insert(&self, document: Document) -> Result<(), AppError> {
        self.collection.insert_one(document).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": *id }).await?)
    }

    async fn update_by_id(&self, id: &ObjectId, changes: Document) -> Result<UpdateOutcome, AppError> {
        // $set vazio é rejeitado pelo servidor: só confirma a existência
        if changes.is_empty() {
            let exists = self.collection.count_documents(doc! { "_id": *id }).await?;
            return Ok(UpdateOutcome { matched: exists, modified: 0 });
        }

        let result = self
            .collection
            .update_one(doc! { "_id": *id }, doc! { "$set": changes })
            .await?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        Ok(self.collection.find_one_and_delete(doc! { "_id": *id }).await?)
    }
}
