use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};
use tokio::sync::RwLock;

use super::store::{UpdateOutcome, UserStore, Window};
use crate::models::{Filter, STORAGE_ID_FIELD};
use crate::utils::error::AppError;

/// Storage em memória (testes e `STORAGE_BACKEND=memory`).
/// Documentos ficam em ordem de inserção.
#[derive(Default)]
pub struct MemoryUserStore {
    documents: RwLock<Vec<Document>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(document: &Document, id: &ObjectId) -> bool {
    document.get_object_id(STORAGE_ID_FIELD).ok().as_ref() == Some(id)
}

#[async_trait]
impl UserStore for MemoryUserStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> Result<(), AppError> {
        Ok(())
    }

    async fn find(&self, filter: &Filter, window: Option<Window>) -> Result<Vec<Document>, AppError> {
        let documents = self.documents.read().await;
        let matching = documents.iter().filter(|d| filter.matches(d));

        let page: Vec<Document> = match window {
            Some(w) => matching
                .skip(w.skip as usize)
                .take(w.limit as usize)
                .cloned()
                .collect(),
            None => matching.cloned().collect(),
        };
        Ok(page)
    }

    async fn count(&self, filter: &Filter) -> Result<u64, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().filter(|d| filter.matches(d)).count() as u64)
    }

    async fn insert(&self, document: Document) -> Result<(), AppError> {
        let id = document
            .get_object_id(STORAGE_ID_FIELD)
            .map_err(|e| AppError::DatabaseError(format!("document without ObjectId _id: {}", e)))?;

        let mut documents = self.documents.write().await;
        if documents.iter().any(|d| has_id(d, &id)) {
            return Err(AppError::DatabaseError(format!("duplicate key _id: {}", id)));
        }
        documents.push(document);
        Ok(())
    }

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        let documents = self.documents.read().await;
        Ok(documents.iter().find(|d| has_id(d, id)).cloned())
    }

    async fn update_by_id(&self, id: &ObjectId, changes: Document) -> Result<UpdateOutcome, AppError> {
        let mut documents = self.documents.write().await;
        let Some(document) = documents.iter_mut().find(|d| has_id(d, id)) else {
            return Ok(UpdateOutcome { matched: 0, modified: 0 });
        };

        let mut modified = false;
        for (key, value) in changes {
            if document.get(&key) != Some(&value) {
                document.insert(key, value);
                modified = true;
            }
        }

        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(modified),
        })
    }

    async fn delete_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError> {
        let mut documents = self.documents.write().await;
        let position = documents.iter().position(|d| has_id(d, id));
        Ok(position.map(|index| documents.remove(index)))
    }
}
