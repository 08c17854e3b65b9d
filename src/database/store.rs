use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::models::Filter;
use crate::utils::error::AppError;

/// Janela de paginação aplicada no storage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    pub skip: u64,
    pub limit: u64,
}

/// Resultado bruto de um update por id
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// Coleção de documentos sem schema, endereçada por ObjectId.
///
/// Implementações devem manter ordem estável (inserção / `_id` crescente)
/// em `find`, e garantir atomicidade por documento.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Nome do backend ("mongodb", "memory")
    fn backend(&self) -> &'static str;

    async fn ping(&self) -> Result<(), AppError>;

    async fn find(&self, filter: &Filter, window: Option<Window>) -> Result<Vec<Document>, AppError>;

    async fn count(&self, filter: &Filter) -> Result<u64, AppError>;

    /// O documento já chega com `_id` atribuído
    async fn insert(&self, document: Document) -> Result<(), AppError>;

    async fn find_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError>;

    /// Merge parcial (`$set`) dos campos em `changes`
    async fn update_by_id(&self, id: &ObjectId, changes: Document) -> Result<UpdateOutcome, AppError>;

    /// Remove e devolve o documento anterior
    async fn delete_by_id(&self, id: &ObjectId) -> Result<Option<Document>, AppError>;
}
