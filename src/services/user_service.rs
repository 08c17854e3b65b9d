// ==================== USERS REPOSITORY ====================
// CRUD + listagem paginada sobre a coleção de usuários.
// Entradas já chegam validadas (ObjectId e campos) pelos handlers.

use mongodb::bson::{oid::ObjectId, Document};

use crate::{
    database::{UserStore, Window},
    models::{fields_to_document, Filter, ListQuery, PaginatedUsers, UpdateSummary, User, UserFields, STORAGE_ID_FIELD},
    utils::error::AppError,
};

fn to_user(document: Document) -> Result<User, AppError> {
    User::from_document(document)
        .ok_or_else(|| AppError::DatabaseError("stored user has no ObjectId _id".to_string()))
}

fn to_users(documents: Vec<Document>) -> Result<Vec<User>, AppError> {
    documents.into_iter().map(to_user).collect()
}

/// GET /users - Todos os usuários, sem limite
pub async fn list_users(store: &dyn UserStore) -> Result<Vec<User>, AppError> {
    let documents = store.find(&Filter::all(), None).await?;
    to_users(documents)
}

/// GET /users/paginated - Total independente da janela, docs só da página pedida
pub async fn list_users_paginated(store: &dyn UserStore, query: &ListQuery) -> Result<PaginatedUsers, AppError> {
    let limit = query.limit.max(1);
    let window = Window {
        skip: query.skip(),
        limit,
    };

    let (total, documents) = futures::try_join!(
        store.count(&query.filter),
        store.find(&query.filter, Some(window)),
    )?;

    Ok(PaginatedUsers {
        docs: to_users(documents)?,
        total,
        limit,
        page: query.page,
        pages: total.div_ceil(limit),
    })
}

/// POST /users - Atribui um ObjectId novo e persiste
pub async fn create_user(store: &dyn UserStore, fields: UserFields) -> Result<User, AppError> {
    let id = ObjectId::new();

    let mut document = fields_to_document(fields.clone());
    document.insert(STORAGE_ID_FIELD, id);

    store.insert(document).await?;
    log::info!("✅ User created: {}", id);

    Ok(User { id, fields })
}

pub async fn get_user(store: &dyn UserStore, id: &ObjectId) -> Result<User, AppError> {
    match store.find_by_id(id).await? {
        Some(document) => to_user(document),
        None => Err(AppError::NotFound),
    }
}

/// PUT /users/{id} - Merge parcial dos campos
pub async fn update_user(store: &dyn UserStore, id: &ObjectId, patch: UserFields) -> Result<UpdateSummary, AppError> {
    let outcome = store.update_by_id(id, fields_to_document(patch)).await?;

    if outcome.matched == 0 {
        return Err(AppError::NotFound);
    }

    log::info!("✅ User {} updated (modified: {})", id, outcome.modified);

    Ok(UpdateSummary {
        n: outcome.matched,
        n_modified: outcome.modified,
        ok: 1,
    })
}

/// DELETE /users/{id} - Devolve o documento removido
pub async fn delete_user(store: &dyn UserStore, id: &ObjectId) -> Result<User, AppError> {
    match store.delete_by_id(id).await? {
        Some(document) => {
            log::info!("🗑️  User deleted: {}", id);
            to_user(document)
        }
        None => Err(AppError::NotFound),
    }
}
