use mongodb::bson::{doc, Bson, Document};
use serde::Serialize;

use super::user::{User, UserSchema};

/// Teto do skip: o driver serializa skip como i64
pub const MAX_SKIP: u64 = i64::MAX as u64;

/// Filtro de igualdade sobre um campo, todos os documentos ou nenhum
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Filter {
    #[default]
    All,
    Equals(String, Bson),
    Nothing,
}

impl Filter {
    pub fn all() -> Self {
        Filter::All
    }

    pub fn none() -> Self {
        Filter::Nothing
    }

    pub fn field_equals(field: impl Into<String>, value: impl Into<Bson>) -> Self {
        Filter::Equals(field.into(), value.into())
    }

    /// Query do MongoDB equivalente
    pub fn to_document(&self) -> Document {
        match self {
            Filter::All => Document::new(),
            Filter::Equals(field, value) => {
                let mut query = Document::new();
                query.insert(field.clone(), value.clone());
                query
            }
            // todo documento tem _id
            Filter::Nothing => doc! { "_id": { "$exists": false } },
        }
    }

    /// Avalia o filtro em memória (mesma semântica de igualdade do MongoDB para escalares)
    pub fn matches(&self, document: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::Equals(field, value) => document.get(field) == Some(value),
            Filter::Nothing => false,
        }
    }
}

/// Query de listagem já normalizada
#[derive(Debug, Clone, PartialEq)]
pub struct ListQuery {
    pub filter: Filter,
    /// Página (começa em 1)
    pub page: u64,
    pub limit: u64,
}

impl ListQuery {
    pub fn skip(&self) -> u64 {
        self.page
            .saturating_sub(1)
            .saturating_mul(self.limit)
            .min(MAX_SKIP)
    }
}

/// Resultado paginado
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct PaginatedUsers {
    #[schema(value_type = Vec<UserSchema>)]
    pub docs: Vec<User>,
    /// Total de documentos que satisfazem o filtro
    pub total: u64,
    pub limit: u64,
    pub page: u64,
    pub pages: u64,
}

/// Resumo de update no formato do driver legado: `{ n, nModified, ok }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, utoipa::ToSchema)]
pub struct UpdateSummary {
    pub n: u64,
    #[serde(rename = "nModified")]
    pub n_modified: u64,
    pub ok: u8,
}
