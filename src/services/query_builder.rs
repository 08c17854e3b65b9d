// Converte os parâmetros de listagem (filter, filterVal, page, limit)
// numa ListQuery. Nunca falha: valores inválidos caem nos defaults.

use mongodb::bson::{oid::ObjectId, Bson};
use serde::Deserialize;

use crate::models::{is_id_field, is_plain_field_name, schema_kind, FieldKind, Filter, ListQuery, STORAGE_ID_FIELD};

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;

/// Parâmetros crus da query string
#[derive(Debug, Default, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Nome do campo a filtrar
    pub filter: Option<String>,
    /// Valor exato do campo
    #[serde(rename = "filterVal")]
    pub filter_val: Option<String>,
    /// Página (default 1)
    pub page: Option<String>,
    /// Tamanho da página
    pub limit: Option<String>,
}

pub fn build_list_query(params: &ListParams, default_limit: u64) -> ListQuery {
    let filter = match (params.filter.as_deref().map(str::trim), params.filter_val.as_deref()) {
        (Some(field), Some(value)) if !field.is_empty() => build_filter(field, value),
        _ => Filter::all(),
    };

    ListQuery {
        filter,
        page: positive_or(params.page.as_deref(), DEFAULT_PAGE),
        limit: positive_or(params.limit.as_deref(), default_limit.max(1)),
    }
}

fn build_filter(field: &str, raw: &str) -> Filter {
    if is_id_field(field) {
        // id mal formado fica como string e simplesmente não casa com nenhum ObjectId
        return match ObjectId::parse_str(raw) {
            Ok(id) => Filter::field_equals(STORAGE_ID_FIELD, id),
            Err(_) => Filter::field_equals(STORAGE_ID_FIELD, raw),
        };
    }

    // operadores ($where, $expr...) e caminhos aninhados nunca chegam à query
    if !is_plain_field_name(field) {
        log::warn!("⚠️  Ignoring filter on unsupported field name {:?}", field);
        return Filter::none();
    }

    let value = match (schema_kind(field), raw) {
        (Some(FieldKind::Bool), "true") => Bson::Boolean(true),
        (Some(FieldKind::Bool), "false") => Bson::Boolean(false),
        _ => Bson::String(raw.to_string()),
    };
    Filter::field_equals(field, value)
}

fn positive_or(raw: Option<&str>, fallback: u64) -> u64 {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(fallback)
}
