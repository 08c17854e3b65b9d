// Validação explícita do schema de usuário, independente do storage

use mongodb::bson::oid::ObjectId;
use serde_json::{Map, Value};

use crate::models::{is_id_field, is_plain_field_name, schema_kind, FieldValue, UserFields, REQUIRED_FIELDS};
use crate::utils::error::AppError;

/// Valida o formato do identificador (ObjectId: 24 caracteres hex)
pub fn validate_object_id(raw: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(raw).map_err(|_| AppError::InvalidIdentifier(raw.to_string()))
}

/// Valida o corpo de um POST: os 5 campos obrigatórios como string,
/// `selected` booleano se presente, demais campos apenas escalares.
pub fn validate_create(input: Map<String, Value>) -> Result<UserFields, AppError> {
    let mut problems = Vec::new();

    for field in REQUIRED_FIELDS {
        if !input.contains_key(field) {
            problems.push(format!("{field}: Path `{field}` is required"));
        }
    }

    let mut fields = UserFields::new();
    for (key, value) in input {
        if is_id_field(&key) {
            problems.push(format!("{key}: identifiers are assigned by the server"));
            continue;
        }
        match coerce_field(&key, &value) {
            Ok(v) => {
                fields.insert(key, v);
            }
            Err(reason) => problems.push(format!("{key}: {reason}")),
        }
    }

    if problems.is_empty() {
        Ok(fields)
    } else {
        Err(AppError::Validation(problems.join(", ")))
    }
}

/// Valida o corpo de um PUT (patch parcial). Qualquer tentativa de tocar
/// no identificador é rejeitada antes da checagem de tipos.
pub fn validate_update(input: Map<String, Value>) -> Result<UserFields, AppError> {
    if let Some(key) = input.keys().find(|key| is_id_field(key)) {
        return Err(AppError::ImmutableField(key.clone()));
    }

    let mut problems = Vec::new();
    let mut patch = UserFields::new();
    for (key, value) in input {
        match coerce_field(&key, &value) {
            Ok(v) => {
                patch.insert(key, v);
            }
            Err(reason) => problems.push(format!("{key}: {reason}")),
        }
    }

    if problems.is_empty() {
        Ok(patch)
    } else {
        Err(AppError::Validation(problems.join(", ")))
    }
}

fn coerce_field(key: &str, value: &Value) -> Result<FieldValue, String> {
    if !is_plain_field_name(key) {
        return Err(format!("invalid field name `{key}` (no `$` prefix or `.`)"));
    }

    let parsed = FieldValue::from_json(value)
        .ok_or_else(|| format!("unsupported value {} for path `{key}`", value))?;

    match schema_kind(key) {
        Some(expected) if parsed.kind() != Some(expected) => Err(format!(
            "Cast to {} failed for value {} (type {}) at path `{key}`",
            expected.name(),
            value,
            parsed.type_name()
        )),
        _ => Ok(parsed),
    }
}
