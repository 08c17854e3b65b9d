use mongodb::bson::{oid::ObjectId, Bson, Document};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Campo de identificador exposto pela API
pub const ID_FIELD: &str = "id";

/// Chave primária no MongoDB
pub const STORAGE_ID_FIELD: &str = "_id";

/// Campos obrigatórios (todos strings)
pub const REQUIRED_FIELDS: [&str; 5] = ["name", "surveyStatus", "type", "location", "role"];

/// Flag opcional de seleção
pub const SELECTED_FIELD: &str = "selected";

/// Tipo declarado de um campo do schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    String,
    Bool,
}

impl FieldKind {
    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Bool => "Boolean",
        }
    }
}

/// Retorna o tipo declarado do campo, ou `None` para campos fora do schema
pub fn schema_kind(field: &str) -> Option<FieldKind> {
    if REQUIRED_FIELDS.contains(&field) {
        Some(FieldKind::String)
    } else if field == SELECTED_FIELD {
        Some(FieldKind::Bool)
    } else {
        None
    }
}

pub fn is_id_field(field: &str) -> bool {
    field == ID_FIELD || field == STORAGE_ID_FIELD
}

/// Nome de campo plano: sem operador (`$...`), sem caminho (`a.b`) e sem NUL
pub fn is_plain_field_name(field: &str) -> bool {
    !field.is_empty() && !field.starts_with('$') && !field.contains(['.', '\0'])
}

/// Valor escalar de um campo do usuário
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Bool(bool),
    Int(i64),
    Float(f64),
}

impl FieldValue {
    pub fn kind(&self) -> Option<FieldKind> {
        match self {
            FieldValue::String(_) => Some(FieldKind::String),
            FieldValue::Bool(_) => Some(FieldKind::Bool),
            FieldValue::Int(_) | FieldValue::Float(_) => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            FieldValue::String(_) => "string",
            FieldValue::Bool(_) => "boolean",
            FieldValue::Int(_) | FieldValue::Float(_) => "number",
        }
    }

    /// Converte um valor JSON; objetos, arrays e null não são aceitos
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(FieldValue::String(s.clone())),
            serde_json::Value::Bool(b) => Some(FieldValue::Bool(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(FieldValue::Int)
                .or_else(|| n.as_f64().map(FieldValue::Float)),
            _ => None,
        }
    }

    pub fn from_bson(value: &Bson) -> Option<Self> {
        match value {
            Bson::String(s) => Some(FieldValue::String(s.clone())),
            Bson::Boolean(b) => Some(FieldValue::Bool(*b)),
            Bson::Int32(i) => Some(FieldValue::Int(i64::from(*i))),
            Bson::Int64(i) => Some(FieldValue::Int(*i)),
            Bson::Double(d) => Some(FieldValue::Float(*d)),
            _ => None,
        }
    }
}

impl From<FieldValue> for Bson {
    fn from(value: FieldValue) -> Self {
        match value {
            FieldValue::String(s) => Bson::String(s),
            FieldValue::Bool(b) => Bson::Boolean(b),
            FieldValue::Int(i) => Bson::Int64(i),
            FieldValue::Float(f) => Bson::Double(f),
        }
    }
}

/// Campos validados de um usuário (sem identificador)
pub type UserFields = BTreeMap<String, FieldValue>;

pub fn fields_to_document(fields: UserFields) -> Document {
    fields
        .into_iter()
        .map(|(key, value)| (key, Bson::from(value)))
        .collect()
}

/// Usuário armazenado (serializado com `id` em hex + campos achatados)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct User {
    #[serde(serialize_with = "serialize_object_id")]
    pub id: ObjectId,
    #[serde(flatten)]
    pub fields: UserFields,
}

impl User {
    /// Monta o usuário a partir do documento do MongoDB.
    /// Retorna `None` se o `_id` não for um ObjectId; campos não escalares
    /// (ex: `__v` de outras ferramentas, subdocumentos) são ignorados.
    pub fn from_document(document: Document) -> Option<Self> {
        let id = document.get_object_id(STORAGE_ID_FIELD).ok()?;

        let fields = document
            .iter()
            .filter(|(key, _)| key.as_str() != STORAGE_ID_FIELD && key.as_str() != "__v")
            .filter_map(|(key, value)| match FieldValue::from_bson(value) {
                Some(v) => Some((key.clone(), v)),
                None => {
                    log::debug!("Skipping non-scalar field '{}' on user {}", key, id);
                    None
                }
            })
            .collect();

        Some(User { id, fields })
    }
}

fn serialize_object_id<S: Serializer>(id: &ObjectId, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&id.to_hex())
}

/// Schema do usuário para a documentação OpenAPI
#[allow(dead_code)]
#[derive(Serialize, utoipa::ToSchema)]
pub struct UserSchema {
    /// ObjectId em hexadecimal (24 caracteres)
    pub id: String,
    pub name: String,
    #[serde(rename = "surveyStatus")]
    pub survey_status: String,
    /// Ex: "Candidate", "Employee"
    #[serde(rename = "type")]
    pub user_type: String,
    pub location: String,
    pub role: String,
    pub selected: Option<bool>,
}
