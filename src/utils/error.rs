use actix_web::{error::JsonPayloadError, http::StatusCode, HttpRequest, HttpResponse, ResponseError};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Documento não passou no schema (create/update)
    #[error("User validation failed: {0}")]
    Validation(String),

    /// Identificador mal formado; a mensagem carrega o valor recebido
    #[error("Cast to ObjectId failed for value \"{0}\" at path \"_id\"")]
    InvalidIdentifier(String),

    #[error("Performing an update on the path '{0}' would modify the immutable field '{0}'")]
    ImmutableField(String),

    #[error("Not Found")]
    NotFound,

    /// Corpo da requisição ilegível (JSON inválido, tipo errado)
    #[error("Invalid request body: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    DatabaseError(String),
}

impl From<mongodb::error::Error> for AppError {
    fn from(err: mongodb::error::Error) -> Self {
        AppError::DatabaseError(err.to_string())
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorMessage {
    pub message: String,
}

/// Formato único de erro: `{ "error": { "message": "..." } }`
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: ErrorMessage,
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_)
            | AppError::InvalidIdentifier(_)
            | AppError::ImmutableField(_)
            | AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            AppError::DatabaseError(msg) => log::error!("❌ {}", msg),
            other => log::warn!("⚠️  {}", other),
        }

        HttpResponse::build(self.status_code()).json(ErrorResponse {
            error: ErrorMessage {
                message: self.to_string(),
            },
        })
    }
}

/// Handler para `web::JsonConfig`: erros de parse do corpo viram 400 no formato padrão
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::BadRequest(err.to_string()).into()
}
