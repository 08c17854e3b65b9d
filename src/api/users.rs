use actix_web::{web, HttpResponse};
use serde_json::{Map, Value};

use crate::{
    config::AppConfig,
    database::UserStore,
    services::{build_list_query, user_service, ListParams},
    utils::{
        error::{AppError, ErrorResponse},
        validation::{validate_create, validate_object_id, validate_update},
    },
};

/// Corpo JSON válido mas que não é objeto (array, string, null) falha como validação
fn json_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Validation(format!(
            "expected a JSON object, received {}",
            json_kind(&other)
        ))),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// GET /api/users - Lista todos os usuários (sem paginação)
#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users", body = Vec<crate::models::UserSchema>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_users(store: web::Data<dyn UserStore>) -> Result<HttpResponse, AppError> {
    log::info!("📋 GET /api/users");

    let users = user_service::list_users(store.get_ref()).await?;
    log::info!("✅ Listed {} users", users.len());

    Ok(HttpResponse::Ok().json(users))
}

/// GET /api/users/paginated - Lista paginada com filtro de igualdade opcional
#[utoipa::path(
    get,
    path = "/api/users/paginated",
    tag = "Users",
    params(ListParams),
    responses(
        (status = 200, description = "One page of users", body = crate::models::PaginatedUsers),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn list_users_paginated(
    store: web::Data<dyn UserStore>,
    config: web::Data<AppConfig>,
    params: web::Query<ListParams>,
) -> Result<HttpResponse, AppError> {
    let list_query = build_list_query(&params, config.default_page_limit);

    log::info!(
        "📋 GET /api/users/paginated - page {} limit {} filter {:?}",
        list_query.page,
        list_query.limit,
        list_query.filter.to_document()
    );

    let page = user_service::list_users_paginated(store.get_ref(), &list_query).await?;
    Ok(HttpResponse::Ok().json(page))
}

/// POST /api/users - Cria usuário (201 com o documento criado)
#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = crate::models::UserSchema,
    responses(
        (status = 201, description = "User created", body = crate::models::UserSchema),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn create_user(
    store: web::Data<dyn UserStore>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/users");

    let fields = validate_create(json_object(body.into_inner())?)?;
    let user = user_service::create_user(store.get_ref(), fields).await?;

    Ok(HttpResponse::Created().json(user))
}

/// GET /api/users/{id}
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "User found", body = crate::models::UserSchema),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn get_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let raw_id = path.into_inner();
    log::info!("🔍 GET /api/users/{}", raw_id);

    let id = validate_object_id(&raw_id)?;
    let user = user_service::get_user(store.get_ref(), &id).await?;

    Ok(HttpResponse::Ok().json(user))
}

/// PUT /api/users/{id} - Atualização parcial, responde `{ n, nModified, ok }`
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    request_body(content = crate::models::UserSchema, description = "Partial user fields, without id"),
    responses(
        (status = 200, description = "Update summary", body = crate::models::UpdateSummary),
        (status = 400, description = "Malformed id, immutable field or validation failure", body = ErrorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn update_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> Result<HttpResponse, AppError> {
    let raw_id = path.into_inner();
    log::info!("🔧 PUT /api/users/{}", raw_id);

    let id = validate_object_id(&raw_id)?;
    let patch = validate_update(json_object(body.into_inner())?)?;
    let summary = user_service::update_user(store.get_ref(), &id, patch).await?;

    Ok(HttpResponse::Ok().json(summary))
}

/// DELETE /api/users/{id} - Devolve o usuário removido
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = String, Path, description = "User ObjectId (24 hex chars)")),
    responses(
        (status = 200, description = "Deleted user", body = crate::models::UserSchema),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "Not Found", body = ErrorResponse)
    )
)]
pub async fn delete_user(
    store: web::Data<dyn UserStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let raw_id = path.into_inner();
    log::info!("🗑️  DELETE /api/users/{}", raw_id);

    let id = validate_object_id(&raw_id)?;
    let user = user_service::delete_user(store.get_ref(), &id).await?;

    Ok(HttpResponse::Ok().json(user))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryUserStore;
    use actix_web::{dev::ServiceResponse, http::StatusCode, test, App};
    use mongodb::bson::oid::ObjectId;
    use serde_json::json;
    use std::sync::Arc;

    macro_rules! test_app {
        () => {{
            let store: Arc<dyn UserStore> = Arc::new(MemoryUserStore::new());
            test::init_service(
                App::new()
                    .app_data(web::Data::from(store))
                    .app_data(web::Data::new(AppConfig::default()))
                    .configure(crate::api::configure),
            )
            .await
        }};
    }

    macro_rules! create {
        ($app:expr, $body:expr) => {
            created_json(test::call_service(&$app, post_user(&$body).to_request()).await).await
        };
    }

    fn user_body(name: &str, user_type: &str) -> Value {
        json!({
            "name": name,
            "surveyStatus": "Completed",
            "type": user_type,
            "location": "São Paulo",
            "role": "Developer",
            "selected": false
        })
    }

    fn post_user(body: &Value) -> test::TestRequest {
        test::TestRequest::post().uri("/api/users").set_json(body)
    }

    async fn created_json(resp: ServiceResponse) -> Value {
        assert_eq!(resp.status(), StatusCode::CREATED);
        test::read_body_json(resp).await
    }

    async fn error_message(resp: ServiceResponse) -> String {
        let body: Value = test::read_body_json(resp).await;
        body["error"]["message"].as_str().unwrap().to_string()
    }

    #[actix_rt::test]
    async fn test_create_echoes_fields_with_id() {
        let app = test_app!();
        let input = user_body("João", "Candidate");

        let created = create!(app, input);

        let id = created["id"].as_str().unwrap();
        assert!(ObjectId::parse_str(id).is_ok());
        for (key, value) in input.as_object().unwrap() {
            assert_eq!(&created[key], value, "field {key}");
        }
    }

    #[actix_rt::test]
    async fn test_create_with_unknown_fields_only_is_400() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({ "favoriteColor": "green" }))
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("validation failed"));
    }

    #[actix_rt::test]
    async fn test_create_with_malformed_json_is_400_with_error_shape() {
        let app = test_app!();
        let req = test::TestRequest::post()
            .uri("/api/users")
            .insert_header(("content-type", "application/json"))
            .set_payload("{\"name\": ")
            .to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.starts_with("Invalid request body"));
    }

    #[actix_rt::test]
    async fn test_get_by_id_roundtrip() {
        let app = test_app!();
        let created = create!(app, user_body("Ana", "Employee"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let fetched: Value = test::read_body_json(resp).await;
        assert_eq!(fetched, created);
    }

    #[actix_rt::test]
    async fn test_get_with_invalid_id_reports_literal() {
        let app = test_app!();
        let req = test::TestRequest::get().uri("/api/users/invalidId").to_request();

        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("invalidId"));
    }

    #[actix_rt::test]
    async fn test_get_unassigned_id_is_404() {
        let app = test_app!();
        let uri = format!("/api/users/{}", ObjectId::new().to_hex());

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Not Found");
    }

    #[actix_rt::test]
    async fn test_list_returns_every_user() {
        let app = test_app!();
        for i in 0..12 {
            create!(app, user_body(&format!("user-{i}"), "Candidate"));
        }

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/users").to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let users: Vec<Value> = test::read_body_json(resp).await;
        assert_eq!(users.len(), 12);
        assert_eq!(users[0]["name"], "user-0");
    }

    #[actix_rt::test]
    async fn test_paginated_filter_by_type() {
        let app = test_app!();
        for i in 0..15 {
            let user_type = if i % 2 == 0 { "Employee" } else { "Candidate" };
            create!(app, user_body(&format!("user-{i}"), user_type));
        }

        let req = test::TestRequest::get()
            .uri("/api/users/paginated?filter=type&filterVal=Employee&page=1&limit=3")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        let docs = page["docs"].as_array().unwrap();
        assert_eq!(docs.len(), 3);
        assert_eq!(docs.first().unwrap()["type"], "Employee");
        assert_eq!(docs.last().unwrap()["type"], "Employee");
        assert_eq!(page["total"], 8);
        assert_eq!(page["limit"], 3);
        assert_eq!(page["page"], 1);
        assert_eq!(page["pages"], 3);
    }

    #[actix_rt::test]
    async fn test_paginated_bad_params_fall_back_to_defaults() {
        let app = test_app!();
        for i in 0..12 {
            create!(app, user_body(&format!("user-{i}"), "Candidate"));
        }

        let req = test::TestRequest::get()
            .uri("/api/users/paginated?page=zero&limit=-4")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        assert_eq!(page["docs"].as_array().unwrap().len(), 10);
        assert_eq!(page["page"], 1);
        assert_eq!(page["limit"], 10);
        assert_eq!(page["pages"], 2);
    }

    #[actix_rt::test]
    async fn test_update_subset_of_fields() {
        let app = test_app!();
        let created = create!(app, user_body("Ana", "Candidate"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "type": "Employee", "selected": true }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let summary: Value = test::read_body_json(resp).await;
        assert_eq!(summary, json!({ "n": 1, "nModified": 1, "ok": 1 }));

        let fetched: Value = test::read_body_json(
            test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await,
        )
        .await;
        assert_eq!(fetched["type"], "Employee");
        assert_eq!(fetched["selected"], true);
        assert_eq!(fetched["name"], "Ana");
    }

    #[actix_rt::test]
    async fn test_update_id_is_immutable() {
        let app = test_app!();
        let created = create!(app, user_body("Ana", "Candidate"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());

        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "id": ObjectId::new().to_hex() }))
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("immutable"));
    }

    #[actix_rt::test]
    async fn test_update_unknown_user_is_404() {
        let app = test_app!();
        let uri = format!("/api/users/{}", ObjectId::new().to_hex());

        let req = test::TestRequest::put().uri(&uri).set_json(json!({ "role": "QA" })).to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_delete_returns_document_then_404() {
        let app = test_app!();
        let created = create!(app, user_body("Ana", "Candidate"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let deleted: Value = test::read_body_json(resp).await;
        assert_eq!(deleted, created);

        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_eq!(error_message(resp).await, "Not Found");

        let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_non_object_body_fails_validation() {
        let app = test_app!();
        let resp = test::call_service(&app, post_user(&json!([])).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("validation failed"));

        let created = create!(app, user_body("Ana", "Candidate"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());
        let req = test::TestRequest::put().uri(&uri).set_json(json!("Porto")).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("validation failed"));
    }

    #[actix_rt::test]
    async fn test_operator_or_dotted_field_names_are_400() {
        let app = test_app!();
        let mut body = user_body("Ana", "Candidate");
        body["$where"] = json!("true");
        let resp = test::call_service(&app, post_user(&body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(error_message(resp).await.contains("validation failed"));

        let created = create!(app, user_body("Ana", "Candidate"));
        let uri = format!("/api/users/{}", created["id"].as_str().unwrap());
        let req = test::TestRequest::put()
            .uri(&uri)
            .set_json(json!({ "$inc": "x", "location.city": "Porto" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let message = error_message(resp).await;
        assert!(message.contains("validation failed"));
        assert!(message.contains("location.city"), "{message}");
    }

    #[actix_rt::test]
    async fn test_paginated_operator_filter_returns_empty_page() {
        let app = test_app!();
        for i in 0..3 {
            create!(app, user_body(&format!("user-{i}"), "Candidate"));
        }

        let req = test::TestRequest::get()
            .uri("/api/users/paginated?filter=%24where&filterVal=true")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        assert_eq!(page["total"], 0);
        assert!(page["docs"].as_array().unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_paginated_huge_page_is_empty_not_500() {
        let app = test_app!();
        create!(app, user_body("Ana", "Candidate"));

        let req = test::TestRequest::get()
            .uri("/api/users/paginated?page=9223372036854775807")
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let page: Value = test::read_body_json(resp).await;
        assert!(page["docs"].as_array().unwrap().is_empty());
        assert_eq!(page["total"], 1);
    }
}
