use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users Service API",
        version = "1.0.0",
        description = "CRUD over the `users` collection with filtered pagination.\n\n**Errors:** every failure responds with `{ \"error\": { \"message\": string } }`.\n\n**Identifiers:** MongoDB ObjectIds (24 hex chars)."
    ),
    paths(
        // Users
        crate::api::users::list_users,
        crate::api::users::list_users_paginated,
        crate::api::users::create_user,
        crate::api::users::get_user,
        crate::api::users::update_user,
        crate::api::users::delete_user,

        // Health & Metrics
        crate::api::health::health_check,
        crate::api::metrics::get_metrics,
    ),
    components(
        schemas(
            crate::models::UserSchema,
            crate::models::PaginatedUsers,
            crate::models::UpdateSummary,
            crate::utils::error::ErrorResponse,
            crate::utils::error::ErrorMessage,
            crate::api::health::HealthResponse,
            crate::api::metrics::MetricsResponse,
        )
    ),
    tags(
        (name = "Users", description = "User documents: create, read, partial update, delete and paginated listing."),
        (name = "Health", description = "Health check and system metrics endpoints for monitoring service status."),
    )
)]
pub struct ApiDoc;
