pub mod health;
pub mod metrics;
pub mod swagger;
pub mod users;

use actix_web::web;

use crate::utils::error::json_error_handler;

/// Rotas da API (usado pelo main e pelos testes)
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Metrics
        .route("/metrics", web::get().to(metrics::get_metrics))
        // Users: "/paginated" precisa vir antes de "/{id}"
        .service(
            web::scope("/api/users")
                .route("", web::get().to(users::list_users))
                .route("", web::post().to(users::create_user))
                .route("/paginated", web::get().to(users::list_users_paginated))
                .route("/{id}", web::get().to(users::get_user))
                .route("/{id}", web::put().to(users::update_user))
                .route("/{id}", web::delete().to(users::delete_user)),
        );
}
