mod api;
mod config;
mod database;
mod middleware;
mod models;
mod services;
mod utils;

use actix_cors::Cors;
use actix_web::{middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use config::{AppConfig, StorageBackend};
use database::{MemoryUserStore, MongoDB, MongoUserStore, UserStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = AppConfig::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        std::io::Error::other(e)
    })?;

    log::info!("🚀 Starting Users Service...");

    let mut mongo: Option<MongoDB> = None;
    let store: Arc<dyn UserStore> = match config.storage {
        StorageBackend::MongoDb => {
            let database_url = config.database_url.as_deref().unwrap_or_default();
            log::info!("📊 Database: {}", database_url);

            let db = MongoDB::new(database_url, &config.users_collection)
                .await
                .map_err(|e| {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    std::io::Error::other(e)
                })?;
            log::info!("✅ MongoDB connected successfully");

            let store = MongoUserStore::new(db.database().clone(), &config.users_collection);
            mongo = Some(db);
            Arc::new(store)
        }
        StorageBackend::Memory => {
            log::warn!("⚠️  Using in-memory storage: data is lost on restart");
            Arc::new(MemoryUserStore::new())
        }
    };

    let host = config.host.clone();
    let port = config.port;
    let cors_origins = config.cors_allowed_origins.clone();

    let store_data = web::Data::from(store);
    let config_data = web::Data::new(config);

    log::info!("🌐 Server starting on {}:{}", host, port);
    log::info!("📚 Swagger UI available at: http://{}:{}/swagger-ui/", host, port);
    log::info!("📄 OpenAPI spec at: http://{}:{}/api-docs/openapi.json", host, port);

    HttpServer::new(move || {
        let cors = cors_origins
            .iter()
            .fold(Cors::default(), |cors, origin| cors.allowed_origin(origin))
            .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
            .allowed_headers(vec![
                actix_web::http::header::CONTENT_TYPE,
                actix_web::http::header::ACCEPT,
            ])
            .expose_headers(vec![actix_web::http::header::CONTENT_TYPE])
            .max_age(3600);

        // Generate OpenAPI specification
        let openapi = api::swagger::ApiDoc::openapi();

        App::new()
            .app_data(store_data.clone())
            .app_data(config_data.clone())
            .wrap(cors)
            .wrap(middleware::RequestMetrics)
            .wrap(Logger::default())
            .service(SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi))
            .configure(api::configure)
    })
    .bind((host.as_str(), port))?
    .run()
    .await?;

    log::info!("🛑 Server stopped");

    if let Some(db) = mongo {
        db.shutdown().await;
    }

    Ok(())
}
