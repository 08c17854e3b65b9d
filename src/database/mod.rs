pub mod memory;
pub mod mongo_store;
pub mod store;

pub use memory::MemoryUserStore;
pub use mongo_store::MongoUserStore;
pub use store::{UserStore, Window};

use mongodb::{Client, Database};

/// Conexão compartilhada com o MongoDB: criada no startup, encerrada no shutdown
#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, users_collection: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // Connection pool
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(5);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;

        let db_name = database_name_from_uri(uri);
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes(users_collection).await;

        Ok(mongodb)
    }

    /// Índices usados pela listagem filtrada
    async fn ensure_indexes(&self, users_collection: &str) {
        use mongodb::bson::Document;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.db.collection::<Document>(users_collection);

        for field in ["type", "surveyStatus"] {
            let mut keys = Document::new();
            keys.insert(field, 1);
            let index = IndexModel::builder().keys(keys).build();
            match users.create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}({})", users_collection, field),
                Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub async fn shutdown(self) {
        log::info!("🔌 Closing MongoDB connections...");
        self.client.shutdown().await;
        log::info!("✅ MongoDB connections closed");
    }
}

/// Extrai o nome do banco do path da URI ("mongodb://host/db?opts")
fn database_name_from_uri(uri: &str) -> &str {
    uri.split("://")
        .nth(1)
        .and_then(|rest| rest.split_once('/'))
        .map(|(_, path)| path.split('?').next().unwrap_or_default())
        .filter(|name| !name.is_empty())
        .unwrap_or("users_api")
}
