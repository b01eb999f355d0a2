use std::{sync::Arc, time::Duration};

use sqlx::postgres::PgPoolOptions;

use crate::{
    config::{Config, StoreBackend},
    db::{SharedStore, memory::MemoryDocumentStore, postgres::PgDocumentStore},
    notify::{NotificationClient, SharedDispatcher},
    upload::{SharedUploader, build_uploader},
};

#[derive(Clone)]
pub struct AppState {
    pub store: SharedStore,
    pub uploader: SharedUploader,
    pub dispatcher: SharedDispatcher,
    pub config: Config,
}

pub type SharedAppState = Arc<AppState>;

impl AppState {
    pub async fn init(config: Config) -> Result<Self, anyhow::Error> {
        let store: SharedStore = match config.database.backend {
            StoreBackend::Postgres => {
                let pool = PgPoolOptions::new()
                    .min_connections(5)
                    .max_connections(30)
                    .connect_lazy_with(config.database.with_db());

                if config.application.run_migration {
                    tracing::warn!("Running database migrations...");
                    sqlx::migrate!("./migrations").run(&pool).await?;
                }

                Arc::new(PgDocumentStore::new(pool))
            }
            StoreBackend::Memory => {
                tracing::warn!("Using in-memory document store, data is lost on exit");
                Arc::new(MemoryDocumentStore::new())
            }
        };

        Self::with_store(config, store)
    }

    /// Wires the outbound clients from `config` around an existing store.
    pub fn with_store(config: Config, store: SharedStore) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.http_client.timeout_seconds))
            .build()?;

        let uploader = build_uploader(&config.upload, client.clone())?;
        let dispatcher: SharedDispatcher = Arc::new(NotificationClient::new(
            client,
            config.notification.dispatch_url.clone(),
        ));

        Ok(AppState {
            store,
            uploader,
            dispatcher,
            config,
        })
    }
}
