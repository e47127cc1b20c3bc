use std::sync::Arc;

use uasrc_config::{Collections, Config, Cors};
use uasrc_service::UasrcService;
use uasrc_storage::{db::Db, postgres::PgDocumentStore, store::DocumentStore};

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<UasrcService>,
	pub cors: Arc<Cors>,
}
impl AppState {
	pub async fn new(config: &Config) -> color_eyre::Result<Self> {
		let db = Db::connect(&config.storage.postgres).await?;

		db.ensure_schema(&config.collections).await?;

		let store = Arc::new(PgDocumentStore::new(db.pool));

		Ok(Self::with_store(config.collections.clone(), store, config.cors.clone()))
	}

	pub fn with_store(collections: Collections, store: Arc<dyn DocumentStore>, cors: Cors) -> Self {
		Self { service: Arc::new(UasrcService::new(collections, store)), cors: Arc::new(cors) }
	}
}
