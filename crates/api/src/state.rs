use std::sync::Arc;

use infra::Db;

use crate::config::AppConfig;

#[derive(Clone, Debug)]
pub struct AppState {
    pub db: Db,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: Db, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
