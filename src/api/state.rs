use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::Config;
use crate::errorlog::ErrorLog;
use crate::models::AnimeRecord;
use crate::services::providers::{
    HuggingFaceGenerator, MediaSearcher, TenorSearcher, TextGenerator,
};
use crate::{catalog, error::AppError};

/// Shared session context
///
/// Holds everything the chat pipeline needs: the read-only catalog, the two
/// optional external collaborators, the per-session media URL cache and the
/// error log. Passed explicitly into every handler; nothing is ambient.
#[derive(Clone)]
pub struct AppState {
    /// `None` when catalog loading failed; the chat surface then renders the
    /// load-error message instead of recommendations
    pub catalog: Option<Arc<Vec<AnimeRecord>>>,
    pub generator: Option<Arc<dyn TextGenerator>>,
    pub media_searcher: Option<Arc<dyn MediaSearcher>>,
    /// Media URLs fetched this session, keyed by title
    pub media_cache: Arc<RwLock<HashMap<String, String>>>,
    pub error_log: ErrorLog,
}

impl AppState {
    pub fn new(
        catalog: Option<Vec<AnimeRecord>>,
        generator: Option<Arc<dyn TextGenerator>>,
        media_searcher: Option<Arc<dyn MediaSearcher>>,
    ) -> Self {
        Self {
            catalog: catalog.map(Arc::new),
            generator,
            media_searcher,
            media_cache: Arc::new(RwLock::new(HashMap::new())),
            error_log: ErrorLog::new(),
        }
    }

    /// Builds the session from configuration: loads the catalog and wires up
    /// whichever collaborators have credentials
    ///
    /// A failed catalog load is recorded but does not stop the server; the
    /// session serves the load-error message instead.
    pub async fn from_config(config: &Config) -> Self {
        let error_log = ErrorLog::new();

        let catalog =
            match catalog::load_from_files(&config.catalog_path, &config.descriptive_path).await {
                Ok(records) => Some(Arc::new(records)),
                Err(e) => {
                    error_log
                        .record(&e, serde_json::json!({ "action": "load_catalog" }))
                        .await;
                    None
                }
            };

        let generator: Option<Arc<dyn TextGenerator>> = match &config.hugging_face_api_key {
            Some(key) => Some(Arc::new(HuggingFaceGenerator::new(
                key.clone(),
                config.hugging_face_api_url.clone(),
                config.hugging_face_model.clone(),
            ))),
            None => {
                tracing::error!("Missing Hugging Face API key; narrative generation disabled");
                None
            }
        };

        let media_searcher: Option<Arc<dyn MediaSearcher>> = match &config.tenor_api_key {
            Some(key) => Some(Arc::new(TenorSearcher::new(
                key.clone(),
                config.tenor_api_url.clone(),
            ))),
            None => {
                tracing::warn!("Missing Tenor API key; media lookups disabled");
                None
            }
        };

        Self {
            catalog,
            generator,
            media_searcher,
            media_cache: Arc::new(RwLock::new(HashMap::new())),
            error_log,
        }
    }

    /// Records a caught pipeline failure with its context
    pub async fn record_error(&self, error: &AppError, context: serde_json::Value) {
        self.error_log.record(error, context).await;
    }
}
