use std::sync::Arc;

use reqwest::Client;

use crate::{
    backend::BackendClient,
    cache::TtlCache,
    core::{
        http::{
            ensure_success,
            http_client,
        },
        settings::AppSettings,
        structure::{
            structure_url,
            StructureSummary,
        },
        FloraError,
    },
    enrichment::Enricher,
    gbif::GbifClient,
    persistence::KeyValueStore,
};

/// Everything background jobs talk to, shared behind one `Arc`.
pub struct Services {
    pub http: Client,
    pub backend: BackendClient,
    pub enricher: Enricher<GbifClient, BackendClient>,
    pub cache: TtlCache,
    pub asset_url: String,
}

impl Services {
    pub fn new(settings: &AppSettings, store: Arc<dyn KeyValueStore>) -> Result<Self, FloraError> {
        let http = http_client()?;
        let cache = TtlCache::new(store);
        let backend = BackendClient::new(http.clone(), settings.api_url.clone());
        let gbif = GbifClient::new(http.clone(), settings.gbif_url.clone(), cache.clone());

        tracing::info!(api = %settings.api_url, gbif = %settings.gbif_url, "Services configured");

        Ok(Self {
            http,
            enricher: Enricher::new(gbif, backend.clone()),
            backend,
            cache,
            asset_url: settings.asset_url.clone(),
        })
    }

    pub async fn fetch_structure(&self, file_name: &str) -> Result<StructureSummary, FloraError> {
        let url = structure_url(&self.asset_url, file_name);
        tracing::debug!(url = %url, "Fetching structure file");

        let resp = self.http.get(&url).send().await?;
        ensure_success(&resp)?;
        let text = resp.text().await?;
        StructureSummary::inspect(&text)
    }
}
