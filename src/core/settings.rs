use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    controller::MAX_PER_PAGE,
    gbif::DEFAULT_GBIF_URL,
    persistence::{
        load_json_or_default,
        save_json,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const API_URL_ENV: &str = "FLORAFIND_API_URL";
pub const GBIF_URL_ENV: &str = "FLORAFIND_GBIF_URL";

const DEFAULT_API_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_url: String,
    pub gbif_url: String,
    /// Where `mol-structure/*.pdb` files are served from.
    pub asset_url: String,
    pub per_page: u32,
    pub dark_mode: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            gbif_url: DEFAULT_GBIF_URL.to_string(),
            asset_url: DEFAULT_API_URL.to_string(),
            per_page: 10,
            dark_mode: true,
        }
    }
}

impl AppSettings {
    /// settings.json from the app data dir, then environment overrides.
    pub fn load() -> Self {
        let settings = load_json_or_default::<AppSettings>(SETTINGS_FILE);
        settings.with_overrides(|key| std::env::var(key).ok())
    }

    pub fn save(&self) {
        if let Err(e) = save_json(self, SETTINGS_FILE) {
            tracing::error!("Failed to save settings: {}", e);
        }
    }

    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(api_url) = non_empty(API_URL_ENV) {
            tracing::info!(api_url = %api_url, "Backend url taken from environment");
            self.api_url = api_url;
        }
        if let Some(gbif_url) = non_empty(GBIF_URL_ENV) {
            self.gbif_url = gbif_url;
        }

        self.per_page = self.per_page.clamp(1, MAX_PER_PAGE);
        self
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn environment_wins_over_file() {
        let env = HashMap::from([
            (API_URL_ENV, "https://api.example.org"),
            (GBIF_URL_ENV, "  "),
        ]);
        let settings = AppSettings::default().with_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(settings.api_url, "https://api.example.org");
        assert_eq!(settings.gbif_url, DEFAULT_GBIF_URL);
    }

    #[test]
    fn per_page_is_clamped_to_backend_limit() {
        let settings = AppSettings { per_page: 500, ..AppSettings::default() }.with_overrides(|_| None);
        assert_eq!(settings.per_page, MAX_PER_PAGE);

        let settings = AppSettings { per_page: 0, ..AppSettings::default() }.with_overrides(|_| None);
        assert_eq!(settings.per_page, 1);
    }

    #[test]
    fn partial_file_fills_defaults() {
        let settings: AppSettings = serde_json::from_str(r#"{"api_url": "http://backend:8080"}"#).unwrap();
        assert_eq!(settings.api_url, "http://backend:8080");
        assert_eq!(settings.per_page, 10);
        assert!(settings.dark_mode);
    }
}
