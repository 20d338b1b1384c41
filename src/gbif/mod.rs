//! Read-only client for the GBIF occurrence and species APIs.

use reqwest::Client;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    cache::{
        CacheNamespace,
        TtlCache,
    },
    core::{
        countries::normalize_code,
        http::{
            get_json,
            join_url,
        },
        FloraError,
    },
    enrichment::{
        BiodiversitySource,
        ImageLookup,
    },
};

pub const DEFAULT_GBIF_URL: &str = "https://api.gbif.org/v1";
pub const IMAGE_LIMIT: usize = 2;

#[derive(Debug, Deserialize)]
pub struct OccurrenceSearch {
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub results: Vec<Occurrence>,
}

#[derive(Debug, Deserialize)]
pub struct Occurrence {
    #[serde(default)]
    pub kingdom: Option<String>,
    #[serde(default)]
    pub media: Vec<Media>,
}

#[derive(Debug, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub identifier: Option<String>,
}

impl OccurrenceSearch {
    fn into_image_lookup(self, limit: usize) -> ImageLookup {
        let kingdom = self.results.first().and_then(|r| r.kingdom.clone());
        let images = self
            .results
            .into_iter()
            .flat_map(|r| r.media.into_iter().filter_map(|m| m.identifier))
            .filter(|url| !url.trim().is_empty())
            .take(limit)
            .collect();

        ImageLookup { images, kingdom }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeciesMatch {
    #[serde(default)]
    pub usage_key: Option<u64>,
    #[serde(default)]
    pub scientific_name: Option<String>,
    #[serde(default)]
    pub kingdom: Option<String>,
    #[serde(default)]
    pub match_type: Option<String>,
    #[serde(default)]
    pub confidence: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct VernacularPage {
    #[serde(default)]
    results: Vec<VernacularName>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VernacularName {
    vernacular_name: String,
    #[serde(default)]
    language: Option<String>,
}

#[derive(Clone)]
pub struct GbifClient {
    http: Client,
    base_url: String,
    cache: TtlCache,
}

impl GbifClient {
    pub fn new(http: Client, base_url: impl Into<String>, cache: TtlCache) -> Self {
        Self { http, base_url: base_url.into(), cache }
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    /// Whether any occurrence of the species is recorded in `country`.
    pub async fn occurrence_found(&self, scientific_name: &str, country: &str) -> Result<bool, FloraError> {
        let country = normalize_code(country);
        let cache_key = format!("{}_{}", scientific_name.to_lowercase(), country);
        if let Some(found) = self.cache.get::<bool>(CacheNamespace::Occurrence, &cache_key) {
            return Ok(found);
        }

        let search: OccurrenceSearch = get_json(
            &self.http,
            &self.url("occurrence/search"),
            &[("scientificName", scientific_name), ("country", country.as_str()), ("limit", "0")],
        )
        .await?;

        let found = search.count > 0;
        tracing::debug!(scientific_name, country = %country, count = search.count, "occurrence lookup");
        self.cache.set(CacheNamespace::Occurrence, &cache_key, &found);
        Ok(found)
    }

    /// Up to two still images from georeferenced records without geospatial issues.
    pub async fn occurrence_images(&self, scientific_name: &str) -> Result<ImageLookup, FloraError> {
        let cache_key = scientific_name.to_lowercase();
        if let Some(lookup) = self.cache.get::<ImageLookup>(CacheNamespace::Images, &cache_key) {
            return Ok(lookup);
        }

        let limit = IMAGE_LIMIT.to_string();
        let search: OccurrenceSearch = get_json(
            &self.http,
            &self.url("occurrence/search"),
            &[
                ("scientificName", scientific_name),
                ("mediaType", "StillImage"),
                ("limit", limit.as_str()),
                ("hasCoordinate", "true"),
                ("hasGeospatialIssue", "false"),
            ],
        )
        .await?;

        let lookup = search.into_image_lookup(IMAGE_LIMIT);
        self.cache.set(CacheNamespace::Images, &cache_key, &lookup);
        Ok(lookup)
    }

    pub async fn species_match(&self, name: &str) -> Result<Option<SpeciesMatch>, FloraError> {
        let cache_key = name.to_lowercase();
        if let Some(found) = self.cache.get::<SpeciesMatch>(CacheNamespace::SpeciesMatch, &cache_key) {
            return Ok(Some(found));
        }

        let matched: SpeciesMatch =
            get_json(&self.http, &self.url("species/match"), &[("name", name)]).await?;

        if matched.usage_key.is_none() {
            return Ok(None);
        }

        self.cache.set(CacheNamespace::SpeciesMatch, &cache_key, &matched);
        Ok(Some(matched))
    }

    /// Common names for a taxon, English first.
    pub async fn vernacular_names(&self, taxon_key: u64) -> Result<Vec<String>, FloraError> {
        let cache_key = taxon_key.to_string();
        if let Some(names) = self.cache.get::<Vec<String>>(CacheNamespace::Vernacular, &cache_key) {
            return Ok(names);
        }

        let page: VernacularPage = get_json(
            &self.http,
            &self.url(&format!("species/{taxon_key}/vernacularNames")),
            &[("limit", "50")],
        )
        .await?;

        let names = order_vernacular_names(page.results);
        self.cache.set(CacheNamespace::Vernacular, &cache_key, &names);
        Ok(names)
    }

    /// Matches a name and returns its common names, if GBIF knows the species.
    pub async fn common_names(&self, name: &str) -> Result<Vec<String>, FloraError> {
        match self.species_match(name).await? {
            Some(SpeciesMatch { usage_key: Some(key), .. }) => self.vernacular_names(key).await,
            _ => Ok(Vec::new()),
        }
    }
}

fn order_vernacular_names(results: Vec<VernacularName>) -> Vec<String> {
    let (mut english, other): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|n| n.language.as_deref() == Some("eng"));
    english.extend(other);

    let mut names: Vec<String> = Vec::new();
    for name in english {
        let trimmed = name.vernacular_name.trim().to_string();
        if !trimmed.is_empty() && !names.iter().any(|n| n.eq_ignore_ascii_case(&trimmed)) {
            names.push(trimmed);
        }
    }
    names
}

impl BiodiversitySource for GbifClient {
    async fn occurrence_found(&self, scientific_name: &str, country: &str) -> Result<bool, FloraError> {
        GbifClient::occurrence_found(self, scientific_name, country).await
    }

    async fn occurrence_images(&self, scientific_name: &str) -> Result<ImageLookup, FloraError> {
        GbifClient::occurrence_images(self, scientific_name).await
    }

    async fn common_names(&self, scientific_name: &str) -> Result<Vec<String>, FloraError> {
        GbifClient::common_names(self, scientific_name).await
    }
}
