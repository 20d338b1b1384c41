use futures::future::join_all;
use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    core::{
        models::{
            EnrichedOrganism,
            Enrichment,
            Organism,
            RatingSummary,
        },
        FloraError,
    },
    gbif::IMAGE_LIMIT,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageLookup {
    pub images: Vec<String>,
    pub kingdom: Option<String>,
}

#[allow(async_fn_in_trait)]
pub trait BiodiversitySource {
    async fn occurrence_found(&self, scientific_name: &str, country: &str) -> Result<bool, FloraError>;
    async fn occurrence_images(&self, scientific_name: &str) -> Result<ImageLookup, FloraError>;
    async fn common_names(&self, scientific_name: &str) -> Result<Vec<String>, FloraError>;
}

#[allow(async_fn_in_trait)]
pub trait RatingSource {
    async fn rating_summary(&self, organism_id: u64) -> Result<Option<RatingSummary>, FloraError>;
}

pub struct Enricher<S, R> {
    source: S,
    ratings: R,
}

impl<S: BiodiversitySource, R: RatingSource> Enricher<S, R> {
    pub fn new(source: S, ratings: R) -> Self {
        Self { source, ratings }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn ratings(&self) -> &R {
        &self.ratings
    }

    /// Enriches every organism for `country`. Output order matches input order and
    /// a failed lookup only degrades the organism it belongs to.
    pub async fn enrich(&self, organisms: &[Organism], country: Option<&str>) -> Vec<EnrichedOrganism> {
        join_all(organisms.iter().map(|organism| self.enrich_one(organism, country))).await
    }

    async fn enrich_one(&self, organism: &Organism, country: Option<&str>) -> EnrichedOrganism {
        let name = organism.organism_name.as_str();

        let occurrence = async {
            match country.filter(|c| !c.trim().is_empty()) {
                Some(country) => self.source.occurrence_found(name, country).await,
                None => Ok(false),
            }
        };

        let (occurrence, images, common_names, rating) = futures::join!(
            occurrence,
            self.source.occurrence_images(name),
            self.source.common_names(name),
            self.ratings.rating_summary(organism.organism_id)
        );

        // The list page already carries a summary; it stands in when the lookup has nothing.
        let rating = match rating {
            Ok(summary) => summary.or_else(|| organism.rating.clone()),
            Err(e) => {
                tracing::warn!(organism_id = organism.organism_id, "Rating lookup failed: {}", e);
                organism.rating.clone()
            }
        };

        let common_names = common_names.unwrap_or_else(|e| {
            tracing::debug!(organism = %name, "Common name lookup failed: {}", e);
            Vec::new()
        });

        let enrichment = match (occurrence, images) {
            (Ok(found), Ok(lookup)) => Enrichment {
                kingdom: lookup
                    .kingdom
                    .filter(|k| !k.trim().is_empty())
                    .unwrap_or_else(|| organism.organism_type.clone()),
                found,
                images: lookup.images.into_iter().take(IMAGE_LIMIT).collect(),
                common_names,
                rating,
            },
            (occurrence, images) => {
                let error = occurrence.err().or(images.err());
                if let Some(e) = error {
                    tracing::warn!(organism = %name, "GBIF lookup failed: {}", e);
                }
                Enrichment { common_names, rating, ..Enrichment::fallback(organism) }
            }
        };

        EnrichedOrganism { organism: organism.clone(), enrichment }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::{
        collections::{
            HashMap,
            HashSet,
        },
        sync::Mutex,
        time::Duration,
    };

    use super::*;

    /// In-memory stand-in for GBIF: names listed in `failing_*` error out,
    /// `delays` lets later records finish before earlier ones.
    #[derive(Default)]
    pub(crate) struct FakeSource {
        pub found_in: HashSet<(String, String)>,
        pub images: HashMap<String, ImageLookup>,
        pub failing_occurrence: HashSet<String>,
        pub failing_images: HashSet<String>,
        pub common_names: HashMap<String, Vec<String>>,
        pub failing_names: HashSet<String>,
        pub delays: HashMap<String, u64>,
        pub calls: Mutex<Vec<String>>,
    }

    impl FakeSource {
        async fn delay(&self, name: &str) {
            if let Some(ms) = self.delays.get(name) {
                tokio::time::sleep(Duration::from_millis(*ms)).await;
            }
        }
    }

    impl BiodiversitySource for FakeSource {
        async fn occurrence_found(&self, scientific_name: &str, country: &str) -> Result<bool, FloraError> {
            self.calls.lock().unwrap().push(format!("occurrence:{scientific_name}:{country}"));
            self.delay(scientific_name).await;
            if self.failing_occurrence.contains(scientific_name) {
                return Err(FloraError::Http { status: 503, url: "occurrence/search".to_string() });
            }
            Ok(self.found_in.contains(&(scientific_name.to_string(), country.to_string())))
        }

        async fn occurrence_images(&self, scientific_name: &str) -> Result<ImageLookup, FloraError> {
            self.delay(scientific_name).await;
            if self.failing_images.contains(scientific_name) {
                return Err(FloraError::Custom("network error".to_string()));
            }
            Ok(self.images.get(scientific_name).cloned().unwrap_or_default())
        }

        async fn common_names(&self, scientific_name: &str) -> Result<Vec<String>, FloraError> {
            if self.failing_names.contains(scientific_name) {
                return Err(FloraError::Http { status: 404, url: "species/match".to_string() });
            }
            Ok(self.common_names.get(scientific_name).cloned().unwrap_or_default())
        }
    }

    #[derive(Default)]
    pub(crate) struct FakeRatings {
        pub summaries: Mutex<HashMap<u64, RatingSummary>>,
        pub failing: HashSet<u64>,
    }

    impl RatingSource for FakeRatings {
        async fn rating_summary(&self, organism_id: u64) -> Result<Option<RatingSummary>, FloraError> {
            if self.failing.contains(&organism_id) {
                return Err(FloraError::Backend("Failed to fetch rating".to_string()));
            }
            Ok(self.summaries.lock().unwrap().get(&organism_id).cloned())
        }
    }

    pub(crate) fn organism(id: u64, name: &str, organism_type: &str) -> Organism {
        Organism {
            organism_id: id,
            organism_name: name.to_string(),
            organism_type: organism_type.to_string(),
            ..Organism::default()
        }
    }

    fn plant_images(urls: &[&str]) -> ImageLookup {
        ImageLookup {
            images: urls.iter().map(|u| u.to_string()).collect(),
            kingdom: Some("Plantae".to_string()),
        }
    }

    #[tokio::test]
    async fn output_preserves_input_order_regardless_of_completion() {
        let mut source = FakeSource::default();
        source.delays.insert("Zingiber officinale".to_string(), 40);
        source.delays.insert("Boswellia serrata".to_string(), 20);
        let enricher = Enricher::new(source, FakeRatings::default());

        let input = vec![
            organism(1, "Zingiber officinale", "Plant"),
            organism(2, "Boswellia serrata", "Plant"),
            organism(3, "Curcuma longa", "Plant"),
        ];
        let output = enricher.enrich(&input, Some("DE")).await;

        let ids: Vec<u64> = output.iter().map(|o| o.id()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(output.len(), input.len());
    }

    #[tokio::test]
    async fn occurrence_failure_is_isolated_to_its_record() {
        let mut source = FakeSource::default();
        source.failing_occurrence.insert("Boswellia serrata".to_string());
        source.found_in.insert(("Curcuma longa".to_string(), "DE".to_string()));
        source.images.insert("Curcuma longa".to_string(), plant_images(&["https://img/1.jpg"]));
        let enricher = Enricher::new(source, FakeRatings::default());

        let output = enricher
            .enrich(&[organism(1, "Boswellia serrata", "Tree"), organism(2, "Curcuma longa", "Plant")], Some("DE"))
            .await;

        assert!(!output[0].enrichment.found);
        assert!(output[0].enrichment.images.is_empty());
        assert_eq!(output[0].enrichment.kingdom, "Tree");

        assert!(output[1].enrichment.found);
        assert_eq!(output[1].enrichment.kingdom, "Plantae");
        assert_eq!(output[1].enrichment.images, vec!["https://img/1.jpg"]);
    }

    #[tokio::test]
    async fn image_failure_falls_back_to_declared_type() {
        let mut source = FakeSource::default();
        source.failing_images.insert("Curcuma longa".to_string());
        source.found_in.insert(("Curcuma longa".to_string(), "IN".to_string()));
        let enricher = Enricher::new(source, FakeRatings::default());

        let output = enricher.enrich(&[organism(7, "Curcuma longa", "Herb")], Some("IN")).await;

        let enrichment = &output[0].enrichment;
        assert!(enrichment.images.is_empty());
        assert_eq!(enrichment.kingdom, "Herb");
        assert!(!enrichment.found);
    }

    #[tokio::test]
    async fn images_are_capped_and_kingdom_falls_back_when_missing() {
        let mut source = FakeSource::default();
        source.images.insert(
            "Salix alba".to_string(),
            ImageLookup { images: vec!["a".into(), "b".into(), "c".into()], kingdom: None },
        );
        let enricher = Enricher::new(source, FakeRatings::default());

        let output = enricher.enrich(&[organism(1, "Salix alba", "Tree")], Some("FR")).await;
        assert_eq!(output[0].enrichment.images.len(), 2);
        assert_eq!(output[0].enrichment.kingdom, "Tree");
    }

    #[tokio::test]
    async fn no_country_skips_occurrence_lookup() {
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());
        let output = enricher.enrich(&[organism(1, "Curcuma longa", "Herb")], None).await;

        assert!(!output[0].enrichment.found);
        assert!(enricher.source().calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rating_lookup_and_fallbacks() {
        let ratings = FakeRatings::default();
        ratings.summaries.lock().unwrap().insert(
            1,
            RatingSummary { average_rating: Some(4.0), review_count: 3, reviews_with_text: 1 },
        );
        let ratings = FakeRatings { failing: HashSet::from([3]), ..ratings };
        let enricher = Enricher::new(FakeSource::default(), ratings);

        let mut embedded = organism(2, "Arnica montana", "Plant");
        embedded.rating = Some(RatingSummary { average_rating: Some(3.5), review_count: 2, reviews_with_text: 0 });

        let output = enricher
            .enrich(&[organism(1, "Curcuma longa", "Herb"), embedded, organism(3, "Salix alba", "Tree")], Some("DE"))
            .await;

        assert_eq!(output[0].enrichment.rating.as_ref().unwrap().review_count, 3);
        assert_eq!(output[1].enrichment.rating.as_ref().unwrap().average(), 3.5);
        assert!(output[2].enrichment.rating.is_none());
    }

    #[tokio::test]
    async fn failed_rating_lookup_keeps_embedded_summary() {
        let ratings = FakeRatings { failing: HashSet::from([4]), ..FakeRatings::default() };
        let enricher = Enricher::new(FakeSource::default(), ratings);

        let mut rated = organism(4, "Arnica montana", "Plant");
        rated.rating = Some(RatingSummary { average_rating: Some(4.5), review_count: 2, reviews_with_text: 1 });

        let output = enricher.enrich(&[rated], Some("DE")).await;
        let rating = output[0].enrichment.rating.as_ref().unwrap();
        assert_eq!(rating.review_count, 2);
        assert_eq!(rating.average(), 4.5);
    }

    #[tokio::test]
    async fn common_names_survive_gbif_failures() {
        let mut source = FakeSource::default();
        source.common_names.insert("Curcuma longa".to_string(), vec!["Turmeric".to_string()]);
        source.common_names.insert("Salix alba".to_string(), vec!["White willow".to_string()]);
        source.failing_images.insert("Salix alba".to_string());
        source.failing_names.insert("Boswellia serrata".to_string());
        let enricher = Enricher::new(source, FakeRatings::default());

        let output = enricher
            .enrich(
                &[
                    organism(1, "Curcuma longa", "Herb"),
                    organism(2, "Salix alba", "Tree"),
                    organism(3, "Boswellia serrata", "Tree"),
                ],
                Some("DE"),
            )
            .await;

        assert_eq!(output[0].enrichment.common_names, vec!["Turmeric"]);
        assert_eq!(output[1].enrichment.common_names, vec!["White willow"]);
        assert_eq!(output[1].enrichment.kingdom, "Tree");
        assert!(output[2].enrichment.common_names.is_empty());
    }

    #[tokio::test]
    async fn original_records_are_not_mutated() {
        let mut source = FakeSource::default();
        source.images.insert("Curcuma longa".to_string(), plant_images(&["https://img/1.jpg"]));
        let enricher = Enricher::new(source, FakeRatings::default());

        let input = vec![organism(1, "Curcuma longa", "Herb")];
        let snapshot = input.clone();
        let output = enricher.enrich(&input, Some("DE")).await;

        assert_eq!(input, snapshot);
        assert_eq!(output[0].organism, snapshot[0]);
    }
}
