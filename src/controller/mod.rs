//! Paginated organism list for the selected stage and country.
//!
//! The controller itself never awaits: it hands out [`PageRequest`]s, the work runs
//! elsewhere ([`load_page`]), and results come back through [`ResourceListController::apply`].
//! Every request carries a generation; only the latest generation is ever published.

use crate::{
    core::{
        models::{
            EnrichedOrganism,
            OrganismPage,
            Pagination,
        },
        FloraError,
    },
    enrichment::{
        BiodiversitySource,
        Enricher,
        RatingSource,
    },
};

pub const MAX_PER_PAGE: u32 = 100;

#[allow(async_fn_in_trait)]
pub trait ResourceBackend {
    async fn organisms(&self, stage: &str, page: u32, per_page: u32) -> Result<OrganismPage, FloraError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub generation: u64,
    pub stage: String,
    pub country: Option<String>,
    pub page: u32,
    pub per_page: u32,
}

pub type PageResult = Result<(Vec<EnrichedOrganism>, Pagination), String>;

#[derive(Debug, Clone)]
pub struct PageOutcome {
    pub generation: u64,
    pub result: PageResult,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Idle,
    Loading,
    Failed(String),
    Ready,
}

/// Everything the resources panel draws, borrowed from the controller for one frame.
#[derive(Debug, Clone)]
pub struct ListView<'a> {
    pub status: ListStatus,
    pub stage: Option<&'a str>,
    pub country: Option<&'a str>,
    pub records: &'a [EnrichedOrganism],
    pub pagination: Pagination,
}

pub struct ResourceListController {
    stage: Option<String>,
    country: Option<String>,
    pagination: Pagination,
    records: Vec<EnrichedOrganism>,
    loading: bool,
    error: Option<String>,
    generation: u64,
    loaded: bool,
}

impl ResourceListController {
    pub fn new(per_page: u32) -> Self {
        Self {
            stage: None,
            country: None,
            pagination: Pagination::with_per_page(per_page.clamp(1, MAX_PER_PAGE)),
            records: Vec::new(),
            loading: false,
            error: None,
            generation: 0,
            loaded: false,
        }
    }

    pub fn stage(&self) -> Option<&str> {
        self.stage.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }

    pub fn pagination(&self) -> Pagination {
        self.pagination
    }

    pub fn records(&self) -> &[EnrichedOrganism] {
        &self.records
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn status(&self) -> ListStatus {
        if self.loading {
            ListStatus::Loading
        } else if let Some(error) = &self.error {
            ListStatus::Failed(error.clone())
        } else if self.loaded {
            ListStatus::Ready
        } else {
            ListStatus::Idle
        }
    }

    pub fn view(&self) -> ListView<'_> {
        ListView {
            status: self.status(),
            stage: self.stage(),
            country: self.country(),
            records: &self.records,
            pagination: self.pagination,
        }
    }

    fn reset_pagination(&mut self) {
        self.pagination = Pagination::with_per_page(self.pagination.per_page);
    }

    /// Drops whatever is in flight without issuing anything new.
    pub fn invalidate(&mut self) {
        self.generation += 1;
        self.loading = false;
    }

    /// Returns true when the selection actually changed.
    pub fn select_stage(&mut self, stage: Option<String>) -> bool {
        let stage = stage.filter(|s| !s.trim().is_empty());
        if stage == self.stage {
            return false;
        }

        self.stage = stage;
        self.records.clear();
        self.error = None;
        self.loaded = false;
        self.reset_pagination();
        self.invalidate();
        true
    }

    /// Enrichment belongs to the country it was fetched for, so rows are dropped too.
    pub fn select_country(&mut self, country: Option<String>) -> bool {
        let country = country.filter(|c| !c.trim().is_empty());
        if country == self.country {
            return false;
        }

        self.country = country;
        self.records.clear();
        self.error = None;
        self.loaded = false;
        self.reset_pagination();
        self.invalidate();
        true
    }

    /// Selects `country` and, when a list was shown, loading or failed, asks for
    /// page 1 again under the new country.
    pub fn change_country(&mut self, country: Option<String>) -> Option<PageRequest> {
        let active = self.loaded || self.loading || self.error.is_some();
        if !self.select_country(country) || !active {
            return None;
        }
        self.request_page(1).ok().flatten()
    }

    /// Starts loading `page` of the current stage.
    ///
    /// `Ok(None)` means there is nothing to load (no stage selected). Pages outside
    /// `1..=total_pages` are rejected; before anything is known only page 1 is valid.
    pub fn request_page(&mut self, page: u32) -> Result<Option<PageRequest>, FloraError> {
        let Some(stage) = self.stage.clone() else {
            self.loading = false;
            return Ok(None);
        };

        let max_page = self.pagination.total_pages.max(1);
        if page == 0 || page > max_page {
            return Err(FloraError::PageOutOfRange { page, total_pages: max_page });
        }

        self.generation += 1;
        self.loading = true;
        self.error = None;

        Ok(Some(PageRequest {
            generation: self.generation,
            stage,
            country: self.country.clone(),
            page,
            per_page: self.pagination.per_page,
        }))
    }

    pub fn reload(&mut self) -> Result<Option<PageRequest>, FloraError> {
        self.request_page(self.pagination.page.max(1))
    }

    /// Publishes a finished load. Returns false when the outcome was superseded.
    pub fn apply(&mut self, outcome: PageOutcome) -> bool {
        if outcome.generation != self.generation {
            tracing::debug!(
                stale = outcome.generation,
                current = self.generation,
                "Dropping superseded page load"
            );
            return false;
        }

        self.loading = false;
        match outcome.result {
            Ok((records, pagination)) => {
                self.records = records;
                self.pagination = pagination;
                self.error = None;
                self.loaded = true;
            }
            Err(message) => {
                self.error = Some(message);
            }
        }
        true
    }

    /// Request, load and publish in one go.
    pub async fn load<B, S, R>(
        &mut self,
        backend: &B,
        enricher: &Enricher<S, R>,
        page: u32,
    ) -> Result<bool, FloraError>
    where
        B: ResourceBackend,
        S: BiodiversitySource,
        R: RatingSource,
    {
        let Some(request) = self.request_page(page)? else {
            return Ok(false);
        };
        let outcome = load_page(backend, enricher, &request).await;
        Ok(self.apply(outcome))
    }
}

/// Fetches one page and enriches it for the request's country.
pub async fn load_page<B, S, R>(backend: &B, enricher: &Enricher<S, R>, request: &PageRequest) -> PageOutcome
where
    B: ResourceBackend,
    S: BiodiversitySource,
    R: RatingSource,
{
    let result = match backend.organisms(&request.stage, request.page, request.per_page).await {
        Ok(page) => {
            let enriched = enricher.enrich(&page.organisms, request.country.as_deref()).await;
            Ok((enriched, page.pagination))
        }
        Err(e) => {
            tracing::error!(stage = %request.stage, page = request.page, "Error fetching organisms: {}", e);
            Err(e.user_message())
        }
    };

    PageOutcome { generation: request.generation, result }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::Mutex,
    };

    use super::*;
    use crate::{
        core::models::{
            Organism,
            RatingSubmission,
            RatingSummary,
        },
        enrichment::{
            tests::{
                organism,
                FakeRatings,
                FakeSource,
            },
            ImageLookup,
        },
        rating::{
            RatingFlow,
            RatingSink,
            RatingTarget,
            SubmitOutcome,
        },
    };

    #[derive(Default)]
    struct FakeBackend {
        pages: HashMap<(String, u32), Result<OrganismPage, String>>,
        calls: Mutex<Vec<(String, u32, u32)>>,
    }

    impl FakeBackend {
        fn with_page(mut self, stage: &str, page: u32, organisms: Vec<Organism>, total: u64) -> Self {
            let per_page = 10;
            let total_pages = ((total + per_page as u64 - 1) / per_page as u64) as u32;
            self.pages.insert(
                (stage.to_string(), page),
                Ok(OrganismPage { organisms, pagination: Pagination { page, per_page, total, total_pages } }),
            );
            self
        }

        fn call_count(&self) -> usize {
            self.calls.lock().unwrap().len()
        }
    }

    impl ResourceBackend for FakeBackend {
        async fn organisms(&self, stage: &str, page: u32, per_page: u32) -> Result<OrganismPage, FloraError> {
            self.calls.lock().unwrap().push((stage.to_string(), page, per_page));
            match self.pages.get(&(stage.to_string(), page)) {
                Some(Ok(page)) => Ok(page.clone()),
                Some(Err(message)) => Err(FloraError::Backend(message.clone())),
                None => Err(FloraError::Http { status: 500, url: "/api/organisms".to_string() }),
            }
        }
    }

    fn three_organisms() -> Vec<Organism> {
        vec![
            organism(1, "Curcuma longa", "Herb"),
            organism(2, "Boswellia serrata", "Tree"),
            organism(3, "Zingiber officinale", "Herb"),
        ]
    }

    #[tokio::test]
    async fn no_stage_is_idle_without_request() {
        let backend = FakeBackend::default();
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());
        let mut controller = ResourceListController::new(10);

        assert!(!controller.load(&backend, &enricher, 1).await.unwrap());
        assert_eq!(controller.status(), ListStatus::Idle);
        assert_eq!(backend.call_count(), 0);
    }

    #[tokio::test]
    async fn moderate_stage_in_germany_shows_three_rows() {
        let backend = FakeBackend::default().with_page("moderate", 1, three_organisms(), 3);
        let mut source = FakeSource::default();
        source.found_in.insert(("Curcuma longa".to_string(), "DE".to_string()));
        source.images.insert(
            "Curcuma longa".to_string(),
            ImageLookup { images: vec!["https://img/1.jpg".into(), "https://img/2.jpg".into()], kingdom: Some("Plantae".into()) },
        );
        let enricher = Enricher::new(source, FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("moderate".to_string()));
        controller.select_country(Some("DE".to_string()));

        assert!(controller.load(&backend, &enricher, 1).await.unwrap());
        let view = controller.view();
        assert_eq!(view.status, ListStatus::Ready);
        assert_eq!((view.stage, view.country), (Some("moderate"), Some("DE")));
        assert_eq!(controller.records().len(), 3);
        assert!(controller.records().iter().all(|r| r.enrichment.images.len() <= 2));
        assert!(controller.records()[0].enrichment.found);
        assert!(!controller.records()[1].enrichment.found);
        assert_eq!(controller.pagination().total_pages, 1);
        assert_eq!(backend.calls.lock().unwrap()[0], ("moderate".to_string(), 1, 10));
    }

    #[tokio::test]
    async fn failure_keeps_previous_rows() {
        let mut backend = FakeBackend::default().with_page("early", 1, three_organisms(), 25);
        backend.pages.insert(("early".to_string(), 2), Err("Failed to fetch organisms data".to_string()));
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("early".to_string()));
        controller.load(&backend, &enricher, 1).await.unwrap();
        controller.load(&backend, &enricher, 2).await.unwrap();

        assert_eq!(controller.status(), ListStatus::Failed("Failed to fetch organisms data".to_string()));
        assert_eq!(controller.records().len(), 3);
        assert_eq!(controller.pagination().page, 1);
    }

    #[tokio::test]
    async fn pages_beyond_total_are_rejected() {
        let backend = FakeBackend::default().with_page("severe", 1, three_organisms(), 3);
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("severe".to_string()));

        assert!(matches!(controller.request_page(2), Err(FloraError::PageOutOfRange { page: 2, total_pages: 1 })));
        controller.load(&backend, &enricher, 1).await.unwrap();

        let err = controller.load(&backend, &enricher, 5).await.unwrap_err();
        assert!(matches!(err, FloraError::PageOutOfRange { page: 5, total_pages: 1 }));
        assert!(controller.request_page(0).is_err());
        assert_eq!(backend.call_count(), 1);
        assert_eq!(controller.status(), ListStatus::Ready);
    }

    #[tokio::test]
    async fn stale_outcomes_are_dropped() {
        let backend = FakeBackend::default()
            .with_page("early", 1, three_organisms(), 30)
            .with_page("early", 2, vec![organism(9, "Salix alba", "Tree")], 30);
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("early".to_string()));
        controller.load(&backend, &enricher, 1).await.unwrap();

        // Page 2 is requested, then page 3 supersedes it before page 2 arrives.
        let first = controller.request_page(2).unwrap().unwrap();
        let second = controller.request_page(3).unwrap().unwrap();
        assert!(second.generation > first.generation);

        let stale = load_page(&backend, &enricher, &first).await;
        assert!(!controller.apply(stale));
        assert!(controller.is_loading());
        assert_eq!(controller.records()[0].id(), 1);

        let latest = PageOutcome { generation: second.generation, result: Err("gone".to_string()) };
        assert!(controller.apply(latest));
        assert!(!controller.is_loading());
    }

    #[tokio::test]
    async fn changing_selection_resets_to_first_page_and_invalidates() {
        let backend = FakeBackend::default()
            .with_page("early", 1, three_organisms(), 30)
            .with_page("early", 2, vec![organism(9, "Salix alba", "Tree")], 30);
        let enricher = Enricher::new(FakeSource::default(), FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("early".to_string()));
        controller.load(&backend, &enricher, 1).await.unwrap();
        controller.load(&backend, &enricher, 2).await.unwrap();
        assert_eq!(controller.pagination().page, 2);

        let in_flight = controller.request_page(3).unwrap().unwrap();
        assert!(controller.select_country(Some("FR".to_string())));
        assert_eq!(controller.pagination().page, 1);
        assert!(!controller.apply(PageOutcome { generation: in_flight.generation, result: Err("late".into()) }));

        assert!(controller.select_stage(Some("advanced".to_string())));
        assert_eq!(controller.pagination().page, 1);
        assert!(controller.records().is_empty());
        assert!(!controller.select_stage(Some("advanced".to_string())));

        let request = controller.reload().unwrap().unwrap();
        assert_eq!((request.stage.as_str(), request.page, request.country.as_deref()), ("advanced", 1, Some("FR")));
    }

    #[tokio::test]
    async fn country_change_mid_load_reloads_first_page() {
        let backend = FakeBackend::default()
            .with_page("early", 1, three_organisms(), 30)
            .with_page("early", 2, vec![organism(9, "Salix alba", "Tree")], 30);
        let mut source = FakeSource::default();
        source.found_in.insert(("Curcuma longa".to_string(), "DE".to_string()));
        let enricher = Enricher::new(source, FakeRatings::default());

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("early".to_string()));
        controller.select_country(Some("DE".to_string()));
        controller.load(&backend, &enricher, 1).await.unwrap();
        assert!(controller.records()[0].enrichment.found);

        let in_flight = controller.request_page(2).unwrap().unwrap();
        assert_eq!(controller.status(), ListStatus::Loading);

        let request = controller.change_country(Some("FR".to_string())).unwrap();
        assert_eq!((request.page, request.country.as_deref()), (1, Some("FR")));
        assert_eq!(controller.status(), ListStatus::Loading);
        assert!(controller.records().is_empty());

        assert!(!controller.apply(load_page(&backend, &enricher, &in_flight).await));
        assert!(controller.apply(load_page(&backend, &enricher, &request).await));

        let view = controller.view();
        assert_eq!((view.status, view.country), (ListStatus::Ready, Some("FR")));
        assert!(view.records.iter().all(|r| !r.enrichment.found));
        assert_eq!(view.pagination.total_pages, 3);
    }

    #[test]
    fn country_change_before_any_load_requests_nothing() {
        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("early".to_string()));

        assert!(controller.change_country(Some("FR".to_string())).is_none());
        assert_eq!(controller.country(), Some("FR"));
        assert_eq!(controller.status(), ListStatus::Idle);
        assert!(controller.change_country(Some("FR".to_string())).is_none());
    }

    struct RecordingSink<'a> {
        ratings: &'a FakeRatings,
        submitted: Mutex<Vec<(u64, RatingSubmission)>>,
    }

    impl RatingSink for RecordingSink<'_> {
        async fn submit_rating(&self, organism_id: u64, submission: &RatingSubmission) -> Result<(), FloraError> {
            self.submitted.lock().unwrap().push((organism_id, submission.clone()));
            let mut summaries = self.ratings.summaries.lock().unwrap();
            let summary = summaries.entry(organism_id).or_insert_with(RatingSummary::default);
            let total = summary.average() * summary.review_count as f32 + submission.rating as f32;
            summary.review_count += 1;
            summary.average_rating = Some(total / summary.review_count as f32);
            Ok(())
        }
    }

    #[tokio::test]
    async fn submitted_rating_is_visible_after_reload() {
        let backend = FakeBackend::default().with_page("moderate", 1, three_organisms(), 3);
        let ratings = FakeRatings::default();
        ratings.summaries.lock().unwrap().insert(
            2,
            RatingSummary { average_rating: Some(5.0), review_count: 1, reviews_with_text: 0 },
        );
        let enricher = Enricher::new(FakeSource::default(), ratings);

        let mut controller = ResourceListController::new(10);
        controller.select_stage(Some("moderate".to_string()));
        controller.load(&backend, &enricher, 1).await.unwrap();

        let sink = RecordingSink { ratings: enricher.ratings(), submitted: Mutex::new(Vec::new()) };
        let mut flow = RatingFlow::new();
        flow.open(RatingTarget { organism_id: 2, organism_name: "Boswellia serrata".to_string() });
        flow.set_rating(4);
        flow.draft_mut().review = "Helped with stiffness".to_string();

        let outcome = flow.submit(&sink).await;
        assert_eq!(outcome, SubmitOutcome::Reload);
        assert_eq!(sink.submitted.lock().unwrap()[0].1.review, "Helped with stiffness");

        assert!(controller.load(&backend, &enricher, controller.pagination().page).await.unwrap());
        let rating = controller.records()[1].enrichment.rating.clone().unwrap();
        assert_eq!(rating.review_count, 2);
        assert_eq!(rating.average_rating, Some(4.5));
    }
}
