use reqwest::{
    Client,
    RequestBuilder,
};
use serde::{
    de::DeserializeOwned,
    Deserialize,
};

use crate::{
    controller::ResourceBackend,
    core::{
        http::join_url,
        models::{
            Organism,
            OrganismPage,
            Pagination,
            RatingSubmission,
            RatingSummary,
            ReviewsData,
            Stage,
        },
        FloraError,
    },
    enrichment::RatingSource,
    rating::RatingSink,
};

const DEFAULT_FAILURE: &str = "Failed to fetch data";

/// Every backend response is wrapped in this envelope.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<T>,
    pub pagination: Option<Pagination>,
    pub rating: Option<RatingSummary>,
}

impl<T> Envelope<T> {
    pub fn into_result(self) -> Result<Self, FloraError> {
        if self.success {
            Ok(self)
        } else {
            Err(FloraError::Backend(
                self.message.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| DEFAULT_FAILURE.to_string()),
            ))
        }
    }
}

/// Interprets a raw response. A JSON envelope wins over the HTTP status so that
/// `success: false` messages reach the user verbatim even on 4xx/5xx.
pub fn parse_envelope<T: DeserializeOwned>(status: u16, url: &str, body: &str) -> Result<Envelope<T>, FloraError> {
    match serde_json::from_str::<Envelope<T>>(body) {
        Ok(envelope) => envelope.into_result(),
        Err(_) if !(200..300).contains(&status) => Err(FloraError::Http { status, url: url.to_string() }),
        Err(e) => Err(FloraError::Json(e)),
    }
}

#[derive(Clone)]
pub struct BackendClient {
    http: Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self { http, base_url: base_url.into() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        join_url(&self.base_url, path)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<Envelope<T>, FloraError> {
        let resp = request.send().await?;
        let status = resp.status().as_u16();
        let url = resp.url().to_string();
        let body = resp.text().await?;
        parse_envelope(status, &url, &body)
    }

    pub async fn stages(&self) -> Result<Vec<Stage>, FloraError> {
        let envelope: Envelope<Vec<Stage>> =
            self.send(self.http.get(self.url("api/organisms/clinical-stages"))).await?;
        Ok(envelope.data.unwrap_or_default().into_iter().filter(|s| !s.is_placeholder()).collect())
    }

    pub async fn organisms(&self, stage: &str, page: u32, per_page: u32) -> Result<OrganismPage, FloraError> {
        let request = self.http.get(self.url("api/organisms")).query(&[
            ("stage", stage.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ]);
        let envelope: Envelope<Vec<Organism>> = self.send(request).await?;

        tracing::debug!(stage, page, per_page, rows = envelope.data.as_ref().map_or(0, |d| d.len()), "organism page");
        Ok(OrganismPage {
            organisms: envelope.data.unwrap_or_default(),
            pagination: envelope
                .pagination
                .unwrap_or(Pagination { page, per_page, ..Pagination::default() }),
        })
    }

    pub async fn rating(&self, organism_id: u64) -> Result<Option<RatingSummary>, FloraError> {
        let envelope: Envelope<serde_json::Value> =
            self.send(self.http.get(self.url(&format!("api/organisms/{organism_id}/rating")))).await?;
        Ok(envelope.rating.filter(|r| r.review_count > 0))
    }

    pub async fn submit_rating(&self, organism_id: u64, submission: &RatingSubmission) -> Result<(), FloraError> {
        let request =
            self.http.post(self.url(&format!("api/organisms/{organism_id}/rating"))).json(submission);
        let _: Envelope<serde_json::Value> = self.send(request).await?;
        tracing::info!(organism_id, rating = submission.rating, "rating submitted");
        Ok(())
    }

    pub async fn reviews(&self, organism_id: u64) -> Result<ReviewsData, FloraError> {
        let envelope: Envelope<ReviewsData> =
            self.send(self.http.get(self.url(&format!("api/organisms/{organism_id}/reviews")))).await?;
        Ok(envelope.data.unwrap_or_default())
    }
}

impl ResourceBackend for BackendClient {
    async fn organisms(&self, stage: &str, page: u32, per_page: u32) -> Result<OrganismPage, FloraError> {
        BackendClient::organisms(self, stage, page, per_page).await
    }
}

impl RatingSource for BackendClient {
    async fn rating_summary(&self, organism_id: u64) -> Result<Option<RatingSummary>, FloraError> {
        self.rating(organism_id).await
    }
}

impl RatingSink for BackendClient {
    async fn submit_rating(&self, organism_id: u64, submission: &RatingSubmission) -> Result<(), FloraError> {
        BackendClient::submit_rating(self, organism_id, submission).await
    }
}
