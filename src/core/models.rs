use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stage {
    #[serde(deserialize_with = "id_as_string")]
    pub stage_id: String,
    pub stage_name: String,
}

impl Stage {
    /// The backend prepends a "Select stage" row with an empty id.
    pub fn is_placeholder(&self) -> bool {
        self.stage_id.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompoundProteinModel {
    #[serde(default)]
    pub protein: String,
    #[serde(default)]
    pub compound: String,
    #[serde(default)]
    pub pubchem_id: String,
    #[serde(default)]
    pub model: String,
}

impl CompoundProteinModel {
    pub fn has_structure(&self) -> bool {
        !self.model.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RatingSummary {
    #[serde(default)]
    pub average_rating: Option<f32>,
    #[serde(default)]
    pub review_count: u32,
    #[serde(default)]
    pub reviews_with_text: u32,
}

impl RatingSummary {
    pub fn average(&self) -> f32 {
        self.average_rating.unwrap_or(0.0)
    }
}

/// One organism row as returned by the backend for a stage.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Organism {
    #[serde(default)]
    pub data_id: Option<u64>,
    #[serde(default)]
    pub organism_id: u64,
    #[serde(default)]
    pub organism_name: String,
    #[serde(default)]
    pub organism_type: String,
    #[serde(default)]
    pub food: String,
    #[serde(default)]
    pub compound_protein_model: Vec<CompoundProteinModel>,
    #[serde(default)]
    pub rating: Option<RatingSummary>,
}

/// Externally sourced attributes attached to an organism for one country.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Enrichment {
    pub kingdom: String,
    pub found: bool,
    pub images: Vec<String>,
    pub common_names: Vec<String>,
    pub rating: Option<RatingSummary>,
}

impl Enrichment {
    pub fn fallback(organism: &Organism) -> Self {
        Self {
            kingdom: organism.organism_type.clone(),
            found: false,
            images: Vec::new(),
            common_names: Vec::new(),
            rating: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedOrganism {
    pub organism: Organism,
    pub enrichment: Enrichment,
}

impl EnrichedOrganism {
    pub fn name(&self) -> &str {
        &self.organism.organism_name
    }

    pub fn id(&self) -> u64 {
        self.organism.organism_id
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
    pub total: u64,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self { page: 1, per_page: 10, total: 0, total_pages: 0 }
    }
}

impl Pagination {
    pub fn with_per_page(per_page: u32) -> Self {
        Self { per_page, ..Self::default() }
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// 1-based index range of the rows on the current page, for "Showing x-y of z".
    pub fn showing_range(&self) -> Option<(u64, u64)> {
        if self.total == 0 {
            return None;
        }
        let start = (self.page.saturating_sub(1) as u64) * self.per_page as u64 + 1;
        let end = (start + self.per_page as u64 - 1).min(self.total);
        Some((start, end))
    }
}

#[derive(Debug, Clone)]
pub struct OrganismPage {
    pub organisms: Vec<Organism>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Review {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub organism_id: u64,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub reviewer_name: Option<String>,
    #[serde(default)]
    pub reviewer_email: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Review {
    pub fn reviewer(&self) -> &str {
        self.reviewer_name.as_deref().filter(|n| !n.trim().is_empty()).unwrap_or("Anonymous")
    }

    pub fn created_date(&self) -> Option<String> {
        let raw = self.created_at.as_deref()?;
        chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .or_else(|_| {
                chrono::DateTime::parse_from_rfc3339(raw).map(|dt| dt.format("%Y-%m-%d").to_string())
            })
            .ok()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewsData {
    #[serde(default)]
    pub reviews: Vec<Review>,
    #[serde(default)]
    pub average_rating: f32,
    #[serde(default)]
    pub review_count: u32,
}

/// Body of a rating POST.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingSubmission {
    pub rating: u8,
    pub review: String,
    pub user_name: String,
    pub user_email: String,
}

fn id_as_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => s,
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    })
}
