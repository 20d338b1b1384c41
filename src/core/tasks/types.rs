use crate::{
    controller::PageOutcome,
    core::{
        models::{
            ReviewsData,
            Stage,
        },
        structure::StructureSummary,
    },
};

#[derive(Debug, Clone)]
pub enum TaskResult {
    StagesLoaded(Result<Vec<Stage>, String>),
    PageLoaded(PageOutcome),

    RatingSubmitted(Result<(), String>),
    ReviewsLoaded { organism_name: String, result: Result<ReviewsData, String> },

    StructureLoaded { file_name: String, result: Result<StructureSummary, String> },

    CacheSwept(usize),
}

impl TaskResult {
    pub fn task_type(&self) -> &'static str {
        match self {
            TaskResult::StagesLoaded(_) => "stages",
            TaskResult::PageLoaded(_) => "page",
            TaskResult::RatingSubmitted(_) => "rating_submit",
            TaskResult::ReviewsLoaded { .. } => "reviews",
            TaskResult::StructureLoaded { .. } => "structure",
            TaskResult::CacheSwept(_) => "cache_sweep",
        }
    }
}
