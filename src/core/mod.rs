pub mod countries;
pub mod errors;
pub mod http;
pub mod models;
pub mod settings;
pub mod structure;
pub mod tasks;

pub use errors::FloraError;
pub use models::{
    EnrichedOrganism,
    Organism,
    Pagination,
    Stage,
};
pub use settings::AppSettings;
