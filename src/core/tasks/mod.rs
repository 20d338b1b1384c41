pub mod manager;
pub mod services;
pub mod types;

pub use manager::TaskManager;
pub use services::Services;
pub use types::TaskResult;
