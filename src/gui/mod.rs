pub mod about_modal;
pub mod app;
pub mod error_modal;
pub mod message_overlay;
pub mod modal;
pub mod rating_modal;
pub mod resources_table;
pub mod reviews_modal;
pub mod stars;
pub mod structure_modal;
pub mod theme;
pub mod top_bar;
pub mod world_map;

pub use app::FloraApp;
pub use world_map::MapHandle;
