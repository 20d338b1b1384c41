pub mod backend;
pub mod cache;
pub mod controller;
pub mod core;
pub mod enrichment;
pub mod gbif;
pub mod gui;
pub mod persistence;
pub mod rating;

pub use crate::core::{
    AppSettings,
    FloraError,
};
