pub mod api;

pub use api::{
    BackendClient,
    Envelope,
};
