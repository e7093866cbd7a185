pub mod client;
pub mod error;
pub mod models;

pub use client::FilmClient;
pub use error::ApiError;
pub use models::*;
