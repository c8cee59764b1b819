pub mod client;
pub mod config;
pub mod error;
pub mod models;

pub use client::TmdbClient;
pub use config::*;
pub use error::TmdbError;
pub use models::*;
