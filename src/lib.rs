//! Movie and series catalog browsing on top of TMDB, a local "My List" of
//! saved titles, and a toy block ledger.

pub mod catalog;
pub mod config;
pub mod errors;
pub mod favorites;
pub mod ledger;
pub mod tmdb;

pub use config::AppConfig;
pub use errors::AppError;
pub use favorites::{FavoriteItem, FavoritesStore, Notice};
