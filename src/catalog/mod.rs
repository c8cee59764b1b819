//! Catalog browsing on top of the metadata client: paginated feeds, filter
//! selection and link building.

pub mod feed;
pub mod filters;
pub mod links;
pub mod source;

pub use feed::{FeedQuery, FetchOutcome, InfiniteFeed};
pub use filters::{FilterSelection, Filters};
pub use links::{PlayTarget, PosterSize};
pub use source::CatalogSource;
