use serde::{Deserialize, Serialize};

pub const DEFAULT_API_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p";
pub const DEFAULT_LANGUAGE: &str = "en-US";
pub const REQUEST_TIMEOUT_SECONDS: u64 = 10;
/// TMDB refuses `page` values above this for listing endpoints.
pub const LISTING_PAGE_CAP: u32 = 500;
pub const DEFAULT_SORT: &str = "popularity.desc";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TmdbConfig {
    pub base_url: String,
    pub language: String,
    pub timeout_secs: u64,
    #[serde(skip_serializing)]
    pub token: Option<String>,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
            language: DEFAULT_LANGUAGE.to_string(),
            timeout_secs: REQUEST_TIMEOUT_SECONDS,
            token: None,
        }
    }
}
