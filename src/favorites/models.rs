use serde::{Deserialize, Serialize};

use crate::tmdb::{CatalogItem, MediaType};

/// A catalog entry the user bookmarked. Field names match the stored JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteItem {
    pub id: u64,
    #[serde(default, alias = "name")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub poster_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<MediaType>,
}

impl FavoriteItem {
    pub fn new(id: u64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            poster_path: None,
            media_type: None,
        }
    }

    pub fn with_poster(mut self, poster_path: impl Into<String>) -> Self {
        self.poster_path = Some(poster_path.into());
        self
    }

    pub fn with_media(mut self, media: MediaType) -> Self {
        self.media_type = Some(media);
        self
    }

    /// Entries saved without a media type route as movies.
    pub fn media(&self) -> MediaType {
        self.media_type.unwrap_or_default()
    }
}

impl From<&CatalogItem> for FavoriteItem {
    fn from(item: &CatalogItem) -> Self {
        FavoriteItem {
            id: item.id,
            title: item.display_title().to_string(),
            poster_path: item.poster_path.clone(),
            media_type: item.media(),
        }
    }
}

/// User-facing outcome of a list mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    Added,
    AlreadyPresent,
    Removed,
}

impl Notice {
    pub fn message(&self) -> &'static str {
        match self {
            Notice::Added => "Added to My List",
            Notice::AlreadyPresent => "Already in My List",
            Notice::Removed => "Removed from My List",
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self, Notice::AlreadyPresent)
    }
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}
