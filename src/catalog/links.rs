use crate::tmdb::{MediaType, DEFAULT_IMAGE_BASE_URL};

pub const DEFAULT_PLAYER_BASE_URL: &str = "https://vidsrc.xyz/embed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PosterSize {
    /// Grid cards.
    Card,
    /// Detail banner.
    Original,
}

impl PosterSize {
    pub fn as_str(&self) -> &'static str {
        match self {
            PosterSize::Card => "w500",
            PosterSize::Original => "original",
        }
    }
}

pub fn poster_url(base: &str, poster_path: &str, size: PosterSize) -> String {
    format!(
        "{}/{}{}",
        base.trim_end_matches('/'),
        size.as_str(),
        poster_path
    )
}

pub fn default_poster_url(poster_path: &str, size: PosterSize) -> String {
    poster_url(DEFAULT_IMAGE_BASE_URL, poster_path, size)
}

/// What the embedded player should start on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayTarget {
    Movie { id: u64 },
    Episode { series_id: u64, season: u32, episode: u32 },
}

impl PlayTarget {
    /// Series start on the first listed season, episode 1, unless told
    /// otherwise. A leading specials season (number 0) is skipped for season 1.
    pub fn series(
        series_id: u64,
        season: Option<u32>,
        episode: Option<u32>,
        first_season: Option<u32>,
    ) -> Self {
        PlayTarget::Episode {
            series_id,
            season: season
                .or(first_season.filter(|&n| n != 0))
                .unwrap_or(1),
            episode: episode.unwrap_or(1),
        }
    }

    pub fn player_url(&self, base: &str) -> String {
        let base = base.trim_end_matches('/');
        match self {
            PlayTarget::Movie { id } => format!("{}/movie/{}", base, id),
            PlayTarget::Episode {
                series_id,
                season,
                episode,
            } => format!("{}/tv/{}/{}/{}", base, series_id, season, episode),
        }
    }
}

pub fn detail_route(media: MediaType, id: u64) -> String {
    format!("/{}/{}", media.route(), id)
}
