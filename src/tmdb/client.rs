use futures_util::future::join_all;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::config::*;
use super::error::TmdbError;
use super::models::*;
use crate::catalog::filters::Filters;

pub struct TmdbClient {
    client: Client,
    base_url: String,
    language: String,
    token: String,
}

impl TmdbClient {
    pub fn new(config: &TmdbConfig) -> Result<Self, TmdbError> {
        let token = config
            .token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .ok_or(TmdbError::MissingToken)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            language: config.language.clone(),
            token,
        })
    }

    async fn get_json<T>(
        &self,
        path: &str,
        params: &[(&str, String)],
        operation: &str,
    ) -> Result<T, TmdbError>
    where
        T: DeserializeOwned,
    {
        let url = format!("{}{}", self.base_url, path);
        let url = reqwest::Url::parse_with_params(&url, params)
            .map_err(|e| TmdbError::NetworkError(format!("URL parse error: {}", e)))?;

        log::debug!("[{}] GET {}", operation, url);

        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .header("Content-Type", "application/json")
            .send()
            .await?;

        let status = response.status();
        let url_debug = response.url().path().to_string();

        let text = response
            .text()
            .await
            .map_err(|e| TmdbError::NetworkError(e.to_string()))?;

        match status.as_u16() {
            404 => {
                log::warn!("[{}] Not found at {}", operation, url_debug);
                return Err(TmdbError::NotFound(url_debug));
            }
            401 => {
                log::warn!("[{}] Token rejected at {}", operation, url_debug);
                return Err(TmdbError::Unauthorized);
            }
            _ if !status.is_success() => {
                log::warn!("[{}] Request failed ({}) at {}", operation, status, url_debug);
                return Err(TmdbError::Http {
                    status: status.as_u16(),
                    body: text,
                });
            }
            _ => {}
        }

        serde_json::from_str(&text)
            .map_err(|e| TmdbError::ParseError(format!("JSON error at {}: {}", url_debug, e)))
    }

    fn language_param(&self) -> (&'static str, String) {
        ("language", self.language.clone())
    }

    pub async fn movie(&self, id: u64) -> Result<MovieDetails, TmdbError> {
        self.get_json(&format!("/movie/{}", id), &[self.language_param()], "movie")
            .await
    }

    pub async fn series(&self, id: u64) -> Result<SeriesDetails, TmdbError> {
        self.get_json(&format!("/tv/{}", id), &[self.language_param()], "series")
            .await
    }

    pub async fn season(&self, series_id: u64, season_number: u32) -> Result<Season, TmdbError> {
        self.get_json(
            &format!("/tv/{}/season/{}", series_id, season_number),
            &[self.language_param()],
            "season",
        )
        .await
    }

    /// Fetches every season listed on the series concurrently. Seasons that
    /// fail to load are left out.
    pub async fn seasons(&self, series: &SeriesDetails) -> Vec<Season> {
        let requests = series
            .seasons
            .iter()
            .map(|s| self.season(series.id, s.season_number));

        join_all(requests)
            .await
            .into_iter()
            .zip(&series.seasons)
            .filter_map(|(result, summary)| match result {
                Ok(season) => Some(season),
                Err(e) => {
                    log::warn!(
                        "Skipping season {} of series {}: {}",
                        summary.season_number,
                        series.id,
                        e
                    );
                    None
                }
            })
            .collect()
    }

    pub async fn discover(
        &self,
        media: MediaType,
        page: u32,
        filters: &Filters,
    ) -> Result<Page<CatalogItem>, TmdbError> {
        let mut params = vec![
            ("include_adult", "false".to_string()),
            self.language_param(),
            ("page", page.to_string()),
        ];
        if media == MediaType::Movie {
            params.push(("include_video", "false".to_string()));
        }
        params.extend(filters.to_params());

        self.get_json(
            &format!("/discover/{}", media.as_str()),
            &params,
            "discover",
        )
        .await
    }

    pub async fn trending(&self, page: u32) -> Result<Page<CatalogItem>, TmdbError> {
        self.get_json(
            "/trending/all/week",
            &[("page", page.to_string())],
            "trending",
        )
        .await
    }

    pub async fn search(&self, query: &str, page: u32) -> Result<Page<CatalogItem>, TmdbError> {
        self.get_json(
            "/search/multi",
            &[
                ("query", query.to_string()),
                ("include_adult", "false".to_string()),
                self.language_param(),
                ("page", page.to_string()),
            ],
            "search",
        )
        .await
    }

    pub async fn genres(&self, media: MediaType) -> Result<Vec<Genre>, TmdbError> {
        let list: GenreList = self
            .get_json(
                &format!("/genre/{}/list", media.as_str()),
                &[self.language_param()],
                "genres",
            )
            .await?;
        Ok(list.genres)
    }
}
