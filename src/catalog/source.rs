use anyhow::Result;
use async_trait::async_trait;

use super::filters::Filters;
use crate::tmdb::{CatalogItem, MediaType, Page, TmdbClient};

/// Listing endpoints a feed can page through.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn discover(
        &self,
        media: MediaType,
        page: u32,
        filters: &Filters,
    ) -> Result<Page<CatalogItem>>;

    async fn trending(&self, page: u32) -> Result<Page<CatalogItem>>;

    async fn search(&self, query: &str, page: u32) -> Result<Page<CatalogItem>>;
}

#[async_trait]
impl CatalogSource for TmdbClient {
    async fn discover(
        &self,
        media: MediaType,
        page: u32,
        filters: &Filters,
    ) -> Result<Page<CatalogItem>> {
        Ok(TmdbClient::discover(self, media, page, filters).await?)
    }

    async fn trending(&self, page: u32) -> Result<Page<CatalogItem>> {
        Ok(TmdbClient::trending(self, page).await?)
    }

    async fn search(&self, query: &str, page: u32) -> Result<Page<CatalogItem>> {
        Ok(TmdbClient::search(self, query, page).await?)
    }
}
