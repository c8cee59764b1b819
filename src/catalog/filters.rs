//! Genre and sort selection for discover listings.
//!
//! One genre and one sort order can be active at the same time. Picking the
//! active value a second time deselects it.

use crate::tmdb::DEFAULT_SORT;

/// Query-level filters understood by the discover endpoints.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Filters {
    pub sort_by: Option<String>,
    pub with_genres: Option<String>,
}

impl Filters {
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![(
            "sort_by",
            self.sort_by
                .clone()
                .unwrap_or_else(|| DEFAULT_SORT.to_string()),
        )];
        if let Some(genres) = &self.with_genres {
            params.push(("with_genres", genres.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSelection {
    genre: Option<String>,
    sort: Option<String>,
}

impl FilterSelection {
    pub fn new(default_sort: Option<String>) -> Self {
        Self {
            genre: None,
            sort: default_sort,
        }
    }

    pub fn genre(&self) -> Option<&str> {
        self.genre.as_deref()
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn select_genre(&mut self, value: &str) {
        self.genre = toggle(self.genre.take(), value);
    }

    pub fn select_sort(&mut self, value: &str) {
        self.sort = toggle(self.sort.take(), value);
    }

    pub fn clear(&mut self) {
        self.genre = None;
        self.sort = None;
    }

    pub fn has_active(&self) -> bool {
        self.genre.is_some() || self.sort.is_some()
    }

    /// `sort,genre` with unset parts left out.
    pub fn summary(&self) -> String {
        [self.sort.as_deref(), self.genre.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(",")
    }

    pub fn to_filters(&self) -> Filters {
        Filters {
            sort_by: self.sort.clone(),
            with_genres: self.genre.clone(),
        }
    }
}

fn toggle(current: Option<String>, value: &str) -> Option<String> {
    match current {
        Some(active) if active == value => None,
        _ => Some(value.to_string()),
    }
}
