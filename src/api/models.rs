use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::util::time::parse_timestamp;

pub const YEAR_MIN: i32 = 1888;
pub const YEAR_MAX: i32 = 2100;
pub const RATING_MIN: f64 = 0.0;
pub const RATING_MAX: f64 = 10.0;

pub const TITLE_MAX_LEN: usize = 200;
pub const DIRECTOR_MAX_LEN: usize = 100;
pub const GENRE_MAX_LEN: usize = 50;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// A film record as returned by the catalog API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Film {
    pub id: i64,
    pub title: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub genre: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "optional_timestamp")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Body sent on create and update. `description` is always serialized so an
/// empty description reaches the server as an explicit `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilmPayload {
    pub title: String,
    pub director: String,
    pub year: i32,
    pub rating: f64,
    pub genre: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilmPage {
    pub items: Vec<Film>,
    pub total: u64,
    #[serde(default)]
    pub page: Option<u32>,
    pub pages: u32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FilmStats {
    pub total_films: u64,
    pub average_rating: f64,
    pub min_rating: f64,
    pub max_rating: f64,
    #[serde(default)]
    pub films_by_year: BTreeMap<String, u64>,
    #[serde(default)]
    pub films_by_genre: BTreeMap<String, u64>,
}

impl FilmStats {
    /// Genres ordered by film count, most frequent first.
    pub fn top_genres(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut genres: Vec<_> = self
            .films_by_genre
            .iter()
            .map(|(genre, count)| (genre.as_str(), *count))
            .collect();
        genres.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
        genres.truncate(limit);
        genres
    }

    /// Years ordered by film count, most frequent first.
    pub fn top_years(&self, limit: usize) -> Vec<(&str, u64)> {
        let mut years: Vec<_> = self
            .films_by_year
            .iter()
            .map(|(year, count)| (year.as_str(), *count))
            .collect();
        years.sort_by(|a, b| b.1.cmp(&a.1).then(b.0.cmp(a.0)));
        years.truncate(limit);
        years
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Id,
    Title,
    Year,
    Rating,
}

impl SortField {
    pub fn label(self) -> &'static str {
        match self {
            SortField::Id => "ID",
            SortField::Title => "Title",
            SortField::Year => "Year",
            SortField::Rating => "Rating",
        }
    }

    /// Next field in the search view's sort selector.
    pub fn next_filter_field(self) -> Self {
        match self {
            SortField::Rating => SortField::Year,
            SortField::Year => SortField::Title,
            SortField::Title => SortField::Id,
            SortField::Id => SortField::Rating,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    pub fn toggled(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            SortOrder::Asc => "↑",
            SortOrder::Desc => "↓",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortOrder::Asc => f.write_str("asc"),
            SortOrder::Desc => f.write_str("desc"),
        }
    }
}

/// Query string for `GET /films`. Unset bounds are left out of the request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListQuery {
    pub page: u32,
    pub size: u32,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_min: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_max: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating_max: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
}

impl ListQuery {
    pub fn page(page: u32, size: u32, sort_by: SortField, sort_order: SortOrder) -> Self {
        Self {
            page,
            size,
            sort_by,
            sort_order,
            year_min: None,
            year_max: None,
            rating_min: None,
            rating_max: None,
            genre: None,
        }
    }
}

fn optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_timestamp))
}
