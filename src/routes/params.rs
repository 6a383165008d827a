use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

pub const DEFAULT_PER_PAGE: i64 = 20;
pub const RESERVATIONS_PER_PAGE: i64 = 10;
pub const MAX_PER_PAGE: i64 = 100;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    /// Page number, starting at 1
    pub page: Option<i64>,
    /// Items per page, at most 100
    pub per_page: Option<i64>,
}

/// A normalized page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub per_page: i64,
    pub offset: i64,
}

impl Page {
    pub fn limit(&self) -> u64 {
        self.per_page as u64
    }

    pub fn offset(&self) -> u64 {
        self.offset as u64
    }
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: Some(page),
            per_page: Some(per_page),
        }
    }

    pub fn normalize(&self) -> Page {
        self.normalize_with(DEFAULT_PER_PAGE)
    }

    pub fn normalize_with(&self, default_per_page: i64) -> Page {
        let number = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(default_per_page).clamp(1, MAX_PER_PAGE);
        let offset = (number - 1).saturating_mul(per_page);
        Page {
            number,
            per_page,
            offset,
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayFilter {
    /// Case-insensitive substring of the title (ex. ?title=hamlet)
    pub title: Option<String>,
    /// Comma separated actor ids (ex. ?actor=<id>,<id>)
    pub actor: Option<String>,
    /// Comma separated genre ids (ex. ?genres=<id>,<id>)
    pub genres: Option<String>,
}

impl PlayFilter {
    pub fn actor_ids(&self) -> AppResult<Option<Vec<Uuid>>> {
        self.actor
            .as_deref()
            .map(|raw| parse_id_list("actor", raw))
            .transpose()
    }

    pub fn genre_ids(&self) -> AppResult<Option<Vec<Uuid>>> {
        self.genres
            .as_deref()
            .map(|raw| parse_id_list("genres", raw))
            .transpose()
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PerformanceFilter {
    /// Show date in UTC, YYYY-MM-DD
    pub date: Option<NaiveDate>,
    /// Play id
    pub play: Option<Uuid>,
}

/// Parses `"a,b,c"` into ids. Empty segments are ignored.
pub fn parse_id_list(field: &'static str, raw: &str) -> AppResult<Vec<Uuid>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            Uuid::parse_str(s).map_err(|_| AppError::InvalidField {
                field,
                reason: format!("'{s}' is not a valid id"),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_applies_defaults_and_bounds() {
        assert_eq!(
            Pagination::default().normalize(),
            Page {
                number: 1,
                per_page: 20,
                offset: 0
            }
        );
        assert_eq!(Pagination::new(3, 500).normalize().per_page, 100);
        assert_eq!(Pagination::new(0, 0).normalize().number, 1);
        assert_eq!(Pagination::new(3, 10).normalize().offset, 20);
    }

    #[test]
    fn huge_page_numbers_saturate_the_offset() {
        let page = Pagination::new(i64::MAX, 100).normalize();
        assert_eq!(page.number, i64::MAX);
        assert_eq!(page.offset, i64::MAX);
        assert_eq!(page.offset(), i64::MAX as u64);
    }

    #[test]
    fn reservation_pages_default_to_ten() {
        let page = Pagination::default().normalize_with(RESERVATIONS_PER_PAGE);
        assert_eq!(page.per_page, 10);
        let page = Pagination::new(1, 1000).normalize_with(RESERVATIONS_PER_PAGE);
        assert_eq!(page.per_page, MAX_PER_PAGE);
    }

    #[test]
    fn parses_csv_ids() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        let ids = parse_id_list("actor", &format!("{a}, {b},")).unwrap();
        assert_eq!(ids, vec![a, b]);
    }

    #[test]
    fn rejects_malformed_ids_naming_the_field() {
        let err = parse_id_list("genres", "not-an-id").unwrap_err();
        match err {
            AppError::InvalidField { field, .. } => assert_eq!(field, "genres"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn filter_without_ids_is_none() {
        let filter = PlayFilter::default();
        assert!(filter.actor_ids().unwrap().is_none());
        assert!(filter.genre_ids().unwrap().is_none());
    }
}
