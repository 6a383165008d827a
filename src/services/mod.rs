pub mod actor_service;
pub mod auth_service;
pub mod genre_service;
pub mod performance_service;
pub mod play_service;
pub mod reservation_service;
pub mod theatre_hall_service;

use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Column width of the short text fields (names, titles).
pub const MAX_NAME_LEN: usize = 60;

/// Trims a required short text field and rejects empty or oversized values.
pub(crate) fn require_text(field: &'static str, value: String) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::invalid(field, "must not be empty"));
    }
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(AppError::invalid(
            field,
            format!("must be at most {MAX_NAME_LEN} characters"),
        ));
    }
    Ok(trimmed.to_string())
}

/// Removes duplicates, keeping the first occurrence order.
pub(crate) fn dedup_ids(ids: Vec<Uuid>) -> Vec<Uuid> {
    let mut seen = std::collections::HashSet::with_capacity(ids.len());
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

pub(crate) fn first_missing(requested: &[Uuid], found: &[Uuid]) -> Option<Uuid> {
    requested.iter().find(|id| !found.contains(id)).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Hamlet ".into()).unwrap(), "Hamlet");
        assert!(matches!(
            require_text("title", "   ".into()),
            Err(AppError::InvalidField { field: "title", .. })
        ));
        assert!(require_text("title", "x".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(dedup_ids(vec![a, b, a, b]), vec![a, b]);
    }

    #[test]
    fn first_missing_reports_unknown_id() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(first_missing(&[a, b], &[a]), Some(b));
        assert_eq!(first_missing(&[a], &[a, b]), None);
        assert_eq!(first_missing(&[], &[]), None);
    }
}
