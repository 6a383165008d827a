use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use uuid::Uuid;

use crate::{
    booking::{CapacityExceeded, SeatAlreadyTaken, ValidationError},
    response::{ApiResponse, Meta},
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("{field} {id} not found")]
    ReferenceNotFound { field: &'static str, id: Uuid },

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    SeatTaken(#[from] SeatAlreadyTaken),

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Integrity violation")]
    Integrity(#[from] CapacityExceeded),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(#[from] sea_orm::DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        AppError::InvalidField {
            field,
            reason: reason.into(),
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound | AppError::ReferenceNotFound { .. } => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::InvalidField { .. } | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::SeatTaken(_) | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Integrity(_)
            | AppError::DbError(_)
            | AppError::OrmError(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound | AppError::ReferenceNotFound { .. } => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidField { .. } => "invalid_field",
            AppError::Validation(ValidationError::OutOfRange { .. }) => "out_of_range",
            AppError::Validation(ValidationError::EmptyReservation) => "empty_reservation",
            AppError::SeatTaken(_) => "seat_already_taken",
            AppError::Conflict(_) => "conflict",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Forbidden => "forbidden",
            AppError::Integrity(_) => "integrity_violation",
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => "internal",
        }
    }

    /// Field-level detail for errors the caller can act on.
    fn details(&self) -> Option<Value> {
        match self {
            AppError::ReferenceNotFound { field, id } => Some(json!({ "field": field, "id": id })),
            AppError::InvalidField { field, .. } => Some(json!({ "field": field })),
            AppError::Validation(ValidationError::OutOfRange {
                coordinate,
                value,
                min,
                max,
            }) => Some(json!({
                "field": coordinate,
                "value": value,
                "min": min,
                "max": max,
            })),
            AppError::Validation(ValidationError::EmptyReservation) => {
                Some(json!({ "field": "tickets" }))
            }
            AppError::SeatTaken(taken) => Some(json!({
                "performance": taken.performance_id,
                "row": taken.row,
                "seat": taken.seat,
            })),
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            AppError::Integrity(err) => {
                tracing::error!(error = %err, "data integrity violation");
            }
            AppError::DbError(err) => tracing::error!(error = %err, "database error"),
            AppError::OrmError(err) => tracing::error!(error = %err, "orm error"),
            AppError::Internal(err) => tracing::error!(error = ?err, "internal error"),
            _ => tracing::debug!(error = %self, code = self.code(), "request rejected"),
        }
    }
}

#[derive(Serialize)]
struct ErrorData {
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let status = self.status_code();
        let message = self.to_string();

        let body = ApiResponse {
            message: message.clone(),
            data: Some(ErrorData {
                error: message,
                code: self.code(),
                details: self.details(),
            }),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::Coordinate;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn out_of_range_names_the_coordinate_and_bound() {
        let (status, body) = body_json(
            ValidationError::OutOfRange {
                coordinate: Coordinate::Row,
                value: 6,
                min: 1,
                max: 5,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["data"]["code"], "out_of_range");
        assert_eq!(body["data"]["details"]["field"], "row");
        assert_eq!(body["data"]["details"]["min"], 1);
        assert_eq!(body["data"]["details"]["max"], 5);
    }

    #[tokio::test]
    async fn seat_conflict_is_409_with_coordinates() {
        let performance_id = Uuid::new_v4();
        let (status, body) = body_json(
            SeatAlreadyTaken {
                performance_id,
                row: 3,
                seat: 4,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["data"]["code"], "seat_already_taken");
        assert_eq!(
            body["data"]["details"]["performance"],
            performance_id.to_string()
        );
        assert_eq!(body["data"]["details"]["row"], 3);
        assert_eq!(body["data"]["details"]["seat"], 4);
    }

    #[tokio::test]
    async fn integrity_failure_hides_internals() {
        let (status, body) = body_json(
            CapacityExceeded {
                performance_id: Uuid::nil(),
                capacity: 4,
                taken: 5,
            }
            .into(),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["data"]["code"], "integrity_violation");
        assert_eq!(body["message"], "Integrity violation");
        assert!(body["data"].get("details").is_none());
    }

    #[test]
    fn authentication_and_authorization_are_distinct() {
        assert_eq!(
            AppError::Unauthorized("missing token".into()).status_code(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            AppError::Validation(ValidationError::EmptyReservation).code(),
            "empty_reservation"
        );
    }
}
