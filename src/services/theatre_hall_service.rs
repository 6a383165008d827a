use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    booking::{HallDimensions, seat},
    db::{HALL_NAME_CONSTRAINT, unique_violation},
    dto::theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    entity::{
        performances::Column as PerformanceCol,
        theatre_halls::{ActiveModel, Column, Entity as TheatreHalls},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::TheatreHall,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{performance_service::ticket_extent, require_text},
    state::AppState,
};

pub async fn list_theatre_halls(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<TheatreHallList>> {
    let page = pagination.normalize();
    let finder = TheatreHalls::find().order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(page.limit())
        .offset(page.offset())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(TheatreHall::from)
        .collect();

    Ok(ApiResponse::page(
        "Theatre halls",
        TheatreHallList { items },
        &page,
        total,
    ))
}

pub async fn get_theatre_hall(state: &AppState, id: Uuid) -> AppResult<ApiResponse<TheatreHall>> {
    let hall = TheatreHalls::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Theatre hall", TheatreHall::from(hall), None))
}

pub async fn create_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTheatreHallRequest,
) -> AppResult<ApiResponse<TheatreHall>> {
    ensure_admin(user)?;
    let name = require_text("name", payload.name)?;
    let rows = require_positive("rows", payload.rows)?;
    let seats_in_row = require_positive("seats_in_row", payload.seats_in_row)?;

    let hall = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.clone()),
        rows: Set(rows),
        seats_in_row: Set(seats_in_row),
    }
    .insert(&state.orm)
    .await
    .map_err(|err| name_conflict(err, &name))?;

    audit::record(
        state,
        user.user_id,
        "theatre_hall_create",
        "theatre_halls",
        serde_json::json!({ "theatre_hall_id": hall.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Theatre hall created",
        TheatreHall::from(hall),
        Some(Meta::empty()),
    ))
}

/// Resizing is refused when a ticket already sold for one of the hall's
/// performances would fall outside the new grid.
pub async fn update_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateTheatreHallRequest,
) -> AppResult<ApiResponse<TheatreHall>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let existing = TheatreHalls::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let rows = payload
        .rows
        .map(|rows| require_positive("rows", rows))
        .transpose()?
        .unwrap_or(existing.rows);
    let seats_in_row = payload
        .seats_in_row
        .map(|seats| require_positive("seats_in_row", seats))
        .transpose()?
        .unwrap_or(existing.seats_in_row);

    if rows < existing.rows || seats_in_row < existing.seats_in_row {
        let extent = ticket_extent(&txn, PerformanceCol::TheatreHallId.eq(id)).await?;
        seat::validate_extent(extent, HallDimensions::new(rows, seats_in_row))?;
    }

    let mut active: ActiveModel = existing.into();
    let mut new_name = None;
    if let Some(name) = payload.name {
        let name = require_text("name", name)?;
        active.name = Set(name.clone());
        new_name = Some(name);
    }
    active.rows = Set(rows);
    active.seats_in_row = Set(seats_in_row);

    let hall = match active.update(&txn).await {
        Ok(hall) => hall,
        Err(err) => return Err(name_conflict(err, new_name.as_deref().unwrap_or_default())),
    };
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "theatre_hall_update",
        "theatre_halls",
        serde_json::json!({
            "theatre_hall_id": hall.id,
            "rows": rows,
            "seats_in_row": seats_in_row,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        TheatreHall::from(hall),
        Some(Meta::empty()),
    ))
}

/// Deleting a hall removes its performances and their tickets.
pub async fn delete_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = TheatreHalls::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "theatre_hall_delete",
        "theatre_halls",
        serde_json::json!({ "theatre_hall_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

fn require_positive(field: &'static str, value: i32) -> AppResult<i32> {
    if value < 1 {
        return Err(AppError::invalid(field, "must be at least 1"));
    }
    Ok(value)
}

fn name_conflict(err: sea_orm::DbErr, name: &str) -> AppError {
    if unique_violation(&err) == Some(HALL_NAME_CONSTRAINT) {
        AppError::Conflict(format!("theatre hall '{name}' already exists"))
    } else {
        AppError::from(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimensions_must_be_positive() {
        assert_eq!(require_positive("rows", 1).unwrap(), 1);
        assert!(matches!(
            require_positive("rows", 0),
            Err(AppError::InvalidField { field: "rows", .. })
        ));
        assert!(matches!(
            require_positive("seats_in_row", -3),
            Err(AppError::InvalidField {
                field: "seats_in_row",
                ..
            })
        ));
    }

    #[test]
    fn other_database_errors_are_not_conflicts() {
        let err = name_conflict(sea_orm::DbErr::Custom("boom".into()), "Main");
        assert!(matches!(err, AppError::OrmError(_)));
    }
}
