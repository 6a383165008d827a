use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, TimeDelta, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, FromQueryResult,
    JoinType, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait,
    Select, Set, TransactionTrait, prelude::DateTimeWithTimeZone,
    sea_query::{IntoCondition, LockType},
};
use uuid::Uuid;

use crate::{
    audit,
    booking::{HallDimensions, seat, tickets_available},
    dto::performances::{
        CreatePerformanceRequest, Performance, PerformanceDetail, PerformanceList,
        PerformanceSummary, UpdatePerformanceRequest,
    },
    entity::{
        performances::{self, ActiveModel, Column, Entity as Performances, Relation},
        plays::{Column as PlayCol, Entity as Plays},
        theatre_halls::{Column as HallCol, Entity as TheatreHalls},
        tickets::{Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{TakenPlace, TheatreHall},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, PerformanceFilter},
    services::play_service,
    state::AppState,
};

/// One performance joined with its play title, hall and live ticket count.
#[derive(Debug, FromQueryResult)]
struct SummaryRow {
    id: Uuid,
    show_time: DateTimeWithTimeZone,
    play_title: String,
    theatre_hall_name: String,
    hall_rows: i32,
    hall_seats_in_row: i32,
    tickets_taken: i64,
}

impl SummaryRow {
    fn into_summary(self) -> AppResult<PerformanceSummary> {
        let hall = HallDimensions::new(self.hall_rows, self.hall_seats_in_row);
        let tickets_available = tickets_available(self.id, hall, self.tickets_taken)?;
        Ok(PerformanceSummary {
            id: self.id,
            show_time: self.show_time.with_timezone(&Utc),
            play_title: self.play_title,
            theatre_hall_name: self.theatre_hall_name,
            theatre_hall_capacity: hall.capacity(),
            tickets_available,
        })
    }
}

fn summary_select() -> Select<Performances> {
    Performances::find()
        .select_only()
        .column(Column::Id)
        .column(Column::ShowTime)
        .column_as(PlayCol::Title, "play_title")
        .column_as(HallCol::Name, "theatre_hall_name")
        .column_as(HallCol::Rows, "hall_rows")
        .column_as(HallCol::SeatsInRow, "hall_seats_in_row")
        .column_as(TicketCol::Id.count(), "tickets_taken")
        .join(JoinType::InnerJoin, Relation::Plays.def())
        .join(JoinType::InnerJoin, Relation::TheatreHalls.def())
        .join(JoinType::LeftJoin, Relation::Tickets.def())
        .group_by(Column::Id)
        .group_by(PlayCol::Title)
        .group_by(HallCol::Name)
        .group_by(HallCol::Rows)
        .group_by(HallCol::SeatsInRow)
}

/// Summaries keyed by performance id, for the performances matching `condition`.
pub(crate) async fn summaries_by_id<C>(
    db: &C,
    condition: Condition,
) -> AppResult<HashMap<Uuid, PerformanceSummary>>
where
    C: ConnectionTrait,
{
    summary_select()
        .filter(condition)
        .into_model::<SummaryRow>()
        .all(db)
        .await?
        .into_iter()
        .map(|row| row.into_summary().map(|summary| (summary.id, summary)))
        .collect()
}

/// Highest row and highest seat ticketed across the performances matching
/// `condition`, or `None` when none of them has tickets.
pub(crate) async fn ticket_extent<C, F>(db: &C, condition: F) -> AppResult<Option<(i32, i32)>>
where
    C: ConnectionTrait,
    F: IntoCondition,
{
    let extent: Option<(Option<i32>, Option<i32>)> = Tickets::find()
        .select_only()
        .column_as(TicketCol::Row.max(), "max_row")
        .column_as(TicketCol::Seat.max(), "max_seat")
        .inner_join(Performances)
        .filter(condition)
        .into_tuple()
        .one(db)
        .await?;

    Ok(match extent {
        Some((Some(max_row), Some(max_seat))) => Some((max_row, max_seat)),
        _ => None,
    })
}

fn filter_condition(filter: &PerformanceFilter) -> Condition {
    let mut condition = Condition::all();
    if let Some(date) = filter.date {
        let (start, end) = utc_day(date);
        condition = condition
            .add(Column::ShowTime.gte(start))
            .add(Column::ShowTime.lt(end));
    }
    if let Some(play_id) = filter.play {
        condition = condition.add(Column::PlayId.eq(play_id));
    }
    condition
}

fn utc_day(date: NaiveDate) -> (chrono::DateTime<Utc>, chrono::DateTime<Utc>) {
    let start = date.and_time(NaiveTime::MIN).and_utc();
    (start, start + TimeDelta::days(1))
}

pub async fn list_performances(
    state: &AppState,
    pagination: Pagination,
    filter: PerformanceFilter,
) -> AppResult<ApiResponse<PerformanceList>> {
    let page = pagination.normalize();
    let condition = filter_condition(&filter);

    let total = Performances::find()
        .filter(condition.clone())
        .count(&state.orm)
        .await?;

    let items = summary_select()
        .filter(condition)
        .order_by_asc(Column::ShowTime)
        .order_by_asc(Column::Id)
        .limit(page.limit())
        .offset(page.offset())
        .into_model::<SummaryRow>()
        .all(&state.orm)
        .await?
        .into_iter()
        .map(SummaryRow::into_summary)
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ApiResponse::page(
        "Performances",
        PerformanceList { items },
        &page,
        total,
    ))
}

pub async fn get_performance(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<PerformanceDetail>> {
    let db = &state.orm;
    let performance = Performances::find_by_id(id)
        .one(db)
        .await?
        .ok_or(AppError::NotFound)?;

    let play = Plays::find_by_id(performance.play_id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("performance {id} references a missing play"))?;
    let hall = TheatreHalls::find_by_id(performance.theatre_hall_id)
        .one(db)
        .await?
        .ok_or_else(|| anyhow::anyhow!("performance {id} references a missing hall"))?;

    let taken_places: Vec<TakenPlace> = Tickets::find()
        .select_only()
        .column(TicketCol::Row)
        .column(TicketCol::Seat)
        .filter(TicketCol::PerformanceId.eq(id))
        .order_by_asc(TicketCol::Row)
        .order_by_asc(TicketCol::Seat)
        .into_tuple::<(i32, i32)>()
        .all(db)
        .await?
        .into_iter()
        .map(|(row, seat)| TakenPlace { row, seat })
        .collect();

    let tickets_available =
        tickets_available(id, hall.dimensions(), taken_places.len() as i64)?;
    let play = play_service::summarize(db, vec![play])
        .await?
        .pop()
        .ok_or_else(|| anyhow::anyhow!("play summary missing for performance {id}"))?;

    let detail = PerformanceDetail {
        id: performance.id,
        show_time: performance.show_time.with_timezone(&Utc),
        play,
        theatre_hall: TheatreHall::from(hall),
        taken_places,
        tickets_available,
    };
    Ok(ApiResponse::success("Performance", detail, None))
}

pub async fn create_performance(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePerformanceRequest,
) -> AppResult<ApiResponse<Performance>> {
    ensure_admin(user)?;
    ensure_play_exists(&state.orm, payload.play).await?;
    ensure_hall_exists(&state.orm, payload.theatre_hall).await?;

    let performance = ActiveModel {
        id: Set(Uuid::new_v4()),
        play_id: Set(payload.play),
        theatre_hall_id: Set(payload.theatre_hall),
        show_time: Set(payload.show_time.fixed_offset()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "performance_create",
        "performances",
        serde_json::json!({ "performance_id": performance.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Performance created",
        to_view(performance),
        Some(Meta::empty()),
    ))
}

/// Moving a performance to another hall is refused when a ticket already
/// sold for it would not fit there.
pub async fn update_performance(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePerformanceRequest,
) -> AppResult<ApiResponse<Performance>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let existing = Performances::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(play_id) = payload.play {
        ensure_play_exists(&txn, play_id).await?;
        active.play_id = Set(play_id);
    }
    if let Some(hall_id) = payload.theatre_hall.filter(|h| *h != existing.theatre_hall_id) {
        let hall = TheatreHalls::find_by_id(hall_id)
            .lock(LockType::Share)
            .one(&txn)
            .await?
            .ok_or(AppError::ReferenceNotFound {
                field: "theatre_hall",
                id: hall_id,
            })?;
        let extent = ticket_extent(&txn, Column::Id.eq(id)).await?;
        seat::validate_extent(extent, hall.dimensions())?;
        active.theatre_hall_id = Set(hall_id);
    }
    if let Some(show_time) = payload.show_time {
        active.show_time = Set(show_time.fixed_offset());
    }

    let performance = active.update(&txn).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "performance_update",
        "performances",
        serde_json::json!({ "performance_id": performance.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        to_view(performance),
        Some(Meta::empty()),
    ))
}

/// Deleting a performance removes its tickets.
pub async fn delete_performance(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Performances::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "performance_delete",
        "performances",
        serde_json::json!({ "performance_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

async fn ensure_play_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let found = Plays::find_by_id(id).count(db).await?;
    if found == 0 {
        return Err(AppError::ReferenceNotFound { field: "play", id });
    }
    Ok(())
}

async fn ensure_hall_exists<C: ConnectionTrait>(db: &C, id: Uuid) -> AppResult<()> {
    let found = TheatreHalls::find_by_id(id).count(db).await?;
    if found == 0 {
        return Err(AppError::ReferenceNotFound {
            field: "theatre_hall",
            id,
        });
    }
    Ok(())
}

fn to_view(model: performances::Model) -> Performance {
    Performance {
        id: model.id,
        play: model.play_id,
        theatre_hall: model.theatre_hall_id,
        show_time: model.show_time.with_timezone(&Utc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utc_day_spans_exactly_one_day() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 9).expect("valid date");
        let (start, end) = utc_day(date);
        assert_eq!(start.to_rfc3339(), "2025-03-09T00:00:00+00:00");
        assert_eq!(end - start, TimeDelta::days(1));
    }

    #[test]
    fn summary_rows_compute_availability() {
        let row = SummaryRow {
            id: Uuid::new_v4(),
            show_time: Utc::now().fixed_offset(),
            play_title: "Hamlet".into(),
            theatre_hall_name: "Main".into(),
            hall_rows: 5,
            hall_seats_in_row: 10,
            tickets_taken: 2,
        };
        let summary = row.into_summary().expect("summary");
        assert_eq!(summary.theatre_hall_capacity, 50);
        assert_eq!(summary.tickets_available, 48);
    }

    #[test]
    fn overbooked_rows_are_integrity_errors() {
        let row = SummaryRow {
            id: Uuid::new_v4(),
            show_time: Utc::now().fixed_offset(),
            play_title: "Hamlet".into(),
            theatre_hall_name: "Studio".into(),
            hall_rows: 1,
            hall_seats_in_row: 1,
            tickets_taken: 2,
        };
        assert!(matches!(row.into_summary(), Err(AppError::Integrity(_))));
    }
}
