//! Reservation creation and the caller's reservation history.
//!
//! A reservation and all of its tickets are written in one transaction. Seat
//! uniqueness is left to the `tickets_performance_row_seat_key` constraint:
//! two requests racing for the same seat both pass validation, and the
//! second insert fails inside its own transaction.

use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait,
    DatabaseTransaction, EntityTrait, LoaderTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::sea_query::LockType;
use uuid::Uuid;

use crate::{
    audit,
    booking::{HallDimensions, SeatAlreadyTaken, ValidationError, seat},
    db::{TICKET_SEAT_CONSTRAINT, unique_violation},
    dto::{
        performances::PerformanceSummary,
        reservations::{
            CreateReservationRequest, ReservationList, ReservationSummary, ReservationTicket,
            TicketRequest,
        },
    },
    entity::{
        performances::{Column as PerformanceCol, Entity as Performances},
        reservations::{self, Column, Entity as Reservations},
        theatre_halls::Entity as TheatreHalls,
        tickets::{self, Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    response::{ApiResponse, Meta},
    routes::params::{Pagination, RESERVATIONS_PER_PAGE},
    services::performance_service::summaries_by_id,
    state::AppState,
};

pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<ReservationSummary>> {
    if payload.tickets.is_empty() {
        return Err(ValidationError::EmptyReservation.into());
    }

    let txn = state.orm.begin().await?;

    let mut performance_ids: Vec<Uuid> = payload
        .tickets
        .iter()
        .map(|ticket| ticket.performance)
        .collect();
    performance_ids.sort_unstable();
    performance_ids.dedup();

    let mut halls: HashMap<Uuid, HallDimensions> = HashMap::with_capacity(performance_ids.len());
    for &performance_id in &performance_ids {
        let hall = lock_performance_hall(&txn, performance_id).await?;
        halls.insert(performance_id, hall);
    }
    for request in &payload.tickets {
        let hall = halls.get(&request.performance).copied().ok_or_else(|| {
            anyhow::anyhow!("performance {} was not locked", request.performance)
        })?;
        seat::validate(request.row, request.seat, hall)?;
    }

    let reservation = reservations::ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let created = insert_tickets(&txn, reservation.id, &payload.tickets).await?;

    let summaries = summaries_by_id(
        &txn,
        Condition::all().add(PerformanceCol::Id.is_in(performance_ids.clone())),
    )
    .await?;
    let ticket_count = created.len();
    let summary = to_summary(reservation, created, &summaries)?;

    txn.commit().await?;

    tracing::info!(
        reservation_id = %summary.id,
        user_id = %user.user_id,
        tickets = ticket_count,
        "reservation created"
    );

    audit::record(
        state,
        user.user_id,
        "reservation_create",
        "reservations",
        serde_json::json!({
            "reservation_id": summary.id,
            "performances": performance_ids,
            "tickets": ticket_count,
        }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        summary,
        Some(Meta::empty()),
    ))
}

/// The caller's reservations, newest first.
pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReservationList>> {
    let page = pagination.normalize_with(RESERVATIONS_PER_PAGE);
    let finder = Reservations::find()
        .filter(Column::UserId.eq(user.user_id))
        .order_by_desc(Column::CreatedAt)
        .order_by_desc(Column::Id);

    let total = finder.clone().count(&state.orm).await?;
    let reservations = finder
        .limit(page.limit())
        .offset(page.offset())
        .all(&state.orm)
        .await?;

    let items = with_tickets(&state.orm, reservations).await?;
    Ok(ApiResponse::page(
        "Reservations",
        ReservationList { items },
        &page,
        total,
    ))
}

/// A single reservation of the caller. Reservations of other users are
/// reported as missing.
pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<ReservationSummary>> {
    let reservation = Reservations::find_by_id(id)
        .filter(Column::UserId.eq(user.user_id))
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let summary = with_tickets(&state.orm, vec![reservation])
        .await?
        .pop()
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Reservation", summary, None))
}

/// Loads the performance and its hall under shared locks, so neither can be
/// resized, moved or deleted before this transaction ends.
async fn lock_performance_hall(
    txn: &DatabaseTransaction,
    performance_id: Uuid,
) -> AppResult<HallDimensions> {
    let performance = Performances::find_by_id(performance_id)
        .lock(LockType::Share)
        .one(txn)
        .await?
        .ok_or(AppError::ReferenceNotFound {
            field: "performance",
            id: performance_id,
        })?;

    let hall = TheatreHalls::find_by_id(performance.theatre_hall_id)
        .lock(LockType::Share)
        .one(txn)
        .await?
        .ok_or_else(|| {
            anyhow::anyhow!("performance {performance_id} references a missing hall")
        })?;

    Ok(hall.dimensions())
}

/// Inserts tickets ordered by (performance, row, seat) so that overlapping
/// reservations wait on the same index entry instead of deadlocking. The
/// result is returned in request order.
async fn insert_tickets(
    txn: &DatabaseTransaction,
    reservation_id: Uuid,
    requests: &[TicketRequest],
) -> AppResult<Vec<tickets::Model>> {
    let mut inserted = Vec::with_capacity(requests.len());
    for index in insertion_order(requests) {
        let ticket = insert_ticket(txn, reservation_id, &requests[index]).await?;
        inserted.push((index, ticket));
    }
    inserted.sort_unstable_by_key(|(index, _)| *index);
    Ok(inserted.into_iter().map(|(_, ticket)| ticket).collect())
}

fn insertion_order(requests: &[TicketRequest]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..requests.len()).collect();
    order.sort_by_key(|&index| {
        let request = &requests[index];
        (request.performance, request.row, request.seat)
    });
    order
}

async fn insert_ticket(
    txn: &DatabaseTransaction,
    reservation_id: Uuid,
    request: &TicketRequest,
) -> AppResult<tickets::Model> {
    let ticket = tickets::ActiveModel {
        id: Set(Uuid::new_v4()),
        row: Set(request.row),
        seat: Set(request.seat),
        performance_id: Set(request.performance),
        reservation_id: Set(reservation_id),
    };

    match ticket.insert(txn).await {
        Ok(model) => Ok(model),
        Err(err) if unique_violation(&err) == Some(TICKET_SEAT_CONSTRAINT) => {
            tracing::debug!(
                performance_id = %request.performance,
                row = request.row,
                seat = request.seat,
                "seat already taken"
            );
            Err(SeatAlreadyTaken {
                performance_id: request.performance,
                row: request.row,
                seat: request.seat,
            }
            .into())
        }
        Err(err) => Err(err.into()),
    }
}

async fn with_tickets<C>(
    db: &C,
    reservations: Vec<reservations::Model>,
) -> AppResult<Vec<ReservationSummary>>
where
    C: ConnectionTrait,
{
    let tickets = reservations
        .load_many(
            Tickets::find()
                .order_by_asc(TicketCol::Row)
                .order_by_asc(TicketCol::Seat),
            db,
        )
        .await?;

    let mut performance_ids: Vec<Uuid> = tickets
        .iter()
        .flatten()
        .map(|ticket| ticket.performance_id)
        .collect();
    performance_ids.sort_unstable();
    performance_ids.dedup();

    let summaries = if performance_ids.is_empty() {
        HashMap::new()
    } else {
        summaries_by_id(
            db,
            Condition::all().add(PerformanceCol::Id.is_in(performance_ids)),
        )
        .await?
    };

    reservations
        .into_iter()
        .zip(tickets)
        .map(|(reservation, tickets)| to_summary(reservation, tickets, &summaries))
        .collect()
}

fn to_summary(
    reservation: reservations::Model,
    tickets: Vec<tickets::Model>,
    summaries: &HashMap<Uuid, PerformanceSummary>,
) -> AppResult<ReservationSummary> {
    let tickets = tickets
        .into_iter()
        .map(|ticket| -> AppResult<ReservationTicket> {
            let performance = summaries
                .get(&ticket.performance_id)
                .cloned()
                .ok_or_else(|| {
                    anyhow::anyhow!(
                        "ticket {} references unknown performance {}",
                        ticket.id,
                        ticket.performance_id
                    )
                })?;
            Ok(ReservationTicket {
                id: ticket.id,
                row: ticket.row,
                seat: ticket.seat,
                performance,
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(ReservationSummary {
        id: reservation.id,
        created_at: reservation.created_at.with_timezone(&Utc),
        tickets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(id: Uuid) -> PerformanceSummary {
        PerformanceSummary {
            id,
            show_time: Utc::now(),
            play_title: "Hamlet".into(),
            theatre_hall_name: "Main".into(),
            theatre_hall_capacity: 50,
            tickets_available: 49,
        }
    }

    fn ticket(reservation_id: Uuid, performance_id: Uuid) -> tickets::Model {
        tickets::Model {
            id: Uuid::new_v4(),
            row: 1,
            seat: 2,
            performance_id,
            reservation_id,
        }
    }

    fn reservation() -> reservations::Model {
        reservations::Model {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            created_at: Utc::now().fixed_offset(),
        }
    }

    #[test]
    fn tickets_carry_their_performance_summary() {
        let reservation = reservation();
        let performance_id = Uuid::new_v4();
        let summaries = HashMap::from([(performance_id, summary(performance_id))]);

        let view = to_summary(
            reservation.clone(),
            vec![ticket(reservation.id, performance_id)],
            &summaries,
        )
        .expect("summary");

        assert_eq!(view.id, reservation.id);
        assert_eq!(view.tickets.len(), 1);
        assert_eq!(view.tickets[0].performance.id, performance_id);
        assert_eq!(view.tickets[0].seat, 2);
    }

    #[test]
    fn tickets_are_inserted_in_seat_order_whatever_the_request_order() {
        let evening = Uuid::new_v4();
        let matinee = Uuid::new_v4();
        let (first, second) = if evening < matinee {
            (evening, matinee)
        } else {
            (matinee, evening)
        };
        let request = |performance, row, seat| TicketRequest {
            row,
            seat,
            performance,
        };
        let requests = vec![
            request(second, 1, 1),
            request(first, 2, 7),
            request(first, 2, 3),
            request(first, 1, 9),
        ];

        assert_eq!(insertion_order(&requests), vec![3, 2, 1, 0]);

        let reversed: Vec<TicketRequest> = requests.into_iter().rev().collect();
        assert_eq!(insertion_order(&reversed), vec![0, 1, 2, 3]);
    }

    #[test]
    fn missing_performance_summary_is_internal() {
        let reservation = reservation();
        let err = to_summary(
            reservation.clone(),
            vec![ticket(reservation.id, Uuid::new_v4())],
            &HashMap::new(),
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
