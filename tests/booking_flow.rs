mod common;

use theatre_booking_api::{
    booking::{Coordinate, SeatAlreadyTaken, ValidationError},
    error::AppError,
    middleware::auth::AuthUser,
    models::TakenPlace,
    routes::params::Pagination,
    services::{performance_service, reservation_service},
    state::AppState,
};
use uuid::Uuid;

use common::{admin, customer, scheduled_performance, setup_state, tickets};

async fn availability(
    state: &AppState,
    performance: Uuid,
) -> anyhow::Result<(i64, Vec<TakenPlace>)> {
    let detail = performance_service::get_performance(state, performance)
        .await?
        .data
        .expect("performance detail");
    Ok((detail.tickets_available, detail.taken_places))
}

async fn reservation_count(
    state: &AppState,
    user: &AuthUser,
) -> anyhow::Result<i64> {
    let resp =
        reservation_service::list_reservations(state, user, Pagination::default()).await?;
    Ok(resp.meta.and_then(|m| m.total).unwrap_or_default())
}

// Reserve two seats, lose a race for one of them, then hit the grid edge.
#[tokio::test]
async fn reservation_lifecycle_on_a_five_by_ten_hall() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let first = customer(&state).await?;
    let second = customer(&state).await?;
    let (hall, performance) = scheduled_performance(&state, &admin, 5, 10).await?;
    assert_eq!(hall.capacity, 50);
    assert_eq!(availability(&state, performance.id).await?.0, 50);

    let created = reservation_service::create_reservation(
        &state,
        &first,
        tickets(performance.id, &[(3, 4), (3, 5)]),
    )
    .await?
    .data
    .expect("reservation");
    assert_eq!(created.tickets.len(), 2);
    assert_eq!((created.tickets[0].row, created.tickets[0].seat), (3, 4));
    assert_eq!(created.tickets[0].performance.id, performance.id);
    assert_eq!(created.tickets[1].performance.tickets_available, 48);

    let (available, taken) = availability(&state, performance.id).await?;
    assert_eq!(available, 48);
    assert_eq!(
        taken,
        vec![TakenPlace { row: 3, seat: 4 }, TakenPlace { row: 3, seat: 5 }]
    );

    let err = reservation_service::create_reservation(
        &state,
        &second,
        tickets(performance.id, &[(3, 4)]),
    )
    .await
    .unwrap_err();
    match err {
        AppError::SeatTaken(SeatAlreadyTaken {
            performance_id,
            row,
            seat,
        }) => assert_eq!((performance_id, row, seat), (performance.id, 3, 4)),
        other => panic!("expected seat conflict, got {other:?}"),
    }
    assert_eq!(availability(&state, performance.id).await?.0, 48);

    let err = reservation_service::create_reservation(
        &state,
        &second,
        tickets(performance.id, &[(6, 1)]),
    )
    .await
    .unwrap_err();
    match err {
        AppError::Validation(ValidationError::OutOfRange {
            coordinate,
            min,
            max,
            ..
        }) => {
            assert_eq!(coordinate, Coordinate::Row);
            assert_eq!((min, max), (1, 5));
        }
        other => panic!("expected out of range, got {other:?}"),
    }

    let err = reservation_service::create_reservation(&state, &second, tickets(performance.id, &[]))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::EmptyReservation)
    ));

    assert_eq!(availability(&state, performance.id).await?.0, 48);
    assert_eq!(reservation_count(&state, &second).await?, 0);
    assert_eq!(reservation_count(&state, &first).await?, 1);
    Ok(())
}

// A failure at any position leaves no reservation and no ticket behind.
#[tokio::test]
async fn failed_requests_persist_nothing_whatever_the_failing_position() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let holder = customer(&state).await?;
    let user = customer(&state).await?;
    let (_, performance) = scheduled_performance(&state, &admin, 4, 4).await?;

    reservation_service::create_reservation(&state, &holder, tickets(performance.id, &[(4, 4)]))
        .await?;

    for k in 0..3 {
        let mut seats: Vec<(i32, i32)> = (1..=k).map(|seat| (1, seat)).collect();
        seats.push((0, 1));
        let err =
            reservation_service::create_reservation(&state, &user, tickets(performance.id, &seats))
                .await
                .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "k={k}: {err:?}");

        let mut seats: Vec<(i32, i32)> = (1..=k).map(|seat| (2, seat)).collect();
        seats.push((4, 4));
        let err =
            reservation_service::create_reservation(&state, &user, tickets(performance.id, &seats))
                .await
                .unwrap_err();
        assert!(matches!(err, AppError::SeatTaken(_)), "k={k}: {err:?}");
    }

    let (available, taken) = availability(&state, performance.id).await?;
    assert_eq!(available, 15);
    assert_eq!(taken, vec![TakenPlace { row: 4, seat: 4 }]);
    assert_eq!(reservation_count(&state, &user).await?, 0);
    Ok(())
}

#[tokio::test]
async fn same_seat_twice_in_one_request_is_a_conflict() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let user = customer(&state).await?;
    let (_, performance) = scheduled_performance(&state, &admin, 2, 2).await?;

    let err = reservation_service::create_reservation(
        &state,
        &user,
        tickets(performance.id, &[(1, 1), (1, 1)]),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::SeatTaken(_)));
    assert_eq!(availability(&state, performance.id).await?.0, 4);
    Ok(())
}

#[tokio::test]
async fn concurrent_requests_for_one_seat_admit_exactly_one() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let (_, performance) = scheduled_performance(&state, &admin, 3, 3).await?;

    let mut handles = Vec::new();
    for _ in 0..4 {
        let state = state.clone();
        let user = customer(&state).await?;
        let request = tickets(performance.id, &[(2, 2)]);
        handles.push(tokio::spawn(async move {
            reservation_service::create_reservation(&state, &user, request).await
        }));
    }

    let mut succeeded = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await? {
            Ok(_) => succeeded += 1,
            Err(AppError::SeatTaken(_)) => conflicts += 1,
            Err(other) => panic!("unexpected error: {other:?}"),
        }
    }
    assert_eq!(succeeded, 1);
    assert_eq!(conflicts, 3);

    let (available, taken) = availability(&state, performance.id).await?;
    assert_eq!(available, 8);
    assert_eq!(taken, vec![TakenPlace { row: 2, seat: 2 }]);
    Ok(())
}

// Overlapping requests that list the same seats in opposite orders must
// still resolve to one booking and one seat conflict.
#[tokio::test]
async fn opposite_seat_orders_conflict_instead_of_deadlocking() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let forward: Vec<(i32, i32)> = (1..=10).map(|seat| (1, seat)).collect();
    let reversed: Vec<(i32, i32)> = forward.iter().rev().copied().collect();

    for _ in 0..10 {
        let (_, performance) = scheduled_performance(&state, &admin, 1, 10).await?;
        let mut handles = Vec::new();
        for seats in [&forward, &reversed] {
            let state = state.clone();
            let user = customer(&state).await?;
            let request = tickets(performance.id, seats);
            handles.push(tokio::spawn(async move {
                reservation_service::create_reservation(&state, &user, request).await
            }));
        }

        let mut booked = Vec::new();
        let mut conflicts = 0;
        for handle in handles {
            match handle.await? {
                Ok(resp) => booked.push(resp.data.expect("reservation")),
                Err(AppError::SeatTaken(_)) => conflicts += 1,
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(booked.len(), 1);
        assert_eq!(conflicts, 1);

        let returned: Vec<(i32, i32)> = booked[0]
            .tickets
            .iter()
            .map(|ticket| (ticket.row, ticket.seat))
            .collect();
        assert!(returned == forward || returned == reversed);
        assert_eq!(availability(&state, performance.id).await?.0, 0);
    }
    Ok(())
}

#[tokio::test]
async fn one_reservation_may_span_performances() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let user = customer(&state).await?;
    let (_, evening) = scheduled_performance(&state, &admin, 2, 5).await?;
    let (_, matinee) = scheduled_performance(&state, &admin, 3, 3).await?;

    let mut request = tickets(evening.id, &[(1, 5)]);
    request.tickets.extend(tickets(matinee.id, &[(3, 3)]).tickets);
    let created = reservation_service::create_reservation(&state, &user, request)
        .await?
        .data
        .expect("reservation");

    assert_eq!(created.tickets.len(), 2);
    assert_eq!(created.tickets[0].performance.id, evening.id);
    assert_eq!(created.tickets[1].performance.id, matinee.id);
    assert_eq!(availability(&state, evening.id).await?.0, 9);
    assert_eq!(availability(&state, matinee.id).await?.0, 8);
    Ok(())
}

#[tokio::test]
async fn unknown_performance_is_reported_by_field() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let user = customer(&state).await?;
    let missing = Uuid::new_v4();

    let err = reservation_service::create_reservation(&state, &user, tickets(missing, &[(1, 1)]))
        .await
        .unwrap_err();
    match err {
        AppError::ReferenceNotFound { field, id } => {
            assert_eq!(field, "performance");
            assert_eq!(id, missing);
        }
        other => panic!("expected missing performance, got {other:?}"),
    }
    Ok(())
}

#[tokio::test]
async fn reservations_are_visible_to_their_owner_only() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let owner = customer(&state).await?;
    let stranger = customer(&state).await?;
    let (_, performance) = scheduled_performance(&state, &admin, 2, 2).await?;

    let first = reservation_service::create_reservation(
        &state,
        &owner,
        tickets(performance.id, &[(2, 2), (1, 1)]),
    )
    .await?
    .data
    .expect("reservation");
    let second = reservation_service::create_reservation(
        &state,
        &owner,
        tickets(performance.id, &[(1, 2)]),
    )
    .await?
    .data
    .expect("reservation");

    let list = reservation_service::list_reservations(&state, &owner, Pagination::default())
        .await?;
    let meta = list.meta.expect("meta");
    assert_eq!(meta.total, Some(2));
    assert_eq!(meta.per_page, Some(10));
    let items = list.data.expect("reservations").items;
    assert_eq!(items[0].id, second.id);
    assert_eq!(items[1].id, first.id);
    let seats: Vec<_> = items[1].tickets.iter().map(|t| (t.row, t.seat)).collect();
    assert_eq!(seats, vec![(1, 1), (2, 2)]);

    let fetched = reservation_service::get_reservation(&state, &owner, first.id)
        .await?
        .data
        .expect("reservation");
    assert_eq!(fetched.tickets.len(), 2);

    let err = reservation_service::get_reservation(&state, &stranger, first.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));
    assert_eq!(reservation_count(&state, &stranger).await?, 0);
    Ok(())
}

#[tokio::test]
async fn deleting_a_performance_releases_its_tickets() -> anyhow::Result<()> {
    let Some(state) = setup_state().await? else {
        return Ok(());
    };
    let admin = admin(&state).await?;
    let user = customer(&state).await?;
    let (_, performance) = scheduled_performance(&state, &admin, 2, 2).await?;

    let reservation = reservation_service::create_reservation(
        &state,
        &user,
        tickets(performance.id, &[(1, 1)]),
    )
    .await?
    .data
    .expect("reservation");

    performance_service::delete_performance(&state, &admin, performance.id).await?;

    let err = performance_service::get_performance(&state, performance.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound));

    let fetched = reservation_service::get_reservation(&state, &user, reservation.id)
        .await?
        .data
        .expect("reservation");
    assert!(fetched.tickets.is_empty());
    Ok(())
}
