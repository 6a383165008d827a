#![allow(dead_code)]

use chrono::{DateTime, Utc};
use sea_orm::{ActiveModelTrait, ActiveValue::NotSet, Set};
use theatre_booking_api::{
    config::AppConfig,
    db::{create_pool, run_migrations},
    dto::{
        performances::{CreatePerformanceRequest, Performance},
        plays::{CreatePlayRequest, PlayDetail},
        reservations::{CreateReservationRequest, TicketRequest},
        theatre_halls::CreateTheatreHallRequest,
    },
    entity::users::ActiveModel as UserActive,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_USER},
    models::TheatreHall,
    services::{performance_service, play_service, theatre_hall_service},
    state::AppState,
};
use uuid::Uuid;

/// Connects to the test database and applies migrations. Returns `None`
/// (after printing why) when no database is configured.
pub async fn setup_state() -> anyhow::Result<Option<AppState>> {
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration tests."
            );
            return Ok(None);
        }
    };

    let pool = create_pool(&database_url, 10).await?;
    run_migrations(&pool).await?;
    Ok(Some(AppState::new(pool, AppConfig::for_database(database_url))))
}

/// Short unique suffix so tests sharing a database never collide.
pub fn unique(prefix: &str) -> String {
    format!("{prefix} {}", Uuid::new_v4().simple())
}

pub async fn create_user(state: &AppState, role: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(format!("{role}-{}@example.com", Uuid::new_v4().simple())),
        password_hash: Set("not-a-real-hash".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}

pub async fn admin(state: &AppState) -> anyhow::Result<AuthUser> {
    create_user(state, ROLE_ADMIN).await
}

pub async fn customer(state: &AppState) -> anyhow::Result<AuthUser> {
    create_user(state, ROLE_USER).await
}

pub async fn create_hall(
    state: &AppState,
    admin: &AuthUser,
    rows: i32,
    seats_in_row: i32,
) -> anyhow::Result<TheatreHall> {
    let resp = theatre_hall_service::create_theatre_hall(
        state,
        admin,
        CreateTheatreHallRequest {
            name: unique("Hall"),
            rows,
            seats_in_row,
        },
    )
    .await?;
    Ok(resp.data.expect("hall"))
}

pub async fn create_play(
    state: &AppState,
    admin: &AuthUser,
    title: String,
    actors: Vec<Uuid>,
    genres: Vec<Uuid>,
) -> anyhow::Result<PlayDetail> {
    let resp = play_service::create_play(
        state,
        admin,
        CreatePlayRequest {
            title,
            description: String::new(),
            actors,
            genres,
        },
    )
    .await?;
    Ok(resp.data.expect("play"))
}

pub async fn create_performance(
    state: &AppState,
    admin: &AuthUser,
    play: Uuid,
    theatre_hall: Uuid,
    show_time: DateTime<Utc>,
) -> anyhow::Result<Performance> {
    let resp = performance_service::create_performance(
        state,
        admin,
        CreatePerformanceRequest {
            play,
            theatre_hall,
            show_time,
        },
    )
    .await?;
    Ok(resp.data.expect("performance"))
}

/// A fresh play scheduled once in a fresh hall of the given size.
pub async fn scheduled_performance(
    state: &AppState,
    admin: &AuthUser,
    rows: i32,
    seats_in_row: i32,
) -> anyhow::Result<(TheatreHall, Performance)> {
    let hall = create_hall(state, admin, rows, seats_in_row).await?;
    let play = create_play(state, admin, unique("Play"), vec![], vec![]).await?;
    let performance = create_performance(state, admin, play.id, hall.id, Utc::now()).await?;
    Ok((hall, performance))
}

pub fn tickets(performance: Uuid, seats: &[(i32, i32)]) -> CreateReservationRequest {
    CreateReservationRequest {
        tickets: seats
            .iter()
            .map(|&(row, seat)| TicketRequest {
                row,
                seat,
                performance,
            })
            .collect(),
    }
}
