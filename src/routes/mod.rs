use axum::Router;

use crate::state::AppState;

pub mod actors;
pub mod auth;
pub mod doc;
pub mod genres;
pub mod health;
pub mod params;
pub mod performances;
pub mod plays;
pub mod reservations;
pub mod theatre_halls;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/actors", actors::router())
        .nest("/genres", genres::router())
        .nest("/plays", plays::router())
        .nest("/theatrehalls", theatre_halls::router())
        .nest("/performances", performances::router())
        .nest("/reservations", reservations::router())
        .nest("/auth", auth::router())
}
