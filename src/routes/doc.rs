use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    booking::Coordinate,
    dto::{
        actors::{ActorList, CreateActorRequest, UpdateActorRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
        performances::{
            CreatePerformanceRequest, Performance, PerformanceDetail, PerformanceList,
            PerformanceSummary, UpdatePerformanceRequest,
        },
        plays::{CreatePlayRequest, PlayDetail, PlayList, PlaySummary, UpdatePlayRequest},
        reservations::{
            CreateReservationRequest, ReservationList, ReservationSummary, ReservationTicket,
            TicketRequest,
        },
        theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    },
    media::ImageForm,
    models::{Actor, Genre, TakenPlace, TheatreHall, User},
    response::{ApiResponse, Meta},
    routes::{
        actors, auth, genres, health, params, performances, plays, reservations, theatre_halls,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        actors::list_actors,
        actors::create_actor,
        actors::get_actor,
        actors::update_actor,
        actors::delete_actor,
        actors::upload_image,
        genres::list_genres,
        genres::create_genre,
        genres::get_genre,
        genres::update_genre,
        genres::delete_genre,
        plays::list_plays,
        plays::create_play,
        plays::get_play,
        plays::update_play,
        plays::delete_play,
        plays::upload_image,
        theatre_halls::list_theatre_halls,
        theatre_halls::create_theatre_hall,
        theatre_halls::get_theatre_hall,
        theatre_halls::update_theatre_hall,
        theatre_halls::delete_theatre_hall,
        performances::list_performances,
        performances::create_performance,
        performances::get_performance,
        performances::update_performance,
        performances::delete_performance,
        reservations::list_reservations,
        reservations::create_reservation,
        reservations::get_reservation
    ),
    components(
        schemas(
            User,
            Actor,
            Genre,
            TheatreHall,
            TakenPlace,
            Coordinate,
            ImageForm,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            ActorList,
            CreateActorRequest,
            UpdateActorRequest,
            GenreList,
            CreateGenreRequest,
            UpdateGenreRequest,
            PlayList,
            PlaySummary,
            PlayDetail,
            CreatePlayRequest,
            UpdatePlayRequest,
            TheatreHallList,
            CreateTheatreHallRequest,
            UpdateTheatreHallRequest,
            Performance,
            PerformanceSummary,
            PerformanceDetail,
            PerformanceList,
            CreatePerformanceRequest,
            UpdatePerformanceRequest,
            TicketRequest,
            CreateReservationRequest,
            ReservationTicket,
            ReservationSummary,
            ReservationList,
            params::Pagination,
            params::PlayFilter,
            params::PerformanceFilter,
            Meta,
            ApiResponse<PlayDetail>,
            ApiResponse<PerformanceDetail>,
            ApiResponse<ReservationSummary>,
            ApiResponse<ReservationList>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Actors", description = "Actor catalog"),
        (name = "Genres", description = "Genre catalog"),
        (name = "Plays", description = "Play catalog"),
        (name = "Theatre halls", description = "Halls and their seating grids"),
        (name = "Performances", description = "Scheduled performances and availability"),
        (name = "Reservations", description = "Ticket reservations of the caller"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_resource_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/health",
            "/api/actors",
            "/api/actors/{id}/upload-image",
            "/api/plays/{id}",
            "/api/theatrehalls",
            "/api/performances/{id}",
            "/api/reservations",
            "/api/reservations/{id}",
            "/api/auth/login",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
