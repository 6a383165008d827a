use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::TheatreHall,
    response::ApiResponse,
    routes::params::Pagination,
    services::theatre_hall_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_theatre_halls).post(create_theatre_hall))
        .route(
            "/{id}",
            get(get_theatre_hall)
                .put(update_theatre_hall)
                .patch(update_theatre_hall)
                .delete(delete_theatre_hall),
        )
}

#[utoipa::path(
    get,
    path = "/api/theatrehalls",
    params(Pagination),
    responses(
        (status = 200, description = "List theatre halls", body = ApiResponse<TheatreHallList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn list_theatre_halls(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<TheatreHallList>>> {
    let resp = theatre_hall_service::list_theatre_halls(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/theatrehalls",
    request_body = CreateTheatreHallRequest,
    responses(
        (status = 201, description = "Theatre hall created", body = ApiResponse<TheatreHall>),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already in use"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn create_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateTheatreHallRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TheatreHall>>)> {
    let resp = theatre_hall_service::create_theatre_hall(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/theatrehalls/{id}",
    params(("id" = Uuid, Path, description = "Theatre hall ID")),
    responses(
        (status = 200, description = "Theatre hall", body = ApiResponse<TheatreHall>),
        (status = 404, description = "Theatre hall not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn get_theatre_hall(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<TheatreHall>>> {
    let resp = theatre_hall_service::get_theatre_hall(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/theatrehalls/{id}",
    params(("id" = Uuid, Path, description = "Theatre hall ID")),
    request_body = UpdateTheatreHallRequest,
    responses(
        (status = 200, description = "Theatre hall updated", body = ApiResponse<TheatreHall>),
        (status = 400, description = "Sold tickets would fall outside the new grid"),
        (status = 409, description = "Name already in use"),
        (status = 404, description = "Theatre hall not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn update_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateTheatreHallRequest>,
) -> AppResult<Json<ApiResponse<TheatreHall>>> {
    let resp = theatre_hall_service::update_theatre_hall(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/theatrehalls/{id}",
    params(("id" = Uuid, Path, description = "Theatre hall ID")),
    responses(
        (status = 200, description = "Theatre hall deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Theatre hall not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn delete_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = theatre_hall_service::delete_theatre_hall(&state, &user, id).await?;
    Ok(Json(resp))
}
