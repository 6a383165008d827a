use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Genre,
    response::ApiResponse,
    routes::params::Pagination,
    services::genre_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genres).post(create_genre))
        .route(
            "/{id}",
            get(get_genre)
                .put(update_genre)
                .patch(update_genre)
                .delete(delete_genre),
        )
}

#[utoipa::path(
    get,
    path = "/api/genres",
    params(Pagination),
    responses(
        (status = 200, description = "List genres", body = ApiResponse<GenreList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn list_genres(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<GenreList>>> {
    let resp = genre_service::list_genres(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Genre created", body = ApiResponse<Genre>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateGenreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Genre>>)> {
    let resp = genre_service::create_genre(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre", body = ApiResponse<Genre>),
        (status = 404, description = "Genre not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn get_genre(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    let resp = genre_service::get_genre(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    params(("id" = Uuid, Path, description = "Genre ID")),
    request_body = UpdateGenreRequest,
    responses(
        (status = 200, description = "Genre updated", body = ApiResponse<Genre>),
        (status = 404, description = "Genre not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn update_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateGenreRequest>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    let resp = genre_service::update_genre(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    params(("id" = Uuid, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Genre not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = genre_service::delete_genre(&state, &user, id).await?;
    Ok(Json(resp))
}
