use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::plays::{CreatePlayRequest, PlayDetail, PlayList, UpdatePlayRequest},
    error::AppResult,
    media::{self, ImageForm},
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{Pagination, PlayFilter},
    services::play_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plays).post(create_play))
        .route(
            "/{id}",
            get(get_play)
                .put(update_play)
                .patch(update_play)
                .delete(delete_play),
        )
        .route("/{id}/upload-image", post(upload_image))
}

#[utoipa::path(
    get,
    path = "/api/plays",
    params(Pagination, PlayFilter),
    responses(
        (status = 200, description = "List plays", body = ApiResponse<PlayList>),
        (status = 400, description = "Malformed id filter"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn list_plays(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<PlayFilter>,
) -> AppResult<Json<ApiResponse<PlayList>>> {
    let resp = play_service::list_plays(&state, pagination, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plays",
    request_body = CreatePlayRequest,
    responses(
        (status = 201, description = "Play created", body = ApiResponse<PlayDetail>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Unknown actor or genre"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn create_play(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePlayRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PlayDetail>>)> {
    let resp = play_service::create_play(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/plays/{id}",
    params(("id" = Uuid, Path, description = "Play ID")),
    responses(
        (status = 200, description = "Play", body = ApiResponse<PlayDetail>),
        (status = 404, description = "Play not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn get_play(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PlayDetail>>> {
    let resp = play_service::get_play(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/plays/{id}",
    params(("id" = Uuid, Path, description = "Play ID")),
    request_body = UpdatePlayRequest,
    responses(
        (status = 200, description = "Play updated", body = ApiResponse<PlayDetail>),
        (status = 404, description = "Play not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn update_play(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePlayRequest>,
) -> AppResult<Json<ApiResponse<PlayDetail>>> {
    let resp = play_service::update_play(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/plays/{id}",
    params(("id" = Uuid, Path, description = "Play ID")),
    responses(
        (status = 200, description = "Play deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Play not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn delete_play(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = play_service::delete_play(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plays/{id}/upload-image",
    params(("id" = Uuid, Path, description = "Play ID")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<PlayDetail>),
        (status = 400, description = "Missing or unsupported image")
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<PlayDetail>>> {
    let upload = media::image_from_multipart(multipart).await?;
    let resp = play_service::upload_image(&state, &user, id, upload).await?;
    Ok(Json(resp))
}
