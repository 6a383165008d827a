use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::actors::{ActorList, CreateActorRequest, UpdateActorRequest},
    error::AppResult,
    media::{self, ImageForm},
    middleware::auth::AuthUser,
    models::Actor,
    response::ApiResponse,
    routes::params::Pagination,
    services::actor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_actors).post(create_actor))
        .route(
            "/{id}",
            get(get_actor)
                .put(update_actor)
                .patch(update_actor)
                .delete(delete_actor),
        )
        .route("/{id}/upload-image", post(upload_image))
}

#[utoipa::path(
    get,
    path = "/api/actors",
    params(Pagination),
    responses(
        (status = 200, description = "List actors", body = ApiResponse<ActorList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn list_actors(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<ActorList>>> {
    let resp = actor_service::list_actors(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/actors",
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Actor created", body = ApiResponse<Actor>),
        (status = 400, description = "Invalid input"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn create_actor(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateActorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Actor>>)> {
    let resp = actor_service::create_actor(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/actors/{id}",
    params(("id" = Uuid, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor", body = ApiResponse<Actor>),
        (status = 404, description = "Actor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn get_actor(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let resp = actor_service::get_actor(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/actors/{id}",
    params(("id" = Uuid, Path, description = "Actor ID")),
    request_body = UpdateActorRequest,
    responses(
        (status = 200, description = "Actor updated", body = ApiResponse<Actor>),
        (status = 404, description = "Actor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn update_actor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateActorRequest>,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let resp = actor_service::update_actor(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/actors/{id}",
    params(("id" = Uuid, Path, description = "Actor ID")),
    responses(
        (status = 200, description = "Actor deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Actor not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn delete_actor(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = actor_service::delete_actor(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/actors/{id}/upload-image",
    params(("id" = Uuid, Path, description = "Actor ID")),
    request_body(content = ImageForm, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Image stored", body = ApiResponse<Actor>),
        (status = 400, description = "Missing or unsupported image")
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let upload = media::image_from_multipart(multipart).await?;
    let resp = actor_service::upload_image(&state, &user, id, upload).await?;
    Ok(Json(resp))
}
