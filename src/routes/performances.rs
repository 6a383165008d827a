use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
};
use uuid::Uuid;

use crate::{
    dto::performances::{
        CreatePerformanceRequest, Performance, PerformanceDetail, PerformanceList,
        UpdatePerformanceRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    routes::params::{Pagination, PerformanceFilter},
    services::performance_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_performances).post(create_performance))
        .route(
            "/{id}",
            get(get_performance)
                .put(update_performance)
                .patch(update_performance)
                .delete(delete_performance),
        )
}

#[utoipa::path(
    get,
    path = "/api/performances",
    params(Pagination, PerformanceFilter),
    responses(
        (status = 200, description = "List performances", body = ApiResponse<PerformanceList>),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn list_performances(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(pagination): Query<Pagination>,
    Query(filter): Query<PerformanceFilter>,
) -> AppResult<Json<ApiResponse<PerformanceList>>> {
    let resp = performance_service::list_performances(&state, pagination, filter).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/performances",
    request_body = CreatePerformanceRequest,
    responses(
        (status = 201, description = "Performance created", body = ApiResponse<Performance>),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Unknown play or theatre hall"),
        (status = 403, description = "Admin only")
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn create_performance(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreatePerformanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Performance>>)> {
    let resp = performance_service::create_performance(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/performances/{id}",
    params(("id" = Uuid, Path, description = "Performance ID")),
    responses(
        (status = 200, description = "Performance with taken places", body = ApiResponse<PerformanceDetail>),
        (status = 404, description = "Performance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn get_performance(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<PerformanceDetail>>> {
    let resp = performance_service::get_performance(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/performances/{id}",
    params(("id" = Uuid, Path, description = "Performance ID")),
    request_body = UpdatePerformanceRequest,
    responses(
        (status = 200, description = "Performance updated", body = ApiResponse<Performance>),
        (status = 400, description = "Sold tickets do not fit the new hall"),
        (status = 404, description = "Performance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn update_performance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePerformanceRequest>,
) -> AppResult<Json<ApiResponse<Performance>>> {
    let resp = performance_service::update_performance(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/performances/{id}",
    params(("id" = Uuid, Path, description = "Performance ID")),
    responses(
        (status = 200, description = "Performance deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Performance not found")
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn delete_performance(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = performance_service::delete_performance(&state, &user, id).await?;
    Ok(Json(resp))
}
