use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set};
use uuid::Uuid;

use crate::{
    audit,
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    entity::genres::{ActiveModel, Column, Entity as Genres},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Genre,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::require_text,
    state::AppState,
};

pub async fn list_genres(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<GenreList>> {
    let page = pagination.normalize();
    let finder = Genres::find().order_by_asc(Column::Name);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(page.limit())
        .offset(page.offset())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Genre::from)
        .collect();

    Ok(ApiResponse::page("Genres", GenreList { items }, &page, total))
}

pub async fn get_genre(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Genre>> {
    let genre = Genres::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Genre", Genre::from(genre), None))
}

pub async fn create_genre(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGenreRequest,
) -> AppResult<ApiResponse<Genre>> {
    ensure_admin(user)?;
    let genre = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(require_text("name", payload.name)?),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "genre_create",
        "genres",
        serde_json::json!({ "genre_id": genre.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Genre created",
        Genre::from(genre),
        Some(Meta::empty()),
    ))
}

pub async fn update_genre(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateGenreRequest,
) -> AppResult<ApiResponse<Genre>> {
    ensure_admin(user)?;
    let existing = Genres::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        active.name = Set(require_text("name", name)?);
    }
    let genre = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "genre_update",
        "genres",
        serde_json::json!({ "genre_id": genre.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", Genre::from(genre), Some(Meta::empty())))
}

pub async fn delete_genre(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let result = Genres::delete_by_id(id).exec(&state.orm).await?;
    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        user.user_id,
        "genre_delete",
        "genres",
        serde_json::json!({ "genre_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
