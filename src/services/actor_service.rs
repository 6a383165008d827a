use sea_orm::{
    ActiveModelTrait, EntityTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::actors::{ActorList, CreateActorRequest, UpdateActorRequest},
    entity::actors::{ActiveModel, Column, Entity as Actors},
    error::{AppError, AppResult},
    media::{self, ImageUpload},
    middleware::auth::{AuthUser, ensure_admin},
    models::Actor,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::require_text,
    state::AppState,
};

pub async fn list_actors(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ActorList>> {
    let page = pagination.normalize();
    let finder = Actors::find()
        .order_by_asc(Column::LastName)
        .order_by_asc(Column::FirstName);

    let total = finder.clone().count(&state.orm).await?;
    let items = finder
        .limit(page.limit())
        .offset(page.offset())
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Actor::from)
        .collect();

    Ok(ApiResponse::page("Actors", ActorList { items }, &page, total))
}

pub async fn get_actor(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Actor>> {
    let actor = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Actor", Actor::from(actor), None))
}

pub async fn create_actor(
    state: &AppState,
    user: &AuthUser,
    payload: CreateActorRequest,
) -> AppResult<ApiResponse<Actor>> {
    ensure_admin(user)?;
    let actor = ActiveModel {
        id: Set(Uuid::new_v4()),
        first_name: Set(require_text("first_name", payload.first_name)?),
        last_name: Set(require_text("last_name", payload.last_name)?),
        image: Set(None),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        user.user_id,
        "actor_create",
        "actors",
        serde_json::json!({ "actor_id": actor.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Actor created",
        Actor::from(actor),
        Some(Meta::empty()),
    ))
}

pub async fn update_actor(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateActorRequest,
) -> AppResult<ApiResponse<Actor>> {
    ensure_admin(user)?;
    let existing = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(first_name) = payload.first_name {
        active.first_name = Set(require_text("first_name", first_name)?);
    }
    if let Some(last_name) = payload.last_name {
        active.last_name = Set(require_text("last_name", last_name)?);
    }
    let actor = active.update(&state.orm).await?;

    audit::record(
        state,
        user.user_id,
        "actor_update",
        "actors",
        serde_json::json!({ "actor_id": actor.id }),
    )
    .await;

    Ok(ApiResponse::success("Updated", Actor::from(actor), Some(Meta::empty())))
}

/// Removing an actor only detaches it from its plays.
pub async fn delete_actor(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Actors::delete_by_id(id).exec(&state.orm).await?;
    if let Some(image) = existing.image.as_deref() {
        media::remove_image(&state.config.media_root, image).await;
    }

    audit::record(
        state,
        user.user_id,
        "actor_delete",
        "actors",
        serde_json::json!({ "actor_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    upload: ImageUpload,
) -> AppResult<ApiResponse<Actor>> {
    ensure_admin(user)?;
    let existing = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let path = media::store_image(
        &state.config.media_root,
        "actors",
        &existing.full_name(),
        &upload,
    )
    .await?;
    let previous = existing.image.clone();

    let mut active: ActiveModel = existing.into();
    active.image = Set(Some(path));
    let actor = active.update(&state.orm).await?;

    if let Some(previous) = previous.as_deref() {
        media::remove_image(&state.config.media_root, previous).await;
    }

    audit::record(
        state,
        user.user_id,
        "actor_image_upload",
        "actors",
        serde_json::json!({ "actor_id": actor.id, "image": actor.image }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image uploaded",
        Actor::from(actor),
        Some(Meta::empty()),
    ))
}
