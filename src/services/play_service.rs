use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, Query};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, LoaderTrait,
    ModelTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::plays::{CreatePlayRequest, PlayDetail, PlayList, PlaySummary, UpdatePlayRequest},
    entity::{
        actors::{Column as ActorCol, Entity as Actors},
        genres::{Column as GenreCol, Entity as Genres},
        play_actors::{self, Entity as PlayActors},
        play_genres::{self, Entity as PlayGenres},
        plays::{ActiveModel, Column, Entity as Plays, Model as PlayModel},
    },
    error::{AppError, AppResult},
    media::{self, ImageUpload},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Actor, Genre},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, PlayFilter},
    services::{dedup_ids, first_missing, require_text},
    state::AppState,
};

pub async fn list_plays(
    state: &AppState,
    pagination: Pagination,
    filter: PlayFilter,
) -> AppResult<ApiResponse<PlayList>> {
    let page = pagination.normalize();
    let mut condition = Condition::all();

    if let Some(title) = filter.title.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
        let pattern = format!("%{}%", escape_like(title));
        condition = condition.add(Expr::col((Plays, Column::Title)).ilike(pattern));
    }

    if let Some(actor_ids) = filter.actor_ids()?.filter(|ids| !ids.is_empty()) {
        condition = condition.add(
            Column::Id.in_subquery(
                Query::select()
                    .column(play_actors::Column::PlayId)
                    .from(PlayActors)
                    .and_where(play_actors::Column::ActorId.is_in(actor_ids))
                    .to_owned(),
            ),
        );
    }

    if let Some(genre_ids) = filter.genre_ids()?.filter(|ids| !ids.is_empty()) {
        condition = condition.add(
            Column::Id.in_subquery(
                Query::select()
                    .column(play_genres::Column::PlayId)
                    .from(PlayGenres)
                    .and_where(play_genres::Column::GenreId.is_in(genre_ids))
                    .to_owned(),
            ),
        );
    }

    let finder = Plays::find().filter(condition).order_by_asc(Column::Title);
    let total = finder.clone().count(&state.orm).await?;
    let plays = finder
        .limit(page.limit())
        .offset(page.offset())
        .all(&state.orm)
        .await?;

    let items = summarize(&state.orm, plays).await?;
    Ok(ApiResponse::page("Plays", PlayList { items }, &page, total))
}

pub async fn get_play(state: &AppState, id: Uuid) -> AppResult<ApiResponse<PlayDetail>> {
    let play = Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let detail = detail_of(&state.orm, play).await?;
    Ok(ApiResponse::success("Play", detail, None))
}

pub async fn create_play(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePlayRequest,
) -> AppResult<ApiResponse<PlayDetail>> {
    ensure_admin(user)?;
    let title = require_text("title", payload.title)?;
    let actor_ids = dedup_ids(payload.actors);
    let genre_ids = dedup_ids(payload.genres);

    let txn = state.orm.begin().await?;
    ensure_actors_exist(&txn, &actor_ids).await?;
    ensure_genres_exist(&txn, &genre_ids).await?;

    let play = ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set(title),
        description: Set(payload.description),
        image: Set(None),
    }
    .insert(&txn)
    .await?;

    link_actors(&txn, play.id, &actor_ids).await?;
    link_genres(&txn, play.id, &genre_ids).await?;
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "play_create",
        "plays",
        serde_json::json!({ "play_id": play.id }),
    )
    .await;

    let detail = detail_of(&state.orm, play).await?;
    Ok(ApiResponse::success("Play created", detail, Some(Meta::empty())))
}

pub async fn update_play(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdatePlayRequest,
) -> AppResult<ApiResponse<PlayDetail>> {
    ensure_admin(user)?;
    let txn = state.orm.begin().await?;
    let existing = Plays::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    if let Some(title) = payload.title {
        active.title = Set(require_text("title", title)?);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    let play = active.update(&txn).await?;

    if let Some(actors) = payload.actors {
        let actor_ids = dedup_ids(actors);
        ensure_actors_exist(&txn, &actor_ids).await?;
        PlayActors::delete_many()
            .filter(play_actors::Column::PlayId.eq(play.id))
            .exec(&txn)
            .await?;
        link_actors(&txn, play.id, &actor_ids).await?;
    }
    if let Some(genres) = payload.genres {
        let genre_ids = dedup_ids(genres);
        ensure_genres_exist(&txn, &genre_ids).await?;
        PlayGenres::delete_many()
            .filter(play_genres::Column::PlayId.eq(play.id))
            .exec(&txn)
            .await?;
        link_genres(&txn, play.id, &genre_ids).await?;
    }
    txn.commit().await?;

    audit::record(
        state,
        user.user_id,
        "play_update",
        "plays",
        serde_json::json!({ "play_id": play.id }),
    )
    .await;

    let detail = detail_of(&state.orm, play).await?;
    Ok(ApiResponse::success("Updated", detail, Some(Meta::empty())))
}

/// Deleting a play removes its performances and their tickets.
pub async fn delete_play(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    Plays::delete_by_id(id).exec(&state.orm).await?;
    if let Some(image) = existing.image.as_deref() {
        media::remove_image(&state.config.media_root, image).await;
    }

    audit::record(
        state,
        user.user_id,
        "play_delete",
        "plays",
        serde_json::json!({ "play_id": id }),
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
) -> AppResult<ApiResponse<PlayDetail>> {
    ensure_admin(user)?;
    let existing = Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let path =
        media::store_image(&state.config.media_root, "plays", &existing.title, &upload).await?;
    let previous = existing.image.clone();

    let mut active: ActiveModel = existing.into();
    active.image = Set(Some(path));
    let play = active.update(&state.orm).await?;

    if let Some(previous) = previous.as_deref() {
        media::remove_image(&state.config.media_root, previous).await;
    }

    audit::record(
        state,
        user.user_id,
        "play_image_upload",
        "plays",
        serde_json::json!({ "play_id": play.id, "image": play.image }),
    )
    .await;

    let detail = detail_of(&state.orm, play).await?;
    Ok(ApiResponse::success("Image uploaded", detail, Some(Meta::empty())))
}

/// List views for a batch of plays, loading actors and genres in two queries.
pub(crate) async fn summarize<C>(db: &C, plays: Vec<PlayModel>) -> AppResult<Vec<PlaySummary>>
where
    C: ConnectionTrait,
{
    let actors = plays
        .load_many_to_many(
            Actors::find()
                .order_by_asc(ActorCol::LastName)
                .order_by_asc(ActorCol::FirstName),
            PlayActors,
            db,
        )
        .await?;
    let genres = plays
        .load_many_to_many(Genres::find().order_by_asc(GenreCol::Name), PlayGenres, db)
        .await?;

    Ok(plays
        .into_iter()
        .zip(actors)
        .zip(genres)
        .map(|((play, actors), genres)| PlaySummary {
            id: play.id,
            title: play.title,
            genres: genres.into_iter().map(|g| g.name).collect(),
            actors: actors.iter().map(|a| a.full_name()).collect(),
            image: play.image,
        })
        .collect())
}

async fn detail_of<C>(db: &C, play: PlayModel) -> AppResult<PlayDetail>
where
    C: ConnectionTrait,
{
    let actors = play
        .find_related(Actors)
        .order_by_asc(ActorCol::LastName)
        .order_by_asc(ActorCol::FirstName)
        .all(db)
        .await?
        .into_iter()
        .map(Actor::from)
        .collect();
    let genres = play
        .find_related(Genres)
        .order_by_asc(GenreCol::Name)
        .all(db)
        .await?
        .into_iter()
        .map(Genre::from)
        .collect();

    Ok(PlayDetail {
        id: play.id,
        title: play.title,
        description: play.description,
        actors,
        genres,
        image: play.image,
    })
}

async fn ensure_actors_exist<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<Uuid> = Actors::find()
        .select_only()
        .column(ActorCol::Id)
        .filter(ActorCol::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(db)
        .await?;
    match first_missing(ids, &found) {
        Some(id) => Err(AppError::ReferenceNotFound { field: "actors", id }),
        None => Ok(()),
    }
}

async fn ensure_genres_exist<C: ConnectionTrait>(db: &C, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let found: Vec<Uuid> = Genres::find()
        .select_only()
        .column(GenreCol::Id)
        .filter(GenreCol::Id.is_in(ids.to_vec()))
        .into_tuple()
        .all(db)
        .await?;
    match first_missing(ids, &found) {
        Some(id) => Err(AppError::ReferenceNotFound { field: "genres", id }),
        None => Ok(()),
    }
}

async fn link_actors<C: ConnectionTrait>(db: &C, play_id: Uuid, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let rows = ids.iter().map(|actor_id| play_actors::ActiveModel {
        play_id: Set(play_id),
        actor_id: Set(*actor_id),
    });
    PlayActors::insert_many(rows).exec_without_returning(db).await?;
    Ok(())
}

async fn link_genres<C: ConnectionTrait>(db: &C, play_id: Uuid, ids: &[Uuid]) -> AppResult<()> {
    if ids.is_empty() {
        return Ok(());
    }
    let rows = ids.iter().map(|genre_id| play_genres::ActiveModel {
        play_id: Set(play_id),
        genre_id: Set(*genre_id),
    });
    PlayGenres::insert_many(rows).exec_without_returning(db).await?;
    Ok(())
}

fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::escape_like;

    #[test]
    fn like_wildcards_are_matched_literally() {
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a_b"), "a\\_b");
        assert_eq!(escape_like("Hamlet"), "Hamlet");
    }
}
