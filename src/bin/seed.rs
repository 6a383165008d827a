use chrono::{Duration, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use theatre_booking_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    entity::{
        Genres, TheatreHalls, actors, genres, performances, play_actors, play_genres, plays,
        theatre_halls,
    },
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
    services::auth_service::hash_password,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.database_max_connections).await?;
    run_migrations(&pool).await?;
    let orm = orm_from_pool(&pool);

    let admin_id = ensure_user(&pool, "admin@example.com", "admin12345", ROLE_ADMIN).await?;
    let user_id = ensure_user(&pool, "user@example.com", "user12345", ROLE_USER).await?;
    seed_catalog(&orm).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password)?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

/// Sample hall, play and upcoming performance. Skipped when the hall exists.
async fn seed_catalog(db: &DatabaseConnection) -> anyhow::Result<()> {
    let hall_name = "Main Stage";
    let existing = TheatreHalls::find()
        .filter(theatre_halls::Column::Name.eq(hall_name))
        .one(db)
        .await?;
    if existing.is_some() {
        println!("Catalog already seeded");
        return Ok(());
    }

    let hall = theatre_halls::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(hall_name.to_string()),
        rows: Set(12),
        seats_in_row: Set(20),
    }
    .insert(db)
    .await?;

    let drama = find_or_create_genre(db, "Drama").await?;
    let tragedy = find_or_create_genre(db, "Tragedy").await?;

    let mut cast = Vec::new();
    for (first_name, last_name) in [("Judi", "Dench"), ("Ian", "McKellen")] {
        let actor = actors::ActiveModel {
            id: Set(Uuid::new_v4()),
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            image: Set(None),
        }
        .insert(db)
        .await?;
        cast.push(actor.id);
    }

    let play = plays::ActiveModel {
        id: Set(Uuid::new_v4()),
        title: Set("Macbeth".to_string()),
        description: Set("A Scottish general's ambition turns to murder.".to_string()),
        image: Set(None),
    }
    .insert(db)
    .await?;

    for actor_id in cast {
        play_actors::ActiveModel {
            play_id: Set(play.id),
            actor_id: Set(actor_id),
        }
        .insert(db)
        .await?;
    }
    for genre_id in [drama, tragedy] {
        play_genres::ActiveModel {
            play_id: Set(play.id),
            genre_id: Set(genre_id),
        }
        .insert(db)
        .await?;
    }

    for days_ahead in [7, 14] {
        performances::ActiveModel {
            id: Set(Uuid::new_v4()),
            play_id: Set(play.id),
            theatre_hall_id: Set(hall.id),
            show_time: Set((Utc::now() + Duration::days(days_ahead)).fixed_offset()),
        }
        .insert(db)
        .await?;
    }

    println!("Seeded catalog: play '{}' in hall '{hall_name}'", play.title);
    Ok(())
}

async fn find_or_create_genre(db: &DatabaseConnection, name: &str) -> anyhow::Result<Uuid> {
    if let Some(genre) = Genres::find()
        .filter(genres::Column::Name.eq(name))
        .one(db)
        .await?
    {
        return Ok(genre.id);
    }
    let genre = genres::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name.to_string()),
    }
    .insert(db)
    .await?;
    Ok(genre.id)
}
