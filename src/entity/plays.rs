use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "plays")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub image: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::play_actors::Entity")]
    PlayActors,
    #[sea_orm(has_many = "super::play_genres::Entity")]
    PlayGenres,
    #[sea_orm(has_many = "super::performances::Entity")]
    Performances,
}

impl Related<super::play_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayActors.def()
    }
}

impl Related<super::play_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayGenres.def()
    }
}

impl Related<super::performances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performances.def()
    }
}

impl Related<super::actors::Entity> for Entity {
    fn to() -> RelationDef {
        super::play_actors::Relation::Actors.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::play_actors::Relation::Plays.def().rev())
    }
}

impl Related<super::genres::Entity> for Entity {
    fn to() -> RelationDef {
        super::play_genres::Relation::Genres.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::play_genres::Relation::Plays.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
