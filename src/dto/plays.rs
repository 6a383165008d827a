use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Actor, Genre};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlayRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub actors: Vec<Uuid>,
    #[serde(default)]
    pub genres: Vec<Uuid>,
}

/// Omitted fields are left untouched; `actors`/`genres` replace the whole set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePlayRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub actors: Option<Vec<Uuid>>,
    pub genres: Option<Vec<Uuid>>,
}

/// List view: related entities are flattened to their display names.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PlaySummary {
    pub id: Uuid,
    pub title: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayDetail {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub actors: Vec<Actor>,
    pub genres: Vec<Genre>,
    pub image: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PlayList {
    pub items: Vec<PlaySummary>,
}
