use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Genre;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGenreRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGenreRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct GenreList {
    pub items: Vec<Genre>,
}
