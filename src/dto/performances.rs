use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    dto::plays::PlaySummary,
    models::{TakenPlace, TheatreHall},
};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePerformanceRequest {
    pub play: Uuid,
    pub theatre_hall: Uuid,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePerformanceRequest {
    pub play: Option<Uuid>,
    pub theatre_hall: Option<Uuid>,
    pub show_time: Option<DateTime<Utc>>,
}

/// Write-side view returned by create and update.
#[derive(Debug, Serialize, ToSchema)]
pub struct Performance {
    pub id: Uuid,
    pub play: Uuid,
    pub theatre_hall: Uuid,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PerformanceSummary {
    pub id: Uuid,
    pub show_time: DateTime<Utc>,
    pub play_title: String,
    pub theatre_hall_name: String,
    pub theatre_hall_capacity: i64,
    pub tickets_available: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceDetail {
    pub id: Uuid,
    pub show_time: DateTime<Utc>,
    pub play: PlaySummary,
    pub theatre_hall: TheatreHall,
    pub taken_places: Vec<TakenPlace>,
    pub tickets_available: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PerformanceList {
    pub items: Vec<PerformanceSummary>,
}
