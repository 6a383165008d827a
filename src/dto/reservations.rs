use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::dto::performances::PerformanceSummary;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TicketRequest {
    pub row: i32,
    pub seat: i32,
    pub performance: Uuid,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub tickets: Vec<TicketRequest>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationTicket {
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub performance: PerformanceSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationSummary {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<ReservationTicket>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationList {
    pub items: Vec<ReservationSummary>,
}
