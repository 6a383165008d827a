//! Booking rules shared by the reservation service, the ticket entity hook
//! and the performance read models.

pub mod availability;
pub mod seat;

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

pub use availability::{CapacityExceeded, tickets_available};
pub use seat::HallDimensions;

/// The two coordinates a ticket claims inside a hall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Coordinate {
    Row,
    Seat,
}

impl Coordinate {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coordinate::Row => "row",
            Coordinate::Seat => "seat",
        }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{coordinate} number must be in available range: ({min}, {max})")]
    OutOfRange {
        coordinate: Coordinate,
        value: i32,
        min: i32,
        max: i32,
    },

    #[error("reservation must contain at least one ticket")]
    EmptyReservation,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("seat {seat} in row {row} is already taken for performance {performance_id}")]
pub struct SeatAlreadyTaken {
    pub performance_id: Uuid,
    pub row: i32,
    pub seat: i32,
}
