use super::{Coordinate, ValidationError};

/// Seating grid of a theatre hall. Rows and seats are numbered from 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HallDimensions {
    pub rows: i32,
    pub seats_in_row: i32,
}

impl HallDimensions {
    pub fn new(rows: i32, seats_in_row: i32) -> Self {
        Self { rows, seats_in_row }
    }

    pub fn capacity(&self) -> i64 {
        i64::from(self.rows) * i64::from(self.seats_in_row)
    }
}

/// Checks a (row, seat) pair against the hall grid. The row is checked first.
pub fn validate(row: i32, seat: i32, hall: HallDimensions) -> Result<(), ValidationError> {
    let checks = [
        (Coordinate::Row, row, hall.rows),
        (Coordinate::Seat, seat, hall.seats_in_row),
    ];

    for (coordinate, value, max) in checks {
        if !(1..=max).contains(&value) {
            return Err(ValidationError::OutOfRange {
                coordinate,
                value,
                min: 1,
                max,
            });
        }
    }

    Ok(())
}

/// Checks that tickets already sold, spanning up to `(max_row, max_seat)`,
/// still fit a hall. `None` means no tickets.
pub fn validate_extent(
    extent: Option<(i32, i32)>,
    hall: HallDimensions,
) -> Result<(), ValidationError> {
    match extent {
        Some((max_row, max_seat)) => validate(max_row, max_seat, hall),
        None => Ok(()),
    }
}
