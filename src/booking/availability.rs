use thiserror::Error;
use uuid::Uuid;

use super::HallDimensions;

/// More tickets exist for a performance than its hall has seats. Only
/// reachable if the seat uniqueness guarantee was bypassed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("performance {performance_id} has {taken} tickets for a capacity of {capacity}")]
pub struct CapacityExceeded {
    pub performance_id: Uuid,
    pub capacity: i64,
    pub taken: i64,
}

/// Seats left for a performance given the live ticket count.
pub fn tickets_available(
    performance_id: Uuid,
    hall: HallDimensions,
    taken: i64,
) -> Result<i64, CapacityExceeded> {
    let capacity = hall.capacity();
    let available = capacity - taken;
    if available < 0 {
        tracing::error!(
            performance_id = %performance_id,
            capacity,
            taken,
            "ticket count exceeds hall capacity"
        );
        return Err(CapacityExceeded {
            performance_id,
            capacity,
            taken,
        });
    }
    Ok(available)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subtracts_taken_seats_from_capacity() {
        let hall = HallDimensions::new(5, 10);
        assert_eq!(tickets_available(Uuid::nil(), hall, 0), Ok(50));
        assert_eq!(tickets_available(Uuid::nil(), hall, 2), Ok(48));
    }

    #[test]
    fn sold_out_is_zero() {
        let hall = HallDimensions::new(2, 3);
        assert_eq!(tickets_available(Uuid::nil(), hall, 6), Ok(0));
    }

    #[test]
    fn overbooking_is_an_error_not_a_clamp() {
        let id = Uuid::new_v4();
        let err = tickets_available(id, HallDimensions::new(2, 3), 7).unwrap_err();
        assert_eq!(
            err,
            CapacityExceeded {
                performance_id: id,
                capacity: 6,
                taken: 7,
            }
        );
    }
}
