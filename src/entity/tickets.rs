use async_trait::async_trait;
use sea_orm::entity::prelude::*;

use crate::booking::seat;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub row: i32,
    pub seat: i32,
    pub performance_id: Uuid,
    pub reservation_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performances::Entity",
        from = "Column::PerformanceId",
        to = "super::performances::Column::Id",
        on_delete = "Cascade"
    )]
    Performances,
    #[sea_orm(
        belongs_to = "super::reservations::Entity",
        from = "Column::ReservationId",
        to = "super::reservations::Column::Id",
        on_delete = "Cascade"
    )]
    Reservations,
}

impl Related<super::performances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performances.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    /// Every ticket write is re-checked against the hall of its performance,
    /// whichever code path produced the row.
    async fn before_save<C>(self, db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let (Some(row), Some(seat), Some(performance_id)) = (
            self.row.try_as_ref().copied(),
            self.seat.try_as_ref().copied(),
            self.performance_id.try_as_ref().copied(),
        ) else {
            return Ok(self);
        };

        let hall = super::theatre_halls::Entity::find()
            .inner_join(super::performances::Entity)
            .filter(super::performances::Column::Id.eq(performance_id))
            .one(db)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("performance {performance_id}")))?;

        seat::validate(row, seat, hall.dimensions())
            .map_err(|err| DbErr::Custom(err.to_string()))?;

        Ok(self)
    }
}
