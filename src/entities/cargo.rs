use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Smallest and largest accepted cargo weight, inclusive.
pub const MIN_WEIGHT: i32 = 1;
pub const MAX_WEIGHT: i32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cargo")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub pick_up_location_id: i32,
    pub delivery_location_id: i32,
    pub weight: i32,
    #[sea_orm(column_type = "Text")]
    pub description: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::PickUpLocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    PickUpLocation,
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::DeliveryLocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    DeliveryLocation,
}

/// Joins a cargo row with its pick-up location.
impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PickUpLocation.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
