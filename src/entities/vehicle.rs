use async_trait::async_trait;
use rand::Rng;
use sea_orm::{entity::prelude::*, ActiveValue, ActiveValue::Set};
use serde::{Deserialize, Serialize};

/// Smallest and largest accepted payload capacity, inclusive.
pub const MIN_PAYLOAD_CAPACITY: i32 = 1;
pub const MAX_PAYLOAD_CAPACITY: i32 = 1000;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "vehicles")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub unique_number: String,
    pub current_location_id: i32,
    pub payload_capacity: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::location::Entity",
        from = "Column::CurrentLocationId",
        to = "super::location::Column::Id",
        on_update = "Cascade",
        on_delete = "Cascade"
    )]
    CurrentLocation,
}

impl Related<super::location::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CurrentLocation.def()
    }
}

/// Produces a vehicle identifier: four digits in 1000..=9999 followed by
/// one uppercase ASCII letter, e.g. `4821K`.
pub fn generate_unique_number() -> String {
    let mut rng = rand::thread_rng();
    let digits: u16 = rng.gen_range(1000..=9999);
    let letter = (b'A' + rng.gen_range(0..26u8)) as char;
    format!("{digits}{letter}")
}

/// Checks the `DDDDL` identifier format.
pub fn is_valid_unique_number(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() == 5
        && bytes[0] != b'0'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[4].is_ascii_uppercase()
}

#[async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C: ConnectionTrait>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;

        if insert {
            let missing = match &active_model.unique_number {
                ActiveValue::NotSet => true,
                ActiveValue::Set(value) | ActiveValue::Unchanged(value) => value.is_empty(),
            };
            if missing {
                active_model.unique_number = Set(generate_unique_number());
            }
        }

        Ok(active_model)
    }
}
