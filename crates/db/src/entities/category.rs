//! Restaurant category entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Display name (not unique)
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::restaurant::Entity")]
    Restaurants,

    #[sea_orm(has_many = "super::food_poll_vote::Entity")]
    FoodPollVotes,
}

impl Related<super::restaurant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Restaurants.def()
    }
}

impl Related<super::food_poll_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodPollVotes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
