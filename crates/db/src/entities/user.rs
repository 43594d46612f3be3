//! User entity.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub username: String,

    /// Empty for accounts created by an admin without an email
    #[sea_orm(unique, nullable)]
    pub email: Option<String>,

    /// Argon2 PHC string
    #[serde(skip_serializing)]
    pub password_hash: String,

    #[sea_orm(default_value = "")]
    pub first_name: String,

    #[sea_orm(default_value = "")]
    pub last_name: String,

    /// Session token (rotated on logout)
    #[sea_orm(unique, nullable)]
    #[serde(skip_serializing)]
    pub token: Option<String>,

    #[sea_orm(default_value = false)]
    pub is_superuser: bool,

    #[sea_orm(default_value = true)]
    pub is_active: bool,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub last_login_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::food_poll_vote::Entity")]
    FoodPollVotes,

    #[sea_orm(has_one = "super::presence_vote::Entity")]
    PresenceVote,

    #[sea_orm(has_many = "super::review::Entity")]
    Reviews,
}

impl Related<super::food_poll_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FoodPollVotes.def()
    }
}

impl Related<super::presence_vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PresenceVote.def()
    }
}

impl Related<super::review::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reviews.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
