//! Presence vote entity: at most one row per user.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Whether a user will join on Friday evening.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(10))")]
#[serde(rename_all = "lowercase")]
pub enum Presence {
    #[sea_orm(string_value = "present")]
    Present,
    #[sea_orm(string_value = "absent")]
    Absent,
}

impl Presence {
    /// Wire name of the value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Present => "present",
            Self::Absent => "absent",
        }
    }

    /// Parse a wire name.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "present" => Some(Self::Present),
            "absent" => Some(Self::Absent),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "presence_vote")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    #[sea_orm(unique)]
    pub user_id: i32,

    pub presence: Presence,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_presence_parse() {
        assert_eq!(Presence::parse("present"), Some(Presence::Present));
        assert_eq!(Presence::parse("absent"), Some(Presence::Absent));
        assert_eq!(Presence::parse("maybe"), None);
        assert_eq!(Presence::parse("Present"), None);
    }

    #[test]
    fn test_presence_serializes_lowercase() {
        let json = serde_json::to_string(&Presence::Absent).unwrap_or_default();
        assert_eq!(json, "\"absent\"");
        assert_eq!(Presence::Present.as_str(), "present");
    }
}
