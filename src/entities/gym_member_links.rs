use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Many members per gym, exactly one gym per member.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "gym_member_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub gym_id: i64,
    #[sea_orm(unique)]
    pub member_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
