use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A gym has at most one gym admin and a gym admin runs at most one gym.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "gym_admin_links")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub gym_admin_id: i64,
    #[sea_orm(unique)]
    pub gym_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
