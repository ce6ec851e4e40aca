use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Price validity windows of one plan never overlap (half-open `[start, end)`).
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "plan_prices")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub membership_plan_id: i64,
    pub price_cents: i64,
    pub validity_start: DateTime<Utc>,
    pub validity_end: DateTime<Utc>,
    pub comments: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
