use crate::entities::{DurationUnit, membership_plan_entity, plan_price_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMembershipPlanRequest {
    pub gym_id: i64,
    #[schema(example = "Quarterly Strength")]
    pub plan_name: String,
    pub plan_description: Option<String>,
    pub duration_unit: DurationUnit,
    #[schema(example = 3)]
    pub duration_value: i32,
    #[schema(example = "strength")]
    pub category: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMembershipPlanRequest {
    /// Only admins may move a plan to another gym.
    pub gym_id: Option<i64>,
    pub plan_name: Option<String>,
    pub plan_description: Option<String>,
    pub duration_unit: Option<DurationUnit>,
    pub duration_value: Option<i32>,
    pub category: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipPlanResponse {
    pub id: i64,
    pub gym_id: i64,
    pub plan_name: String,
    pub plan_description: Option<String>,
    pub duration_unit: DurationUnit,
    pub duration_value: i32,
    pub category: String,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<membership_plan_entity::Model> for MembershipPlanResponse {
    fn from(m: membership_plan_entity::Model) -> Self {
        Self {
            id: m.id,
            gym_id: m.gym_id,
            plan_name: m.plan_name,
            plan_description: m.plan_description,
            duration_unit: m.duration_unit,
            duration_value: m.duration_value,
            category: m.category,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MembershipPlanQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub gym_id: Option<i64>,
    pub category: Option<String>,
}

/// Dates accept `YYYY-MM-DD` or RFC 3339.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePlanPriceRequest {
    pub membership_plan_id: i64,
    #[schema(example = 450000)]
    pub price_cents: i64,
    #[schema(example = "2024-01-01")]
    pub validity_start: String,
    #[schema(example = "2024-07-01")]
    pub validity_end: String,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePlanPriceRequest {
    pub price_cents: Option<i64>,
    pub validity_start: Option<String>,
    pub validity_end: Option<String>,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PlanPriceResponse {
    pub id: i64,
    pub membership_plan_id: i64,
    pub price_cents: i64,
    pub validity_start: DateTime<Utc>,
    pub validity_end: DateTime<Utc>,
    pub comments: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<plan_price_entity::Model> for PlanPriceResponse {
    fn from(m: plan_price_entity::Model) -> Self {
        Self {
            id: m.id,
            membership_plan_id: m.membership_plan_id,
            price_cents: m.price_cents,
            validity_start: m.validity_start,
            validity_end: m.validity_end,
            comments: m.comments,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlanPriceQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub membership_plan_id: Option<i64>,
}
