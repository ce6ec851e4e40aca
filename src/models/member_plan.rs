use crate::entities::{diet_plan_entity, workout_plan_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Diet and workout plans share one shape: a named chart owned by a member.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMemberPlanRequest {
    pub member_id: i64,
    #[schema(example = "Cutting phase")]
    pub plan_name: String,
    pub comments: Option<String>,
    pub chart: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMemberPlanRequest {
    pub plan_name: Option<String>,
    pub comments: Option<String>,
    pub chart: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MemberPlanResponse {
    pub id: i64,
    pub member_id: i64,
    pub plan_name: String,
    pub comments: Option<String>,
    pub chart: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<diet_plan_entity::Model> for MemberPlanResponse {
    fn from(m: diet_plan_entity::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            plan_name: m.plan_name,
            comments: m.comments,
            chart: m.chart,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

impl From<workout_plan_entity::Model> for MemberPlanResponse {
    fn from(m: workout_plan_entity::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            plan_name: m.plan_name,
            comments: m.comments,
            chart: m.chart,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
