use crate::entities::{gym_admin_link_entity, gym_member_link_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateGymAdminLinkRequest {
    pub gym_id: i64,
    pub gym_admin_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GymAdminLinkResponse {
    pub id: i64,
    pub gym_id: i64,
    pub gym_admin_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<gym_admin_link_entity::Model> for GymAdminLinkResponse {
    fn from(m: gym_admin_link_entity::Model) -> Self {
        Self {
            id: m.id,
            gym_id: m.gym_id,
            gym_admin_id: m.gym_admin_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateGymMemberLinkRequest {
    pub gym_id: i64,
    pub member_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct GymMemberLinkResponse {
    pub id: i64,
    pub gym_id: i64,
    pub member_id: i64,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<gym_member_link_entity::Model> for GymMemberLinkResponse {
    fn from(m: gym_member_link_entity::Model) -> Self {
        Self {
            id: m.id,
            gym_id: m.gym_id,
            member_id: m.member_id,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GymLinkQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub gym_id: Option<i64>,
}
