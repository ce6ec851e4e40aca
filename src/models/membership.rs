use crate::entities::{PaymentType, membership_entity, payment_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// Filter for lists of member-owned rows.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MemberRecordQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub member_id: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateMembershipRequest {
    pub member_id: i64,
    pub membership_plan_id: i64,
    #[schema(example = "2024-01-01")]
    pub start_date: String,
    #[schema(example = "2024-02-01")]
    pub end_date: String,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateMembershipRequest {
    pub membership_plan_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MembershipResponse {
    pub id: i64,
    pub member_id: i64,
    pub membership_plan_id: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<membership_entity::Model> for MembershipResponse {
    fn from(m: membership_entity::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            membership_plan_id: m.membership_plan_id,
            start_date: m.start_date,
            end_date: m.end_date,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatePaymentRequest {
    pub member_id: i64,
    pub membership_plan_id: Option<i64>,
    /// Covered period, if the payment is for one.
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    /// Defaults to now.
    pub payment_date: Option<String>,
    pub payment_type: PaymentType,
    #[schema(example = "upi")]
    pub payment_method: String,
    pub calculation_breakup: Option<String>,
    #[schema(example = 450000)]
    pub total_amount_cents: i64,
    pub comments: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdatePaymentRequest {
    pub membership_plan_id: Option<i64>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub payment_date: Option<String>,
    pub payment_type: Option<PaymentType>,
    pub payment_method: Option<String>,
    pub calculation_breakup: Option<String>,
    pub total_amount_cents: Option<i64>,
    pub comments: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentResponse {
    pub id: i64,
    pub member_id: i64,
    pub membership_plan_id: Option<i64>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub payment_date: DateTime<Utc>,
    pub payment_type: PaymentType,
    pub payment_method: String,
    pub calculation_breakup: Option<String>,
    pub total_amount_cents: i64,
    pub comments: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<payment_entity::Model> for PaymentResponse {
    fn from(m: payment_entity::Model) -> Self {
        Self {
            id: m.id,
            member_id: m.member_id,
            membership_plan_id: m.membership_plan_id,
            start_date: m.start_date,
            end_date: m.end_date,
            payment_date: m.payment_date,
            payment_type: m.payment_type,
            payment_method: m.payment_method,
            calculation_breakup: m.calculation_breakup,
            total_amount_cents: m.total_amount_cents,
            comments: m.comments,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
