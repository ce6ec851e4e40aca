use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::payment_entity as payments;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::overlap::{Period, parse_instant};
use crate::services::membership_service::require_plan_in_gym;
use crate::services::scope;
use crate::services::user_service::require_member;
use crate::utils::{non_negative, required};

fn parse_optional(field: &str, raw: Option<&str>) -> AppResult<Option<DateTime<Utc>>> {
    raw.map(|raw| parse_instant(field, raw)).transpose()
}

/// A covered period is optional, but when given both ends must be present and
/// ordered. Payments may overlap each other.
fn covered_period(
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> AppResult<Option<Period>> {
    match (start, end) {
        (None, None) => Ok(None),
        (Some(start), Some(end)) => {
            let period = Period::new(start, end);
            if !period.is_ordered() {
                return Err(AppError::ValidationError(
                    "start date must be before end date".to_string(),
                ));
            }
            Ok(Some(period))
        }
        _ => Err(AppError::ValidationError(
            "start date and end date must be given together".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct PaymentService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl PaymentService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_payment(
        &self,
        caller: &Caller,
        request: CreatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        let owner = self
            .authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::Payment,
                Target::Under(Parent::Member(request.member_id)),
            )
            .await?;
        require_member(&self.pool, request.member_id).await?;
        if let Some(plan_id) = request.membership_plan_id {
            require_plan_in_gym(&self.pool, plan_id, owner.gym_id).await?;
        }
        non_negative("Total amount", request.total_amount_cents)?;
        let period = covered_period(
            parse_optional("start date", request.start_date.as_deref())?,
            parse_optional("end date", request.end_date.as_deref())?,
        )?;
        let payment_date =
            parse_optional("payment date", request.payment_date.as_deref())?.unwrap_or_else(Utc::now);

        let payment = payments::ActiveModel {
            member_id: Set(request.member_id),
            membership_plan_id: Set(request.membership_plan_id),
            start_date: Set(period.map(|p| p.start)),
            end_date: Set(period.map(|p| p.end)),
            payment_date: Set(payment_date),
            payment_type: Set(request.payment_type),
            payment_method: Set(required("Payment method", &request.payment_method)?),
            calculation_breakup: Set(clean(request.calculation_breakup)),
            total_amount_cents: Set(request.total_amount_cents),
            comments: Set(clean(request.comments)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!(
            "Payment {} of {} cents recorded for member {}",
            payment.id,
            payment.total_amount_cents,
            payment.member_id
        );
        Ok(PaymentResponse::from(payment))
    }

    pub async fn get_payment(&self, caller: &Caller, payment_id: i64) -> AppResult<PaymentResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::Payment, Target::Row(payment_id))
            .await?;
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        Ok(PaymentResponse::from(payment))
    }

    pub async fn list_payments(
        &self,
        caller: &Caller,
        query: &MemberRecordQuery,
    ) -> AppResult<PaginatedResponse<PaymentResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::Payment)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = payments::Entity::find()
            .filter(scope::condition(ResourceKind::Payment, filter))
            .order_by_desc(payments::Column::PaymentDate);
        if let Some(member_id) = query.member_id {
            select = select.filter(payments::Column::MemberId.eq(member_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_payment(
        &self,
        caller: &Caller,
        payment_id: i64,
        request: UpdatePaymentRequest,
    ) -> AppResult<PaymentResponse> {
        let owner = self
            .authz
            .enforce(caller, Action::Update, ResourceKind::Payment, Target::Row(payment_id))
            .await?;

        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;

        if let Some(plan_id) = request.membership_plan_id {
            require_plan_in_gym(&self.pool, plan_id, owner.gym_id).await?;
        }
        if let Some(cents) = request.total_amount_cents {
            non_negative("Total amount", cents)?;
        }
        let period = covered_period(
            parse_optional("start date", request.start_date.as_deref())?.or(payment.start_date),
            parse_optional("end date", request.end_date.as_deref())?.or(payment.end_date),
        )?;
        let payment_date = parse_optional("payment date", request.payment_date.as_deref())?;

        let mut am = payment.into_active_model();
        am.start_date = Set(period.map(|p| p.start));
        am.end_date = Set(period.map(|p| p.end));
        if let Some(plan_id) = request.membership_plan_id {
            am.membership_plan_id = Set(Some(plan_id));
        }
        if let Some(date) = payment_date {
            am.payment_date = Set(date);
        }
        if let Some(v) = request.payment_type {
            am.payment_type = Set(v);
        }
        if let Some(v) = request.payment_method {
            am.payment_method = Set(required("Payment method", &v)?);
        }
        if request.calculation_breakup.is_some() {
            am.calculation_breakup = Set(clean(request.calculation_breakup));
        }
        if let Some(cents) = request.total_amount_cents {
            am.total_amount_cents = Set(cents);
        }
        if request.comments.is_some() {
            am.comments = Set(clean(request.comments));
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("Payment {} updated by {}", payment_id, caller.id);
        Ok(PaymentResponse::from(updated))
    }

    pub async fn delete_payment(&self, caller: &Caller, payment_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::Payment, Target::Row(payment_id))
            .await?;
        let payment = payments::Entity::find_by_id(payment_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Payment not found".to_string()))?;
        payment.delete(&self.pool).await?;

        log::info!("Payment {} deleted by {}", payment_id, caller.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_covered_period() {
        let jan = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let feb = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();

        assert_eq!(covered_period(None, None).unwrap(), None);
        assert_eq!(
            covered_period(Some(jan), Some(feb)).unwrap(),
            Some(Period::new(jan, feb))
        );
        assert!(covered_period(Some(feb), Some(jan)).is_err());
        assert!(covered_period(Some(jan), None).is_err());
    }
}
