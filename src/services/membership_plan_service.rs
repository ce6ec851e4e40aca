use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
    check_fields,
};
use crate::entities::{
    gym_entity as gyms, membership_entity as memberships, membership_plan_entity as plans,
    payment_entity as payments,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;
use crate::utils::required;

fn validate_duration(value: i32) -> AppResult<()> {
    if value <= 0 {
        return Err(AppError::ValidationError(
            "Duration value must be positive".to_string(),
        ));
    }
    Ok(())
}

/// Billing rows belong to the gym that sold the plan, so a plan that has been
/// sold stays where it is.
fn check_plan_move(memberships: u64, payments: u64) -> AppResult<()> {
    if memberships > 0 || payments > 0 {
        return Err(AppError::Conflict(
            "Membership plan is still referenced by memberships or payments".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct MembershipPlanService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl MembershipPlanService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_plan(
        &self,
        caller: &Caller,
        request: CreateMembershipPlanRequest,
    ) -> AppResult<MembershipPlanResponse> {
        self.authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::MembershipPlan,
                Target::Under(Parent::Gym(request.gym_id)),
            )
            .await?;
        validate_duration(request.duration_value)?;

        let plan = plans::ActiveModel {
            gym_id: Set(request.gym_id),
            plan_name: Set(required("Plan name", &request.plan_name)?),
            plan_description: Set(clean(request.plan_description)),
            duration_unit: Set(request.duration_unit),
            duration_value: Set(request.duration_value),
            category: Set(required("Category", &request.category)?),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Membership plan {} created for gym {}", plan.id, plan.gym_id);
        Ok(MembershipPlanResponse::from(plan))
    }

    pub async fn get_plan(&self, caller: &Caller, plan_id: i64) -> AppResult<MembershipPlanResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::MembershipPlan, Target::Row(plan_id))
            .await?;
        let plan = plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
        Ok(MembershipPlanResponse::from(plan))
    }

    pub async fn list_plans(
        &self,
        caller: &Caller,
        query: &MembershipPlanQuery,
    ) -> AppResult<PaginatedResponse<MembershipPlanResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::MembershipPlan)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = plans::Entity::find()
            .filter(scope::condition(ResourceKind::MembershipPlan, filter))
            .order_by_asc(plans::Column::Id);
        if let Some(gym_id) = query.gym_id {
            select = select.filter(plans::Column::GymId.eq(gym_id));
        }
        if let Some(category) = clean(query.category.clone()) {
            select = select.filter(plans::Column::Category.eq(category));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_plan(
        &self,
        caller: &Caller,
        plan_id: i64,
        request: UpdateMembershipPlanRequest,
    ) -> AppResult<MembershipPlanResponse> {
        self.authz
            .enforce(caller, Action::Update, ResourceKind::MembershipPlan, Target::Row(plan_id))
            .await?;

        let plan = plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        let moved_to = request.gym_id.filter(|gym_id| *gym_id != plan.gym_id);
        if let Some(gym_id) = moved_to {
            check_fields(caller, ResourceKind::MembershipPlan, &["gym_id"])?;
            gyms::Entity::find_by_id(gym_id)
                .one(&self.pool)
                .await?
                .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

            let memberships = memberships::Entity::find()
                .filter(memberships::Column::MembershipPlanId.eq(plan_id))
                .count(&self.pool)
                .await?;
            let payments = payments::Entity::find()
                .filter(payments::Column::MembershipPlanId.eq(plan_id))
                .count(&self.pool)
                .await?;
            check_plan_move(memberships, payments)?;
        }

        let mut am = plan.into_active_model();
        if let Some(gym_id) = moved_to {
            am.gym_id = Set(gym_id);
        }
        if let Some(v) = request.plan_name {
            am.plan_name = Set(required("Plan name", &v)?);
        }
        if request.plan_description.is_some() {
            am.plan_description = Set(clean(request.plan_description));
        }
        if let Some(v) = request.duration_unit {
            am.duration_unit = Set(v);
        }
        if let Some(v) = request.duration_value {
            validate_duration(v)?;
            am.duration_value = Set(v);
        }
        if let Some(v) = request.category {
            am.category = Set(required("Category", &v)?);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("Membership plan {} updated by {}", plan_id, caller.id);
        Ok(MembershipPlanResponse::from(updated))
    }

    /// Prices go with the plan. Refused while memberships reference it.
    pub async fn delete_plan(&self, caller: &Caller, plan_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::MembershipPlan, Target::Row(plan_id))
            .await?;
        let plan = plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
        plan.delete(&self.pool).await?;

        log::info!("Membership plan {} deleted by {}", plan_id, caller.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_duration() {
        assert!(validate_duration(1).is_ok());
        assert!(validate_duration(0).is_err());
        assert!(validate_duration(-3).is_err());
    }

    #[test]
    fn test_unsold_plan_can_move() {
        assert!(check_plan_move(0, 0).is_ok());
    }

    #[test]
    fn test_sold_plan_stays_with_its_gym() {
        for (memberships, payments) in [(1, 0), (0, 2), (3, 3)] {
            let err = check_plan_move(memberships, payments).unwrap_err();
            assert!(matches!(err, AppError::Conflict(ref m) if m.contains("still referenced")));
        }
    }
}
