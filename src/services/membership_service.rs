use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::{
    membership_entity as memberships, membership_plan_entity as plans, user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::overlap::{MembershipIntervals, Period, parse_instant, parse_period, validate_interval};
use crate::services::scope;
use crate::services::user_service::require_member;

/// The plan must exist and belong to the member's gym.
pub(crate) async fn require_plan_in_gym<C: ConnectionTrait>(
    conn: &C,
    plan_id: i64,
    gym_id: Option<i64>,
) -> AppResult<plans::Model> {
    let plan = plans::Entity::find_by_id(plan_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;
    check_plan_gym(&plan, gym_id)?;
    Ok(plan)
}

pub(crate) fn check_plan_gym(plan: &plans::Model, gym_id: Option<i64>) -> AppResult<()> {
    match gym_id {
        Some(gym_id) if gym_id == plan.gym_id => Ok(()),
        Some(_) => Err(AppError::ValidationError(
            "Membership plan does not belong to the member's gym".to_string(),
        )),
        None => Err(AppError::ValidationError(
            "Member is not linked to a gym".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct MembershipService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl MembershipService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_membership(
        &self,
        caller: &Caller,
        request: CreateMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        let member_id = request.member_id;
        let owner = self
            .authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::Membership,
                Target::Under(Parent::Member(member_id)),
            )
            .await?;
        require_member(&self.pool, member_id).await?;
        require_plan_in_gym(&self.pool, request.membership_plan_id, owner.gym_id).await?;
        let period = parse_period(&request.start_date, &request.end_date)?;

        let txn = self.pool.begin().await?;
        // serialize writers for this member until commit
        users::Entity::find_by_id(member_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        validate_interval(&MembershipIntervals::new(&txn), member_id, period, None)
            .await?
            .into_result("membership")?;

        let membership = memberships::ActiveModel {
            member_id: Set(member_id),
            membership_plan_id: Set(request.membership_plan_id),
            start_date: Set(period.start),
            end_date: Set(period.end),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!(
            "Membership {} created for member {} on plan {}",
            membership.id,
            member_id,
            membership.membership_plan_id
        );
        Ok(MembershipResponse::from(membership))
    }

    pub async fn get_membership(
        &self,
        caller: &Caller,
        membership_id: i64,
    ) -> AppResult<MembershipResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::Membership, Target::Row(membership_id))
            .await?;
        let membership = memberships::Entity::find_by_id(membership_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        Ok(MembershipResponse::from(membership))
    }

    pub async fn list_memberships(
        &self,
        caller: &Caller,
        query: &MemberRecordQuery,
    ) -> AppResult<PaginatedResponse<MembershipResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::Membership)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = memberships::Entity::find()
            .filter(scope::condition(ResourceKind::Membership, filter))
            .order_by_desc(memberships::Column::StartDate);
        if let Some(member_id) = query.member_id {
            select = select.filter(memberships::Column::MemberId.eq(member_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_membership(
        &self,
        caller: &Caller,
        membership_id: i64,
        request: UpdateMembershipRequest,
    ) -> AppResult<MembershipResponse> {
        let owner = self
            .authz
            .enforce(caller, Action::Update, ResourceKind::Membership, Target::Row(membership_id))
            .await?;
        if let Some(plan_id) = request.membership_plan_id {
            require_plan_in_gym(&self.pool, plan_id, owner.gym_id).await?;
        }
        let new_start = request
            .start_date
            .as_deref()
            .map(|raw| parse_instant("start date", raw))
            .transpose()?;
        let new_end = request
            .end_date
            .as_deref()
            .map(|raw| parse_instant("end date", raw))
            .transpose()?;

        let txn = self.pool.begin().await?;
        let membership = memberships::Entity::find_by_id(membership_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        users::Entity::find_by_id(membership.member_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let period = Period::new(
            new_start.unwrap_or(membership.start_date),
            new_end.unwrap_or(membership.end_date),
        );
        if new_start.is_some() || new_end.is_some() {
            validate_interval(
                &MembershipIntervals::new(&txn),
                membership.member_id,
                period,
                Some(membership.id),
            )
            .await?
            .into_result("membership")?;
        }

        let mut am = membership.into_active_model();
        am.start_date = Set(period.start);
        am.end_date = Set(period.end);
        if let Some(plan_id) = request.membership_plan_id {
            am.membership_plan_id = Set(plan_id);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&txn).await?;
        txn.commit().await?;

        log::info!("Membership {} updated by {}", membership_id, caller.id);
        Ok(MembershipResponse::from(updated))
    }

    pub async fn delete_membership(&self, caller: &Caller, membership_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::Membership, Target::Row(membership_id))
            .await?;
        let membership = memberships::Entity::find_by_id(membership_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership not found".to_string()))?;
        membership.delete(&self.pool).await?;

        log::info!("Membership {} deleted by {}", membership_id, caller.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::DurationUnit;

    fn plan(gym_id: i64) -> plans::Model {
        plans::Model {
            id: 1,
            gym_id,
            plan_name: "Monthly".to_string(),
            plan_description: None,
            duration_unit: DurationUnit::Months,
            duration_value: 1,
            category: "standard".to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn test_plan_from_own_gym_accepted() {
        assert!(check_plan_gym(&plan(3), Some(3)).is_ok());
    }

    #[test]
    fn test_plan_from_other_gym_rejected() {
        let err = check_plan_gym(&plan(3), Some(4)).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("member's gym")));
    }

    #[test]
    fn test_unlinked_member_rejected() {
        let err = check_plan_gym(&plan(3), None).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("not linked")));
    }
}
