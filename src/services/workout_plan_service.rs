use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::workout_plan_entity as workout_plans;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;
use crate::services::user_service::require_member;
use crate::utils::required;

#[derive(Clone)]
pub struct WorkoutPlanService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl WorkoutPlanService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_plan(
        &self,
        caller: &Caller,
        request: CreateMemberPlanRequest,
    ) -> AppResult<MemberPlanResponse> {
        self.authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::WorkoutPlan,
                Target::Under(Parent::Member(request.member_id)),
            )
            .await?;
        require_member(&self.pool, request.member_id).await?;

        let plan = workout_plans::ActiveModel {
            member_id: Set(request.member_id),
            plan_name: Set(required("Plan name", &request.plan_name)?),
            comments: Set(clean(request.comments)),
            chart: Set(request.chart),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Workout plan {} created for member {}", plan.id, plan.member_id);
        Ok(MemberPlanResponse::from(plan))
    }

    pub async fn get_plan(&self, caller: &Caller, plan_id: i64) -> AppResult<MemberPlanResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::WorkoutPlan, Target::Row(plan_id))
            .await?;
        let plan = workout_plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;
        Ok(MemberPlanResponse::from(plan))
    }

    pub async fn list_plans(
        &self,
        caller: &Caller,
        query: &MemberRecordQuery,
    ) -> AppResult<PaginatedResponse<MemberPlanResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::WorkoutPlan)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = workout_plans::Entity::find()
            .filter(scope::condition(ResourceKind::WorkoutPlan, filter))
            .order_by_desc(workout_plans::Column::Id);
        if let Some(member_id) = query.member_id {
            select = select.filter(workout_plans::Column::MemberId.eq(member_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_plan(
        &self,
        caller: &Caller,
        plan_id: i64,
        request: UpdateMemberPlanRequest,
    ) -> AppResult<MemberPlanResponse> {
        self.authz
            .enforce(caller, Action::Update, ResourceKind::WorkoutPlan, Target::Row(plan_id))
            .await?;
        let plan = workout_plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;

        let mut am = plan.into_active_model();
        if let Some(v) = request.plan_name {
            am.plan_name = Set(required("Plan name", &v)?);
        }
        if request.comments.is_some() {
            am.comments = Set(clean(request.comments));
        }
        if request.chart.is_some() {
            am.chart = Set(request.chart);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("Workout plan {} updated by {}", plan_id, caller.id);
        Ok(MemberPlanResponse::from(updated))
    }

    pub async fn delete_plan(&self, caller: &Caller, plan_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::WorkoutPlan, Target::Row(plan_id))
            .await?;
        let plan = workout_plans::Entity::find_by_id(plan_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Workout plan not found".to_string()))?;
        plan.delete(&self.pool).await?;

        log::info!("Workout plan {} deleted by {}", plan_id, caller.id);
        Ok(())
    }
}
