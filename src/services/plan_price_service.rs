use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::{membership_plan_entity as plans, plan_price_entity as prices};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::overlap::{Period, PriceIntervals, parse_instant, parse_period, validate_interval};
use crate::services::scope;
use crate::utils::non_negative;

#[derive(Clone)]
pub struct PlanPriceService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl PlanPriceService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_price(
        &self,
        caller: &Caller,
        request: CreatePlanPriceRequest,
    ) -> AppResult<PlanPriceResponse> {
        let plan_id = request.membership_plan_id;
        self.authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::PlanPrice,
                Target::Under(Parent::Plan(plan_id)),
            )
            .await?;
        non_negative("Price", request.price_cents)?;
        let period = parse_period(&request.validity_start, &request.validity_end)?;

        let txn = self.pool.begin().await?;
        // concurrent writers for the same plan queue on this row lock
        plans::Entity::find_by_id(plan_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan not found".to_string()))?;

        validate_interval(&PriceIntervals::new(&txn), plan_id, period, None)
            .await?
            .into_result("price")?;

        let price = prices::ActiveModel {
            membership_plan_id: Set(plan_id),
            price_cents: Set(request.price_cents),
            validity_start: Set(period.start),
            validity_end: Set(period.end),
            comments: Set(clean(request.comments)),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!("Price {} added to membership plan {}", price.id, plan_id);
        Ok(PlanPriceResponse::from(price))
    }

    pub async fn get_price(&self, caller: &Caller, price_id: i64) -> AppResult<PlanPriceResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::PlanPrice, Target::Row(price_id))
            .await?;
        let price = prices::Entity::find_by_id(price_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan price not found".to_string()))?;
        Ok(PlanPriceResponse::from(price))
    }

    pub async fn list_prices(
        &self,
        caller: &Caller,
        query: &PlanPriceQuery,
    ) -> AppResult<PaginatedResponse<PlanPriceResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::PlanPrice)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = prices::Entity::find()
            .filter(scope::condition(ResourceKind::PlanPrice, filter))
            .order_by_asc(prices::Column::ValidityStart);
        if let Some(plan_id) = query.membership_plan_id {
            select = select.filter(prices::Column::MembershipPlanId.eq(plan_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_price(
        &self,
        caller: &Caller,
        price_id: i64,
        request: UpdatePlanPriceRequest,
    ) -> AppResult<PlanPriceResponse> {
        self.authz
            .enforce(caller, Action::Update, ResourceKind::PlanPrice, Target::Row(price_id))
            .await?;
        if let Some(cents) = request.price_cents {
            non_negative("Price", cents)?;
        }
        let new_start = request
            .validity_start
            .as_deref()
            .map(|raw| parse_instant("start date", raw))
            .transpose()?;
        let new_end = request
            .validity_end
            .as_deref()
            .map(|raw| parse_instant("end date", raw))
            .transpose()?;

        let txn = self.pool.begin().await?;
        let price = prices::Entity::find_by_id(price_id)
            .one(&txn)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan price not found".to_string()))?;
        plans::Entity::find_by_id(price.membership_plan_id)
            .lock_exclusive()
            .one(&txn)
            .await?;

        let period = Period::new(
            new_start.unwrap_or(price.validity_start),
            new_end.unwrap_or(price.validity_end),
        );
        if new_start.is_some() || new_end.is_some() {
            validate_interval(
                &PriceIntervals::new(&txn),
                price.membership_plan_id,
                period,
                Some(price.id),
            )
            .await?
            .into_result("price")?;
        }

        let mut am = price.into_active_model();
        am.validity_start = Set(period.start);
        am.validity_end = Set(period.end);
        if let Some(cents) = request.price_cents {
            am.price_cents = Set(cents);
        }
        if request.comments.is_some() {
            am.comments = Set(clean(request.comments));
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&txn).await?;
        txn.commit().await?;

        log::info!("Price {} updated by {}", price_id, caller.id);
        Ok(PlanPriceResponse::from(updated))
    }

    pub async fn delete_price(&self, caller: &Caller, price_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::PlanPrice, Target::Row(price_id))
            .await?;
        let price = prices::Entity::find_by_id(price_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Membership plan price not found".to_string()))?;
        price.delete(&self.pool).await?;

        log::info!("Price {} deleted by {}", price_id, caller.id);
        Ok(())
    }
}
