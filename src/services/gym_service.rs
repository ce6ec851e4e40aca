use chrono::Utc;
use sea_orm::sea_query::{Expr, Func};
use sea_orm::{
    ActiveModelTrait, Condition, DatabaseConnection, EntityTrait, IntoActiveModel,
    ModelTrait, QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::{ActiveStatus, gym_entity as gyms};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;
use crate::utils::*;

#[derive(Clone)]
pub struct GymService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl GymService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn create_gym(&self, caller: &Caller, request: CreateGymRequest) -> AppResult<GymResponse> {
        self.authz
            .enforce(caller, Action::Create, ResourceKind::Gym, Target::Under(Parent::Root))
            .await?;

        validate_coordinates(request.latitude, request.longitude)?;
        validate_phone("Phone number", request.phone_number.trim())?;
        validate_pincode(request.pincode.trim())?;
        validate_email(request.email.trim())?;

        let gym = gyms::ActiveModel {
            name: Set(required("Name", &request.name)?),
            address: Set(required("Address", &request.address)?),
            city: Set(required("City", &request.city)?),
            state: Set(required("State", &request.state)?),
            country: Set(required("Country", &request.country)?),
            pincode: Set(request.pincode.trim().to_string()),
            phone_number: Set(request.phone_number.trim().to_string()),
            email: Set(request.email.trim().to_string()),
            website: Set(clean(request.website)),
            contact_person: Set(required("Contact person", &request.contact_person)?),
            currency: Set(required("Currency", &request.currency)?),
            latitude: Set(request.latitude),
            longitude: Set(request.longitude),
            status: Set(request.status.unwrap_or(ActiveStatus::Active)),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Gym {} created by {}", gym.id, caller.id);
        Ok(GymResponse::from(gym))
    }

    pub async fn get_gym(&self, caller: &Caller, gym_id: i64) -> AppResult<GymResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::Gym, Target::Row(gym_id))
            .await?;
        let gym = gyms::Entity::find_by_id(gym_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;
        Ok(GymResponse::from(gym))
    }

    pub async fn list_gyms(
        &self,
        caller: &Caller,
        query: &GymQuery,
    ) -> AppResult<PaginatedResponse<GymResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::Gym)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = gyms::Entity::find()
            .filter(scope::condition(ResourceKind::Gym, filter))
            .order_by_asc(gyms::Column::Name);
        if let Some(search) = clean(query.search.clone()) {
            let pattern = format!("%{}%", search.to_lowercase());
            select = select.filter(
                Condition::any()
                    .add(Expr::expr(Func::lower(Expr::col(gyms::Column::Name))).like(pattern.clone()))
                    .add(Expr::expr(Func::lower(Expr::col(gyms::Column::City))).like(pattern)),
            );
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_gym(
        &self,
        caller: &Caller,
        gym_id: i64,
        request: UpdateGymRequest,
    ) -> AppResult<GymResponse> {
        self.authz
            .enforce(caller, Action::Update, ResourceKind::Gym, Target::Row(gym_id))
            .await?;

        let gym = gyms::Entity::find_by_id(gym_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

        validate_coordinates(
            request.latitude.unwrap_or(gym.latitude),
            request.longitude.unwrap_or(gym.longitude),
        )?;

        let mut am = gym.into_active_model();
        if let Some(v) = request.name {
            am.name = Set(required("Name", &v)?);
        }
        if let Some(v) = request.address {
            am.address = Set(required("Address", &v)?);
        }
        if let Some(v) = request.city {
            am.city = Set(required("City", &v)?);
        }
        if let Some(v) = request.state {
            am.state = Set(required("State", &v)?);
        }
        if let Some(v) = request.country {
            am.country = Set(required("Country", &v)?);
        }
        if let Some(v) = request.pincode {
            validate_pincode(v.trim())?;
            am.pincode = Set(v.trim().to_string());
        }
        if let Some(v) = request.phone_number {
            validate_phone("Phone number", v.trim())?;
            am.phone_number = Set(v.trim().to_string());
        }
        if let Some(v) = request.email {
            validate_email(v.trim())?;
            am.email = Set(v.trim().to_string());
        }
        if request.website.is_some() {
            am.website = Set(clean(request.website));
        }
        if let Some(v) = request.contact_person {
            am.contact_person = Set(required("Contact person", &v)?);
        }
        if let Some(v) = request.currency {
            am.currency = Set(required("Currency", &v)?);
        }
        if let Some(v) = request.latitude {
            am.latitude = Set(v);
        }
        if let Some(v) = request.longitude {
            am.longitude = Set(v);
        }
        if let Some(v) = request.status {
            am.status = Set(v);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("Gym {} updated by {}", gym_id, caller.id);
        Ok(GymResponse::from(updated))
    }

    /// Links, plans and prices go with the gym. Refused while memberships
    /// still reference one of its plans.
    pub async fn delete_gym(&self, caller: &Caller, gym_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::Gym, Target::Row(gym_id))
            .await?;
        let gym = gyms::Entity::find_by_id(gym_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;
        gym.delete(&self.pool).await?;

        log::info!("Gym {} deleted by {}", gym_id, caller.id);
        Ok(())
    }
}
