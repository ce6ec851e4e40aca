use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::{UserRole, gym_admin_link_entity as admin_links, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;

/// One admin per gym and one gym per admin.
fn link_conflict(
    existing: Option<&admin_links::Model>,
    gym_id: i64,
    gym_admin_id: i64,
) -> AppResult<()> {
    match existing {
        Some(link) if link.gym_id == gym_id => Err(AppError::Conflict(format!(
            "Gym {} already has a gym admin",
            gym_id
        ))),
        Some(_) => Err(AppError::Conflict(format!(
            "Gym admin {} is already linked to a gym",
            gym_admin_id
        ))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct GymAdminLinkService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl GymAdminLinkService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    /// One gym admin per gym and one gym per gym admin.
    pub async fn create_link(
        &self,
        caller: &Caller,
        request: CreateGymAdminLinkRequest,
    ) -> AppResult<GymAdminLinkResponse> {
        self.authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::GymAdminLink,
                Target::Under(Parent::Gym(request.gym_id)),
            )
            .await?;

        let admin = users::Entity::find_by_id(request.gym_admin_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        if admin.role != UserRole::GymAdmin {
            return Err(AppError::ValidationError(format!(
                "User {} is not a gym admin",
                admin.id
            )));
        }

        let existing = admin_links::Entity::find()
            .filter(
                Condition::any()
                    .add(admin_links::Column::GymId.eq(request.gym_id))
                    .add(admin_links::Column::GymAdminId.eq(request.gym_admin_id)),
            )
            .one(&self.pool)
            .await?;
        link_conflict(existing.as_ref(), request.gym_id, request.gym_admin_id)?;

        let link = admin_links::ActiveModel {
            gym_id: Set(request.gym_id),
            gym_admin_id: Set(request.gym_admin_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Gym {} linked to gym admin {}", link.gym_id, link.gym_admin_id);
        Ok(GymAdminLinkResponse::from(link))
    }

    pub async fn get_link(&self, caller: &Caller, link_id: i64) -> AppResult<GymAdminLinkResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::GymAdminLink, Target::Row(link_id))
            .await?;
        let link = admin_links::Entity::find_by_id(link_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym admin link not found".to_string()))?;
        Ok(GymAdminLinkResponse::from(link))
    }

    pub async fn list_links(
        &self,
        caller: &Caller,
        query: &GymLinkQuery,
    ) -> AppResult<PaginatedResponse<GymAdminLinkResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::GymAdminLink)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = admin_links::Entity::find()
            .filter(scope::condition(ResourceKind::GymAdminLink, filter))
            .order_by_asc(admin_links::Column::Id);
        if let Some(gym_id) = query.gym_id {
            select = select.filter(admin_links::Column::GymId.eq(gym_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn delete_link(&self, caller: &Caller, link_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::GymAdminLink, Target::Row(link_id))
            .await?;
        let link = admin_links::Entity::find_by_id(link_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym admin link not found".to_string()))?;
        let (gym_id, gym_admin_id) = (link.gym_id, link.gym_admin_id);
        link.delete(&self.pool).await?;

        log::info!("Gym {} unlinked from gym admin {}", gym_id, gym_admin_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::ResponseError;

    fn link(gym_admin_id: i64, gym_id: i64) -> admin_links::Model {
        admin_links::Model {
            id: 1,
            gym_admin_id,
            gym_id,
            created_at: None,
        }
    }

    #[test]
    fn test_free_pair_links() {
        assert!(link_conflict(None, 1, 20).is_ok());
    }

    #[test]
    fn test_second_admin_for_gym_conflicts() {
        let existing = link(20, 1);
        let err = link_conflict(Some(&existing), 1, 21).unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Gym 1 already has a gym admin"));
        assert_eq!(err.status_code(), actix_web::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_admin_running_other_gym_conflicts() {
        let existing = link(20, 2);
        let err = link_conflict(Some(&existing), 1, 20).unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(ref m) if m == "Gym admin 20 is already linked to a gym")
        );
    }
}
