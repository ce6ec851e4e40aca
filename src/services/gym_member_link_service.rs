use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, Parent, ResourceKind, RowFilter, StoreOwnership, Target,
};
use crate::entities::gym_member_link_entity as member_links;
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;
use crate::services::user_service::require_member;

/// A member belongs to at most one gym.
fn member_link_conflict(existing: Option<&member_links::Model>) -> AppResult<()> {
    match existing {
        Some(link) => Err(AppError::Conflict(format!(
            "Member {} is already linked to gym {}",
            link.member_id, link.gym_id
        ))),
        None => Ok(()),
    }
}

#[derive(Clone)]
pub struct GymMemberLinkService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl GymMemberLinkService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    /// A member belongs to exactly one gym.
    pub async fn create_link(
        &self,
        caller: &Caller,
        request: CreateGymMemberLinkRequest,
    ) -> AppResult<GymMemberLinkResponse> {
        self.authz
            .enforce(
                caller,
                Action::Create,
                ResourceKind::GymMemberLink,
                Target::Under(Parent::Gym(request.gym_id)),
            )
            .await?;
        require_member(&self.pool, request.member_id).await?;

        let existing = member_links::Entity::find()
            .filter(member_links::Column::MemberId.eq(request.member_id))
            .one(&self.pool)
            .await?;
        member_link_conflict(existing.as_ref())?;

        let link = member_links::ActiveModel {
            gym_id: Set(request.gym_id),
            member_id: Set(request.member_id),
            ..Default::default()
        }
        .insert(&self.pool)
        .await?;

        log::info!("Member {} joined gym {}", link.member_id, link.gym_id);
        Ok(GymMemberLinkResponse::from(link))
    }

    pub async fn get_link(&self, caller: &Caller, link_id: i64) -> AppResult<GymMemberLinkResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::GymMemberLink, Target::Row(link_id))
            .await?;
        let link = member_links::Entity::find_by_id(link_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym member link not found".to_string()))?;
        Ok(GymMemberLinkResponse::from(link))
    }

    pub async fn list_links(
        &self,
        caller: &Caller,
        query: &GymLinkQuery,
    ) -> AppResult<PaginatedResponse<GymMemberLinkResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::GymMemberLink)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = member_links::Entity::find()
            .filter(scope::condition(ResourceKind::GymMemberLink, filter))
            .order_by_asc(member_links::Column::Id);
        if let Some(gym_id) = query.gym_id {
            select = select.filter(member_links::Column::GymId.eq(gym_id));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn delete_link(&self, caller: &Caller, link_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::GymMemberLink, Target::Row(link_id))
            .await?;
        let link = member_links::Entity::find_by_id(link_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym member link not found".to_string()))?;
        let (gym_id, member_id) = (link.gym_id, link.member_id);
        link.delete(&self.pool).await?;

        log::info!("Member {} left gym {}", member_id, gym_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_linked_once() {
        assert!(member_link_conflict(None).is_ok());

        let link = member_links::Model {
            id: 4,
            gym_id: 2,
            member_id: 11,
            created_at: None,
        };
        let err = member_link_conflict(Some(&link)).unwrap_err();
        assert!(
            matches!(err, AppError::Conflict(ref m) if m == "Member 11 is already linked to gym 2")
        );
    }
}
