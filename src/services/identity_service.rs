use sea_orm::{DatabaseConnection, EntityTrait};

use crate::authz::{Caller, linked_gym};
use crate::entities::{ActiveStatus, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::utils::JwtService;

/// Turns a bearer token into a [`Caller`]. The gym link is looked up on every
/// call so link changes apply to the very next request.
#[derive(Clone)]
pub struct IdentityService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
}

impl IdentityService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        Self { pool, jwt_service }
    }

    pub async fn resolve_identity(&self, token: &str) -> AppResult<Caller> {
        let claims = self.jwt_service.verify_access_token(token)?;
        self.resolve_caller(claims.user_id()?).await
    }

    pub async fn resolve_caller(&self, user_id: i64) -> AppResult<Caller> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;

        if user.status != ActiveStatus::Active {
            return Err(AppError::AuthError("Account is inactive".to_string()));
        }

        let gym_id = linked_gym(&self.pool, user.id, user.role).await?;
        Ok(Caller::new(user.id, user.role, gym_id))
    }
}
