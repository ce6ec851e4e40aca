use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IntoActiveModel, ModelTrait,
    QueryFilter, QueryOrder, Set,
};

use crate::authz::{
    Action, Authorizer, Caller, ResourceKind, RowFilter, StoreOwnership, Target, check_fields,
    linked_gym,
};
use crate::entities::{UserRole, user_entity as users};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::scope;
use crate::utils::{validate_email, validate_phone, validate_pincode};

/// Validate optional contact fields that were supplied.
pub(crate) fn validate_contact(
    email: Option<&str>,
    phone: Option<&str>,
    pincode: Option<&str>,
    emergency_phone: Option<&str>,
) -> AppResult<()> {
    if let Some(email) = email {
        validate_email(email)?;
    }
    if let Some(phone) = phone {
        validate_phone("Phone", phone)?;
    }
    if let Some(pincode) = pincode {
        validate_pincode(pincode)?;
    }
    if let Some(phone) = emergency_phone {
        validate_phone("Emergency contact phone", phone)?;
    }
    Ok(())
}

/// Load a user that must exist and be a gym member.
pub(crate) async fn require_member(
    conn: &impl sea_orm::ConnectionTrait,
    member_id: i64,
) -> AppResult<users::Model> {
    let user = users::Entity::find_by_id(member_id)
        .one(conn)
        .await?
        .ok_or_else(|| AppError::NotFound("Member not found".to_string()))?;
    if user.role != UserRole::GymMember {
        return Err(AppError::ValidationError(format!(
            "User {member_id} is not a gym member"
        )));
    }
    Ok(user)
}

/// A linked user keeps their role; the link table they sit in depends on it.
fn check_role_change(
    current: UserRole,
    requested: Option<UserRole>,
    linked: bool,
) -> AppResult<()> {
    match requested {
        Some(role) if role != current && linked => Err(AppError::ValidationError(
            "Remove the user's gym link before changing their role".to_string(),
        )),
        _ => Ok(()),
    }
}

fn check_not_self(caller: &Caller, user_id: i64) -> AppResult<()> {
    if user_id == caller.id {
        return Err(AppError::ValidationError(
            "You cannot delete your own account".to_string(),
        ));
    }
    Ok(())
}

#[derive(Clone)]
pub struct UserService {
    pool: DatabaseConnection,
    authz: Authorizer<StoreOwnership>,
}

impl UserService {
    pub fn new(pool: DatabaseConnection) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self { pool, authz }
    }

    pub async fn get_user(&self, caller: &Caller, user_id: i64) -> AppResult<UserResponse> {
        self.authz
            .enforce(caller, Action::Read, ResourceKind::User, Target::Row(user_id))
            .await?;
        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        Ok(UserResponse::from(user))
    }

    pub async fn list_users(
        &self,
        caller: &Caller,
        query: &UserQuery,
    ) -> AppResult<PaginatedResponse<UserResponse>> {
        let params = PaginationParams::new(query.page, query.page_size);
        let filter = self
            .authz
            .row_filter(caller, ResourceKind::User)
            .ok_or(AppError::Forbidden)?;
        if filter == RowFilter::Nothing {
            return Ok(PaginatedResponse::empty(&params));
        }

        let mut select = users::Entity::find()
            .filter(scope::condition(ResourceKind::User, filter))
            .order_by_asc(users::Column::Id);
        if let Some(role) = query.role {
            select = select.filter(users::Column::Role.eq(role));
        }

        scope::fetch_page(&self.pool, select, &params).await
    }

    pub async fn update_user(
        &self,
        caller: &Caller,
        user_id: i64,
        request: UpdateUserRequest,
    ) -> AppResult<UserResponse> {
        self.authz
            .enforce(caller, Action::Update, ResourceKind::User, Target::Row(user_id))
            .await?;
        check_fields(caller, ResourceKind::User, &request.account_fields())?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        if request.role.is_some_and(|role| role != user.role) {
            let linked = linked_gym(&self.pool, user.id, user.role).await?.is_some();
            check_role_change(user.role, request.role, linked)?;
        }

        let email = clean(request.email);
        let phone = clean(request.phone);
        let pincode = clean(request.pincode);
        let emergency_contact_phone = clean(request.emergency_contact_phone);
        validate_contact(
            email.as_deref(),
            phone.as_deref(),
            pincode.as_deref(),
            emergency_contact_phone.as_deref(),
        )?;

        let mut am = user.into_active_model();
        if let Some(first_name) = request.first_name {
            am.first_name = Set(crate::utils::required("First name", &first_name)?);
        }
        if let Some(v) = clean(request.last_name) {
            am.last_name = Set(Some(v));
        }
        if email.is_some() {
            am.email = Set(email);
        }
        if phone.is_some() {
            am.phone = Set(phone);
        }
        if let Some(v) = clean(request.address) {
            am.address = Set(Some(v));
        }
        if let Some(v) = clean(request.city) {
            am.city = Set(Some(v));
        }
        if let Some(v) = clean(request.state) {
            am.state = Set(Some(v));
        }
        if pincode.is_some() {
            am.pincode = Set(pincode);
        }
        if let Some(v) = clean(request.country) {
            am.country = Set(Some(v));
        }
        if request.date_of_birth.is_some() {
            am.date_of_birth = Set(request.date_of_birth);
        }
        if request.gender.is_some() {
            am.gender = Set(request.gender);
        }
        if let Some(v) = clean(request.profile_picture) {
            am.profile_picture = Set(Some(v));
        }
        if let Some(v) = clean(request.emergency_contact_name) {
            am.emergency_contact_name = Set(Some(v));
        }
        if emergency_contact_phone.is_some() {
            am.emergency_contact_phone = Set(emergency_contact_phone);
        }
        if let Some(v) = clean(request.emergency_contact_relation) {
            am.emergency_contact_relation = Set(Some(v));
        }
        if let Some(status) = request.status {
            am.status = Set(status);
        }
        if let Some(role) = request.role {
            am.role = Set(role);
        }
        am.updated_at = Set(Some(Utc::now()));

        let updated = am.update(&self.pool).await?;
        log::info!("User {} updated by {}", updated.id, caller.id);
        Ok(UserResponse::from(updated))
    }

    pub async fn delete_user(&self, caller: &Caller, user_id: i64) -> AppResult<()> {
        self.authz
            .enforce(caller, Action::Delete, ResourceKind::User, Target::Row(user_id))
            .await?;
        check_not_self(caller, user_id)?;

        let user = users::Entity::find_by_id(user_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;
        user.delete(&self.pool).await?;

        log::info!("User {} deleted by {}", user_id, caller.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linked_user_keeps_role() {
        let err = check_role_change(UserRole::GymMember, Some(UserRole::GymAdmin), true)
            .unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("gym link")));
    }

    #[test]
    fn test_unlinked_or_unchanged_role_passes() {
        assert!(check_role_change(UserRole::GymMember, Some(UserRole::GymAdmin), false).is_ok());
        assert!(check_role_change(UserRole::GymMember, Some(UserRole::GymMember), true).is_ok());
        assert!(check_role_change(UserRole::GymAdmin, None, true).is_ok());
    }

    #[test]
    fn test_admin_cannot_delete_self() {
        let admin = Caller::admin(1);
        let err = check_not_self(&admin, 1).unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref m) if m.contains("your own account")));
        assert!(check_not_self(&admin, 2).is_ok());
    }

    #[test]
    fn test_contact_fields_checked_only_when_present() {
        assert!(validate_contact(None, None, None, None).is_ok());
        assert!(validate_contact(Some("not-an-email"), None, None, None).is_err());
    }
}
