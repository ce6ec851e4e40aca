use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, Set, Statement, TransactionTrait,
};

use crate::authz::{Action, Authorizer, Caller, Parent, ResourceKind, StoreOwnership, Target};
use crate::entities::{
    ActiveStatus, UserRole, gym_entity as gyms, gym_member_link_entity as member_links,
    user_entity as users,
};
use crate::error::{AppError, AppResult};
use crate::models::*;
use crate::services::user_service::validate_contact;
use crate::utils::*;

/// Who has to be authorized for an admin signup. Nobody while there are no
/// admins yet; afterwards a caller is required.
fn admin_signup_caller(admins: u64, caller: Option<&Caller>) -> AppResult<Option<&Caller>> {
    match (admins, caller) {
        (0, _) => Ok(None),
        (_, Some(caller)) => Ok(Some(caller)),
        (_, None) => Err(AppError::AuthError(
            "Only an admin can create another admin".to_string(),
        )),
    }
}

#[derive(Clone)]
pub struct AuthService {
    pool: DatabaseConnection,
    jwt_service: JwtService,
    authz: Authorizer<StoreOwnership>,
}

impl AuthService {
    pub fn new(pool: DatabaseConnection, jwt_service: JwtService) -> Self {
        let authz = Authorizer::new(StoreOwnership::new(pool.clone()));
        Self {
            pool,
            jwt_service,
            authz,
        }
    }

    /// The first admin may sign up without credentials; after that only an
    /// admin can create another.
    pub async fn signup_admin(
        &self,
        caller: Option<&Caller>,
        request: SignupRequest,
    ) -> AppResult<UserResponse> {
        let admins = self.count_admins(&self.pool).await?;
        self.check_admin_signup(admins, caller).await?;
        let username = request.username.trim().to_string();
        let model = self.prepare_user(request, UserRole::Admin).await?;

        let txn = self.pool.begin().await?;
        // concurrent first-admin signups queue here until commit
        txn.execute(Statement::from_string(
            txn.get_database_backend(),
            "LOCK TABLE users IN SHARE ROW EXCLUSIVE MODE",
        ))
        .await?;
        let admins_now = self.count_admins(&txn).await?;
        if admins_now != admins {
            self.check_admin_signup(admins_now, caller).await?;
        }
        if admins_now == 0 {
            log::info!("Bootstrapping first admin account {}", username);
        }
        let user = model.insert(&txn).await?;
        txn.commit().await?;

        log::info!("Created {} account {}", UserRole::Admin, user.id);
        Ok(UserResponse::from(user))
    }

    async fn count_admins<C: ConnectionTrait>(&self, conn: &C) -> AppResult<u64> {
        Ok(users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Admin))
            .count(conn)
            .await?)
    }

    async fn check_admin_signup(&self, admins: u64, caller: Option<&Caller>) -> AppResult<()> {
        if let Some(caller) = admin_signup_caller(admins, caller)? {
            self.authz
                .enforce(caller, Action::Create, ResourceKind::User, Target::Under(Parent::Root))
                .await?;
        }
        Ok(())
    }

    pub async fn signup_gym_admin(
        &self,
        caller: &Caller,
        request: SignupRequest,
    ) -> AppResult<UserResponse> {
        self.authz
            .enforce(caller, Action::Create, ResourceKind::User, Target::Under(Parent::Root))
            .await?;
        self.create_user(request, UserRole::GymAdmin).await
    }

    /// Public signup. The member and their gym link are written together.
    pub async fn signup_gym_member(
        &self,
        request: GymMemberSignupRequest,
    ) -> AppResult<UserResponse> {
        let gym_id = request.gym_id;
        gyms::Entity::find_by_id(gym_id)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound("Gym not found".to_string()))?;

        let model = self.prepare_user(request.profile, UserRole::GymMember).await?;

        let txn = self.pool.begin().await?;
        let user = model.insert(&txn).await?;
        member_links::ActiveModel {
            gym_id: Set(gym_id),
            member_id: Set(user.id),
            ..Default::default()
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        log::info!("Gym member {} signed up at gym {}", user.id, gym_id);
        Ok(UserResponse::from(user))
    }

    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let user = users::Entity::find()
            .filter(users::Column::Username.eq(request.username.trim()))
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("Invalid username or password".to_string()))?;

        if !verify_password(&request.password, &user.password_hash)? {
            return Err(AppError::AuthError(
                "Invalid username or password".to_string(),
            ));
        }

        if user.status != ActiveStatus::Active {
            return Err(AppError::AuthError("Account is inactive".to_string()));
        }

        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;
        let refresh_token = self.jwt_service.generate_refresh_token(user.id, user.role)?;

        log::info!("User {} logged in", user.id);
        Ok(LoginResponse {
            user: UserResponse::from(user),
            access_token,
            refresh_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    pub async fn refresh_token(&self, refresh_token: &str) -> AppResult<RefreshTokenResponse> {
        let claims = self.jwt_service.verify_refresh_token(refresh_token)?;

        let user = users::Entity::find_by_id(claims.user_id()?)
            .one(&self.pool)
            .await?
            .ok_or_else(|| AppError::AuthError("User no longer exists".to_string()))?;
        if user.status != ActiveStatus::Active {
            return Err(AppError::AuthError("Account is inactive".to_string()));
        }

        // the role may have changed since the refresh token was issued
        let access_token = self.jwt_service.generate_access_token(user.id, user.role)?;

        Ok(RefreshTokenResponse {
            access_token,
            expires_in: self.jwt_service.get_access_token_expires_in(),
        })
    }

    async fn create_user(&self, request: SignupRequest, role: UserRole) -> AppResult<UserResponse> {
        let user = self.prepare_user(request, role).await?.insert(&self.pool).await?;
        log::info!("Created {} account {}", role, user.id);
        Ok(UserResponse::from(user))
    }

    async fn prepare_user(
        &self,
        request: SignupRequest,
        role: UserRole,
    ) -> AppResult<users::ActiveModel> {
        let username = required("Username", &request.username)?;
        let first_name = required("First name", &request.first_name)?;
        validate_password(&request.password)?;

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

        let taken = users::Entity::find()
            .filter(users::Column::Username.eq(&username))
            .one(&self.pool)
            .await?;
        if taken.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {username} is already taken"
            )));
        }

        Ok(users::ActiveModel {
            username: Set(username),
            password_hash: Set(hash_password(&request.password)?),
            role: Set(role),
            email: Set(email),
            phone: Set(phone),
            first_name: Set(first_name),
            last_name: Set(clean(request.last_name)),
            address: Set(clean(request.address)),
            city: Set(clean(request.city)),
            state: Set(clean(request.state)),
            pincode: Set(pincode),
            country: Set(clean(request.country)),
            date_of_birth: Set(request.date_of_birth),
            gender: Set(request.gender),
            profile_picture: Set(clean(request.profile_picture)),
            emergency_contact_name: Set(clean(request.emergency_contact_name)),
            emergency_contact_phone: Set(emergency_contact_phone),
            emergency_contact_relation: Set(clean(request.emergency_contact_relation)),
            status: Set(ActiveStatus::Active),
            ..Default::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_admin_needs_no_caller() {
        assert!(admin_signup_caller(0, None).unwrap().is_none());
        let gym_admin = Caller::gym_admin(5, Some(1));
        assert!(admin_signup_caller(0, Some(&gym_admin)).unwrap().is_none());
    }

    #[test]
    fn test_later_admins_need_a_caller() {
        let err = admin_signup_caller(1, None).unwrap_err();
        assert!(matches!(err, AppError::AuthError(ref m) if m.contains("Only an admin")));

        let admin = Caller::admin(1);
        assert_eq!(admin_signup_caller(2, Some(&admin)).unwrap(), Some(&admin));
    }
}
