use crate::entities::{ActiveStatus, Gender, UserRole, user_entity};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profile fields shared by every signup route.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignupRequest {
    #[schema(example = "ravi.k")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
    #[schema(example = "Ravi")]
    pub first_name: String,
    pub last_name: Option<String>,
    #[schema(example = "ravi@example.com")]
    pub email: Option<String>,
    #[schema(example = "9876543210")]
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    #[schema(example = "560001")]
    pub pincode: Option<String>,
    pub country: Option<String>,
    #[schema(example = "1995-04-12")]
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GymMemberSignupRequest {
    #[serde(flatten)]
    pub profile: SignupRequest,
    pub gym_id: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    #[schema(example = "ravi.k")]
    pub username: String,
    #[schema(example = "password123")]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct RefreshTokenResponse {
    pub access_token: String,
    pub expires_in: i64,
}

#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateUserRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub status: Option<ActiveStatus>,
    pub role: Option<UserRole>,
}

impl UpdateUserRequest {
    /// Account-level fields present in the request.
    pub fn account_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.status.is_some() {
            fields.push("status");
        }
        if self.role.is_some() {
            fields.push("role");
        }
        fields
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub role: UserRole,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub pincode: Option<String>,
    pub country: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub gender: Option<Gender>,
    pub profile_picture: Option<String>,
    pub emergency_contact_name: Option<String>,
    pub emergency_contact_phone: Option<String>,
    pub emergency_contact_relation: Option<String>,
    pub status: ActiveStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<user_entity::Model> for UserResponse {
    fn from(m: user_entity::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            role: m.role,
            email: m.email,
            phone: m.phone,
            first_name: m.first_name,
            last_name: m.last_name,
            address: m.address,
            city: m.city,
            state: m.state,
            pincode: m.pincode,
            country: m.country,
            date_of_birth: m.date_of_birth,
            gender: m.gender,
            profile_picture: m.profile_picture,
            emergency_contact_name: m.emergency_contact_name,
            emergency_contact_phone: m.emergency_contact_phone,
            emergency_contact_relation: m.emergency_contact_relation,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UserQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub role: Option<UserRole>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_member_signup_flattens_profile() {
        let req: GymMemberSignupRequest = serde_json::from_value(serde_json::json!({
            "username": "asha",
            "password": "password123",
            "first_name": "Asha",
            "gym_id": 4
        }))
        .unwrap();
        assert_eq!(req.gym_id, 4);
        assert_eq!(req.profile.username, "asha");
        assert!(req.profile.email.is_none());
    }

    #[test]
    fn test_account_fields() {
        let req = UpdateUserRequest {
            city: Some("Pune".into()),
            status: Some(ActiveStatus::Inactive),
            ..Default::default()
        };
        assert_eq!(req.account_fields(), vec!["status"]);
    }
}
