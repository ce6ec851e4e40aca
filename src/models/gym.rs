use crate::entities::{ActiveStatus, gym_entity};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateGymRequest {
    #[schema(example = "Iron Temple")]
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    #[schema(example = "560001")]
    pub pincode: String,
    #[schema(example = "9876543210")]
    pub phone_number: String,
    #[schema(example = "front-desk@irontemple.in")]
    pub email: String,
    pub website: Option<String>,
    pub contact_person: String,
    #[schema(example = "INR")]
    pub currency: String,
    #[schema(example = 12.9716)]
    pub latitude: f64,
    #[schema(example = 77.5946)]
    pub longitude: f64,
    pub status: Option<ActiveStatus>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct UpdateGymRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub pincode: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
    pub website: Option<String>,
    pub contact_person: Option<String>,
    pub currency: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub status: Option<ActiveStatus>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct GymResponse {
    pub id: i64,
    pub name: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: String,
    pub phone_number: String,
    pub email: String,
    pub website: Option<String>,
    pub contact_person: String,
    pub currency: String,
    pub latitude: f64,
    pub longitude: f64,
    pub status: ActiveStatus,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<gym_entity::Model> for GymResponse {
    fn from(m: gym_entity::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            address: m.address,
            city: m.city,
            state: m.state,
            country: m.country,
            pincode: m.pincode,
            phone_number: m.phone_number,
            email: m.email,
            website: m.website,
            contact_person: m.contact_person,
            currency: m.currency,
            latitude: m.latitude,
            longitude: m.longitude,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct GymQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    /// Case-insensitive match on name or city.
    pub search: Option<String>,
}
