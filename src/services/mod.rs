pub mod auth_service;
pub mod diet_plan_service;
pub mod gym_admin_link_service;
pub mod gym_member_link_service;
pub mod gym_service;
pub mod identity_service;
pub mod membership_plan_service;
pub mod membership_service;
pub mod payment_service;
pub mod plan_price_service;
pub mod scope;
pub mod user_service;
pub mod workout_plan_service;

pub use auth_service::*;
pub use diet_plan_service::*;
pub use gym_admin_link_service::*;
pub use gym_member_link_service::*;
pub use gym_service::*;
pub use identity_service::*;
pub use membership_plan_service::*;
pub use membership_service::*;
pub use payment_service::*;
pub use plan_price_service::*;
pub use user_service::*;
pub use workout_plan_service::*;
