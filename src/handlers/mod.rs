pub mod auth;
pub mod diet_plan;
pub mod gym;
pub mod gym_admin_link;
pub mod gym_member_link;
pub mod membership;
pub mod membership_plan;
pub mod payment;
pub mod plan_price;
pub mod user;
pub mod workout_plan;

pub use auth::auth_config;
pub use diet_plan::diet_plan_config;
pub use gym::gym_config;
pub use gym_admin_link::gym_admin_link_config;
pub use gym_member_link::gym_member_link_config;
pub use membership::membership_config;
pub use membership_plan::membership_plan_config;
pub use payment::payment_config;
pub use plan_price::plan_price_config;
pub use user::user_config;
pub use workout_plan::workout_plan_config;
