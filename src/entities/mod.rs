pub mod diet_plans;
pub mod gym_admin_links;
pub mod gym_member_links;
pub mod gyms;
pub mod members_memberships;
pub mod membership_plans;
pub mod payments;
pub mod plan_prices;
pub mod users;
pub mod workout_plans;

pub use membership_plans::DurationUnit;
pub use payments::PaymentType;
pub use users::{ActiveStatus, Gender, UserRole};

pub use diet_plans as diet_plan_entity;
pub use gym_admin_links as gym_admin_link_entity;
pub use gym_member_links as gym_member_link_entity;
pub use gyms as gym_entity;
pub use members_memberships as membership_entity;
pub use membership_plans as membership_plan_entity;
pub use payments as payment_entity;
pub use plan_prices as plan_price_entity;
pub use users as user_entity;
pub use workout_plans as workout_plan_entity;
