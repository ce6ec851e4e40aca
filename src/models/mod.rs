pub mod common;
pub mod gym;
pub mod gym_link;
pub mod member_plan;
pub mod membership;
pub mod membership_plan;
pub mod pagination;
pub mod user;

pub use common::*;
pub use gym::*;
pub use gym_link::*;
pub use member_plan::*;
pub use membership::*;
pub use membership_plan::*;
pub use pagination::*;
pub use user::*;
