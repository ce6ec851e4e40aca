pub mod auth;
pub mod cors;

pub use auth::{AuthMiddleware, AuthenticatedCaller, bearer_token};
pub use cors::create_cors;
