use actix_web::web;
use utoipa::OpenApi;
use utoipa::{
    Modify,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_swagger_ui::SwaggerUi;

use crate::entities::{ActiveStatus, DurationUnit, Gender, PaymentType, UserRole};
use crate::handlers;
use crate::models::*;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            )
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::signup_admin,
        handlers::auth::signup_gym_admin,
        handlers::auth::signup_gym_member,
        handlers::auth::login,
        handlers::auth::refresh,
        handlers::auth::me,
        handlers::user::list_users,
        handlers::user::get_user,
        handlers::user::update_user,
        handlers::user::delete_user,
        handlers::gym::create_gym,
        handlers::gym::list_gyms,
        handlers::gym::get_gym,
        handlers::gym::update_gym,
        handlers::gym::delete_gym,
        handlers::gym_admin_link::create_link,
        handlers::gym_admin_link::list_links,
        handlers::gym_admin_link::get_link,
        handlers::gym_admin_link::delete_link,
        handlers::gym_member_link::create_link,
        handlers::gym_member_link::list_links,
        handlers::gym_member_link::get_link,
        handlers::gym_member_link::delete_link,
        handlers::membership_plan::create_plan,
        handlers::membership_plan::list_plans,
        handlers::membership_plan::get_plan,
        handlers::membership_plan::update_plan,
        handlers::membership_plan::delete_plan,
        handlers::plan_price::create_price,
        handlers::plan_price::list_prices,
        handlers::plan_price::get_price,
        handlers::plan_price::update_price,
        handlers::plan_price::delete_price,
        handlers::membership::create_membership,
        handlers::membership::list_memberships,
        handlers::membership::get_membership,
        handlers::membership::update_membership,
        handlers::membership::delete_membership,
        handlers::payment::create_payment,
        handlers::payment::list_payments,
        handlers::payment::get_payment,
        handlers::payment::update_payment,
        handlers::payment::delete_payment,
        handlers::diet_plan::create_plan,
        handlers::diet_plan::list_plans,
        handlers::diet_plan::get_plan,
        handlers::diet_plan::update_plan,
        handlers::diet_plan::delete_plan,
        handlers::workout_plan::create_plan,
        handlers::workout_plan::list_plans,
        handlers::workout_plan::get_plan,
        handlers::workout_plan::update_plan,
        handlers::workout_plan::delete_plan,
    ),
    components(
        schemas(
            UserRole,
            ActiveStatus,
            Gender,
            DurationUnit,
            PaymentType,
            ErrorBody,
            ApiError,
            SignupRequest,
            GymMemberSignupRequest,
            LoginRequest,
            LoginResponse,
            RefreshTokenRequest,
            RefreshTokenResponse,
            UpdateUserRequest,
            UserResponse,
            CreateGymRequest,
            UpdateGymRequest,
            GymResponse,
            CreateGymAdminLinkRequest,
            GymAdminLinkResponse,
            CreateGymMemberLinkRequest,
            GymMemberLinkResponse,
            CreateMembershipPlanRequest,
            UpdateMembershipPlanRequest,
            MembershipPlanResponse,
            CreatePlanPriceRequest,
            UpdatePlanPriceRequest,
            PlanPriceResponse,
            CreateMembershipRequest,
            UpdateMembershipRequest,
            MembershipResponse,
            CreatePaymentRequest,
            UpdatePaymentRequest,
            PaymentResponse,
            CreateMemberPlanRequest,
            UpdateMemberPlanRequest,
            MemberPlanResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Signup, login and token refresh"),
        (name = "users", description = "User accounts"),
        (name = "gyms", description = "Gyms"),
        (name = "gym-admin-links", description = "Gym admin assignments"),
        (name = "gym-member-links", description = "Gym member enrolments"),
        (name = "membership-plans", description = "Membership plan catalogue"),
        (name = "plan-prices", description = "Dated prices of membership plans"),
        (name = "memberships", description = "Member memberships"),
        (name = "payments", description = "Member payments"),
        (name = "diet-plans", description = "Member diet plans"),
        (name = "workout-plans", description = "Member workout plans"),
    ),
    info(
        title = "Gym Backend API",
        version = "1.0.0",
        description = "Multi-tenant gym management REST API"
    ),
    servers(
        (url = "/api/v1", description = "Local server")
    )
)]
pub struct ApiDoc;

pub fn swagger_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()),
    )
    .route(
        "/swagger-ui",
        web::get().to(|| async {
            actix_web::HttpResponse::Found()
                .append_header(("Location", "/swagger-ui/"))
                .finish()
        }),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_every_resource() {
        let doc = ApiDoc::openapi();
        for path in [
            "/auth/login",
            "/users/{id}",
            "/gyms",
            "/gym-admin-links/{id}",
            "/gym-member-links",
            "/membership-plans/{id}",
            "/plan-prices",
            "/memberships/{id}",
            "/payments",
            "/diet-plans/{id}",
            "/workout-plans",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
