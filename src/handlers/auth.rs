use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::{AuthService, UserService};
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/auth/signup/admin",
    tag = "auth",
    request_body = SignupRequest,
    security((), ("bearer_auth" = [])),
    responses(
        (status = 201, description = "Admin created", body = UserResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorBody),
        (status = 401, description = "An admin already exists and no admin token was sent", body = ErrorBody),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    )
)]
pub async fn signup_admin(
    auth_service: web::Data<AuthService>,
    caller: Option<AuthenticatedCaller>,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    let caller = caller.map(|c| c.0);
    match auth_service
        .signup_admin(caller.as_ref(), request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/signup/gym-admin",
    tag = "auth",
    request_body = SignupRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Gym admin created", body = UserResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorBody),
        (status = 403, description = "Caller is not an admin", body = ErrorBody)
    )
)]
pub async fn signup_gym_admin(
    auth_service: web::Data<AuthService>,
    caller: AuthenticatedCaller,
    request: web::Json<SignupRequest>,
) -> Result<HttpResponse> {
    match auth_service
        .signup_gym_admin(&caller.0, request.into_inner())
        .await
    {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/signup/gym-member",
    tag = "auth",
    request_body = GymMemberSignupRequest,
    responses(
        (status = 201, description = "Member created and linked to the gym", body = UserResponse),
        (status = 400, description = "Invalid input or username taken", body = ErrorBody),
        (status = 404, description = "Gym not found", body = ErrorBody)
    )
)]
pub async fn signup_gym_member(
    auth_service: web::Data<AuthService>,
    request: web::Json<GymMemberSignupRequest>,
) -> Result<HttpResponse> {
    match auth_service.signup_gym_member(request.into_inner()).await {
        Ok(user) => Ok(HttpResponse::Created().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Logged in", body = LoginResponse),
        (status = 401, description = "Bad credentials or inactive account", body = ErrorBody)
    )
)]
pub async fn login(
    auth_service: web::Data<AuthService>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match auth_service.login(request.into_inner()).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    post,
    path = "/auth/refresh",
    tag = "auth",
    request_body = RefreshTokenRequest,
    responses(
        (status = 200, description = "New access token", body = RefreshTokenResponse),
        (status = 401, description = "Invalid refresh token", body = ErrorBody)
    )
)]
pub async fn refresh(
    auth_service: web::Data<AuthService>,
    request: web::Json<RefreshTokenRequest>,
) -> Result<HttpResponse> {
    match auth_service.refresh_token(&request.refresh_token).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's profile", body = UserResponse),
        (status = 401, description = "Not authenticated", body = ErrorBody)
    )
)]
pub async fn me(
    user_service: web::Data<UserService>,
    caller: AuthenticatedCaller,
) -> Result<HttpResponse> {
    let caller = caller.0;
    match user_service.get_user(&caller, caller.id).await {
        Ok(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(user))),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn auth_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup/admin", web::post().to(signup_admin))
            .route("/signup/gym-admin", web::post().to(signup_gym_admin))
            .route("/signup/gym-member", web::post().to(signup_gym_member))
            .route("/login", web::post().to(login))
            .route("/refresh", web::post().to(refresh))
            .route("/me", web::get().to(me)),
    );
}
