use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::MembershipPlanService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/membership-plans",
    tag = "membership-plans",
    request_body = CreateMembershipPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Membership plan created", body = MembershipPlanResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym not found", body = ErrorBody)
    )
)]
pub async fn create_plan(
    plan_service: web::Data<MembershipPlanService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateMembershipPlanRequest>,
) -> Result<HttpResponse> {
    match plan_service.create_plan(&caller.0, request.into_inner()).await {
        Ok(plan) => Ok(HttpResponse::Created().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/membership-plans",
    tag = "membership-plans",
    params(MembershipPlanQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership plans visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_plans(
    plan_service: web::Data<MembershipPlanService>,
    caller: AuthenticatedCaller,
    query: web::Query<MembershipPlanQuery>,
) -> Result<HttpResponse> {
    match plan_service.list_plans(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/membership-plans/{id}",
    tag = "membership-plans",
    params(("id" = i64, Path, description = "Membership plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership plan", body = MembershipPlanResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan not found", body = ErrorBody)
    )
)]
pub async fn get_plan(
    plan_service: web::Data<MembershipPlanService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match plan_service.get_plan(&caller.0, path.into_inner()).await {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/membership-plans/{id}",
    tag = "membership-plans",
    params(("id" = i64, Path, description = "Membership plan id")),
    request_body = UpdateMembershipPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated membership plan", body = MembershipPlanResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan not found", body = ErrorBody)
    )
)]
pub async fn update_plan(
    plan_service: web::Data<MembershipPlanService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdateMembershipPlanRequest>,
) -> Result<HttpResponse> {
    match plan_service
        .update_plan(&caller.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(plan) => Ok(HttpResponse::Ok().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/membership-plans/{id}",
    tag = "membership-plans",
    params(("id" = i64, Path, description = "Membership plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan not found", body = ErrorBody)
    )
)]
pub async fn delete_plan(
    plan_service: web::Data<MembershipPlanService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match plan_service.delete_plan(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn membership_plan_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/membership-plans")
            .route("", web::post().to(create_plan))
            .route("", web::get().to(list_plans))
            .route("/{id}", web::get().to(get_plan))
            .route("/{id}", web::put().to(update_plan))
            .route("/{id}", web::delete().to(delete_plan)),
    );
}
