use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::WorkoutPlanService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/workout-plans",
    tag = "workout-plans",
    request_body = CreateMemberPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Workout plan created", body = MemberPlanResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Member not found", body = ErrorBody)
    )
)]
pub async fn create_plan(
    plan_service: web::Data<WorkoutPlanService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateMemberPlanRequest>,
) -> Result<HttpResponse> {
    match plan_service.create_plan(&caller.0, request.into_inner()).await {
        Ok(plan) => Ok(HttpResponse::Created().json(ApiResponse::success(plan))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/workout-plans",
    tag = "workout-plans",
    params(MemberRecordQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workout plans visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_plans(
    plan_service: web::Data<WorkoutPlanService>,
    caller: AuthenticatedCaller,
    query: web::Query<MemberRecordQuery>,
) -> Result<HttpResponse> {
    match plan_service.list_plans(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/workout-plans/{id}",
    tag = "workout-plans",
    params(("id" = i64, Path, description = "Workout plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Workout plan", body = MemberPlanResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Workout plan not found", body = ErrorBody)
    )
)]
pub async fn get_plan(
    plan_service: web::Data<WorkoutPlanService>,
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
    path = "/workout-plans/{id}",
    tag = "workout-plans",
    params(("id" = i64, Path, description = "Workout plan id")),
    request_body = UpdateMemberPlanRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated workout plan", body = MemberPlanResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Workout plan not found", body = ErrorBody)
    )
)]
pub async fn update_plan(
    plan_service: web::Data<WorkoutPlanService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdateMemberPlanRequest>,
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
    path = "/workout-plans/{id}",
    tag = "workout-plans",
    params(("id" = i64, Path, description = "Workout plan id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Workout plan not found", body = ErrorBody)
    )
)]
pub async fn delete_plan(
    plan_service: web::Data<WorkoutPlanService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match plan_service.delete_plan(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn workout_plan_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/workout-plans")
            .route("", web::post().to(create_plan))
            .route("", web::get().to(list_plans))
            .route("/{id}", web::get().to(get_plan))
            .route("/{id}", web::put().to(update_plan))
            .route("/{id}", web::delete().to(delete_plan)),
    );
}
