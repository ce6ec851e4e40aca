use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::GymService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/gyms",
    tag = "gyms",
    request_body = CreateGymRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Gym created", body = GymResponse),
        (status = 400, description = "Invalid input or duplicate email", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Not found", body = ErrorBody)
    )
)]
pub async fn create_gym(
    gym_service: web::Data<GymService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateGymRequest>,
) -> Result<HttpResponse> {
    match gym_service.create_gym(&caller.0, request.into_inner()).await {
        Ok(gym) => Ok(HttpResponse::Created().json(ApiResponse::success(gym))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gyms",
    tag = "gyms",
    params(GymQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gyms visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_gyms(
    gym_service: web::Data<GymService>,
    caller: AuthenticatedCaller,
    query: web::Query<GymQuery>,
) -> Result<HttpResponse> {
    match gym_service.list_gyms(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gyms/{id}",
    tag = "gyms",
    params(("id" = i64, Path, description = "Gym id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gym", body = GymResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym not found", body = ErrorBody)
    )
)]
pub async fn get_gym(
    gym_service: web::Data<GymService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match gym_service.get_gym(&caller.0, path.into_inner()).await {
        Ok(gym) => Ok(HttpResponse::Ok().json(ApiResponse::success(gym))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/gyms/{id}",
    tag = "gyms",
    params(("id" = i64, Path, description = "Gym id")),
    request_body = UpdateGymRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated gym", body = GymResponse),
        (status = 400, description = "Invalid input or duplicate email", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym not found", body = ErrorBody)
    )
)]
pub async fn update_gym(
    gym_service: web::Data<GymService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdateGymRequest>,
) -> Result<HttpResponse> {
    match gym_service
        .update_gym(&caller.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(gym) => Ok(HttpResponse::Ok().json(ApiResponse::success(gym))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/gyms/{id}",
    tag = "gyms",
    params(("id" = i64, Path, description = "Gym id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym not found", body = ErrorBody)
    )
)]
pub async fn delete_gym(
    gym_service: web::Data<GymService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match gym_service.delete_gym(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gym_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gyms")
            .route("", web::post().to(create_gym))
            .route("", web::get().to(list_gyms))
            .route("/{id}", web::get().to(get_gym))
            .route("/{id}", web::put().to(update_gym))
            .route("/{id}", web::delete().to(delete_gym)),
    );
}
