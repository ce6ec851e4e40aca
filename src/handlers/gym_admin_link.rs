use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::GymAdminLinkService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/gym-admin-links",
    tag = "gym-admin-links",
    request_body = CreateGymAdminLinkRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Gym admin link created", body = GymAdminLinkResponse),
        (status = 400, description = "User is not a gym admin, or either side is already linked", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym or user not found", body = ErrorBody)
    )
)]
pub async fn create_link(
    link_service: web::Data<GymAdminLinkService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateGymAdminLinkRequest>,
) -> Result<HttpResponse> {
    match link_service.create_link(&caller.0, request.into_inner()).await {
        Ok(link) => Ok(HttpResponse::Created().json(ApiResponse::success(link))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gym-admin-links",
    tag = "gym-admin-links",
    params(GymLinkQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gym admin links visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_links(
    link_service: web::Data<GymAdminLinkService>,
    caller: AuthenticatedCaller,
    query: web::Query<GymLinkQuery>,
) -> Result<HttpResponse> {
    match link_service.list_links(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gym-admin-links/{id}",
    tag = "gym-admin-links",
    params(("id" = i64, Path, description = "Gym admin link id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gym admin link", body = GymAdminLinkResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym admin link not found", body = ErrorBody)
    )
)]
pub async fn get_link(
    link_service: web::Data<GymAdminLinkService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match link_service.get_link(&caller.0, path.into_inner()).await {
        Ok(link) => Ok(HttpResponse::Ok().json(ApiResponse::success(link))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/gym-admin-links/{id}",
    tag = "gym-admin-links",
    params(("id" = i64, Path, description = "Gym admin link id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym admin link not found", body = ErrorBody)
    )
)]
pub async fn delete_link(
    link_service: web::Data<GymAdminLinkService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match link_service.delete_link(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gym_admin_link_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gym-admin-links")
            .route("", web::post().to(create_link))
            .route("", web::get().to(list_links))
            .route("/{id}", web::get().to(get_link))
            .route("/{id}", web::delete().to(delete_link)),
    );
}
