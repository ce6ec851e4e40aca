use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::GymMemberLinkService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/gym-member-links",
    tag = "gym-member-links",
    request_body = CreateGymMemberLinkRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Gym member link created", body = GymMemberLinkResponse),
        (status = 400, description = "User is not a gym member, or is already linked", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym or member not found", body = ErrorBody)
    )
)]
pub async fn create_link(
    link_service: web::Data<GymMemberLinkService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateGymMemberLinkRequest>,
) -> Result<HttpResponse> {
    match link_service.create_link(&caller.0, request.into_inner()).await {
        Ok(link) => Ok(HttpResponse::Created().json(ApiResponse::success(link))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/gym-member-links",
    tag = "gym-member-links",
    params(GymLinkQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gym member links visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_links(
    link_service: web::Data<GymMemberLinkService>,
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
    path = "/gym-member-links/{id}",
    tag = "gym-member-links",
    params(("id" = i64, Path, description = "Gym member link id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Gym member link", body = GymMemberLinkResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym member link not found", body = ErrorBody)
    )
)]
pub async fn get_link(
    link_service: web::Data<GymMemberLinkService>,
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
    path = "/gym-member-links/{id}",
    tag = "gym-member-links",
    params(("id" = i64, Path, description = "Gym member link id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Gym member link not found", body = ErrorBody)
    )
)]
pub async fn delete_link(
    link_service: web::Data<GymMemberLinkService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match link_service.delete_link(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn gym_member_link_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/gym-member-links")
            .route("", web::post().to(create_link))
            .route("", web::get().to(list_links))
            .route("/{id}", web::get().to(get_link))
            .route("/{id}", web::delete().to(delete_link)),
    );
}
