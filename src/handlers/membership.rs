use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::MembershipService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/memberships",
    tag = "memberships",
    request_body = CreateMembershipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Membership created", body = MembershipResponse),
        (status = 400, description = "Invalid input, or the period overlaps another membership of the member", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Member or plan not found", body = ErrorBody)
    )
)]
pub async fn create_membership(
    membership_service: web::Data<MembershipService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreateMembershipRequest>,
) -> Result<HttpResponse> {
    match membership_service.create_membership(&caller.0, request.into_inner()).await {
        Ok(membership) => Ok(HttpResponse::Created().json(ApiResponse::success(membership))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships",
    tag = "memberships",
    params(MemberRecordQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Memberships visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_memberships(
    membership_service: web::Data<MembershipService>,
    caller: AuthenticatedCaller,
    query: web::Query<MemberRecordQuery>,
) -> Result<HttpResponse> {
    match membership_service.list_memberships(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/memberships/{id}",
    tag = "memberships",
    params(("id" = i64, Path, description = "Membership id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership", body = MembershipResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership not found", body = ErrorBody)
    )
)]
pub async fn get_membership(
    membership_service: web::Data<MembershipService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match membership_service.get_membership(&caller.0, path.into_inner()).await {
        Ok(membership) => Ok(HttpResponse::Ok().json(ApiResponse::success(membership))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/memberships/{id}",
    tag = "memberships",
    params(("id" = i64, Path, description = "Membership id")),
    request_body = UpdateMembershipRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated membership", body = MembershipResponse),
        (status = 400, description = "Invalid input, or the period overlaps another membership of the member", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership not found", body = ErrorBody)
    )
)]
pub async fn update_membership(
    membership_service: web::Data<MembershipService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdateMembershipRequest>,
) -> Result<HttpResponse> {
    match membership_service
        .update_membership(&caller.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(membership) => Ok(HttpResponse::Ok().json(ApiResponse::success(membership))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/memberships/{id}",
    tag = "memberships",
    params(("id" = i64, Path, description = "Membership id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership not found", body = ErrorBody)
    )
)]
pub async fn delete_membership(
    membership_service: web::Data<MembershipService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match membership_service.delete_membership(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn membership_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/memberships")
            .route("", web::post().to(create_membership))
            .route("", web::get().to(list_memberships))
            .route("/{id}", web::get().to(get_membership))
            .route("/{id}", web::put().to(update_membership))
            .route("/{id}", web::delete().to(delete_membership)),
    );
}
