use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::PlanPriceService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/plan-prices",
    tag = "plan-prices",
    request_body = CreatePlanPriceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Membership plan price created", body = PlanPriceResponse),
        (status = 400, description = "Invalid input, or validity overlaps another price of the plan", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan not found", body = ErrorBody)
    )
)]
pub async fn create_price(
    price_service: web::Data<PlanPriceService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreatePlanPriceRequest>,
) -> Result<HttpResponse> {
    match price_service.create_price(&caller.0, request.into_inner()).await {
        Ok(price) => Ok(HttpResponse::Created().json(ApiResponse::success(price))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/plan-prices",
    tag = "plan-prices",
    params(PlanPriceQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Prices visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_prices(
    price_service: web::Data<PlanPriceService>,
    caller: AuthenticatedCaller,
    query: web::Query<PlanPriceQuery>,
) -> Result<HttpResponse> {
    match price_service.list_prices(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/plan-prices/{id}",
    tag = "plan-prices",
    params(("id" = i64, Path, description = "Membership plan price id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Membership plan price", body = PlanPriceResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan price not found", body = ErrorBody)
    )
)]
pub async fn get_price(
    price_service: web::Data<PlanPriceService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match price_service.get_price(&caller.0, path.into_inner()).await {
        Ok(price) => Ok(HttpResponse::Ok().json(ApiResponse::success(price))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/plan-prices/{id}",
    tag = "plan-prices",
    params(("id" = i64, Path, description = "Membership plan price id")),
    request_body = UpdatePlanPriceRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated price", body = PlanPriceResponse),
        (status = 400, description = "Invalid input, or validity overlaps another price of the plan", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan price not found", body = ErrorBody)
    )
)]
pub async fn update_price(
    price_service: web::Data<PlanPriceService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdatePlanPriceRequest>,
) -> Result<HttpResponse> {
    match price_service
        .update_price(&caller.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(price) => Ok(HttpResponse::Ok().json(ApiResponse::success(price))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/plan-prices/{id}",
    tag = "plan-prices",
    params(("id" = i64, Path, description = "Membership plan price id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Membership plan price not found", body = ErrorBody)
    )
)]
pub async fn delete_price(
    price_service: web::Data<PlanPriceService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match price_service.delete_price(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn plan_price_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/plan-prices")
            .route("", web::post().to(create_price))
            .route("", web::get().to(list_prices))
            .route("/{id}", web::get().to(get_price))
            .route("/{id}", web::put().to(update_price))
            .route("/{id}", web::delete().to(delete_price)),
    );
}
