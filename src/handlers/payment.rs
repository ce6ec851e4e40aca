use crate::middlewares::AuthenticatedCaller;
use crate::models::*;
use crate::services::PaymentService;
use actix_web::{HttpResponse, ResponseError, Result, web};

#[utoipa::path(
    post,
    path = "/payments",
    tag = "payments",
    request_body = CreatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 201, description = "Payment created", body = PaymentResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Member or plan not found", body = ErrorBody)
    )
)]
pub async fn create_payment(
    payment_service: web::Data<PaymentService>,
    caller: AuthenticatedCaller,
    request: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service.create_payment(&caller.0, request.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Created().json(ApiResponse::success(payment))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments",
    tag = "payments",
    params(MemberRecordQuery),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payments visible to the caller"),
        (status = 403, description = "Forbidden", body = ErrorBody)
    )
)]
pub async fn list_payments(
    payment_service: web::Data<PaymentService>,
    caller: AuthenticatedCaller,
    query: web::Query<MemberRecordQuery>,
) -> Result<HttpResponse> {
    match payment_service.list_payments(&caller.0, &query.into_inner()).await {
        Ok(page) => Ok(HttpResponse::Ok().json(ApiResponse::success(page))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    get,
    path = "/payments/{id}",
    tag = "payments",
    params(("id" = i64, Path, description = "Payment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Payment", body = PaymentResponse),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Payment not found", body = ErrorBody)
    )
)]
pub async fn get_payment(
    payment_service: web::Data<PaymentService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match payment_service.get_payment(&caller.0, path.into_inner()).await {
        Ok(payment) => Ok(HttpResponse::Ok().json(ApiResponse::success(payment))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    put,
    path = "/payments/{id}",
    tag = "payments",
    params(("id" = i64, Path, description = "Payment id")),
    request_body = UpdatePaymentRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Updated payment", body = PaymentResponse),
        (status = 400, description = "Invalid input", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Payment not found", body = ErrorBody)
    )
)]
pub async fn update_payment(
    payment_service: web::Data<PaymentService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
    request: web::Json<UpdatePaymentRequest>,
) -> Result<HttpResponse> {
    match payment_service
        .update_payment(&caller.0, path.into_inner(), request.into_inner())
        .await
    {
        Ok(payment) => Ok(HttpResponse::Ok().json(ApiResponse::success(payment))),
        Err(e) => Ok(e.error_response()),
    }
}

#[utoipa::path(
    delete,
    path = "/payments/{id}",
    tag = "payments",
    params(("id" = i64, Path, description = "Payment id")),
    security(("bearer_auth" = [])),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Still referenced by other records", body = ErrorBody),
        (status = 403, description = "Forbidden", body = ErrorBody),
        (status = 404, description = "Payment not found", body = ErrorBody)
    )
)]
pub async fn delete_payment(
    payment_service: web::Data<PaymentService>,
    caller: AuthenticatedCaller,
    path: web::Path<i64>,
) -> Result<HttpResponse> {
    match payment_service.delete_payment(&caller.0, path.into_inner()).await {
        Ok(()) => Ok(HttpResponse::NoContent().finish()),
        Err(e) => Ok(e.error_response()),
    }
}

pub fn payment_config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/payments")
            .route("", web::post().to(create_payment))
            .route("", web::get().to(list_payments))
            .route("/{id}", web::get().to(get_payment))
            .route("/{id}", web::put().to(update_payment))
            .route("/{id}", web::delete().to(delete_payment)),
    );
}
