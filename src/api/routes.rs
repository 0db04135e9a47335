use actix_cors::Cors;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use uuid::Uuid;

use crate::metrics::metrics_handler;
use crate::models::{CustomerLoginInput, GetCustomerOrdersInput, GetOrderByIdInput};

use super::{ApiError, Portal, AUTHENTICATE_CUSTOMER, GET_CUSTOMER_ORDERS, GET_ORDER_BY_ID};

/// Register the portal procedures. Expects `web::Data<Portal>` and
/// `web::Data<Arc<Metrics>>` on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| ApiError::InvalidInput(err.to_string()).into()),
    )
    .route("/healthcheck", web::get().to(healthcheck))
    .route(&format!("/{AUTHENTICATE_CUSTOMER}"), web::post().to(authenticate_customer))
    .route(&format!("/{GET_CUSTOMER_ORDERS}"), web::get().to(get_customer_orders))
    .route(&format!("/{GET_ORDER_BY_ID}"), web::get().to(get_order_by_id))
    .route("/metrics", web::get().to(metrics_handler));
}

/// Cross-origin policy for browser clients served from another origin:
/// any origin, method and header is allowed.
pub fn cors() -> Cors {
    Cors::permissive()
}

async fn healthcheck() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

#[tracing::instrument(name = "rpc", skip_all, fields(procedure = AUTHENTICATE_CUSTOMER, request_id = %Uuid::new_v4()))]
async fn authenticate_customer(
    portal: web::Data<Portal>,
    input: web::Json<CustomerLoginInput>,
) -> Result<HttpResponse, ApiError> {
    let customer = portal.authenticate_customer(&input).await?;
    Ok(HttpResponse::Ok().json(customer))
}

#[tracing::instrument(name = "rpc", skip_all, fields(procedure = GET_CUSTOMER_ORDERS, request_id = %Uuid::new_v4()))]
async fn get_customer_orders(
    portal: web::Data<Portal>,
    input: web::Query<GetCustomerOrdersInput>,
) -> Result<HttpResponse, ApiError> {
    let orders = portal.get_customer_orders(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(orders))
}

#[tracing::instrument(name = "rpc", skip_all, fields(procedure = GET_ORDER_BY_ID, request_id = %Uuid::new_v4()))]
async fn get_order_by_id(
    portal: web::Data<Portal>,
    input: web::Query<GetOrderByIdInput>,
) -> Result<HttpResponse, ApiError> {
    let order = portal.get_order_by_id(input.into_inner()).await?;
    Ok(HttpResponse::Ok().json(order))
}
