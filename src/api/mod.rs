// ============================================================================
// API Facade - the three portal procedures
// ============================================================================
//
// `Portal` is what clients talk to: the HTTP routes and the terminal view
// both go through it. It delegates to the authenticator and the order
// aggregator and records call metrics.
//
// ============================================================================

mod error;
mod routes;

use std::sync::Arc;
use std::time::Instant;

use crate::domain::customer::{self, AuthError};
use crate::domain::order;
use crate::metrics::{AuthOutcome, CallOutcome, Metrics};
use crate::models::{
    Customer, CustomerLoginInput, GetCustomerOrdersInput, GetOrderByIdInput, OrderWithDetails,
};
use crate::store::Store;

pub use error::ApiError;
pub use routes::{configure, cors};

pub const AUTHENTICATE_CUSTOMER: &str = "authenticateCustomer";
pub const GET_CUSTOMER_ORDERS: &str = "getCustomerOrders";
pub const GET_ORDER_BY_ID: &str = "getOrderById";

pub struct Portal {
    store: Arc<dyn Store>,
    metrics: Arc<Metrics>,
}

impl Portal {
    pub fn new(store: Arc<dyn Store>, metrics: Arc<Metrics>) -> Self {
        Self { store, metrics }
    }

    #[tracing::instrument(skip_all, fields(email = %input.email))]
    pub async fn authenticate_customer(
        &self,
        input: &CustomerLoginInput,
    ) -> Result<Option<Customer>, ApiError> {
        let started = Instant::now();
        let result = customer::authenticate_customer(self.store.as_ref(), input).await;

        let (auth, call) = match &result {
            Ok(Some(_)) => (AuthOutcome::Success, CallOutcome::Ok),
            Ok(None) => (AuthOutcome::Rejected, CallOutcome::NotFound),
            Err(AuthError::InvalidInput(_)) => (AuthOutcome::Invalid, CallOutcome::InvalidInput),
            Err(AuthError::Store(_)) => (AuthOutcome::Error, CallOutcome::Error),
        };
        self.metrics.record_auth(auth);
        self.metrics
            .record_call(AUTHENTICATE_CUSTOMER, call, started.elapsed().as_secs_f64());

        Ok(result?)
    }

    #[tracing::instrument(skip_all, fields(customer_id = input.customer_id))]
    pub async fn get_customer_orders(
        &self,
        input: GetCustomerOrdersInput,
    ) -> Result<Vec<OrderWithDetails>, ApiError> {
        let started = Instant::now();
        let result = order::get_customer_orders(self.store.as_ref(), input.customer_id).await;

        let outcome = match &result {
            Ok(_) => CallOutcome::Ok,
            Err(_) => CallOutcome::Error,
        };
        self.metrics
            .record_call(GET_CUSTOMER_ORDERS, outcome, started.elapsed().as_secs_f64());

        Ok(result?)
    }

    #[tracing::instrument(skip_all, fields(order_id = input.order_id, customer_id = input.customer_id))]
    pub async fn get_order_by_id(
        &self,
        input: GetOrderByIdInput,
    ) -> Result<Option<OrderWithDetails>, ApiError> {
        let started = Instant::now();
        let result =
            order::get_order_by_id(self.store.as_ref(), input.order_id, input.customer_id).await;

        let outcome = match &result {
            Ok(Some(_)) => CallOutcome::Ok,
            Ok(None) => CallOutcome::NotFound,
            Err(_) => CallOutcome::Error,
        };
        self.metrics
            .record_call(GET_ORDER_BY_ID, outcome, started.elapsed().as_secs_f64());

        Ok(result?)
    }
}
