use crate::{
    abstract_trait::order::service::{DynOrderCommandService, DynOrderQueryService},
    domain::{
        actor::Actor,
        requests::order::{CreateOrderRequest, UpdateStatusRequest},
        response::{
            api::ApiResponse,
            order::{CancelOrderResponse, OrderResponse},
        },
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::{Extension, Path},
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::{get, post},
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;
use uuid::Uuid;

#[utoipa::path(
    post,
    path = "/api/orders",
    tag = "Order",
    security(("bearer_auth" = [])),
    request_body = CreateOrderRequest,
    responses(
        (status = 201, description = "Order created", body = ApiResponse<OrderResponse>),
        (status = 400, description = "Validation error or payment verification failure"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Product not found"),
        (status = 409, description = "Out of stock")
    )
)]
pub async fn create_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(actor): Extension<Actor>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreateOrderRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_order(&actor, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order details", body = ApiResponse<OrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Order belongs to someone else"),
        (status = 404, description = "Order not found")
    )
)]
pub async fn get_order(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_by_id(&actor, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/mine",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Orders placed by the caller", body = ApiResponse<Vec<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a buyer")
    )
)]
pub async fn get_my_orders(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_mine(&actor).await?;
    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/orders/worker/active",
    tag = "Order",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's in-flight assignment, if any", body = ApiResponse<Option<OrderResponse>>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a worker")
    )
)]
pub async fn get_active_assignment(
    Extension(service): Extension<DynOrderQueryService>,
    Extension(actor): Extension<Actor>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.find_active_assignment(&actor).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/cancel",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order cancelled", body = ApiResponse<CancelOrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not the buyer"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order can no longer be cancelled")
    )
)]
pub async fn cancel_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.cancel_order(&actor, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/assign",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    responses(
        (status = 200, description = "Order assigned to the caller", body = ApiResponse<OrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller is not a worker"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Already assigned, worker busy or order not assignable")
    )
)]
pub async fn assign_order(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.assign_order(&actor, id).await?;
    Ok(Json(response))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/status",
    tag = "Order",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Order ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<OrderResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Caller may not perform this transition"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Transition not allowed from the current status")
    )
)]
pub async fn update_status(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.advance_status(&actor, id, body.status).await?;
    Ok(Json(response))
}

pub fn order_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/orders", post(create_order))
        .route("/api/orders/mine", get(get_my_orders))
        .route("/api/orders/worker/active", get(get_active_assignment))
        .route("/api/orders/{id}", get(get_order))
        .route("/api/orders/{id}/cancel", post(cancel_order))
        .route("/api/orders/{id}/assign", post(assign_order))
        .route("/api/orders/{id}/status", post(update_status))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.di_container.order_query.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
