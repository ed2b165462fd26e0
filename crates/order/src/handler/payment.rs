use crate::{
    abstract_trait::order::service::DynOrderCommandService,
    domain::{
        actor::Actor,
        requests::payment::CreatePaymentIntentRequest,
        response::{api::ApiResponse, payment::PaymentIntentResponse},
    },
    middleware::{jwt::auth_middleware, validate::SimpleValidatedJson},
    state::AppState,
};
use axum::{
    Json,
    extract::Extension,
    http::StatusCode,
    middleware,
    response::IntoResponse,
    routing::post,
};
use shared::errors::HttpError;
use std::sync::Arc;
use utoipa_axum::router::OpenApiRouter;

#[utoipa::path(
    post,
    path = "/api/payments/intents",
    tag = "Payment",
    security(("bearer_auth" = [])),
    request_body = CreatePaymentIntentRequest,
    responses(
        (status = 201, description = "Payment intent created", body = ApiResponse<PaymentIntentResponse>),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 502, description = "Payment provider rejected the request"),
        (status = 503, description = "Payment provider unavailable, retry later")
    )
)]
pub async fn create_payment_intent(
    Extension(service): Extension<DynOrderCommandService>,
    Extension(actor): Extension<Actor>,
    SimpleValidatedJson(body): SimpleValidatedJson<CreatePaymentIntentRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let response = service.create_payment_intent(&actor, &body).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

pub fn payment_routes(app_state: Arc<AppState>) -> OpenApiRouter {
    OpenApiRouter::new()
        .route("/api/payments/intents", post(create_payment_intent))
        .route_layer(middleware::from_fn(auth_middleware))
        .layer(Extension(app_state.di_container.order_command.clone()))
        .layer(Extension(app_state.jwt_config.clone()))
}
