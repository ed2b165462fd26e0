use crate::domain::actor::Actor;
use axum::{
    Extension,
    body::Body,
    http::{Request, header},
    middleware::Next,
    response::IntoResponse,
};
use axum_extra::extract::cookie::CookieJar;
use shared::{
    abstract_trait::DynJwtService,
    errors::{HttpError, ServiceError},
};
use tracing::warn;

pub async fn auth_middleware(
    cookie_jar: CookieJar,
    Extension(jwt): Extension<DynJwtService>,
    mut req: Request<Body>,
    next: Next,
) -> Result<impl IntoResponse, HttpError> {
    let token = cookie_jar
        .get("token")
        .map(|cookie| cookie.value().to_string())
        .or_else(|| {
            req.headers()
                .get(header::AUTHORIZATION)
                .and_then(|auth_header| auth_header.to_str().ok())
                .and_then(|auth_value| auth_value.strip_prefix("Bearer ").map(str::to_owned))
        });

    let Some(token) = token else {
        return Err(ServiceError::Unauthenticated(
            "You are not logged in, please provide token".into(),
        )
        .into());
    };

    let actor = jwt
        .verify_token(&token)
        .and_then(Actor::try_from)
        .map_err(|e| {
            warn!("⚠️ Rejected token: {e}");
            HttpError::from(e)
        })?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}
