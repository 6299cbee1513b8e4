use axum::{
    Json,
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use db::models::user::User;
use utils::response::ApiResponse;

use crate::AppState;

fn parse_authorization_bearer(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    let (prefix, rest) = trimmed.split_once(' ')?;
    if !prefix.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() {
        return None;
    }
    Some(token)
}

fn unauthorized(req: &Request, reason: &'static str) -> Response {
    tracing::warn!(
        path = %req.uri().path(),
        method = %req.method(),
        reason,
        "Unauthorized API request"
    );
    let response = ApiResponse::<()>::error("Not authorized to access this route");
    (axum::http::StatusCode::UNAUTHORIZED, Json(response)).into_response()
}

/// Verifies the bearer token and resolves it to a [`User`], which downstream
/// handlers pick up via `Extension<User>`. Every task and export route sits
/// behind this.
pub async fn require_auth(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let Some(token) = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_authorization_bearer)
        .map(str::to_string)
    else {
        return unauthorized(&req, "missing_token");
    };

    let claims = match state.verifier().verify(&token) {
        Ok(claims) => claims,
        Err(err) => {
            let reason = match err {
                utils_jwt::TokenError::Expired => "token_expired",
                utils_jwt::TokenError::Invalid(_) => "token_invalid",
            };
            return unauthorized(&req, reason);
        }
    };

    let user = match User::find_by_id(&state.db().pool, claims.sub).await {
        Ok(Some(user)) => user,
        Ok(None) => return unauthorized(&req, "unknown_user"),
        Err(err) => return crate::error::ApiError::Database(err).into_response(),
    };

    req.extensions_mut().insert(user);
    next.run(req).await
}
