use axum::{Router, middleware::from_fn_with_state, routing::get};

use crate::{AppState, routes};

mod auth;

pub fn router(state: AppState) -> Router {
    let api_routes = Router::new()
        .merge(routes::tasks::router())
        .merge(routes::export::router())
        .layer(from_fn_with_state(state.clone(), auth::require_auth));

    Router::new()
        .route("/health", get(routes::health::health_check))
        .nest("/api", api_routes)
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    use crate::test_support::{TEST_SECRET, authed_request, body_json, seed_user, setup_state};

    #[tokio::test]
    async fn health_is_public() {
        let (state, _mail_rx) = setup_state().await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Server is running");
        assert!(json["data"]["timestamp"].is_string());
    }

    #[tokio::test]
    async fn api_rejects_missing_token_with_error_envelope() {
        let (state, _mail_rx) = setup_state().await;
        let app = super::router(state);

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Not authorized to access this route");
    }

    #[tokio::test]
    async fn api_rejects_garbage_and_expired_tokens() {
        let (state, _mail_rx) = setup_state().await;
        let (user, _token) = seed_user(&state, "ada@example.com", true).await;
        let app = super::router(state);

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .header(header::AUTHORIZATION, "Bearer not-a-token")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let expired =
            utils_jwt::issue_token(TEST_SECRET, user.id, chrono::Duration::hours(-2)).unwrap();
        let response = app
            .oneshot(
                Request::builder()
                    .uri("/api/tasks")
                    .header(header::AUTHORIZATION, format!("Bearer {expired}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn api_rejects_tokens_for_unknown_users() {
        let (state, _mail_rx) = setup_state().await;
        let app = super::router(state);

        let token =
            utils_jwt::issue_token(TEST_SECRET, uuid::Uuid::new_v4(), chrono::Duration::hours(1))
                .unwrap();
        let response = app
            .oneshot(authed_request("GET", "/api/tasks", &token, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn valid_token_reaches_the_api() {
        let (state, _mail_rx) = setup_state().await;
        let (_user, token) = seed_user(&state, "ada@example.com", true).await;
        let app = super::router(state);

        let response = app
            .oneshot(authed_request("GET", "/api/tasks", &token, None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["pagination"]["total"], 0);
    }
}
