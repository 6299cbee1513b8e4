//! Shared fixtures for router tests: an in-memory database, a recording
//! mailer, and helpers for signed requests.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, Response, header},
};
use db::{
    DBService,
    models::{
        task::Task,
        user::{CreateUser, User},
    },
};
use services::services::email::{Mailer, MailerError, Notifier};
use tokio::sync::mpsc;
use utils_jwt::TokenVerifier;
use uuid::Uuid;

use crate::AppState;

pub const TEST_SECRET: &str = "test-secret";

/// Captures every completion mail instead of talking SMTP.
pub struct RecordingMailer {
    tx: mpsc::UnboundedSender<(User, Task)>,
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_completion(&self, user: &User, task: &Task) -> Result<(), MailerError> {
        let _ = self.tx.send((user.clone(), task.clone()));
        Ok(())
    }
}

pub async fn setup_state() -> (AppState, mpsc::UnboundedReceiver<(User, Task)>) {
    let db = DBService::new("sqlite::memory:")
        .await
        .expect("in-memory database");
    let (tx, rx) = mpsc::unbounded_channel();
    let notifier = Notifier::new(Arc::new(RecordingMailer { tx }));
    let state = AppState::new(db, notifier, TokenVerifier::new(TEST_SECRET));
    (state, rx)
}

pub async fn seed_user(state: &AppState, email: &str, email_notifications: bool) -> (User, String) {
    let user = User::create(
        &state.db().pool,
        &CreateUser {
            email: email.to_string(),
            name: "Test".to_string(),
            email_notifications,
        },
        Uuid::new_v4(),
    )
    .await
    .expect("seed user");
    let token = utils_jwt::issue_token(TEST_SECRET, user.id, chrono::Duration::hours(1))
        .expect("signed token");
    (user, token)
}

pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
