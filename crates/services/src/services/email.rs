use std::sync::Arc;

use async_trait::async_trait;
use db::models::{task::Task, user::User};
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Error)]
pub enum MailerError {
    #[error("Invalid mail address: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("Failed to build message: {0}")]
    Message(#[from] lettre::error::Error),
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Outbound mail seam. The production implementation talks SMTP; tests swap
/// in a recorder.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_completion(&self, user: &User, task: &Task) -> Result<(), MailerError>;
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

impl EmailConfig {
    /// Reads the SMTP settings from the environment. `None` when the host is
    /// unset, which disables outbound mail entirely.
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("EMAIL_HOST").ok()?;
        let port = std::env::var("EMAIL_PORT")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(587);
        let username = std::env::var("EMAIL_USER").unwrap_or_default();
        let password = std::env::var("EMAIL_PASSWORD").unwrap_or_default();
        let from = std::env::var("EMAIL_FROM").unwrap_or_else(|_| username.clone());
        Some(Self {
            host,
            port,
            username,
            password,
            from,
        })
    }
}

pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &EmailConfig) -> Result<Self, MailerError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();
        let from = format!("TaskFlow <{}>", config.from).parse()?;
        Ok(Self { transport, from })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send_completion(&self, user: &User, task: &Task) -> Result<(), MailerError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(user.email.parse()?)
            .subject(format!("Task Completed: {}", task.title))
            .header(ContentType::TEXT_HTML)
            .body(completion_body(user, task))?;
        self.transport.send(message).await?;
        Ok(())
    }
}

fn completion_body(user: &User, task: &Task) -> String {
    let description = task
        .description
        .as_deref()
        .map(|text| format!("<p><em>{text}</em></p>"))
        .unwrap_or_default();
    format!(
        "<html><body>\
         <h1>Congratulations!</h1>\
         <h2>Hi {name},</h2>\
         <p>Great job! You've completed your task:</p>\
         <h3>{title}</h3>\
         {description}\
         <p>Keep up the excellent work! Every completed task brings you closer to your goals.</p>\
         <p><strong>The TaskFlow Team</strong></p>\
         </body></html>",
        name = user.name,
        title = task.title,
    )
}

/// Hands completion mails off to a background task so the HTTP response never
/// waits on SMTP. Failures are logged and dropped.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self {
            mailer: Some(mailer),
        }
    }

    /// No-op notifier for deployments without SMTP configured.
    pub fn disabled() -> Self {
        Self { mailer: None }
    }

    pub fn dispatch_completion(&self, user: User, task: Task) {
        let Some(mailer) = self.mailer.clone() else {
            return;
        };
        tokio::spawn(async move {
            if let Err(err) = mailer.send_completion(&user, &task).await {
                warn!("Failed to send completion email for task {}: {}", task.id, err);
            }
        });
    }
}
