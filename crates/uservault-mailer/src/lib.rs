//! Transactional email delivery for UserVault services.
//!
//! Services depend on the [`Mailer`] trait; production wiring uses
//! [`HttpMailer`] against a Resend-compatible HTTP API.

#![allow(async_fn_in_trait)]

use serde::Serialize;

/// A rendered transactional email.
#[derive(Debug, Clone, Serialize)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Port for sending email. Implemented by [`HttpMailer`] in production and
/// by in-memory mocks in tests.
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

/// Mailer backed by a Resend-compatible `POST /emails` JSON API.
#[derive(Clone)]
pub struct HttpMailer {
    client: reqwest::Client,
    endpoint: String,
    api_key: String,
    from: String,
}

impl HttpMailer {
    pub fn new(endpoint: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint,
            api_key,
            from,
        }
    }
}

#[derive(Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl Mailer for HttpMailer {
    async fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        let body = SendRequest {
            from: &self.from,
            to: [&message.to],
            subject: &message.subject,
            html: &message.html,
        };
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            anyhow::bail!("email API error: {status} - {text}");
        }
        Ok(())
    }
}

/// Mask an email address for display (`jo***@example.com`).
///
/// Never reveals more than the first two characters of the local part.
pub fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) if local.len() > 2 => format!("{}***@{}", &local[..2], domain),
        Some((_, domain)) => format!("***@{domain}"),
        None => "***".to_owned(),
    }
}
