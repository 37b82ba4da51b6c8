//! Outbound notification mail.

use crate::config::MailSettings;
use crate::error::AppError;
use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Clone, Debug, PartialEq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), AppError>;
}

/// Sends through the Resend HTTP API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Internal(format!("mail client: {}", e)))?;
        Ok(ResendMailer { client, api_key, from })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: Email) -> Result<(), AppError> {
        let body = ResendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };
        let resp = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Internal(format!("mail send: {}", e)))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(AppError::Internal(format!("mail rejected ({}): {}", status, text)));
        }
        tracing::info!(to = %email.to, subject = %email.subject, "mail sent");
        Ok(())
    }
}

/// Logs instead of sending. Used when no API key is configured.
#[derive(Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), AppError> {
        tracing::info!(to = %email.to, subject = %email.subject, "mail not sent (no provider configured)");
        Ok(())
    }
}

pub fn from_settings(settings: &MailSettings) -> Result<Arc<dyn Mailer>, AppError> {
    Ok(match &settings.resend_api_key {
        Some(key) => Arc::new(ResendMailer::new(key.clone(), settings.from.clone())?),
        None => {
            tracing::warn!("RESEND_API_KEY not set; outgoing mail is only logged");
            Arc::new(LogMailer)
        }
    })
}

/// Send in the background. Delivery failures are logged and never reach the caller.
pub fn send_detached(mailer: Arc<dyn Mailer>, email: Email) {
    tokio::spawn(async move {
        let to = email.to.clone();
        if let Err(e) = mailer.send(email).await {
            tracing::warn!(error = %e, to = %to, "notification mail failed");
        }
    });
}

fn escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"id\"><head><meta charset=\"utf-8\"><title>{title}</title></head>\
         <body style=\"font-family: Arial, sans-serif; color: #333333;\">\
         <h1 style=\"font-size: 24px;\">{title}</h1>{body}\
         <p style=\"color: #9ca3af; font-size: 12px;\">Email ini dikirim otomatis oleh sistem. Mohon tidak membalas email ini.</p>\
         </body></html>"
    )
}

pub fn seller_approved(pic_name: &str, store_name: &str, to: &str, app_public_url: &str) -> Email {
    let store = escape(store_name);
    let body = format!(
        "<p>Halo <strong>{}</strong>,</p>\
         <p>Registrasi toko <strong>\"{}\"</strong> telah <strong>disetujui</strong>. \
         Anda sekarang dapat login ke dashboard seller, menambah produk, dan mengelola profil toko.</p>\
         <p><a href=\"{}/seller/auth/login\">Login ke Dashboard</a></p>",
        escape(pic_name),
        store,
        app_public_url.trim_end_matches('/')
    );
    Email {
        to: to.to_string(),
        subject: format!("Selamat! Registrasi Toko \"{}\" Telah Disetujui", store_name),
        html: layout("Registrasi Disetujui", &body),
    }
}

pub fn seller_rejected(pic_name: &str, store_name: &str, to: &str) -> Email {
    let body = format!(
        "<p>Halo <strong>{}</strong>,</p>\
         <p>Setelah melakukan review terhadap registrasi toko <strong>\"{}\"</strong>, \
         registrasi Anda <strong>tidak dapat kami proses</strong> saat ini.</p>\
         <p>Anda dapat melakukan registrasi ulang dengan data dan dokumen yang lengkap.</p>",
        escape(pic_name),
        escape(store_name)
    );
    Email {
        to: to.to_string(),
        subject: format!("Informasi Registrasi Toko \"{}\"", store_name),
        html: layout("Registrasi Tidak Disetujui", &body),
    }
}

pub fn review_thanks(reviewer: &str, to: &str) -> Email {
    let body = format!(
        "<p>Halo <strong>{}</strong>,</p><p>Terima kasih telah memberikan review di platform kami.</p>",
        escape(reviewer)
    );
    Email {
        to: to.to_string(),
        subject: format!("Terimakasih {}", reviewer),
        html: layout("Terima Kasih", &body),
    }
}
