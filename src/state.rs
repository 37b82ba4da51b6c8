//! Shared application state for all routes.

use crate::auth::TokenKeys;
use crate::config::Settings;
use crate::error::AppError;
use crate::mail::{self, Mailer};
use crate::storage::{self, ObjectStorage};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub keys: TokenKeys,
    pub storage: Arc<dyn ObjectStorage>,
    pub mailer: Arc<dyn Mailer>,
    /// Base URL used in links inside outgoing mail.
    pub app_public_url: String,
    /// Public base URL of the image bucket, when it is served directly.
    pub image_base_url: Option<String>,
}

impl AppState {
    /// Build storage and mail clients from settings around an existing pool.
    pub async fn from_settings(pool: PgPool, settings: &Settings) -> Result<Self, AppError> {
        Ok(AppState {
            pool,
            keys: TokenKeys::new(&settings.auth),
            storage: storage::from_settings(&settings.storage).await,
            mailer: mail::from_settings(&settings.mail)?,
            app_public_url: settings.mail.app_public_url.clone(),
            image_base_url: settings.storage.public_url.clone(),
        })
    }
}
