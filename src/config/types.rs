//! Runtime settings, grouped by concern.

use std::time::Duration;

#[derive(Clone, Debug)]
pub struct ServerSettings {
    pub bind_addr: String,
}

#[derive(Clone, Debug)]
pub struct DatabaseSettings {
    pub url: String,
    /// Schema holding every catalog table. Must be a valid PostgreSQL identifier.
    pub schema: String,
    pub max_connections: u32,
}

#[derive(Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub token_ttl: Duration,
}

impl std::fmt::Debug for AuthSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSettings")
            .field("jwt_secret", &"[redacted]")
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

/// Object storage for product and identity images. `bucket = None` selects the in-memory store.
#[derive(Clone, Debug, Default)]
pub struct StorageSettings {
    pub bucket: Option<String>,
    pub region: Option<String>,
    /// Custom endpoint (R2, MinIO). Path-style addressing is used when it points at localhost.
    pub endpoint: Option<String>,
    pub public_url: Option<String>,
}

/// Outbound mail. Without an API key, mails are only logged.
#[derive(Clone, Default)]
pub struct MailSettings {
    pub resend_api_key: Option<String>,
    pub from: String,
    pub app_public_url: String,
}

impl std::fmt::Debug for MailSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MailSettings")
            .field("resend_api_key", &self.resend_api_key.as_ref().map(|_| "[redacted]"))
            .field("from", &self.from)
            .field("app_public_url", &self.app_public_url)
            .finish()
    }
}

/// First admin account, created at start-up when no admin with that username exists.
#[derive(Clone)]
pub struct AdminBootstrap {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminBootstrap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminBootstrap")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub storage: StorageSettings,
    pub mail: MailSettings,
    pub admin: Option<AdminBootstrap>,
}
