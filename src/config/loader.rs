//! Load settings from the process environment (and `.env` when present).

use crate::config::types::*;
use crate::config::validate;
use crate::error::ConfigError;
use std::collections::HashMap;
use std::time::Duration;

pub const DEFAULT_SCHEMA: &str = "catalog";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;
/// Seven days, matching the lifetime of a seller session.
const DEFAULT_TOKEN_TTL_SECS: u64 = 60 * 60 * 24 * 7;
const DEFAULT_MAIL_FROM: &str = "CatalogApp <noreply@catalog.local>";
const DEFAULT_PUBLIC_URL: &str = "http://localhost:3000";

impl Settings {
    /// Read `.env` if present, then the environment. Validates before returning.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        let vars: HashMap<String, String> = std::env::vars().collect();
        Self::from_map(&vars)
    }

    /// Build from an explicit variable map. Empty values count as unset.
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        let get = |name: &str| {
            vars.get(name)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        let require = |name: &'static str| get(name).ok_or(ConfigError::Missing(name));

        let max_connections = match get("DB_MAX_CONNECTIONS") {
            Some(v) => v.parse::<u32>().map_err(|e| ConfigError::Invalid {
                name: "DB_MAX_CONNECTIONS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let ttl_secs = match get("JWT_TTL_SECS") {
            Some(v) => v.parse::<u64>().map_err(|e| ConfigError::Invalid {
                name: "JWT_TTL_SECS",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TOKEN_TTL_SECS,
        };

        let admin = match (get("ADMIN_USERNAME"), get("ADMIN_PASSWORD")) {
            (Some(username), Some(password)) => Some(AdminBootstrap { username, password }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::Missing("ADMIN_PASSWORD")),
            (None, Some(_)) => return Err(ConfigError::Missing("ADMIN_USERNAME")),
        };

        let settings = Settings {
            server: ServerSettings {
                bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            },
            database: DatabaseSettings {
                url: require("DATABASE_URL")?,
                schema: get("CATALOG_SCHEMA").unwrap_or_else(|| DEFAULT_SCHEMA.into()),
                max_connections,
            },
            auth: AuthSettings {
                jwt_secret: require("JWT_SECRET")?,
                token_ttl: Duration::from_secs(ttl_secs),
            },
            storage: StorageSettings {
                bucket: get("S3_BUCKET"),
                region: get("S3_REGION"),
                endpoint: get("S3_ENDPOINT"),
                public_url: get("S3_PUBLIC_URL"),
            },
            mail: MailSettings {
                resend_api_key: get("RESEND_API_KEY"),
                from: get("EMAIL_FROM").unwrap_or_else(|| DEFAULT_MAIL_FROM.into()),
                app_public_url: get("APP_PUBLIC_URL").unwrap_or_else(|| DEFAULT_PUBLIC_URL.into()),
            },
            admin,
        };
        validate(&settings)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> HashMap<String, String> {
        let mut m = HashMap::new();
        m.insert("DATABASE_URL".into(), "postgres://localhost/catalog".into());
        m.insert("JWT_SECRET".into(), "0123456789abcdef0123456789abcdef".into());
        m
    }

    #[test]
    fn defaults_apply() {
        let s = Settings::from_map(&base()).unwrap();
        assert_eq!(s.server.bind_addr, DEFAULT_BIND_ADDR);
        assert_eq!(s.database.schema, "catalog");
        assert_eq!(s.database.max_connections, 5);
        assert_eq!(s.auth.token_ttl, Duration::from_secs(604_800));
        assert!(s.storage.bucket.is_none());
        assert!(s.mail.resend_api_key.is_none());
    }

    #[test]
    fn missing_database_url() {
        let mut m = base();
        m.remove("DATABASE_URL");
        assert!(matches!(Settings::from_map(&m), Err(ConfigError::Missing("DATABASE_URL"))));
    }

    #[test]
    fn blank_counts_as_unset() {
        let mut m = base();
        m.insert("S3_BUCKET".into(), "   ".into());
        let s = Settings::from_map(&m).unwrap();
        assert!(s.storage.bucket.is_none());
    }

    #[test]
    fn admin_bootstrap_needs_both_values() {
        let mut m = base();
        m.insert("ADMIN_USERNAME".into(), "root".into());
        assert!(matches!(Settings::from_map(&m), Err(ConfigError::Missing("ADMIN_PASSWORD"))));
        m.insert("ADMIN_PASSWORD".into(), "Rahasia#123".into());
        let s = Settings::from_map(&m).unwrap();
        assert_eq!(s.admin.map(|a| a.username).as_deref(), Some("root"));
    }

    #[test]
    fn bad_number() {
        let mut m = base();
        m.insert("DB_MAX_CONNECTIONS".into(), "many".into());
        assert!(matches!(
            Settings::from_map(&m),
            Err(ConfigError::Invalid { name: "DB_MAX_CONNECTIONS", .. })
        ));
    }
}
