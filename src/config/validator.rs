//! Settings validation: reject values that would only fail later at request time.

use crate::config::Settings;
use crate::error::ConfigError;
use regex::Regex;

const MIN_SECRET_LEN: usize = 32;

/// True when `name` can be used unquoted as a PostgreSQL identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    match Regex::new(r"^[a-z_][a-z0-9_]{0,62}$") {
        Ok(re) => re.is_match(name),
        Err(_) => false,
    }
}

pub fn validate(settings: &Settings) -> Result<(), ConfigError> {
    if !is_valid_identifier(&settings.database.schema) {
        return Err(ConfigError::Invalid {
            name: "CATALOG_SCHEMA",
            reason: format!("'{}' is not a lowercase identifier", settings.database.schema),
        });
    }
    if settings.database.max_connections == 0 {
        return Err(ConfigError::Invalid {
            name: "DB_MAX_CONNECTIONS",
            reason: "must be at least 1".into(),
        });
    }
    if settings.auth.jwt_secret.len() < MIN_SECRET_LEN {
        return Err(ConfigError::Invalid {
            name: "JWT_SECRET",
            reason: format!("must be at least {} bytes", MIN_SECRET_LEN),
        });
    }
    if settings.auth.token_ttl.as_secs() == 0 {
        return Err(ConfigError::Invalid {
            name: "JWT_TTL_SECS",
            reason: "must be positive".into(),
        });
    }
    if settings.storage.bucket.is_some() && settings.storage.region.is_none() {
        return Err(ConfigError::Invalid {
            name: "S3_REGION",
            reason: "required when S3_BUCKET is set".into(),
        });
    }
    Ok(())
}
