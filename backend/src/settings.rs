//! Service configuration loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USER_SERVICE_*` environment variables and an
//! optional configuration file, in ortho_config's usual precedence.

use std::net::SocketAddr;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::DEFAULT_LIST_LIMIT;
use crate::outbound::persistence::{
    DEFAULT_DATABASE, DEFAULT_MONGODB_URI, DEFAULT_USER_COLLECTION, MongoConfig,
};

/// Address the HTTP server binds when none is configured.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("invalid bind address {value:?}: {message}")]
    InvalidBindAddr { value: String, message: String },
    #[error("list limit must be greater than zero")]
    ZeroListLimit,
}

/// Runtime settings for the user service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USER_SERVICE")]
pub struct ServiceSettings {
    /// Socket address for the HTTP listener.
    pub bind_addr: Option<String>,
    /// MongoDB connection string.
    pub mongodb_uri: Option<String>,
    /// Database holding the user collection.
    pub database: Option<String>,
    /// Collection holding user documents.
    pub collection: Option<String>,
    /// Maximum number of users returned by a listing.
    pub list_limit: Option<usize>,
    /// Serve from an in-process store instead of MongoDB.
    #[ortho_config(default = false)]
    pub in_memory: bool,
}

impl ServiceSettings {
    /// Parsed listener address, falling back to [`DEFAULT_BIND_ADDR`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddr`] when the value is not a
    /// socket address.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR);
        raw.parse().map_err(|err: std::net::AddrParseError| SettingsError::InvalidBindAddr {
            value: raw.to_owned(),
            message: err.to_string(),
        })
    }

    /// Store connection settings with defaults applied.
    pub fn mongo_config(&self) -> MongoConfig {
        MongoConfig::new(self.mongodb_uri.as_deref().unwrap_or(DEFAULT_MONGODB_URI))
            .with_database(self.database.as_deref().unwrap_or(DEFAULT_DATABASE))
            .with_user_collection(
                self.collection
                    .as_deref()
                    .unwrap_or(DEFAULT_USER_COLLECTION),
            )
    }

    /// Listing cap, falling back to [`DEFAULT_LIST_LIMIT`].
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::ZeroListLimit`] for an explicit zero.
    pub fn list_limit(&self) -> Result<usize, SettingsError> {
        match self.list_limit {
            Some(0) => Err(SettingsError::ZeroListLimit),
            Some(limit) => Ok(limit),
            None => Ok(DEFAULT_LIST_LIMIT),
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for service configuration parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 6] = [
        "USER_SERVICE_BIND_ADDR",
        "USER_SERVICE_MONGODB_URI",
        "USER_SERVICE_DATABASE",
        "USER_SERVICE_COLLECTION",
        "USER_SERVICE_LIST_LIMIT",
        "USER_SERVICE_IN_MEMORY",
    ];

    fn load_from_empty_args() -> ServiceSettings {
        ServiceSettings::load_from_iter([OsString::from("user-service")])
            .expect("config should load")
    }

    #[rstest]
    fn default_values_are_used_when_missing() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert!(!settings.in_memory);
        assert_eq!(
            settings.bind_addr().expect("default address"),
            SocketAddr::from(([0, 0, 0, 0], 8000))
        );
        assert_eq!(settings.list_limit(), Ok(DEFAULT_LIST_LIMIT));
        assert_eq!(settings.mongo_config(), MongoConfig::default());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            ("USER_SERVICE_BIND_ADDR", Some("127.0.0.1:9000".to_owned())),
            (
                "USER_SERVICE_MONGODB_URI",
                Some("mongodb://db.internal:27017".to_owned()),
            ),
            ("USER_SERVICE_DATABASE", Some("people".to_owned())),
            ("USER_SERVICE_COLLECTION", Some("accounts".to_owned())),
            ("USER_SERVICE_LIST_LIMIT", Some("25".to_owned())),
            ("USER_SERVICE_IN_MEMORY", Some("true".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(settings.in_memory);
        assert_eq!(
            settings.bind_addr().expect("configured address"),
            SocketAddr::from(([127, 0, 0, 1], 9000))
        );
        assert_eq!(settings.list_limit(), Ok(25));
        let mongo = settings.mongo_config();
        assert_eq!(mongo.uri(), "mongodb://db.internal:27017");
        assert_eq!(mongo.database(), "people");
        assert_eq!(mongo.user_collection(), "accounts");
    }

    #[rstest]
    fn invalid_values_are_reported() {
        let _guard = lock_env([
            ("USER_SERVICE_BIND_ADDR", Some("not an address".to_owned())),
            ("USER_SERVICE_LIST_LIMIT", Some("0".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert!(matches!(
            settings.bind_addr(),
            Err(SettingsError::InvalidBindAddr { .. })
        ));
        assert_eq!(settings.list_limit(), Err(SettingsError::ZeroListLimit));
    }
}
