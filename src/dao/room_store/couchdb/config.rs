use std::time::Duration;

use super::error::{CouchDaoError, CouchResult};

/// Default interval between change-detection polls of a watched document.
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_000);

/// Runtime configuration describing how to connect to CouchDB.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    /// Server base URL, e.g. `http://localhost:5984`.
    pub base_url: String,
    /// Database holding the room and word-set documents.
    pub database: String,
    /// Basic-auth username, if the server requires one.
    pub username: Option<String>,
    /// Basic-auth password, if the server requires one.
    pub password: Option<String>,
    /// Interval between polls when watching a document for changes.
    pub poll_interval: Duration,
}

impl CouchConfig {
    /// Construct a configuration from explicit base URL and database name.
    pub fn new(base_url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            database: database.into(),
            username: None,
            password: None,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Attach basic-auth credentials to the configuration.
    pub fn with_credentials(
        mut self,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Override the watch poll interval.
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Build a configuration by reading the expected environment variables.
    pub fn from_env() -> CouchResult<Self> {
        let base_url =
            std::env::var("COUCH_BASE_URL").map_err(|_| CouchDaoError::MissingEnvVar {
                var: "COUCH_BASE_URL",
            })?;
        let database = std::env::var("COUCH_DB")
            .map_err(|_| CouchDaoError::MissingEnvVar { var: "COUCH_DB" })?;

        let mut config = Self::new(base_url, database);

        if let (Some(username), Some(password)) = (
            std::env::var("COUCH_USERNAME").ok(),
            std::env::var("COUCH_PASSWORD").ok(),
        ) {
            config = config.with_credentials(username, password);
        }

        if let Some(interval) = std::env::var("COUCH_POLL_MS")
            .ok()
            .and_then(|value| value.parse::<u64>().ok())
        {
            config = config.with_poll_interval(Duration::from_millis(interval));
        }

        Ok(config)
    }
}
