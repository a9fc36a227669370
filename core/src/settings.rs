//! Constants and client configuration.
//!
//! # Design
//! Validation bounds live next to the endpoint defaults so every limit the
//! API enforces is declared in one place. `ClientConfig` is a plain value;
//! nothing in the crate reads the environment except `ClientConfig::from_env`.

use std::time::Duration;

use crate::error::Error;

pub const DEFAULT_BASE_URL: &str = "https://api.realtycloud.ru";

/// Per-call timeout applied by the blocking transport.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// Page size used by `check_status` when the caller does not pick one.
pub const DEFAULT_STATUS_LIMIT: u32 = 1000;

pub const API_KEY_HEADER: &str = "API-Key";

pub const OBJECT_KEY_PATTERN: &str = r"^\d{1,2}:\d{1,2}:(\d|\d{6,7}):\d{1,10}$";
pub const MAX_ADDRESS_LENGTH: usize = 255;

pub const PERSON_NAME_PATTERN: &str = r"^[А-Яа-яЁё\-]+$";
pub const PASSPORT_LENGTH: usize = 10;
pub const BIRTHDAY_FORMAT: &str = "%d.%m.%Y";
pub const BIRTHDAY_PATTERN: &str = r"^[0-9]{1,2}\.[0-9]{1,2}\.[0-9]{4}$";
pub const REGION_MAX_LENGTH: usize = 3;
pub const INN_LENGTH_INDIVIDUAL: usize = 12;
pub const INN_LENGTH_LEGAL: usize = 10;
pub const COMPANY_NAME_MAX_LENGTH: usize = 1024;
pub const REGISTRATION_NUMBER_MAX_LENGTH: usize = 60;

const ENV_API_KEY: &str = "REALTYCLOUD_API_KEY";
const ENV_BASE_URL: &str = "REALTYCLOUD_BASE_URL";
const ENV_TIMEOUT_SECS: &str = "REALTYCLOUD_TIMEOUT_SECS";

/// Connection settings shared by every endpoint group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub api_key: String,
    pub order_url: String,
    pub search_url: String,
    pub status_url: String,
    pub timeout: Duration,
}

impl ClientConfig {
    /// Production endpoints with the default timeout.
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            order_url: String::new(),
            search_url: String::new(),
            status_url: String::new(),
            timeout: TIMEOUT,
        }
        .with_base_url(DEFAULT_BASE_URL)
    }

    /// Point all three endpoint groups at `base_url`. Endpoint URLs always
    /// end with a slash, e.g. `{base_url}/order/`.
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        self.order_url = format!("{base}/order/");
        self.search_url = format!("{base}/search/");
        self.status_url = format!("{base}/orders/");
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Read `REALTYCLOUD_API_KEY` (required), `REALTYCLOUD_BASE_URL` and
    /// `REALTYCLOUD_TIMEOUT_SECS`.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, Error> {
        let api_key = lookup(ENV_API_KEY).ok_or_else(|| Error::Config(format!("{ENV_API_KEY} is not set")))?;
        let mut config = Self::new(&api_key);
        if let Some(base_url) = lookup(ENV_BASE_URL) {
            config = config.with_base_url(&base_url);
        }
        if let Some(raw) = lookup(ENV_TIMEOUT_SECS) {
            let secs: u64 = raw
                .trim()
                .parse()
                .map_err(|_| Error::Config(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got {raw:?}")))?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        config.check()?;
        Ok(config)
    }

    pub(crate) fn check(&self) -> Result<(), Error> {
        if self.api_key.trim().is_empty() {
            return Err(Error::Config("API key must not be empty".to_string()));
        }
        Ok(())
    }
}
