pub(crate) use crate::config::jwt::JwtConfig;
pub(crate) use crate::config::logging::{LogFormat, LoggingConfig};
pub(crate) use crate::config::upstream::{UpstreamConfig, ROLL_NO_PLACEHOLDER};
use confique::Config;
use thiserror::Error;
use url::Url;

pub mod jwt;
pub mod logging;
pub mod upstream;

/// Optional configuration file read after the environment
const CONFIG_FILE: &str = "uniproxy.toml";

/// Errors that prevent the gateway from starting
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(#[from] confique::Error),
    #[error("{0} environment variable is not set")]
    Missing(&'static str),
    #[error("{name} is not a valid URL: {source}")]
    InvalidUrl {
        name: &'static str,
        source: url::ParseError,
    },
    #[error("{name} must contain the {placeholder} placeholder")]
    MissingPlaceholder {
        name: &'static str,
        placeholder: &'static str,
    },
}

/// Main configuration structure for the gateway, built once at startup
#[derive(Debug, Config, Clone)]
pub struct Settings {
    /// The address the gateway listens on (default: 0.0.0.0)
    #[config(env = "HOST", default = "0.0.0.0")]
    pub host: String,

    /// The port the gateway listens on (default: 8000)
    #[config(env = "PORT", default = 8000)]
    pub port: u16,

    /// University service configuration
    #[config(nested)]
    pub upstream: UpstreamConfig,

    /// Bearer token configuration
    #[config(nested)]
    pub jwt: JwtConfig,
}

impl Settings {
    /// Loads the settings from environment variables, falling back to `uniproxy.toml`
    pub fn new() -> Result<Self, ConfigError> {
        let settings = Self::builder().env().file(CONFIG_FILE).load()?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks the invariants the loader cannot express: no empty required
    /// values, parseable endpoints and templates carrying the roll number placeholder
    pub fn validate(&self) -> Result<(), ConfigError> {
        let upstream = &self.upstream;
        let required = [
            ("SIGN_URL", &upstream.sign_url),
            ("EXAMCELL_DOMAIN", &upstream.examcell_domain),
            ("CHANGE_PASSWD_URL", &upstream.change_passwd_url),
            ("BASIC_INFO_URL", &upstream.basic_info_url),
            ("OVERALL_MARKS_SHEET", &upstream.sem_results_url),
            ("JWT_SECRET", &self.jwt.secret),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Missing(name));
            }
        }

        let endpoints = [
            ("SIGN_URL", &upstream.sign_url),
            ("CHANGE_PASSWD_URL", &upstream.change_passwd_url),
            ("BASIC_INFO_URL", &upstream.basic_info_url),
            ("OVERALL_MARKS_SHEET", &upstream.sem_results_url),
        ];
        for (name, value) in endpoints {
            Url::parse(value).map_err(|source| ConfigError::InvalidUrl { name, source })?;
        }

        let templates = [
            ("BASIC_INFO_URL", &upstream.basic_info_url),
            ("OVERALL_MARKS_SHEET", &upstream.sem_results_url),
        ];
        for (name, value) in templates {
            if !value.contains(ROLL_NO_PLACEHOLDER) {
                return Err(ConfigError::MissingPlaceholder {
                    name,
                    placeholder: ROLL_NO_PLACEHOLDER,
                });
            }
        }

        Ok(())
    }

    #[cfg(test)]
    pub fn for_test_with_mocks(university_mock: &wiremock::MockServer) -> Self {
        Self::for_test_with_uri(&university_mock.uri())
    }

    #[cfg(test)]
    pub fn for_test_with_uri(base: &str) -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 0, // Let the OS choose a port
            upstream: UpstreamConfig {
                sign_url: format!("{}/api/auth/sign-in", base),
                examcell_domain: "examcell.test".to_string(),
                change_passwd_url: format!("{}/api/auth/forgot-password", base),
                basic_info_url: format!("{}/api/students/{{roll_no}}/basic-info", base),
                sem_results_url: format!("{}/api/students/{{roll_no}}/marks", base),
                connect_timeout: 1,
                auth_timeout: 1,
                resource_timeout: 1,
                origin: "https://academics.mrdu.edu.in".to_string(),
                referer: "https://academics.mrdu.edu.in/".to_string(),
                user_agent: "uniproxy-test".to_string(),
                accept_invalid_certs: false,
            },
            jwt: JwtConfig {
                secret: "test_jwt_secret".to_string(),
            },
        }
    }
}
