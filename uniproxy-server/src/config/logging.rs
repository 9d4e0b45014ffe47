use confique::Config;
use log::LevelFilter;
use serde::Deserialize;

/// Output format of log records
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Logging configuration, loaded before the rest of the settings so that
/// configuration errors can be reported through the logger
#[derive(Debug, Config, Clone)]
pub struct LoggingConfig {
    /// Application name printed with every record (default: university_proxy)
    #[config(env = "APP_NAME", default = "university_proxy")]
    pub app_name: String,

    /// Enables debug level logging (default: false)
    #[config(env = "DEBUG", default = false)]
    pub debug: bool,

    /// Log format, "text" or "json" (default: text)
    #[config(env = "LOG_FORMAT", default = "text")]
    pub format: LogFormat,

    /// Colorize text output by level (default: true)
    #[config(env = "LOG_COLORS", default = true)]
    pub colors: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: "university_proxy".to_string(),
            debug: false,
            format: LogFormat::Text,
            colors: true,
        }
    }
}

impl LoggingConfig {
    /// Loads the logging configuration from the environment
    pub fn from_env() -> Result<Self, confique::Error> {
        Self::builder().env().load()
    }

    /// Default level filter, `RUST_LOG` still takes precedence when set
    pub fn level(&self) -> LevelFilter {
        if self.debug {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
