//! Process-wide logger setup on top of `env_logger`.
//!
//! Two layouts are supported: a compact, level-colored text line for humans
//! and one JSON object per line for log shippers.

use crate::config::{LogFormat, LoggingConfig};
use chrono::{DateTime, Local, SecondsFormat, Utc};
use env_logger::fmt::style::{AnsiColor, Style};
use env_logger::{Builder, Env, WriteStyle};
use log::Level;
use std::io::Write;

/// Installs the global logger. Calling it twice is a no-op.
pub fn init(config: &LoggingConfig) {
    let mut builder = Builder::from_env(Env::default().default_filter_or(config.level().as_str()));
    let app_name = config.app_name.clone();

    match config.format {
        LogFormat::Text => {
            builder.write_style(if config.colors {
                WriteStyle::Auto
            } else {
                WriteStyle::Never
            });
            // Escape codes are stripped by env_logger when styling is off
            builder.format(move |buf, record| {
                let message = render_message(record.level(), &record.args().to_string());
                let line = render_text(&Local::now(), record.level(), &app_name, &message);
                writeln!(buf, "{line}")
            });
        }
        LogFormat::Json => {
            builder.write_style(WriteStyle::Never);
            builder.format(move |buf, record| {
                let line = render_json(
                    &Utc::now(),
                    record.level(),
                    &app_name,
                    record.target(),
                    &record.args().to_string(),
                );
                writeln!(buf, "{line}")
            });
        }
    }

    let _ = builder.try_init();
}

fn render_text(now: &DateTime<Local>, level: Level, app_name: &str, message: &str) -> String {
    format!(
        "{} | {:<8} | {} | {}",
        now.format("%H:%M:%S"),
        level_name(level),
        app_name,
        message
    )
}

/// Colors the message part of a text line by level, errors in bright red
fn render_message(level: Level, message: &str) -> String {
    let style = message_style(level);
    format!("{style}{message}{style:#}")
}

fn message_style(level: Level) -> Style {
    match level {
        Level::Error => AnsiColor::Red.on_default().bold(),
        Level::Warn => AnsiColor::Yellow.on_default(),
        Level::Info => AnsiColor::Green.on_default(),
        Level::Debug => AnsiColor::Cyan.on_default(),
        Level::Trace => Style::new(),
    }
}

fn render_json(
    now: &DateTime<Utc>,
    level: Level,
    app_name: &str,
    target: &str,
    message: &str,
) -> String {
    serde_json::json!({
        "timestamp": now.to_rfc3339_opts(SecondsFormat::Millis, true),
        "level": level_name(level),
        "app": app_name,
        "target": target,
        "message": message,
    })
    .to_string()
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}
