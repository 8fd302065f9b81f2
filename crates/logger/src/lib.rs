//! Process-wide tracing setup shared by every binary in the workspace.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing_subscriber::fmt::time::ChronoLocal;
use tracing_subscriber::EnvFilter;

pub type InitError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human readable, one event per line.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{other}' (use pretty or json)")),
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => f.write_str("pretty"),
            LogFormat::Json => f.write_str("json"),
        }
    }
}

/// `RUST_LOG` when set and valid, otherwise `default_directives`.
pub fn build_filter(default_directives: &str, env_value: Option<&str>) -> EnvFilter {
    env_value
        .and_then(|v| EnvFilter::try_new(v).ok())
        .unwrap_or_else(|| EnvFilter::new(default_directives))
}

/// Installs the global subscriber. Logs go to stderr so stdout stays clean for reports.
///
/// Calling it twice returns an error instead of panicking.
pub fn init(default_directives: &str, format: LogFormat) -> Result<(), InitError> {
    let env_value = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let filter = build_filter(default_directives, env_value.as_deref());

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_timer(ChronoLocal::rfc_3339())
        .with_writer(std::io::stderr)
        .with_target(true);

    match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().flatten_event(true).try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_formats() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("text".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default().to_string(), "pretty");
    }

    #[test]
    fn env_value_overrides_default() {
        let filter = build_filter("info", Some("erp_analyzer=trace"));
        assert!(filter.to_string().contains("erp_analyzer=trace"));
    }

    #[test]
    fn invalid_env_value_falls_back() {
        let filter = build_filter("warn", Some("erp_analyzer=loud"));
        assert_eq!(filter.to_string(), "warn");
    }

    #[test]
    fn second_init_is_an_error() {
        let _ = init("info", LogFormat::Pretty);
        assert!(init("info", LogFormat::Json).is_err());
    }
}
