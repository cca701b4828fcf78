//! Command-line configuration.
//!
//! Every flag can also be set through a `LATCHKEY_*` environment variable,
//! which is how the systemd unit passes them.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use latchkey_core::constants::{DEFAULT_DEBOUNCE_WINDOW, DEFAULT_LIST_PATH, DEFAULT_SERIAL_DEVICE};
use serde::Serialize;

/// Default log filter. Startup and reload details are logged at debug.
pub const DEFAULT_LOG_FILTER: &str = "debug";

/// RFID door access daemon
#[derive(Parser, Debug, Clone, PartialEq, Serialize)]
#[command(name = "latchkey")]
#[command(version, about, long_about = None)]
pub struct DaemonConfig {
    /// Authorization file, one `<token> <name...>` entry per line
    #[arg(long, env = "LATCHKEY_LIST", default_value = DEFAULT_LIST_PATH)]
    pub list: PathBuf,

    /// Serial device the RFID reader is attached to
    #[arg(long, env = "LATCHKEY_PORT", default_value = DEFAULT_SERIAL_DEVICE)]
    pub port: String,

    /// Minimum seconds between two unlocks
    #[arg(
        long,
        env = "LATCHKEY_DEBOUNCE_SECS",
        default_value_t = DEFAULT_DEBOUNCE_WINDOW.as_secs_f64(),
        value_parser = parse_seconds,
    )]
    pub debounce_secs: f64,

    /// Log filter (trace, debug, info, warn, error, or a full directive)
    #[arg(long, env = "LATCHKEY_LOG", default_value = DEFAULT_LOG_FILTER)]
    pub log_level: String,

    /// Append logs to this file instead of stdout
    #[arg(long, env = "LATCHKEY_LOG_FILE")]
    pub log_file: Option<PathBuf>,
}

impl DaemonConfig {
    /// Debounce window as a duration.
    ///
    /// Falls back to the default window if the configured value is not a
    /// representable duration.
    pub fn debounce_window(&self) -> Duration {
        Duration::try_from_secs_f64(self.debounce_secs).unwrap_or(DEFAULT_DEBOUNCE_WINDOW)
    }
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            list: PathBuf::from(DEFAULT_LIST_PATH),
            port: DEFAULT_SERIAL_DEVICE.to_string(),
            debounce_secs: DEFAULT_DEBOUNCE_WINDOW.as_secs_f64(),
            log_level: DEFAULT_LOG_FILTER.to_string(),
            log_file: None,
        }
    }
}

fn parse_seconds(raw: &str) -> Result<f64, String> {
    let secs: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("`{raw}` is not a number of seconds"))?;

    if Duration::try_from_secs_f64(secs).is_err() {
        return Err(format!("`{raw}` must be a finite, non-negative number of seconds"));
    }
    Ok(secs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<DaemonConfig, clap::Error> {
        DaemonConfig::try_parse_from(std::iter::once("latchkey").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let config = parse(&[]).unwrap();

        assert_eq!(config.list, PathBuf::from("list.txt"));
        assert_eq!(config.port, "/dev/ttyUSB0");
        assert_eq!(config.debounce_window(), Duration::from_secs(5));
        assert_eq!(config.log_level, "debug");
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_default_impl_matches_cli_defaults() {
        assert_eq!(parse(&[]).unwrap(), DaemonConfig::default());
    }

    #[test]
    fn test_overrides() {
        let config = parse(&[
            "--list",
            "/etc/latchkey/list.txt",
            "--port",
            "/dev/ttyAMA0",
            "--debounce-secs",
            "2.5",
            "--log-level",
            "latchkey_daemon=trace,info",
            "--log-file",
            "/var/log/latchkey.log",
        ])
        .unwrap();

        assert_eq!(config.list, PathBuf::from("/etc/latchkey/list.txt"));
        assert_eq!(config.port, "/dev/ttyAMA0");
        assert_eq!(config.debounce_window(), Duration::from_millis(2500));
        assert_eq!(config.log_level, "latchkey_daemon=trace,info");
        assert_eq!(config.log_file, Some(PathBuf::from("/var/log/latchkey.log")));
    }

    #[rstest]
    #[case("-1")]
    #[case("soon")]
    #[case("inf")]
    #[case("NaN")]
    fn test_rejects_bad_debounce(#[case] value: &str) {
        assert!(parse(&["--debounce-secs", value]).is_err());
    }

    #[test]
    fn test_zero_debounce_allowed() {
        let config = parse(&["--debounce-secs", "0"]).unwrap();
        assert_eq!(config.debounce_window(), Duration::ZERO);
    }

    #[test]
    fn test_serializes_to_json() {
        let json = serde_json::to_value(DaemonConfig::default()).unwrap();
        assert_eq!(json["port"], "/dev/ttyUSB0");
        assert_eq!(json["debounce_secs"], 5.0);
        assert!(json["log_file"].is_null());
    }
}
