use std::net::SocketAddr;
use std::path::PathBuf;

/// Application-level constants
pub const APP_NAME: &str = "Dosewatch";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Width of the notification window after a dose's scheduled time.
/// Equal to the client polling interval so no window is missed between polls.
pub const GRACE_SECS: i64 = 300;

/// Polling interval for the in-process notification poller.
pub const POLL_INTERVAL_SECS: u64 = 300;

/// Default HTTP bind address (overridable via `DOSEWATCH_ADDR`).
pub const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8420";

/// Get the application data directory
/// ~/Dosewatch/ on all platforms (user-visible, per design requirement)
pub fn app_data_dir() -> PathBuf {
    let home = dirs::home_dir().expect("Cannot determine home directory");
    home.join(APP_NAME)
}

/// Path to the schedule database. `DOSEWATCH_DB` overrides the default.
pub fn database_path() -> PathBuf {
    match std::env::var("DOSEWATCH_DB") {
        Ok(path) if !path.is_empty() => PathBuf::from(path),
        _ => app_data_dir().join("dosewatch.db"),
    }
}

/// HTTP bind address. `DOSEWATCH_ADDR` overrides the default.
pub fn bind_addr() -> SocketAddr {
    std::env::var("DOSEWATCH_ADDR")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or_else(|| {
            DEFAULT_BIND_ADDR
                .parse()
                .expect("default bind address is valid")
        })
}

/// Whether the in-process notification poller runs alongside the HTTP API.
///
/// The poller and the HTTP poll endpoint consume the same AnnouncedSet, so a
/// deployment runs one or the other as the announcing consumer. Off unless
/// `DOSEWATCH_POLLER` is set.
pub fn poller_enabled() -> bool {
    std::env::var("DOSEWATCH_POLLER")
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false)
}

/// The due-dose grace duration as a chrono `Duration`.
pub fn grace() -> chrono::Duration {
    chrono::Duration::seconds(GRACE_SECS)
}

pub fn default_log_filter() -> String {
    format!("info,{}=info", env!("CARGO_PKG_NAME"))
}
