use std::time::Duration;

/// Fixed path of the signals endpoint, relative to the base URL.
pub const SIGNALS_PATH: &str = "/get_latest_signals";

#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    pub base_url: String,
    /// Seconds until the session reloads
    pub countdown_secs: i64,
    pub tick_ms: u64,
    /// 0 disables the request timeout
    pub fetch_timeout_secs: u64,
    pub html_snapshot: Option<String>,
    /// 0 runs sessions forever
    pub max_sessions: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            countdown_secs: 180,
            tick_ms: 1000,
            fetch_timeout_secs: 0,
            html_snapshot: None,
            max_sessions: 0,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let d = Self::default();
        Self {
            base_url: lookup("DASHBOARD_BASE_URL").unwrap_or(d.base_url),
            countdown_secs: lookup("DASHBOARD_COUNTDOWN_SECS").and_then(|v| v.parse().ok()).unwrap_or(d.countdown_secs),
            tick_ms: lookup("DASHBOARD_TICK_MS").and_then(|v| v.parse().ok()).filter(|ms| *ms > 0).unwrap_or(d.tick_ms),
            fetch_timeout_secs: lookup("DASHBOARD_FETCH_TIMEOUT_SECS").and_then(|v| v.parse().ok()).unwrap_or(d.fetch_timeout_secs),
            html_snapshot: lookup("DASHBOARD_HTML_SNAPSHOT").filter(|p| !p.trim().is_empty()),
            max_sessions: lookup("DASHBOARD_MAX_SESSIONS").and_then(|v| v.parse().ok()).unwrap_or(d.max_sessions),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    pub fn fetch_timeout(&self) -> Option<Duration> {
        match self.fetch_timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        }
    }
}
