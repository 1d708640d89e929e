use anyhow::Result;
use std::path::PathBuf;

use signaldash::client::{HttpSignalSource, SignalSource};
use signaldash::config::Config;
use signaldash::logging::{self, obj, v_int, v_str, Domain};
use signaldash::scheduler::{IntervalTicker, SystemClock};
use signaldash::session::run_sessions;
use signaldash::terminal::TerminalTarget;

#[tokio::main]
async fn main() -> Result<()> {
    let cfg = Config::from_env();
    let source = HttpSignalSource::from_config(&cfg)?;

    logging::info(
        Domain::System,
        "startup",
        obj(&[
            ("url", v_str(&source.describe())),
            ("countdown_secs", v_int(cfg.countdown_secs)),
            ("tick_ms", v_int(cfg.tick_ms as i64)),
            ("html_snapshot", v_str(cfg.html_snapshot.as_deref().unwrap_or(""))),
        ]),
    );

    let snapshot = cfg.html_snapshot.as_ref().map(PathBuf::from);
    let sessions = run_sessions(
        &source,
        &SystemClock,
        cfg.countdown_secs,
        cfg.max_sessions,
        || TerminalTarget::stdout(source.describe(), snapshot.clone()),
        || IntervalTicker::new(cfg.tick_interval()),
    )
    .await;

    logging::info(Domain::System, "shutdown", obj(&[("sessions", v_int(sessions as i64))]));
    Ok(())
}
