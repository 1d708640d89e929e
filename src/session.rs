//! One dashboard session: initial refresh, countdown, reload.
//!
//! A session is what a single page load was in the browser. It ends when the
//! countdown runs out; the caller then starts a fresh session against a fresh
//! render target. A fetch still in flight at that point is dropped.

use crate::client::SignalSource;
use crate::logging::{self, obj, v_int, v_str, Domain};
use crate::refresh::{begin_refresh, finish_refresh, RefreshOutcome};
use crate::render::RenderTarget;
use crate::scheduler::{Clock, Countdown, CountdownTick, Ticker};
use crate::styling::apply_signal_badge_styling;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionReport {
    /// `None` when the fetch was still in flight at reload time.
    pub refresh: Option<RefreshOutcome>,
    pub ticks: u64,
}

impl SessionReport {
    pub fn abandoned_fetch(&self) -> bool {
        self.refresh.is_none()
    }
}

pub async fn run_session<S, T, K>(
    source: &S,
    target: &mut T,
    ticker: &mut K,
    clock: &dyn Clock,
    countdown_secs: i64,
) -> SessionReport
where
    S: SignalSource + ?Sized,
    T: RenderTarget + ?Sized,
    K: Ticker + ?Sized,
{
    logging::info(
        Domain::System,
        "session_start",
        obj(&[
            ("source", v_str(&source.describe())),
            ("countdown_secs", v_int(countdown_secs)),
        ]),
    );

    begin_refresh(target);
    let fetch = source.fetch_signals();
    tokio::pin!(fetch);

    let mut countdown = Countdown::new(countdown_secs);
    target.set_countdown(countdown.remaining());
    // Second signal pass at startup; harmless because the pass is idempotent.
    apply_signal_badge_styling(target);
    target.commit();

    let mut refresh = None;
    let mut ticks = 0u64;
    loop {
        tokio::select! {
            biased;
            result = &mut fetch, if refresh.is_none() => {
                refresh = Some(finish_refresh(target, result, clock));
            }
            _ = ticker.tick() => {
                ticks += 1;
                match countdown.tick() {
                    CountdownTick::Remaining(left) => {
                        target.set_countdown(left);
                        target.commit();
                    }
                    CountdownTick::Reload => {
                        target.set_countdown(countdown.remaining());
                        target.commit();
                        break;
                    }
                }
            }
        }
    }

    if refresh.is_none() {
        logging::warn(
            Domain::Fetch,
            "refresh_abandoned",
            obj(&[("msg", v_str("fetch still in flight at reload"))]),
        );
    }
    logging::info(Domain::Schedule, "reload", obj(&[("ticks", v_int(ticks as i64))]));

    SessionReport { refresh, ticks }
}

/// Runs sessions back to back, each against a fresh target and ticker.
/// `max_sessions == 0` runs forever. Returns the number of sessions run.
pub async fn run_sessions<S, T, K, FT, FK>(
    source: &S,
    clock: &dyn Clock,
    countdown_secs: i64,
    max_sessions: u64,
    mut new_target: FT,
    mut new_ticker: FK,
) -> u64
where
    S: SignalSource + ?Sized,
    T: RenderTarget,
    K: Ticker,
    FT: FnMut() -> T,
    FK: FnMut() -> K,
{
    let mut sessions = 0u64;
    loop {
        let mut target = new_target();
        let mut ticker = new_ticker();
        run_session(source, &mut target, &mut ticker, clock, countdown_secs).await;
        sessions += 1;
        if max_sessions > 0 && sessions >= max_sessions {
            return sessions;
        }
    }
}
