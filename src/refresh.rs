use anyhow::Result;

use crate::client::SignalSource;
use crate::logging::{self, obj, v_int, v_str, Domain};
use crate::payload::SignalsPayload;
use crate::render::{build_rows, RenderTarget};
use crate::scheduler::Clock;
use crate::styling::{apply_badge_styling, apply_signal_badge_styling};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    Updated {
        top_coins: usize,
        active_signals: usize,
    },
    Failed,
}

impl RefreshOutcome {
    pub fn is_updated(&self) -> bool {
        matches!(self, RefreshOutcome::Updated { .. })
    }
}

/// One full refresh: show loading, fetch, render or keep stale rows, hide
/// loading. The fetch error never leaves this function.
pub async fn refresh_signals<S, T>(source: &S, target: &mut T, clock: &dyn Clock) -> RefreshOutcome
where
    S: SignalSource + ?Sized,
    T: RenderTarget + ?Sized,
{
    begin_refresh(target);
    let result = source.fetch_signals().await;
    finish_refresh(target, result, clock)
}

/// Shows the loading indicator. Pair with exactly one `finish_refresh`.
pub fn begin_refresh<T: RenderTarget + ?Sized>(target: &mut T) {
    target.set_loading(true);
    target.commit();
}

/// Applies a fetch result and hides the loading indicator on every path.
pub fn finish_refresh<T: RenderTarget + ?Sized>(
    target: &mut T,
    result: Result<SignalsPayload>,
    clock: &dyn Clock,
) -> RefreshOutcome {
    let outcome = match result {
        Ok(payload) => render_payload(target, &payload, clock),
        Err(err) => {
            logging::error(
                Domain::Fetch,
                "refresh_failed",
                obj(&[("msg", v_str(&format!("{:#}", err)))]),
            );
            RefreshOutcome::Failed
        }
    };
    target.set_loading(false);
    target.commit();
    outcome
}

fn render_payload<T: RenderTarget + ?Sized>(
    target: &mut T,
    payload: &SignalsPayload,
    clock: &dyn Clock,
) -> RefreshOutcome {
    // Build everything first so the target is only touched once rows exist.
    let rows = build_rows(payload);
    let top_coins = rows.top_coins.len();
    let active_signals = rows.active_signals.len();

    target.top_coins().replace(rows.top_coins);
    target.active_signals().replace(rows.active_signals);
    let badges = apply_badge_styling(target);
    let signals = apply_signal_badge_styling(target);

    let stamp = clock.timestamp();
    target.set_last_updated(&stamp);

    logging::info(
        Domain::Render,
        "refreshed",
        obj(&[
            ("top_coins", v_int(top_coins as i64)),
            ("active_signals", v_int(active_signals as i64)),
            ("styled_badges", v_int(badges as i64)),
            ("styled_signals", v_int(signals as i64)),
            ("last_updated", v_str(&stamp)),
        ]),
    );

    RefreshOutcome::Updated {
        top_coins,
        active_signals,
    }
}
