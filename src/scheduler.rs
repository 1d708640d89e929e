//! Time sources and the reload countdown.
//!
//! Wall-clock reads go through `Clock` and the one-second cadence goes
//! through `Ticker`, so sessions can be driven deterministically in tests.

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeZone};
use std::time::Duration;
use tokio::time::{interval_at, Instant, Interval, MissedTickBehavior};

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    /// Text written to the last-updated label.
    fn timestamp(&self) -> String {
        self.now().format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Always reports the same instant.
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    pub fn from_timestamp(secs: i64) -> Option<Self> {
        Local.timestamp_opt(secs, 0).single().map(Self)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}

#[async_trait]
pub trait Ticker: Send {
    /// Resolves once per tick period.
    async fn tick(&mut self);
}

pub struct IntervalTicker {
    interval: Interval,
}

impl IntervalTicker {
    /// First tick lands one period from now, not immediately.
    pub fn new(period: Duration) -> Self {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) {
        self.interval.tick().await;
    }
}

/// Resolves immediately; every call is one simulated period.
#[derive(Debug, Default)]
pub struct InstantTicker {
    pub ticks: u64,
}

#[async_trait]
impl Ticker for InstantTicker {
    async fn tick(&mut self) {
        tokio::task::yield_now().await;
        self.ticks += 1;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Remaining(i64),
    Reload,
}

/// Seconds left until the session reloads.
#[derive(Debug, Clone)]
pub struct Countdown {
    remaining: i64,
    fired: bool,
}

impl Countdown {
    pub fn new(start: i64) -> Self {
        Self {
            remaining: start,
            fired: false,
        }
    }

    pub fn remaining(&self) -> i64 {
        self.remaining
    }

    pub fn has_fired(&self) -> bool {
        self.fired
    }

    /// Decrements once. The first tick at or below zero asks for a reload;
    /// later ticks keep counting down but never ask again.
    pub fn tick(&mut self) -> CountdownTick {
        self.remaining -= 1;
        if self.remaining <= 0 && !self.fired {
            self.fired = true;
            return CountdownTick::Reload;
        }
        CountdownTick::Remaining(self.remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reload_fires_exactly_once_after_start_ticks() {
        let mut countdown = Countdown::new(180);
        let mut reloads = 0;
        let mut last_remaining = None;
        for _ in 0..180 {
            match countdown.tick() {
                CountdownTick::Reload => reloads += 1,
                CountdownTick::Remaining(n) => last_remaining = Some(n),
            }
        }
        assert_eq!(reloads, 1);
        assert_eq!(last_remaining, Some(1));
        assert!(countdown.has_fired());

        // Stragglers after the reload request do not ask again.
        assert_eq!(countdown.tick(), CountdownTick::Remaining(-1));
    }

    #[test]
    fn no_reload_before_zero() {
        let mut countdown = Countdown::new(3);
        assert_eq!(countdown.tick(), CountdownTick::Remaining(2));
        assert_eq!(countdown.tick(), CountdownTick::Remaining(1));
        assert_eq!(countdown.tick(), CountdownTick::Reload);
        assert_eq!(countdown.remaining(), 0);
    }

    #[test]
    fn non_positive_start_reloads_on_first_tick() {
        let mut countdown = Countdown::new(0);
        assert_eq!(countdown.tick(), CountdownTick::Reload);
    }

    #[test]
    fn fixed_clock_timestamp() {
        let clock = FixedClock::from_timestamp(1_700_000_000).unwrap();
        let expected = clock.0.format("%Y-%m-%d %H:%M:%S").to_string();
        assert_eq!(clock.timestamp(), expected);
        assert_eq!(clock.now(), clock.now());
    }

    #[tokio::test]
    async fn instant_ticker_counts() {
        let mut ticker = InstantTicker::default();
        for _ in 0..5 {
            ticker.tick().await;
        }
        assert_eq!(ticker.ticks, 5);
    }
}
