// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Clock abstraction for testable time handling.
//!
//! The engine measures event time in monotonic seconds (spec §3's `Event.time`).
//! Tests substitute [`FakeClock`] to make rule-runner polling deterministic.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A clock that provides monotonic seconds since some fixed origin.
pub trait Clock: Clone + Send + Sync + 'static {
    fn now(&self) -> Instant;

    /// Monotonic seconds, suitable for stamping `Event::time`.
    fn monotonic_secs(&self) -> f64;
}

/// Real system clock.
#[derive(Clone, Default)]
pub struct SystemClock {
    origin: Option<Instant>,
}

impl SystemClock {
    pub fn new() -> Self {
        Self { origin: Some(Instant::now()) }
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn monotonic_secs(&self) -> f64 {
        let origin = self.origin.unwrap_or_else(Instant::now);
        Instant::now().saturating_duration_since(origin).as_secs_f64()
    }
}

/// Fake clock for testing with controllable, steppable time.
#[derive(Clone)]
pub struct FakeClock {
    current: Arc<Mutex<Instant>>,
    origin: Arc<Mutex<Instant>>,
}

impl FakeClock {
    pub fn new() -> Self {
        let now = Instant::now();
        Self { current: Arc::new(Mutex::new(now)), origin: Arc::new(Mutex::new(now)) }
    }

    /// Advance the clock by the given duration.
    pub fn advance(&self, duration: Duration) {
        *self.current.lock() += duration;
    }
}

impl Default for FakeClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for FakeClock {
    fn now(&self) -> Instant {
        *self.current.lock()
    }

    fn monotonic_secs(&self) -> f64 {
        let origin = *self.origin.lock();
        self.now().saturating_duration_since(origin).as_secs_f64()
    }
}

#[cfg(test)]
#[path = "clock_tests.rs"]
mod tests;
