// SPDX-FileCopyrightText: 2026 Helpdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Minimum spacing between consecutive classifier calls of one run.

use std::time::Duration;

use tokio::time::Instant;

/// Enforces a minimum interval between the starts of consecutive calls.
///
/// The first call never waits.
#[derive(Debug)]
pub struct Pacer {
    interval: Duration,
    next: Option<Instant>,
}

impl Pacer {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next: None,
        }
    }

    /// Waits until the next call may start, then reserves the slot after it.
    pub async fn wait(&mut self) {
        if self.interval.is_zero() {
            return;
        }
        if let Some(next) = self.next {
            tokio::time::sleep_until(next).await;
        }
        self.next = Some(Instant::now() + self.interval);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn first_call_does_not_wait() {
        let mut pacer = Pacer::new(Duration::from_secs(7));
        let started = Instant::now();
        pacer.wait().await;
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn consecutive_calls_are_spaced() {
        let mut pacer = Pacer::new(Duration::from_secs(7));
        let started = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        pacer.wait().await;
        assert_eq!(started.elapsed(), Duration::from_secs(14));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_calls_absorb_the_interval() {
        let mut pacer = Pacer::new(Duration::from_secs(7));
        pacer.wait().await;
        tokio::time::sleep(Duration::from_secs(10)).await;
        let before = Instant::now();
        pacer.wait().await;
        assert_eq!(before.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn zero_interval_never_waits() {
        let mut pacer = Pacer::new(Duration::ZERO);
        let started = Instant::now();
        for _ in 0..5 {
            pacer.wait().await;
        }
        assert_eq!(started.elapsed(), Duration::ZERO);
    }
}
