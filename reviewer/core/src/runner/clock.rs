//! Animation Clock
//!
//! A one-shot timer that the runner re-arms after every consumed tick.
//! Because at most one tick is ever pending, disarming it at the terminal
//! transition guarantees no straggler tick reaches the loop afterwards.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::events::Event;

/// Default interval between animation frames
pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_millis(200);

/// Re-armable single-shot tick source
pub struct AnimationClock {
    interval: Duration,
    events: mpsc::Sender<Event>,
    pending: Option<JoinHandle<()>>,
}

impl AnimationClock {
    /// Create a disarmed clock that will send ticks on `events`
    #[must_use]
    pub fn new(interval: Duration, events: mpsc::Sender<Event>) -> Self {
        Self {
            interval,
            events,
            pending: None,
        }
    }

    /// Schedule the next tick, replacing any tick still pending
    pub fn arm(&mut self) {
        self.disarm();

        let events = self.events.clone();
        let interval = self.interval;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(interval).await;
            // Receiver gone means the run is over
            let _ = events.send(Event::Tick(Instant::now())).await;
        }));
    }

    /// Cancel the pending tick, if any
    pub fn disarm(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    /// Whether a tick is scheduled and has not fired yet
    #[must_use]
    pub fn is_armed(&self) -> bool {
        self.pending
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for AnimationClock {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_per_arm() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut clock = AnimationClock::new(DEFAULT_TICK_INTERVAL, tx);

        clock.arm();
        assert!(clock.is_armed());

        let start = Instant::now();
        let event = rx.recv().await.expect("tick");
        assert!(matches!(event, Event::Tick(_)));
        assert!(start.elapsed() >= DEFAULT_TICK_INTERVAL);

        // Not self-perpetuating: nothing else arrives until re-armed
        tokio::time::sleep(DEFAULT_TICK_INTERVAL * 5).await;
        assert!(rx.try_recv().is_err());
        assert!(!clock.is_armed());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_prevents_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut clock = AnimationClock::new(Duration::from_millis(50), tx);

        clock.arm();
        clock.disarm();
        assert!(!clock.is_armed());

        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_tick() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut clock = AnimationClock::new(Duration::from_millis(100), tx);

        clock.arm();
        clock.arm();
        clock.arm();

        tokio::time::sleep(Duration::from_millis(350)).await;
        let mut ticks = 0;
        while rx.try_recv().is_ok() {
            ticks += 1;
        }
        assert_eq!(ticks, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_disarms() {
        let (tx, mut rx) = mpsc::channel(8);
        {
            let mut clock = AnimationClock::new(Duration::from_millis(10), tx);
            clock.arm();
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.recv().await.is_none());
    }
}
