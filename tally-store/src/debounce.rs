//! Trailing debounce for refresh triggers.
//!
//! Rapid repeated triggers coalesce into a single tick once no trigger has
//! arrived for the quiet period. The session owner drives refreshes from
//! the tick stream; triggering never blocks.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};

pub const DEFAULT_QUIET_PERIOD: Duration = Duration::from_millis(300);

#[derive(Clone)]
pub struct Debouncer {
    tx: mpsc::UnboundedSender<()>,
}

impl Debouncer {
    /// Request a refresh; coalesced with neighbors inside the quiet period.
    pub fn trigger(&self) {
        // Receiver gone means nobody is listening for refreshes anymore.
        let _ = self.tx.send(());
    }
}

pub struct DebouncedTicks {
    rx: mpsc::UnboundedReceiver<()>,
}

impl DebouncedTicks {
    /// Next coalesced tick; `None` once all trigger handles are dropped.
    pub async fn tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }
}

/// Wire a trigger handle to a coalesced tick stream.
pub fn debounced(quiet: Duration) -> (Debouncer, DebouncedTicks) {
    let (trigger_tx, mut trigger_rx) = mpsc::unbounded_channel::<()>();
    let (tick_tx, tick_rx) = mpsc::unbounded_channel::<()>();

    tokio::spawn(async move {
        while trigger_rx.recv().await.is_some() {
            let mut deadline = Instant::now() + quiet;
            loop {
                tokio::select! {
                    _ = sleep_until(deadline) => {
                        if tick_tx.send(()).is_err() {
                            return;
                        }
                        break;
                    }
                    more = trigger_rx.recv() => match more {
                        // Another trigger restarts the quiet period.
                        Some(()) => deadline = Instant::now() + quiet,
                        None => {
                            let _ = tick_tx.send(());
                            return;
                        }
                    },
                }
            }
        }
    });

    (Debouncer { tx: trigger_tx }, DebouncedTicks { rx: tick_rx })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::advance;

    #[tokio::test(start_paused = true)]
    async fn rapid_triggers_coalesce_into_one_tick() {
        let (debouncer, mut ticks) = debounced(DEFAULT_QUIET_PERIOD);

        for _ in 0..5 {
            debouncer.trigger();
            advance(Duration::from_millis(50)).await;
        }
        advance(Duration::from_millis(400)).await;

        assert_eq!(ticks.tick().await, Some(()));
        // No second tick pending.
        advance(Duration::from_millis(400)).await;
        assert!(ticks.rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn separated_triggers_each_produce_a_tick() {
        let (debouncer, mut ticks) = debounced(DEFAULT_QUIET_PERIOD);

        debouncer.trigger();
        advance(Duration::from_millis(400)).await;
        assert_eq!(ticks.tick().await, Some(()));

        debouncer.trigger();
        advance(Duration::from_millis(400)).await;
        assert_eq!(ticks.tick().await, Some(()));
    }

    #[tokio::test(start_paused = true)]
    async fn quiet_period_restarts_on_each_trigger() {
        let (debouncer, mut ticks) = debounced(DEFAULT_QUIET_PERIOD);

        debouncer.trigger();
        advance(Duration::from_millis(200)).await;
        // Still inside the quiet period; this restarts it.
        debouncer.trigger();
        advance(Duration::from_millis(200)).await;
        assert!(ticks.rx.try_recv().is_err(), "tick fired too early");

        advance(Duration::from_millis(200)).await;
        assert_eq!(ticks.tick().await, Some(()));
    }
}
