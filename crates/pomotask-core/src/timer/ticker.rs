//! Repeating tick source for the timer engine.
//!
//! At most one tick registration is alive per `Ticker`: scheduling again
//! cancels the previous one, and `cancel()` aborts the registration before
//! returning. The engine ignores ticks while stopped, so a tick already in
//! flight when the host stops the timer cannot move the countdown.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::trace;

#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `on_tick` every `period`, starting one period from now.
    ///
    /// Must be called from within a tokio runtime.
    pub fn schedule<F>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.cancel();
        let handle = tokio::spawn(async move {
            let mut ticks = interval(period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick of a tokio interval completes immediately.
            ticks.tick().await;
            loop {
                ticks.tick().await;
                trace!("tick");
                on_tick();
            }
        });
        self.handle = Some(handle);
    }

    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
