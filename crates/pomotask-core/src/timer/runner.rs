//! Host loop around the engine: one ticker, phase alerts, XP credit.

use std::future::Future;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::engine::TimerEngine;
use super::phase::Phase;
use super::ticker::Ticker;
use crate::events::Event;
use crate::notify::PhaseAlerts;
use crate::storage::KeyValueStore;
use crate::xp::{self, XpProgress};

const TICK: Duration = Duration::from_secs(1);

/// What happened at one phase boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct PhaseOutcome {
    pub from: Phase,
    pub to: Phase,
    pub session_index: u32,
    /// Updated XP when the finished phase was a focus phase.
    pub xp: Option<XpProgress>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunOutcome {
    pub completed: Vec<PhaseOutcome>,
    /// The shutdown future fired before the run ended on its own.
    pub interrupted: bool,
}

pub struct CycleRunner<S> {
    engine: TimerEngine,
    alerts: PhaseAlerts,
    store: S,
    autoplay: bool,
}

impl<S: KeyValueStore> CycleRunner<S> {
    pub fn new(engine: TimerEngine, alerts: PhaseAlerts, store: S) -> Self {
        Self {
            engine,
            alerts,
            store,
            autoplay: false,
        }
    }

    /// Start the next phase automatically after each boundary.
    pub fn with_autoplay(mut self, autoplay: bool) -> Self {
        self.autoplay = autoplay;
        self
    }

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut TimerEngine {
        &mut self.engine
    }

    pub fn into_engine(self) -> TimerEngine {
        self.engine
    }

    /// Advance the engine by one second and handle a phase boundary.
    ///
    /// The alert is announced after the engine has moved to the new phase.
    /// A finished focus phase is credited with XP; a failure to persist it
    /// is logged and does not affect the timer.
    pub fn tick(&mut self) -> Option<PhaseOutcome> {
        let Event::PhaseCompleted {
            from,
            to,
            completed_secs,
            session_index,
            alert,
            ..
        } = self.engine.tick()?
        else {
            return None;
        };

        self.alerts.announce(&alert);

        let xp = if from == Phase::Focus {
            match xp::award_focus(&self.store, completed_secs / 60) {
                Ok(progress) => Some(progress),
                Err(e) => {
                    warn!(error = %e, "failed to record focus XP");
                    None
                }
            }
        } else {
            None
        };

        Some(PhaseOutcome {
            from,
            to,
            session_index,
            xp,
        })
    }

    /// Run the timer until a phase ends (or, with autoplay, until
    /// `max_phases` boundaries have passed) or `shutdown` resolves.
    ///
    /// `render` is called once up front and after every tick. On shutdown
    /// the engine is stopped with its remaining time intact.
    pub async fn run<F, R>(&mut self, max_phases: Option<u32>, shutdown: F, mut render: R) -> RunOutcome
    where
        F: Future<Output = ()>,
        R: FnMut(&TimerEngine),
    {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut ticker = Ticker::new();
        let mut outcome = RunOutcome::default();
        tokio::pin!(shutdown);

        if let Some(event) = self.engine.start() {
            debug!(?event, "run started");
        }
        ticker.schedule(TICK, move || {
            let _ = tx.send(());
        });
        render(&self.engine);

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    ticker.cancel();
                    self.engine.stop();
                    outcome.interrupted = true;
                    break;
                }
                Some(()) = rx.recv() => {
                    let Some(phase) = self.tick() else {
                        render(&self.engine);
                        continue;
                    };
                    outcome.completed.push(phase);
                    let limit_reached = max_phases
                        .is_some_and(|n| outcome.completed.len() >= n as usize);
                    if !self.autoplay || limit_reached {
                        ticker.cancel();
                        render(&self.engine);
                        break;
                    }
                    self.engine.start();
                    render(&self.engine);
                }
                else => break,
            }
        }
        outcome
    }
}
