//! # Comets
//!
//! Bonus comets that streak across the board at random intervals.
//!
//! The spawner is a repeating poll timer. Each time it fires it checks whether
//! the randomly drawn launch time has passed. Spawning stops for good once the
//! game is won or the catch cap is reached. The rules that touch the session
//! (points, caps, completion) live in `GameState`; this module holds the comet
//! bookkeeping.

use crate::game::{new_comet_id, CometId, Scheduler, TimerHandle, TimerKind};
use rand::rngs::StdRng;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Which way a comet crosses the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CometDirection {
    LeftToRight,
    RightToLeft,
}

impl CometDirection {
    pub fn random(rng: &mut StdRng) -> Self {
        if rng.gen_bool(0.5) {
            CometDirection::LeftToRight
        } else {
            CometDirection::RightToLeft
        }
    }
}

/// A comet in flight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comet {
    pub id: CometId,
    pub direction: CometDirection,
    pub launched_at: Duration,
    pub expires_at: Duration,
    #[serde(skip)]
    pub(crate) expiry: Option<TimerHandle>,
}

impl Comet {
    /// Flight progress in `[0, 1]` at game time `now`.
    pub fn progress(&self, now: Duration) -> f32 {
        let total = self.expires_at.saturating_sub(self.launched_at).as_secs_f32();
        if total <= 0.0 {
            return 1.0;
        }
        (now.saturating_sub(self.launched_at).as_secs_f32() / total).clamp(0.0, 1.0)
    }
}

/// Comet spawner state and the comets currently in flight.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CometSystem {
    pub active: Vec<Comet>,
    /// Game time at which the next comet may launch
    pub next_spawn_at: Duration,
    /// Total comets launched this session
    pub launched: u32,
    #[serde(skip)]
    pub(crate) poll: Option<TimerHandle>,
}

impl CometSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the poll timer is armed.
    pub fn is_running(&self) -> bool {
        self.poll.is_some()
    }

    /// Draws the next launch time, uniformly within `max_delay` of `now`.
    pub fn schedule_next_spawn(&mut self, now: Duration, max_delay: Duration, rng: &mut StdRng) {
        let delay_ms = rng.gen_range(0..=max_delay.as_millis() as u64);
        self.next_spawn_at = now + Duration::from_millis(delay_ms);
    }

    /// Arms the repeating poll timer and draws the first launch time.
    pub(crate) fn start(
        &mut self,
        now: Duration,
        poll_interval: Duration,
        max_delay: Duration,
        scheduler: &mut Scheduler,
        rng: &mut StdRng,
    ) {
        if self.is_running() {
            return;
        }
        self.schedule_next_spawn(now, max_delay, rng);
        self.poll = Some(scheduler.schedule_after(now, poll_interval, TimerKind::CometPoll));
    }

    /// Stops the poll timer for good.
    pub(crate) fn stop(&mut self, scheduler: &mut Scheduler) {
        if let Some(handle) = self.poll.take() {
            scheduler.cancel(handle);
        }
    }

    /// Launches a comet and arms its expiry timer.
    pub(crate) fn launch(
        &mut self,
        now: Duration,
        flight: Duration,
        scheduler: &mut Scheduler,
        rng: &mut StdRng,
    ) -> &Comet {
        let id = new_comet_id();
        let expiry = scheduler.schedule_after(now, flight, TimerKind::CometExpiry(id));
        self.launched += 1;
        self.active.push(Comet {
            id,
            direction: CometDirection::random(rng),
            launched_at: now,
            expires_at: now + flight,
            expiry: Some(expiry),
        });
        &self.active[self.active.len() - 1]
    }

    /// Removes a comet from flight, cancelling its expiry timer.
    pub(crate) fn remove(&mut self, id: CometId, scheduler: &mut Scheduler) -> Option<Comet> {
        let index = self.active.iter().position(|c| c.id == id)?;
        let comet = self.active.remove(index);
        if let Some(handle) = comet.expiry {
            scheduler.cancel(handle);
        }
        Some(comet)
    }

    /// Removes every comet in flight.
    pub(crate) fn clear(&mut self, scheduler: &mut Scheduler) {
        for comet in self.active.drain(..) {
            if let Some(handle) = comet.expiry {
                scheduler.cancel(handle);
            }
        }
    }

    pub fn get(&self, id: CometId) -> Option<&Comet> {
        self.active.iter().find(|c| c.id == id)
    }
}
