//! Session driver
//!
//! Owns the live `GameState` plus everything that outlives a single frame:
//! the spawn clock, delayed actions, and the restart epoch. The host calls
//! `frame` once per animation frame and forwards input samples.
//!
//! Delayed actions remember the epoch they were scheduled under. Restart
//! bumps the epoch, so anything left over from an earlier game is dropped
//! when it comes due.

use crate::consts::MAX_FRAME_DT;
use crate::input::{self, PointerSample};
use crate::layout::{Layout, Viewport};
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, Spawner, tick};
use crate::tuning::Tuning;

/// Things that can be scheduled for later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    /// Switch to the win screen
    DeclareWin,
}

#[derive(Debug, Clone)]
struct Scheduled {
    due: f64,
    session: u32,
    action: TimerAction,
}

/// Simulated clock with one-shot delayed actions
#[derive(Debug, Clone, Default)]
pub struct Timeline {
    now: f64,
    pending: Vec<Scheduled>,
}

impl Timeline {
    /// Seconds advanced so far
    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    pub fn schedule(&mut self, delay_secs: f32, session: u32, action: TimerAction) {
        self.pending.push(Scheduled {
            due: self.now + f64::from(delay_secs),
            session,
            action,
        });
    }

    /// Advance the clock, returning due actions in due order
    pub fn advance(&mut self, dt: f32) -> Vec<(u32, TimerAction)> {
        self.now += f64::from(dt);
        let now = self.now;

        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by(|a, b| a.due.total_cmp(&b.due));
        due.into_iter().map(|s| (s.session, s.action)).collect()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// One player's game, across restarts
#[derive(Debug, Clone)]
pub struct Session {
    state: GameState,
    tuning: Tuning,
    layout: Layout,
    spawner: Spawner,
    timeline: Timeline,
    epoch: u32,
    torn_down: bool,
}

impl Session {
    /// New session on the title screen
    pub fn new(seed: u64, tuning: Tuning, viewport: Viewport) -> Self {
        let layout = Layout::new(&tuning, viewport);
        Self {
            state: GameState::new(seed, 0, viewport.center_x()),
            tuning,
            layout,
            spawner: Spawner::new(),
            timeline: Timeline::default(),
            epoch: 0,
            torn_down: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    pub fn epoch(&self) -> u32 {
        self.epoch
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    /// Leave the title screen. Returns false if already started.
    pub fn start(&mut self) -> bool {
        if self.torn_down || self.state.phase != GamePhase::Ready {
            return false;
        }
        self.state.phase = GamePhase::Running;
        self.spawner.reset();
        log::info!("Game started (session {})", self.epoch);
        true
    }

    /// Throw away the current game and start a fresh one
    ///
    /// The basket stays where the pointer last put it.
    pub fn restart(&mut self, seed: u64) {
        if self.torn_down {
            return;
        }
        self.epoch = self.epoch.wrapping_add(1);
        let basket_x = self.state.basket_x;
        self.state = GameState::new(seed, self.epoch, basket_x);
        self.state.phase = GamePhase::Running;
        self.spawner.reset();
        log::info!("Game restarted (session {}, seed {})", self.epoch, seed);
    }

    /// Advance one animation frame of `dt` seconds
    pub fn frame(&mut self, dt: f32) {
        if self.torn_down {
            return;
        }
        let dt = dt.clamp(0.0, MAX_FRAME_DT);

        for (session, action) in self.timeline.advance(dt) {
            self.fire(session, action);
        }

        self.spawner
            .advance(&mut self.state, &self.tuning, &self.layout, dt);
        tick(&mut self.state, &self.tuning, &self.layout, dt);

        if std::mem::take(&mut self.state.win_requested) {
            self.timeline.schedule(
                self.tuning.win_delay_secs,
                self.state.session,
                TimerAction::DeclareWin,
            );
        }
    }

    /// Forward a pointer/touch sample to the basket
    pub fn pointer(&mut self, sample: PointerSample<'_>) -> bool {
        if self.torn_down {
            return false;
        }
        input::track(&mut self.state, sample)
    }

    /// Viewport changed (rotation, window resize)
    pub fn resize(&mut self, viewport: Viewport) {
        self.layout = Layout::new(&self.tuning, viewport);
    }

    /// Stop everything. Later frames, inputs and timers are ignored.
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.torn_down = true;
        self.timeline.clear();
        log::info!("Session torn down");
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.state.drain_events()
    }

    fn fire(&mut self, session: u32, action: TimerAction) {
        if session != self.state.session {
            log::debug!(
                "Dropping stale {:?} from session {} (now {})",
                action,
                session,
                self.state.session
            );
            return;
        }

        match action {
            TimerAction::DeclareWin => {
                if self.state.phase != GamePhase::Running {
                    log::debug!("Win timer fired in {:?}, ignoring", self.state.phase);
                    return;
                }
                self.state.phase = GamePhase::Won;
                self.state.events.push(GameEvent::Won);
                log::info!("Game won (score {})", self.state.score);
            }
        }
    }
}
