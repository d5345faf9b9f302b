//! Frame driver
//!
//! Owns the [`GameState`] and turns host frames (variable wall-clock time)
//! into fixed simulation ticks with an accumulator. Each tick consumes one
//! sample of the controls, so one-shot requests are cleared as soon as a tick
//! has seen them. The loop stops itself on game over and on pause.

use crate::Playfield;
use crate::config::Config;
use crate::consts::{MAX_FRAME_SECS, MAX_SUBSTEPS};
use crate::error::ConfigError;
use crate::input::Controls;
use crate::sim::{GameEvent, GamePhase, GameState, Snapshot, tick};

/// Anything that can draw a frame
pub trait Surface {
    fn present(&mut self, snapshot: &Snapshot);
}

/// Surface that keeps the most recent frame (headless runs, wasm bridge)
#[derive(Debug, Default)]
pub struct LatestFrame {
    pub snapshot: Option<Snapshot>,
    pub presented: u64,
}

impl Surface for LatestFrame {
    fn present(&mut self, snapshot: &Snapshot) {
        self.snapshot = Some(snapshot.clone());
        self.presented += 1;
    }
}

/// Why a frame did nothing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No drawable surface yet (canvas missing, window minimized)
    MissingRenderSurface,
    /// Paused or game over
    Stopped,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    Skipped(SkipReason),
    /// `ticks` may be zero when the frame was shorter than one timestep
    Ticked { ticks: u32, events: Vec<GameEvent> },
}

/// Source of frame timing for [`Driver::run`]
pub trait FrameClock {
    /// Block until the next frame and return the seconds since the last one.
    /// `None` ends the loop.
    fn next_frame(&mut self) -> Option<f32>;
}

/// Fixed step clock for headless runs and tests
#[derive(Debug, Clone)]
pub struct FixedClock {
    step: f32,
    remaining: u64,
}

impl FixedClock {
    pub fn new(step: f32, frames: u64) -> Self {
        Self {
            step,
            remaining: frames,
        }
    }
}

impl FrameClock for FixedClock {
    fn next_frame(&mut self) -> Option<f32> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(self.step)
    }
}

/// Wall-clock pacing at a target frame rate
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug)]
pub struct RealtimeClock {
    frame: std::time::Duration,
    last: std::time::Instant,
}

#[cfg(not(target_arch = "wasm32"))]
impl RealtimeClock {
    pub fn new(fps: f32) -> Self {
        Self {
            frame: std::time::Duration::from_secs_f32(1.0 / fps.max(1.0)),
            last: std::time::Instant::now(),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl FrameClock for RealtimeClock {
    fn next_frame(&mut self) -> Option<f32> {
        let since = self.last.elapsed();
        if since < self.frame {
            std::thread::sleep(self.frame - since);
        }
        let now = std::time::Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        Some(elapsed)
    }
}

/// Owns the game and schedules its ticks
#[derive(Debug)]
pub struct Driver {
    state: GameState,
    controls: Controls,
    accumulator: f32,
    running: bool,
}

impl Driver {
    /// Validate `config` and start a game at level 1
    pub fn new(config: Config, field: Playfield, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        log::info!("Starting game with seed {}", seed);
        Ok(Self::from_state(GameState::new(config, field, seed)))
    }

    /// Drive an already built state (tests, custom scenarios)
    pub fn from_state(state: GameState) -> Self {
        let running = state.phase == GamePhase::Playing;
        Self {
            state,
            controls: Controls::new(),
            accumulator: 0.0,
            running,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn controls_mut(&mut self) -> &mut Controls {
        &mut self.controls
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.state)
    }

    pub fn pause(&mut self) {
        if self.running {
            log::info!("Paused at tick {}", self.state.time_ticks);
        }
        self.running = false;
    }

    /// Resume a paused game. A finished game stays stopped until restart.
    pub fn resume(&mut self) {
        if self.state.phase == GamePhase::Playing {
            // Time spent paused is not simulated
            self.accumulator = 0.0;
            self.running = true;
        }
    }

    /// Fresh ship, level 1, score 0
    pub fn restart(&mut self, seed: u64) {
        log::info!("Restarting with seed {}", seed);
        self.state.restart(seed);
        self.controls.clear();
        self.accumulator = 0.0;
        self.running = true;
    }

    /// Advance by one host frame and present the result
    pub fn frame(&mut self, elapsed: f32, surface: Option<&mut dyn Surface>) -> FrameOutcome {
        if !self.running {
            return FrameOutcome::Skipped(SkipReason::Stopped);
        }
        let Some(surface) = surface else {
            return FrameOutcome::Skipped(SkipReason::MissingRenderSurface);
        };

        let dt = self.state.config.dt();
        // NaN or infinite host timings count as an empty frame
        let elapsed = if elapsed.is_finite() {
            elapsed.clamp(0.0, MAX_FRAME_SECS)
        } else {
            0.0
        };
        self.accumulator += elapsed;

        let mut ticks = 0;
        let mut events = Vec::new();
        while self.accumulator >= dt && ticks < MAX_SUBSTEPS {
            let input = self.controls.take_tick_input();
            events.extend(tick(&mut self.state, &input, dt));
            self.accumulator -= dt;
            ticks += 1;

            if self.state.phase == GamePhase::GameOver {
                log::info!(
                    "Game over: score {} at level {}",
                    self.state.score,
                    self.state.level
                );
                self.running = false;
                self.accumulator = 0.0;
                break;
            }
        }

        for event in &events {
            log::debug!("{:?}", event);
        }

        surface.present(&Snapshot::capture(&self.state));
        FrameOutcome::Ticked { ticks, events }
    }

    /// Run frames until the game stops or the clock runs out
    ///
    /// `steer` sees the state before every frame and may change the
    /// controls. Returns the number of ticks simulated.
    pub fn run(
        &mut self,
        clock: &mut impl FrameClock,
        surface: &mut dyn Surface,
        mut steer: impl FnMut(&GameState, &mut Controls),
    ) -> u64 {
        let mut total = 0u64;
        while self.running {
            let Some(elapsed) = clock.next_frame() else {
                break;
            };
            steer(&self.state, &mut self.controls);
            if let FrameOutcome::Ticked { ticks, .. } = self.frame(elapsed, Some(&mut *surface)) {
                total += u64::from(ticks);
            }
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Asteroid, AsteroidFate};
    use glam::Vec2;

    const FRAME: f32 = 1.0 / 60.0;

    fn quiet_state() -> GameState {
        let mut state = GameState::empty(Config::default(), Playfield::default(), 5);
        // One parked rock far from the ship keeps the level from advancing
        let id = state.next_entity_id();
        state.asteroids.push(Asteroid {
            id,
            pos: Vec2::new(40.0, 40.0),
            vel: Vec2::ZERO,
            radius: 10.0,
            angle: 0.0,
            jag: vec![1.0; 8],
            fragility: f32::MAX,
            fate: AsteroidFate::Alive,
        });
        state
    }

    #[test]
    fn test_missing_surface_skips_without_ticking() {
        let mut driver = Driver::from_state(quiet_state());
        let outcome = driver.frame(0.05, None);
        assert_eq!(
            outcome,
            FrameOutcome::Skipped(SkipReason::MissingRenderSurface)
        );
        assert_eq!(driver.state().time_ticks, 0);
    }

    #[test]
    fn test_accumulator_runs_whole_ticks() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();

        // Two and a half timesteps
        match driver.frame(FRAME * 2.5, Some(&mut surface)) {
            FrameOutcome::Ticked { ticks, .. } => assert_eq!(ticks, 2),
            other => panic!("unexpected {:?}", other),
        }
        // Leftover half step plus another half
        match driver.frame(FRAME * 0.5 + 1e-4, Some(&mut surface)) {
            FrameOutcome::Ticked { ticks, .. } => assert_eq!(ticks, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(driver.state().time_ticks, 3);
        assert_eq!(surface.presented, 2);
        assert_eq!(surface.snapshot.as_ref().map(|s| s.tick), Some(3));
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();
        driver.frame(5.0, Some(&mut surface));
        let max = (MAX_FRAME_SECS / FRAME).ceil() as u64;
        assert!(driver.state().time_ticks <= max);
        assert!(driver.state().time_ticks <= u64::from(MAX_SUBSTEPS));
    }

    #[test]
    fn test_non_finite_frames_do_not_poison_the_clock() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();
        for bad in [f32::NAN, f32::INFINITY, f32::NEG_INFINITY] {
            match driver.frame(bad, Some(&mut surface)) {
                FrameOutcome::Ticked { ticks, .. } => assert_eq!(ticks, 0),
                other => panic!("unexpected {:?}", other),
            }
        }
        assert!(driver.accumulator.is_finite());

        match driver.frame(FRAME * 1.5, Some(&mut surface)) {
            FrameOutcome::Ticked { ticks, .. } => assert_eq!(ticks, 1),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(driver.state().time_ticks, 1);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = Config::default();
        config.asteroid_vertices = crate::config::VertexRange { min: 9, max: 3 };
        let result = Driver::new(config, Playfield::default(), 1);
        assert!(matches!(result, Err(ConfigError::OutOfRange { .. })));

        let driver = Driver::new(Config::default(), Playfield::default(), 1).unwrap();
        assert!(driver.is_running());
        assert_eq!(driver.state().seed, 1);
    }

    #[test]
    fn test_fire_request_consumed_by_one_tick() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();
        driver.controls_mut().request_fire();

        // Too short for a tick: the shot waits
        driver.frame(FRAME * 0.25, Some(&mut surface));
        assert!(driver.state().ship.lasers.is_empty());

        driver.frame(FRAME * 4.0, Some(&mut surface));
        assert_eq!(driver.state().ship.lasers.len(), 1);
        assert!(!driver.controls_mut().fire_pending());
    }

    #[test]
    fn test_pause_and_resume() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();
        driver.pause();
        assert_eq!(
            driver.frame(FRAME * 3.0, Some(&mut surface)),
            FrameOutcome::Skipped(SkipReason::Stopped)
        );
        assert_eq!(driver.state().time_ticks, 0);

        driver.resume();
        driver.frame(FRAME * 1.5, Some(&mut surface));
        assert_eq!(driver.state().time_ticks, 1);
    }

    #[test]
    fn test_game_over_stops_loop_until_restart() {
        let mut state = quiet_state();
        let pos = state.ship.pos + Vec2::new(30.0, 0.0);
        state.spawn_asteroid(pos, 30.0, f32::MAX);
        let mut driver = Driver::from_state(state);
        let mut surface = LatestFrame::default();

        let mut clock = FixedClock::new(FRAME, 100);
        let ticks = driver.run(&mut clock, &mut surface, |_, _| {});
        assert_eq!(ticks, 1);
        assert!(!driver.is_running());
        assert!(surface.snapshot.as_ref().is_some_and(|s| s.game_over));

        // Resume cannot revive a finished game
        driver.resume();
        assert!(!driver.is_running());

        driver.restart(11);
        assert!(driver.is_running());
        assert_eq!(driver.state().phase, GamePhase::Playing);
        assert_eq!(driver.state().score, 0);
        assert_eq!(driver.state().level, 1);
    }

    #[test]
    fn test_fixed_clock_counts_down() {
        let mut clock = FixedClock::new(0.25, 2);
        assert_eq!(clock.next_frame(), Some(0.25));
        assert_eq!(clock.next_frame(), Some(0.25));
        assert_eq!(clock.next_frame(), None);
    }

    #[test]
    fn test_realtime_clock_paces_frames() {
        let mut clock = RealtimeClock::new(200.0);
        let elapsed = clock.next_frame().unwrap();
        assert!(elapsed >= 0.004);
    }

    #[test]
    fn test_run_ends_with_clock() {
        let mut driver = Driver::from_state(quiet_state());
        let mut surface = LatestFrame::default();
        let mut clock = FixedClock::new(FRAME, 30);
        let mut steered = 0;
        let ticks = driver.run(&mut clock, &mut surface, |_, controls| {
            steered += 1;
            controls.press(crate::input::Control::TurnLeft);
        });
        assert_eq!(steered, 30);
        assert!(ticks >= 29 && ticks <= 30);
        assert!(driver.is_running());
        assert!(driver.state().ship.angle > std::f32::consts::FRAC_PI_2);
    }
}
