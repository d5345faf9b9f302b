//! Browser bindings
//!
//! The page owns the canvas and the animation-frame loop. Every frame it
//! calls [`WasmGame::frame`] with the elapsed seconds and draws from
//! [`WasmGame::snapshot_json`]. Key events are forwarded as DOM key names.

use wasm_bindgen::prelude::*;

use crate::driver::{Driver, FrameOutcome, LatestFrame, SkipReason, Surface};
use crate::highscores::{Leaderboard, LocalStorageStore, ScoreSubmission};
use crate::input::Control;
use crate::sim::GamePhase;
use crate::{Config, Playfield};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    if console_log::init_with_level(log::Level::Info).is_err() {
        // Logger already installed by an earlier instance
        return;
    }
    log::info!("Shatterfield starting...");
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Game handle owned by the page
#[wasm_bindgen]
pub struct WasmGame {
    driver: Driver,
    /// `None` until the page reports a canvas
    surface: Option<LatestFrame>,
    leaderboard: Leaderboard<LocalStorageStore>,
}

#[wasm_bindgen]
impl WasmGame {
    /// `config_json` may be empty for the default tuning
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f32, height: f32, seed: u64) -> Result<WasmGame, JsValue> {
        let config = if config_json.trim().is_empty() {
            Config::default()
        } else {
            Config::from_json(config_json).map_err(to_js)?
        };
        Ok(Self {
            driver: Driver::new(config, Playfield::new(width, height), seed).map_err(to_js)?,
            surface: None,
            leaderboard: Leaderboard::new(LocalStorageStore::default()),
        })
    }

    /// Canvas is ready; frames start simulating
    pub fn attach_surface(&mut self) {
        self.surface.get_or_insert_with(LatestFrame::default);
    }

    /// Canvas went away (unmounted, context lost); frames are skipped
    pub fn detach_surface(&mut self) {
        self.surface = None;
    }

    /// Advance by one animation frame. Returns the number of ticks run
    /// (0 when skipped).
    pub fn frame(&mut self, elapsed_secs: f32) -> u32 {
        let surface = self.surface.as_mut().map(|s| s as &mut dyn Surface);
        match self.driver.frame(elapsed_secs, surface) {
            FrameOutcome::Ticked { ticks, .. } => ticks,
            FrameOutcome::Skipped(SkipReason::MissingRenderSurface) => {
                log::debug!("Frame skipped: no render surface");
                0
            }
            FrameOutcome::Skipped(SkipReason::Stopped) => 0,
        }
    }

    pub fn key_down(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.driver.controls_mut().press(control);
        }
    }

    pub fn key_up(&mut self, key: &str) {
        if let Some(control) = Control::from_key(key) {
            self.driver.controls_mut().release(control);
        }
    }

    /// Latest presented frame as JSON (current state if nothing was drawn yet)
    pub fn snapshot_json(&self) -> Result<String, JsValue> {
        let snapshot = match self.surface.as_ref().and_then(|s| s.snapshot.as_ref()) {
            Some(snapshot) => serde_json::to_string(snapshot),
            None => serde_json::to_string(&self.driver.snapshot()),
        };
        snapshot.map_err(to_js)
    }

    pub fn score(&self) -> u64 {
        self.driver.state().score
    }

    pub fn level(&self) -> u32 {
        self.driver.state().level
    }

    pub fn is_game_over(&self) -> bool {
        self.driver.state().phase == GamePhase::GameOver
    }

    pub fn pause(&mut self) {
        self.driver.pause();
    }

    pub fn resume(&mut self) {
        self.driver.resume();
    }

    pub fn restart(&mut self, seed: u64) {
        self.driver.restart(seed);
    }

    /// Stored leaderboard as JSON
    pub fn high_scores_json(&self) -> Result<String, JsValue> {
        let entries = self.leaderboard.fetch().map_err(to_js)?;
        serde_json::to_string(&entries).map_err(to_js)
    }

    /// Record the current score under `name`; returns the updated board as JSON
    pub fn submit_score(&mut self, name: &str) -> Result<String, JsValue> {
        let submission = ScoreSubmission::new(name, self.driver.state().score);
        let entries = self.leaderboard.submit(submission).map_err(to_js)?;
        serde_json::to_string(&entries).map_err(to_js)
    }

    /// Rank the current score would reach, or 0 if it misses the board
    pub fn potential_rank(&self) -> Result<u32, JsValue> {
        let rank = self
            .leaderboard
            .potential_rank(self.driver.state().score)
            .map_err(to_js)?;
        Ok(rank.map_or(0, |r| r as u32))
    }
}
