//! Shatterfield - A wrap-around asteroid field arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, fragmentation, game state)
//! - `driver`: Fixed-timestep frame loop around the simulation
//! - `input`: Key state and one-shot fire latch fed into each tick
//! - `config`: Tunable game constants
//! - `highscores`: Leaderboard with pluggable storage
//! - `web`: Browser bindings (wasm32 only)

pub mod config;
pub mod driver;
pub mod error;
pub mod highscores;
pub mod input;
pub mod sim;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use config::{BreakRule, Config, FragilityRange};
pub use driver::{Driver, FrameClock, FrameOutcome, SkipReason, Surface};
pub use error::{ConfigError, LeaderboardError};
pub use highscores::{Leaderboard, ScoreEntry, ScoreSubmission};
pub use input::{Control, Controls};

use glam::Vec2;

/// Fixed game rules (not exposed through `Config`)
pub mod consts {
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame the driver will try to catch up on (seconds)
    pub const MAX_FRAME_SECS: f32 = 0.1;

    /// Playfield used when the host does not report a surface size
    pub const DEFAULT_FIELD_WIDTH: f32 = 800.0;
    pub const DEFAULT_FIELD_HEIGHT: f32 = 600.0;

    /// Score awarded for each laser hit
    pub const SHOT_SCORE: u64 = 100;
    /// Shot asteroids larger than this split into two halves
    pub const SHOT_SPLIT_RADIUS: f32 = 20.0;

    /// Fragments smaller than this are discarded
    pub const MIN_FRAGMENT_RADIUS: f32 = 5.0;
    /// A body hit by something this many times heavier is obliterated
    pub const OBLITERATE_MASS_RATIO: f32 = 2.5;
    /// Fragment radius jitter (fraction of the nominal radius)
    pub const FRAGMENT_JITTER: f32 = 0.2;
    /// Fraction of the overlap removed per tick by positional correction
    pub const SEPARATION_FACTOR: f32 = 0.5;
    /// Fragment scatter speed = SCATTER_SCALE * sqrt(energy) / parent radius
    pub const SCATTER_SCALE: f32 = 1.0;

    /// Laser muzzle distance ahead of the ship center, in ship radii
    pub const LASER_MUZZLE: f32 = 4.0 / 3.0;
}

/// Playfield dimensions (from the drawing surface)
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Playfield {
    pub width: f32,
    pub height: f32,
}

impl Default for Playfield {
    fn default() -> Self {
        Self {
            width: consts::DEFAULT_FIELD_WIDTH,
            height: consts::DEFAULT_FIELD_HEIGHT,
        }
    }
}

impl Playfield {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Wrap a position onto the torus, keeping `margin` of the body off-screen
    /// before it re-enters on the opposite edge
    #[inline]
    pub fn wrap(&self, pos: Vec2, margin: f32) -> Vec2 {
        Vec2::new(
            wrap_axis(pos.x, self.width, margin),
            wrap_axis(pos.y, self.height, margin),
        )
    }
}

/// Wrap a single coordinate: past `bound + margin` re-enters at `-margin` and
/// vice versa
#[inline]
pub fn wrap_axis(value: f32, bound: f32, margin: f32) -> f32 {
    if value > bound + margin {
        -margin
    } else if value < -margin {
        bound + margin
    } else {
        value
    }
}

/// Unit heading in screen space (y points down, so angles turn counter-clockwise)
#[inline]
pub fn heading(angle: f32) -> Vec2 {
    Vec2::new(angle.cos(), -angle.sin())
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Convert polar (r, theta) to a cartesian offset
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Area of a disc, used as the mass of a body
#[inline]
pub fn disc_area(radius: f32) -> f32 {
    std::f32::consts::PI * radius * radius
}
