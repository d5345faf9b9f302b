//! Game tuning constants
//!
//! Fixed for the lifetime of a session. Loaded from JSON on native (any
//! missing key falls back to its default) and built from defaults on web.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Uniform range asteroid fragility is drawn from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FragilityRange {
    pub min: f32,
    pub max: f32,
}

/// Inclusive range of polygon vertex counts for asteroid silhouettes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VertexRange {
    pub min: usize,
    pub max: usize,
}

/// Which rule decides whether colliding asteroids break
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BreakRule {
    /// Each asteroid breaks when impact energy reaches its own fragility
    #[default]
    Fragility,
    /// Both asteroids break when impact energy exceeds one global threshold
    Threshold { threshold: f32 },
    /// The lighter asteroid breaks when the other is `ratio` times heavier
    MassRatio { ratio: f32 },
}

/// Colors handed to the renderer (CSS color strings)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: String,
    pub ship: String,
    pub asteroid: String,
    pub laser: String,
    pub text: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: "black".into(),
            ship: "white".into(),
            asteroid: "slategray".into(),
            laser: "white".into(),
            text: "white".into(),
        }
    }
}

/// All tunable constants. Speeds are per second and get integrated with
/// `dt = 1 / fps`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Tick rate (ticks per second)
    pub fps: u32,

    // === Ship ===
    /// Velocity decay per second while not thrusting (0 = frictionless space)
    pub friction: f32,
    /// Thrust acceleration (px/s²)
    pub ship_thrust: f32,
    /// Turn rate (degrees/s)
    pub ship_turn_speed: f32,
    pub ship_radius: f32,

    // === Asteroids ===
    /// Asteroids on level 1 (each level adds one more)
    pub asteroid_num: u32,
    /// Diameter of a level-start asteroid (px)
    pub asteroid_size: f32,
    /// Max speed per axis of a spawned asteroid (px/s)
    pub asteroid_speed: f32,
    /// Silhouette irregularity (0 = circle)
    pub asteroid_jag: f32,
    pub asteroid_vertices: VertexRange,
    pub fragility: FragilityRange,
    pub break_rule: BreakRule,
    /// Bounce elasticity (0 = inelastic, 1 = perfectly elastic)
    pub restitution: f32,

    // === Lasers ===
    pub laser_max: usize,
    /// Laser speed (px/s)
    pub laser_spd: f32,
    /// Max laser travel as a fraction of playfield width
    pub laser_dist: f32,

    pub palette: Palette,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fps: 60,

            friction: 0.0,
            ship_thrust: 30.0,
            ship_turn_speed: 120.0,
            ship_radius: 15.0,

            asteroid_num: 5,
            asteroid_size: 100.0,
            asteroid_speed: 30.0,
            asteroid_jag: 0.4,
            asteroid_vertices: VertexRange { min: 7, max: 16 },
            // Two level-start rocks meeting at ~30 px/s carry ~1.7e6
            fragility: FragilityRange {
                min: 1.0e6,
                max: 4.0e6,
            },
            break_rule: BreakRule::Fragility,
            restitution: 1.0,

            laser_max: 10,
            laser_spd: 500.0,
            laser_dist: 0.6,

            palette: Palette::default(),
        }
    }
}

impl Config {
    /// Seconds per tick
    pub fn dt(&self) -> f32 {
        1.0 / self.fps as f32
    }

    /// Turn rate in radians per second
    pub fn turn_rate(&self) -> f32 {
        self.ship_turn_speed.to_radians()
    }

    /// Radius of a level-start asteroid
    pub fn asteroid_radius(&self) -> f32 {
        (self.asteroid_size / 2.0).ceil()
    }

    /// Minimum distance between the ship and a freshly spawned asteroid
    pub fn spawn_clearance(&self) -> f32 {
        self.asteroid_size * 2.0 + self.ship_radius
    }

    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load a config file, falling back to defaults if it is missing or bad
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Using default config ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Check every constant is inside the range the simulation assumes
    pub fn validate(&self) -> Result<(), ConfigError> {
        unit_interval("friction", self.friction)?;
        unit_interval("asteroid_jag", self.asteroid_jag)?;
        unit_interval("restitution", self.restitution)?;

        if self.fps == 0 {
            return Err(out_of_range("fps", 0.0, "> 0"));
        }
        if self.laser_max == 0 {
            return Err(out_of_range("laser_max", 0.0, "> 0"));
        }
        if self.ship_radius <= 0.0 {
            return Err(out_of_range("ship_radius", self.ship_radius, "> 0"));
        }
        if self.asteroid_size <= 0.0 {
            return Err(out_of_range("asteroid_size", self.asteroid_size, "> 0"));
        }
        if self.fragility.min < 0.0 || self.fragility.min > self.fragility.max {
            return Err(out_of_range(
                "fragility.min",
                self.fragility.min,
                "0 <= min <= fragility.max",
            ));
        }
        if self.asteroid_vertices.min < 3
            || self.asteroid_vertices.min > self.asteroid_vertices.max
        {
            return Err(out_of_range(
                "asteroid_vertices.min",
                self.asteroid_vertices.min as f32,
                "3 <= min <= asteroid_vertices.max",
            ));
        }
        match self.break_rule {
            BreakRule::Threshold { threshold } if threshold <= 0.0 => Err(out_of_range(
                "break_rule.threshold",
                threshold,
                "> 0",
            )),
            BreakRule::MassRatio { ratio } if ratio < 1.0 => {
                Err(out_of_range("break_rule.ratio", ratio, ">= 1"))
            }
            _ => Ok(()),
        }
    }
}

fn unit_interval(name: &'static str, value: f32) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(out_of_range(name, value, "0.0 - 1.0"))
    }
}

fn out_of_range(name: &'static str, value: f32, range: &'static str) -> ConfigError {
    ConfigError::OutOfRange {
        name,
        value: value as f64,
        range,
    }
}
