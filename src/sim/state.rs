//! Game state and core simulation types
//!
//! The whole mutable world lives in [`GameState`], owned by the driver and
//! passed by reference into each phase of a tick.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::consts::LASER_MUZZLE;
use crate::{Playfield, disc_area, heading};

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Playing,
    /// Ship collided with an asteroid; terminal until restart
    GameOver,
}

/// How an asteroid left play during the current tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AsteroidFate {
    Alive,
    /// Broken by an asteroid impact (fragments already spawned)
    Shattered,
    /// Destroyed by a laser (split happens at compaction)
    Shot,
}

/// Notable things that happened during a tick (for logging and the host)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Asteroid broke in an asteroid impact
    AsteroidShattered { id: u32, fragments: usize },
    /// Asteroid destroyed by a laser; `split` if it left two halves behind
    AsteroidShot { id: u32, split: bool },
    /// Ship touched an asteroid
    ShipDestroyed { by: u32 },
    /// Every asteroid is gone; `level` is the level just finished
    LevelCleared { level: u32 },
}

/// A laser bolt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Laser {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Cumulative distance traveled
    pub dist: f32,
    pub alive: bool,
}

/// The player's ship
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ship {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Facing angle (radians, counter-clockwise on screen)
    pub angle: f32,
    pub radius: f32,
    /// Whether thrust was applied this tick (cosmetic)
    pub thrusting: bool,
    /// Active lasers (never more than `Config::laser_max`)
    pub lasers: Vec<Laser>,
}

impl Ship {
    /// Ship at rest in the middle of the field, pointing up
    pub fn new(field: &Playfield, radius: f32) -> Self {
        Self {
            pos: field.center(),
            vel: Vec2::ZERO,
            angle: std::f32::consts::FRAC_PI_2,
            radius,
            thrusting: false,
            lasers: Vec::new(),
        }
    }

    /// Point where lasers leave the ship
    pub fn nose(&self) -> Vec2 {
        self.pos + heading(self.angle) * (LASER_MUZZLE * self.radius)
    }

    /// Fire a laser from the nose if under the cap. Returns whether one was fired.
    pub fn fire(&mut self, config: &Config) -> bool {
        if self.lasers.len() >= config.laser_max {
            return false;
        }
        self.lasers.push(Laser {
            pos: self.nose(),
            vel: heading(self.angle) * config.laser_spd,
            dist: 0.0,
            alive: true,
        });
        true
    }
}

/// An asteroid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Asteroid {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    /// Silhouette rotation (static, asteroids do not spin)
    pub angle: f32,
    /// Per-vertex radius multipliers defining the silhouette
    pub jag: Vec<f32>,
    /// Impact energy needed to break this asteroid
    pub fragility: f32,
    pub fate: AsteroidFate,
}

impl Asteroid {
    /// Asteroid with a fresh random silhouette
    pub fn new(
        id: u32,
        pos: Vec2,
        vel: Vec2,
        radius: f32,
        fragility: f32,
        config: &Config,
        rng: &mut impl Rng,
    ) -> Self {
        let vertices = rng.random_range(config.asteroid_vertices.min..=config.asteroid_vertices.max);
        let jag = (0..vertices)
            .map(|_| 1.0 - config.asteroid_jag + rng.random::<f32>() * config.asteroid_jag * 2.0)
            .collect();
        Self {
            id,
            pos,
            vel,
            radius,
            angle: rng.random::<f32>() * std::f32::consts::TAU,
            jag,
            fragility,
            fate: AsteroidFate::Alive,
        }
    }

    /// Mass is the disc area
    #[inline]
    pub fn mass(&self) -> f32 {
        disc_area(self.radius)
    }

    /// Alive asteroids are the only ones drawn or collided against
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.fate == AsteroidFate::Alive && self.radius > 0.0
    }
}

/// Complete game state
#[derive(Debug, Clone)]
pub struct GameState {
    pub config: Config,
    pub field: Playfield,
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Current level (1-based)
    pub level: u32,
    pub score: u64,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub ship: Ship,
    /// Asteroids in play (may hold dead entries mid-tick, compacted at tick end)
    pub asteroids: Vec<Asteroid>,
    /// Next entity ID
    next_id: u32,
}

impl GameState {
    /// Create a new game at level 1 with the given seed
    ///
    /// `config` must already have passed [`Config::validate`]; an empty
    /// vertex range, for one, panics on the first spawn.
    pub fn new(config: Config, field: Playfield, seed: u64) -> Self {
        let ship = Ship::new(&field, config.ship_radius);
        let mut state = Self {
            config,
            field,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            ship,
            asteroids: Vec::new(),
            next_id: 1,
        };
        state.spawn_level();
        state
    }

    /// Empty field for hand-built scenarios (no level asteroids)
    pub fn empty(config: Config, field: Playfield, seed: u64) -> Self {
        let ship = Ship::new(&field, config.ship_radius);
        Self {
            config,
            field,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            level: 1,
            score: 0,
            time_ticks: 0,
            phase: GamePhase::Playing,
            ship,
            asteroids: Vec::new(),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reset score and level and start over with a new ship
    pub fn restart(&mut self, seed: u64) {
        *self = Self::new(self.config.clone(), self.field, seed);
    }

    /// Draw a fragility for a brand-new (non-fragment) asteroid
    pub fn roll_fragility(&mut self) -> f32 {
        let range = self.config.fragility;
        if range.max > range.min {
            self.rng.random_range(range.min..=range.max)
        } else {
            range.min
        }
    }

    /// Random drift velocity for a newly spawned asteroid, scaled by level
    pub fn roll_drift(&mut self) -> Vec2 {
        let speed = self.config.asteroid_speed * (1.0 + 0.1 * self.level as f32);
        let axis = |rng: &mut Pcg32| {
            let sign = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
            rng.random::<f32>() * speed * sign
        };
        let vx = axis(&mut self.rng);
        let vy = axis(&mut self.rng);
        Vec2::new(vx, vy)
    }

    /// Build a freshly shaped, drifting asteroid (not yet in the field)
    pub fn make_asteroid(&mut self, pos: Vec2, radius: f32, fragility: f32) -> Asteroid {
        let id = self.next_entity_id();
        let vel = self.roll_drift();
        Asteroid::new(id, pos, vel, radius, fragility, &self.config, &mut self.rng)
    }

    /// Add a freshly shaped asteroid to the field
    pub fn spawn_asteroid(&mut self, pos: Vec2, radius: f32, fragility: f32) -> u32 {
        let asteroid = self.make_asteroid(pos, radius, fragility);
        let id = asteroid.id;
        self.asteroids.push(asteroid);
        id
    }

    /// Fill the field with `asteroid_num + level` asteroids, keeping clear of the ship
    pub fn spawn_level(&mut self) {
        const MAX_PLACEMENT_TRIES: u32 = 64;

        let count = self.config.asteroid_num + self.level;
        let radius = self.config.asteroid_radius();
        let clearance = self.config.spawn_clearance();
        log::info!("Level {}: spawning {} asteroids", self.level, count);

        for _ in 0..count {
            let mut pos = None;
            for _ in 0..MAX_PLACEMENT_TRIES {
                let candidate = Vec2::new(
                    (self.rng.random::<f32>() * self.field.width).floor(),
                    (self.rng.random::<f32>() * self.field.height).floor(),
                );
                if candidate.distance(self.ship.pos) >= clearance {
                    pos = Some(candidate);
                    break;
                }
            }
            // Tiny fields: take the point farthest from the ship on the torus
            let pos = pos.unwrap_or_else(|| self.far_side_of_ship());
            let fragility = self.roll_fragility();
            self.spawn_asteroid(pos, radius, fragility);
        }
    }

    fn far_side_of_ship(&self) -> Vec2 {
        let half = Vec2::new(self.field.width, self.field.height) / 2.0;
        let p = self.ship.pos + half;
        Vec2::new(
            p.x.rem_euclid(self.field.width),
            p.y.rem_euclid(self.field.height),
        )
    }
}
