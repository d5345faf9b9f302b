//! Read-only view of the world handed to renderers once per frame

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Asteroid, GamePhase, GameState};
use crate::polar_to_cartesian;

/// What a renderer needs to draw the ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShipView {
    pub pos: Vec2,
    pub angle: f32,
    pub radius: f32,
    /// Draw the exhaust flame
    pub thrusting: bool,
}

/// What a renderer needs to draw one asteroid
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AsteroidView {
    pub pos: Vec2,
    pub radius: f32,
    pub angle: f32,
    pub jag: Vec<f32>,
}

impl AsteroidView {
    fn of(asteroid: &Asteroid) -> Self {
        Self {
            pos: asteroid.pos,
            radius: asteroid.radius,
            angle: asteroid.angle,
            jag: asteroid.jag.clone(),
        }
    }

    /// Polygon vertices of the jagged silhouette, in screen coordinates
    ///
    /// Vertex `k` sits at `radius * jag[k]` along `angle + k * TAU / n`.
    pub fn outline(&self) -> Vec<Vec2> {
        let n = self.jag.len();
        if n == 0 {
            return Vec::new();
        }
        let step = std::f32::consts::TAU / n as f32;
        self.jag
            .iter()
            .enumerate()
            .map(|(k, &offset)| {
                let theta = self.angle + k as f32 * step;
                self.pos + polar_to_cartesian(self.radius * offset, theta)
            })
            .collect()
    }
}

/// Frozen copy of everything drawable, plus the overlay numbers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub ship: ShipView,
    /// Laser positions in firing order
    pub lasers: Vec<Vec2>,
    /// Alive asteroids only
    pub asteroids: Vec<AsteroidView>,
    pub score: u64,
    pub level: u32,
    pub game_over: bool,
    pub tick: u64,
}

impl Snapshot {
    pub fn capture(state: &GameState) -> Self {
        let ship = &state.ship;
        Self {
            ship: ShipView {
                pos: ship.pos,
                angle: ship.angle,
                radius: ship.radius,
                thrusting: ship.thrusting,
            },
            lasers: ship.lasers.iter().filter(|l| l.alive).map(|l| l.pos).collect(),
            asteroids: state
                .asteroids
                .iter()
                .filter(|a| a.is_alive())
                .map(AsteroidView::of)
                .collect(),
            score: state.score,
            level: state.level,
            game_over: state.phase == GamePhase::GameOver,
            tick: state.time_ticks,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Playfield;
    use crate::config::Config;
    use crate::sim::state::AsteroidFate;

    #[test]
    fn test_capture_mirrors_state() {
        let mut state = GameState::new(Config::default(), Playfield::default(), 42);
        let config = state.config.clone();
        state.ship.fire(&config);
        state.score = 300;

        let snap = Snapshot::capture(&state);
        assert_eq!(snap.ship.pos, state.ship.pos);
        assert_eq!(snap.lasers.len(), 1);
        assert_eq!(snap.asteroids.len(), state.asteroids.len());
        assert_eq!(snap.score, 300);
        assert_eq!(snap.level, 1);
        assert!(!snap.game_over);
    }

    #[test]
    fn test_capture_skips_dead_asteroids() {
        let mut state = GameState::new(Config::default(), Playfield::default(), 42);
        let total = state.asteroids.len();
        state.asteroids[0].fate = AsteroidFate::Shattered;
        assert_eq!(Snapshot::capture(&state).asteroids.len(), total - 1);
    }

    #[test]
    fn test_outline_follows_jag() {
        let view = AsteroidView {
            pos: Vec2::new(100.0, 100.0),
            radius: 10.0,
            angle: 0.0,
            jag: vec![1.0, 2.0, 1.0, 0.5],
        };
        let points = view.outline();
        assert_eq!(points.len(), 4);
        assert!((points[0] - Vec2::new(110.0, 100.0)).length() < 1e-4);
        assert!((points[1] - Vec2::new(100.0, 120.0)).length() < 1e-4);
        assert!((points[2] - Vec2::new(90.0, 100.0)).length() < 1e-4);
        assert!((points[3] - Vec2::new(100.0, 95.0)).length() < 1e-4);
    }

    #[test]
    fn test_snapshot_json_shape() {
        let state = GameState::new(Config::default(), Playfield::default(), 8);
        let json = serde_json::to_value(Snapshot::capture(&state)).unwrap();
        assert!(json["ship"]["thrusting"].is_boolean());
        assert!(json["asteroids"].as_array().is_some_and(|a| !a.is_empty()));
        assert_eq!(json["game_over"], serde_json::Value::Bool(false));
    }
}
