//! Entity lifecycle after asteroid impacts are resolved
//!
//! Order matters: ship contact, then laser hits, then compaction of dead
//! entities (with shot asteroids splitting), then level completion.

use glam::Vec2;

use super::collision;
use super::state::{AsteroidFate, GameEvent, GamePhase, GameState};
use crate::consts::{SHOT_SCORE, SHOT_SPLIT_RADIUS};

/// Any live asteroid touching the ship ends the game (the ship itself is untouched)
pub fn ship_collisions(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing {
        return;
    }
    if let Some(index) = collision::ship_contact(&state.ship, &state.asteroids) {
        let by = state.asteroids[index].id;
        log::info!("Ship hit by asteroid {} (score {})", by, state.score);
        state.phase = GamePhase::GameOver;
        events.push(GameEvent::ShipDestroyed { by });
    }
}

/// Lasers inside an asteroid destroy it and score; each laser hits once
pub fn laser_hits(state: &mut GameState, events: &mut Vec<GameEvent>) {
    let lasers = &mut state.ship.lasers;
    for asteroid in state.asteroids.iter_mut() {
        for laser in lasers.iter_mut() {
            if !asteroid.is_alive() {
                break;
            }
            if collision::laser_hits(laser, asteroid) {
                laser.alive = false;
                asteroid.fate = AsteroidFate::Shot;
                state.score += SHOT_SCORE;
                events.push(GameEvent::AsteroidShot {
                    id: asteroid.id,
                    split: asteroid.radius > SHOT_SPLIT_RADIUS,
                });
            }
        }
    }
}

/// Drop dead entities; big shot asteroids leave two half-size children
pub fn compact(state: &mut GameState) {
    state.ship.lasers.retain(|l| l.alive);

    let current = std::mem::take(&mut state.asteroids);
    let mut next = Vec::with_capacity(current.len() + 2);
    for asteroid in current {
        match asteroid.fate {
            AsteroidFate::Alive if asteroid.radius > 0.0 => next.push(asteroid),
            AsteroidFate::Shot if asteroid.radius > SHOT_SPLIT_RADIUS => {
                let half = asteroid.radius / 2.0;
                // Diagonal offset of `half` per axis keeps the children apart
                let offset = Vec2::splat(half);
                for pos in [asteroid.pos - offset, asteroid.pos + offset] {
                    next.push(state.make_asteroid(pos, half, asteroid.fragility));
                }
            }
            _ => {}
        }
    }
    state.asteroids = next;
}

/// Empty field: advance the level and spawn a fresh, larger wave
pub fn advance_level(state: &mut GameState, events: &mut Vec<GameEvent>) {
    if state.phase != GamePhase::Playing || !state.asteroids.is_empty() {
        return;
    }
    events.push(GameEvent::LevelCleared { level: state.level });
    state.level += 1;
    log::info!("Level cleared, advancing to level {}", state.level);
    state.spawn_level();
}

/// Run every lifecycle step in order
pub fn run(state: &mut GameState, events: &mut Vec<GameEvent>) {
    ship_collisions(state, events);
    laser_hits(state, events);
    compact(state);
    advance_level(state, events);
}
