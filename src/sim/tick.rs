//! Fixed timestep simulation tick
//!
//! One tick runs to completion in a fixed order:
//! fire → integrate → detect pairs → resolve impacts → lifecycle.
//! Fragments spawned while resolving are already in the field when the
//! ship and laser checks run.

use serde::{Deserialize, Serialize};

use super::state::{GameEvent, GamePhase, GameState};
use super::{collision, integrate, lifecycle, resolve};

/// Input commands for a single tick (deterministic)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Turn counter-clockwise
    pub left: bool,
    /// Turn clockwise
    pub right: bool,
    pub thrust: bool,
    /// One-shot fire request (already debounced by the input layer)
    pub fire: bool,
}

/// Advance the game state by one fixed timestep
///
/// Returns what happened this tick. A finished game does not advance.
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if state.phase == GamePhase::GameOver {
        return events;
    }

    if input.fire {
        state.ship.fire(&state.config);
    }

    integrate::run(state, input, dt);

    let pairs = collision::overlapping_pairs(&state.asteroids);
    resolve::run(state, &pairs, &mut events);

    lifecycle::run(state, &mut events);

    state.time_ticks += 1;
    events
}
