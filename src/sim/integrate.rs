//! Kinematic integration
//!
//! Advances the ship, its lasers and every asteroid by one timestep and wraps
//! them around the playfield. Nothing here reads other entities.

use super::state::{Asteroid, GameState, Laser, Ship};
use super::tick::TickInput;
use crate::config::Config;
use crate::{Playfield, heading};

/// Turn, thrust (or coast under friction), move and wrap the ship
pub fn ship(ship: &mut Ship, input: &TickInput, config: &Config, field: &Playfield, dt: f32) {
    let turn = config.turn_rate() * dt;
    if input.left {
        ship.angle += turn;
    }
    if input.right {
        ship.angle -= turn;
    }

    ship.thrusting = input.thrust;
    if input.thrust {
        ship.vel += heading(ship.angle) * (config.ship_thrust * dt);
    } else {
        ship.vel -= ship.vel * (config.friction * dt);
    }

    ship.pos += ship.vel * dt;
    ship.pos = field.wrap(ship.pos, ship.radius);
}

/// Move lasers as points and expire them past `max_dist`
pub fn lasers(lasers: &mut [Laser], max_dist: f32, field: &Playfield, dt: f32) {
    for laser in lasers.iter_mut().filter(|l| l.alive) {
        laser.pos = field.wrap(laser.pos + laser.vel * dt, 0.0);
        laser.dist += laser.vel.length() * dt;
        if laser.dist > max_dist {
            laser.alive = false;
        }
    }
}

/// Drift asteroids (no spin) with radius-aware wrap
pub fn asteroids(asteroids: &mut [Asteroid], field: &Playfield, dt: f32) {
    for asteroid in asteroids.iter_mut().filter(|a| a.is_alive()) {
        asteroid.pos = field.wrap(asteroid.pos + asteroid.vel * dt, asteroid.radius);
    }
}

/// Integrate the whole field for one tick
pub fn run(state: &mut GameState, input: &TickInput, dt: f32) {
    let field = state.field;
    let max_laser_dist = state.config.laser_dist * field.width;

    ship(&mut state.ship, input, &state.config, &field, dt);
    lasers(&mut state.ship.lasers, max_laser_dist, &field, dt);
    asteroids(&mut state.asteroids, &field, dt);
}
