//! Asteroid-asteroid collision response and fragmentation
//!
//! For each overlapping pair:
//! 1. Skip pairs already separating along the contact normal
//! 2. Measure impact energy from the reduced mass and normal speed
//! 3. Ask the [`BreakPolicy`] which side breaks
//! 4. Apply the restitution impulse to the survivors only
//! 5. Push both bodies apart (partial positional correction)
//! 6. Replace each broken asteroid with 0-4 fragments
//!
//! Fragments are appended to the field in the same tick, so the ship and
//! lasers can hit them immediately. They join pair testing on the next tick.

use glam::Vec2;
use rand::Rng;

use super::collision::{Contact, asteroid_contact};
use super::policy::{BreakDecision, BreakPolicy, Impact};
use super::state::{Asteroid, AsteroidFate, GameEvent, GameState};
use crate::consts::{
    FRAGMENT_JITTER, MIN_FRAGMENT_RADIUS, OBLITERATE_MASS_RATIO, SCATTER_SCALE, SEPARATION_FACTOR,
};

/// Outcome of resolving one approaching pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Collision {
    pub impact: Impact,
    pub decision: BreakDecision,
}

/// A fragment about to be spawned
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// Resolve one overlapping pair in place
///
/// Returns `None` when the pair is already moving apart (nothing changes).
/// Broken asteroids are marked [`AsteroidFate::Shattered`] and keep the
/// velocity they arrived with.
pub fn resolve_pair(
    a: &mut Asteroid,
    b: &mut Asteroid,
    contact: &Contact,
    restitution: f32,
    policy: &dyn BreakPolicy,
) -> Option<Collision> {
    let normal = contact.normal;
    let normal_speed = (b.vel - a.vel).dot(normal);
    if normal_speed > 0.0 {
        return None;
    }

    let mass_a = a.mass();
    let mass_b = b.mass();
    let reduced_mass = (mass_a * mass_b) / (mass_a + mass_b);
    let impact = Impact {
        energy: 0.5 * reduced_mass * normal_speed * normal_speed,
        normal_speed,
        mass_a,
        mass_b,
    };
    let decision = policy.decide(a, b, &impact);

    // j = -(1 + e) * v_rel / (1/m_a + 1/m_b)
    let j = -(1.0 + restitution) * normal_speed / (1.0 / mass_a + 1.0 / mass_b);
    let impulse = normal * j;
    if !decision.a_breaks {
        a.vel -= impulse / mass_a;
    }
    if !decision.b_breaks {
        b.vel += impulse / mass_b;
    }

    // Lighter body moves more
    let push = normal * (contact.overlap * SEPARATION_FACTOR);
    let total = mass_a + mass_b;
    a.pos -= push * (mass_b / total);
    b.pos += push * (mass_a / total);

    if decision.a_breaks {
        a.fate = AsteroidFate::Shattered;
    }
    if decision.b_breaks {
        b.fate = AsteroidFate::Shattered;
    }

    Some(Collision { impact, decision })
}

/// How many pieces a broken asteroid splits into
///
/// Zero when the other body outweighs it by more than the obliteration ratio,
/// otherwise 2-4 depending on how far the energy exceeds its fragility.
pub fn fragment_count(energy: f32, fragility: f32, mass_ratio: f32) -> usize {
    if mass_ratio > OBLITERATE_MASS_RATIO {
        0
    } else if energy > 3.0 * fragility {
        4
    } else if energy > 1.5 * fragility {
        3
    } else {
        2
    }
}

/// Lay out the fragments of a broken asteroid
///
/// Each piece gets radius `R / sqrt(n)` (±20%), starts half a parent radius
/// out along a random angle and flies outward along that same angle at a
/// speed that grows with the impact energy. Pieces under the minimum radius
/// are dropped.
pub fn plan_fragments(
    parent: &Asteroid,
    other_mass: f32,
    energy: f32,
    rng: &mut impl Rng,
) -> Vec<Fragment> {
    let count = fragment_count(energy, parent.fragility, other_mass / parent.mass());
    if count == 0 {
        return Vec::new();
    }

    let nominal = parent.radius / (count as f32).sqrt();
    let scatter_speed = SCATTER_SCALE * energy.sqrt() / parent.radius;

    let mut fragments = Vec::with_capacity(count);
    for _ in 0..count {
        let jitter = rng.random_range(-FRAGMENT_JITTER..=FRAGMENT_JITTER);
        let radius = nominal * (1.0 + jitter);
        let theta = rng.random::<f32>() * std::f32::consts::TAU;
        if radius < MIN_FRAGMENT_RADIUS {
            continue;
        }
        let dir = Vec2::new(theta.cos(), theta.sin());
        fragments.push(Fragment {
            pos: parent.pos + dir * (parent.radius * 0.5),
            vel: parent.vel + dir * scatter_speed,
            radius,
        });
    }
    fragments
}

/// Resolve every detected pair and spawn fragments for whatever broke
pub fn run(state: &mut GameState, pairs: &[(usize, usize)], events: &mut Vec<GameEvent>) {
    let rule = state.config.break_rule;
    let restitution = state.config.restitution;

    for &(i, j) in pairs {
        let (a, b) = pair_mut(&mut state.asteroids, i, j);
        // Earlier pairs may have broken or moved these two
        let Some(contact) = asteroid_contact(a, b) else {
            continue;
        };
        let Some(collision) = resolve_pair(a, b, &contact, restitution, &rule) else {
            continue;
        };

        let Collision { impact, decision } = collision;
        if decision.a_breaks {
            shatter(state, i, impact.mass_b, impact.energy, events);
        }
        if decision.b_breaks {
            shatter(state, j, impact.mass_a, impact.energy, events);
        }
    }
}

/// Spawn the fragments of the (already shattered) asteroid at `index`
fn shatter(
    state: &mut GameState,
    index: usize,
    other_mass: f32,
    energy: f32,
    events: &mut Vec<GameEvent>,
) {
    let parent = &state.asteroids[index];
    let (parent_id, fragility) = (parent.id, parent.fragility);
    let fragments = plan_fragments(parent, other_mass, energy, &mut state.rng);

    log::debug!(
        "Asteroid {} shattered (E={:.0}, fragility={:.0}) into {} fragments",
        parent_id,
        energy,
        fragility,
        fragments.len()
    );

    for fragment in &fragments {
        let id = state.next_entity_id();
        let asteroid = Asteroid::new(
            id,
            fragment.pos,
            fragment.vel,
            fragment.radius,
            fragility,
            &state.config,
            &mut state.rng,
        );
        state.asteroids.push(asteroid);
    }

    events.push(GameEvent::AsteroidShattered {
        id: parent_id,
        fragments: fragments.len(),
    });
}

/// Two distinct mutable elements, `i < j`
fn pair_mut<T>(items: &mut [T], i: usize, j: usize) -> (&mut T, &mut T) {
    debug_assert!(i < j);
    let (head, tail) = items.split_at_mut(j);
    (&mut head[i], &mut tail[0])
}
