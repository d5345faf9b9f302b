//! Collision detection for circle-approximated bodies
//!
//! Everything in the field is a disc (lasers are discs of radius zero), so a
//! single overlap test covers asteroid pairs, the ship and laser hits.

use glam::Vec2;

use super::state::{Asteroid, Laser, Ship};

/// Normal used when two centers coincide exactly
pub const FALLBACK_NORMAL: Vec2 = Vec2::X;

/// Overlap between two discs
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit vector from the first body toward the second
    pub normal: Vec2,
    /// Distance between centers
    pub distance: f32,
    /// Penetration depth (sum of radii minus distance)
    pub overlap: f32,
}

/// Unit direction of `delta`, or the fallback normal for coincident centers
#[inline]
pub fn contact_normal(delta: Vec2, distance: f32) -> Vec2 {
    if distance > 0.0 {
        delta / distance
    } else {
        FALLBACK_NORMAL
    }
}

/// Discs overlap iff the center distance is strictly less than the sum of radii
#[inline]
pub fn circles_overlap(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> bool {
    a_pos.distance(b_pos) < a_radius + b_radius
}

/// Contact between two discs, if they overlap
pub fn circle_contact(a_pos: Vec2, a_radius: f32, b_pos: Vec2, b_radius: f32) -> Option<Contact> {
    let delta = b_pos - a_pos;
    let distance = delta.length();
    let reach = a_radius + b_radius;
    if distance >= reach {
        return None;
    }
    Some(Contact {
        normal: contact_normal(delta, distance),
        distance,
        overlap: reach - distance,
    })
}

/// Contact between two live asteroids (dead ones never collide)
pub fn asteroid_contact(a: &Asteroid, b: &Asteroid) -> Option<Contact> {
    if !a.is_alive() || !b.is_alive() {
        return None;
    }
    circle_contact(a.pos, a.radius, b.pos, b.radius)
}

/// Every overlapping unordered pair (i < j) of live asteroids
pub fn overlapping_pairs(asteroids: &[Asteroid]) -> Vec<(usize, usize)> {
    let mut pairs = Vec::new();
    for (i, a) in asteroids.iter().enumerate() {
        for (j, b) in asteroids.iter().enumerate().skip(i + 1) {
            if asteroid_contact(a, b).is_some() {
                pairs.push((i, j));
            }
        }
    }
    pairs
}

/// Index of the first live asteroid touching the ship
pub fn ship_contact(ship: &Ship, asteroids: &[Asteroid]) -> Option<usize> {
    asteroids
        .iter()
        .position(|a| a.is_alive() && circles_overlap(ship.pos, ship.radius, a.pos, a.radius))
}

/// Whether a live laser is inside a live asteroid's disc
#[inline]
pub fn laser_hits(laser: &Laser, asteroid: &Asteroid) -> bool {
    laser.alive && asteroid.is_alive() && circles_overlap(laser.pos, 0.0, asteroid.pos, asteroid.radius)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::AsteroidFate;

    fn rock(x: f32, y: f32, radius: f32) -> Asteroid {
        Asteroid {
            id: 0,
            pos: Vec2::new(x, y),
            vel: Vec2::ZERO,
            radius,
            angle: 0.0,
            jag: vec![1.0; 8],
            fragility: 1.0,
            fate: AsteroidFate::Alive,
        }
    }

    #[test]
    fn test_circle_contact_overlap() {
        let c = circle_contact(Vec2::ZERO, 10.0, Vec2::new(15.0, 0.0), 10.0).unwrap();
        assert!((c.normal - Vec2::X).length() < 1e-6);
        assert!((c.distance - 15.0).abs() < 1e-6);
        assert!((c.overlap - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_touching_is_not_overlap() {
        assert!(circle_contact(Vec2::ZERO, 10.0, Vec2::new(20.0, 0.0), 10.0).is_none());
        assert!(!circles_overlap(Vec2::ZERO, 10.0, Vec2::new(0.0, 20.0), 10.0));
    }

    #[test]
    fn test_coincident_centers_use_fallback_normal() {
        let c = circle_contact(Vec2::new(5.0, 5.0), 10.0, Vec2::new(5.0, 5.0), 4.0).unwrap();
        assert_eq!(c.normal, FALLBACK_NORMAL);
        assert!(c.normal.is_finite());
        assert_eq!(c.overlap, 14.0);
    }

    #[test]
    fn test_overlapping_pairs_skip_dead() {
        let mut rocks = vec![
            rock(0.0, 0.0, 10.0),
            rock(15.0, 0.0, 10.0),
            rock(28.0, 0.0, 10.0),
            rock(200.0, 0.0, 10.0),
        ];
        assert_eq!(overlapping_pairs(&rocks), vec![(0, 1), (1, 2)]);

        rocks[1].fate = AsteroidFate::Shattered;
        assert!(overlapping_pairs(&rocks).is_empty());
    }

    #[test]
    fn test_zero_radius_never_collides() {
        let rocks = vec![rock(0.0, 0.0, 0.0), rock(1.0, 0.0, 10.0)];
        assert!(overlapping_pairs(&rocks).is_empty());
    }

    #[test]
    fn test_laser_is_a_point() {
        let rock = rock(100.0, 100.0, 30.0);
        let mut laser = Laser {
            pos: Vec2::new(129.0, 100.0),
            vel: Vec2::ZERO,
            dist: 0.0,
            alive: true,
        };
        assert!(laser_hits(&laser, &rock));
        laser.pos.x = 130.5;
        assert!(!laser_hits(&laser, &rock));
        laser.pos.x = 110.0;
        laser.alive = false;
        assert!(!laser_hits(&laser, &rock));
    }
}
