//! Rules deciding which asteroids break in a collision
//!
//! The resolver only talks to [`BreakPolicy`]; `Config::break_rule` picks the
//! implementation.

use super::state::Asteroid;
use crate::config::BreakRule;

/// Measured quantities of one asteroid-asteroid impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    /// Kinetic energy along the normal: 0.5 * reduced mass * v_rel²
    pub energy: f32,
    /// Approach speed along the normal (non-positive)
    pub normal_speed: f32,
    pub mass_a: f32,
    pub mass_b: f32,
}

/// Which side of a pair breaks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreakDecision {
    pub a_breaks: bool,
    pub b_breaks: bool,
}

impl BreakDecision {
    pub const NONE: Self = Self {
        a_breaks: false,
        b_breaks: false,
    };

    pub fn any(&self) -> bool {
        self.a_breaks || self.b_breaks
    }
}

pub trait BreakPolicy {
    fn decide(&self, a: &Asteroid, b: &Asteroid, impact: &Impact) -> BreakDecision;
}

/// Each asteroid breaks once the impact reaches its own fragility
#[derive(Debug, Clone, Copy, Default)]
pub struct FragilityPolicy;

impl BreakPolicy for FragilityPolicy {
    fn decide(&self, a: &Asteroid, b: &Asteroid, impact: &Impact) -> BreakDecision {
        BreakDecision {
            a_breaks: impact.energy >= a.fragility,
            b_breaks: impact.energy >= b.fragility,
        }
    }
}

/// Both asteroids break when the impact exceeds one global threshold
#[derive(Debug, Clone, Copy)]
pub struct ThresholdPolicy {
    pub threshold: f32,
}

impl BreakPolicy for ThresholdPolicy {
    fn decide(&self, _a: &Asteroid, _b: &Asteroid, impact: &Impact) -> BreakDecision {
        let breaks = impact.energy > self.threshold;
        BreakDecision {
            a_breaks: breaks,
            b_breaks: breaks,
        }
    }
}

/// Only mass matters: the lighter body breaks when the other outweighs it by `ratio`
#[derive(Debug, Clone, Copy)]
pub struct MassRatioPolicy {
    pub ratio: f32,
}

impl BreakPolicy for MassRatioPolicy {
    fn decide(&self, _a: &Asteroid, _b: &Asteroid, impact: &Impact) -> BreakDecision {
        BreakDecision {
            a_breaks: impact.mass_b >= impact.mass_a * self.ratio,
            b_breaks: impact.mass_a >= impact.mass_b * self.ratio,
        }
    }
}

impl BreakPolicy for BreakRule {
    fn decide(&self, a: &Asteroid, b: &Asteroid, impact: &Impact) -> BreakDecision {
        match *self {
            BreakRule::Fragility => FragilityPolicy.decide(a, b, impact),
            BreakRule::Threshold { threshold } => ThresholdPolicy { threshold }.decide(a, b, impact),
            BreakRule::MassRatio { ratio } => MassRatioPolicy { ratio }.decide(a, b, impact),
        }
    }
}
