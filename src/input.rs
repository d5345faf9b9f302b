//! Player controls shared between the host's key handlers and the tick
//!
//! Held keys are sampled every tick. Fire is a one-shot latch: releasing the
//! fire key arms it and the next tick consumes it, so holding the key never
//! fires more than once.

use crate::sim::TickInput;

/// Logical controls the host maps its keys onto
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    TurnLeft,
    TurnRight,
    Thrust,
    Fire,
}

impl Control {
    /// Default keyboard layout (arrow keys plus space)
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" | "a" | "A" => Some(Self::TurnLeft),
            "ArrowRight" | "d" | "D" => Some(Self::TurnRight),
            "ArrowUp" | "w" | "W" => Some(Self::Thrust),
            " " | "Spacebar" => Some(Self::Fire),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    left: bool,
    right: bool,
    thrust: bool,
    fire_requested: bool,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, control: Control) {
        match control {
            Control::TurnLeft => self.left = true,
            Control::TurnRight => self.right = true,
            Control::Thrust => self.thrust = true,
            // Shots are queued on release
            Control::Fire => {}
        }
    }

    pub fn release(&mut self, control: Control) {
        match control {
            Control::TurnLeft => self.left = false,
            Control::TurnRight => self.right = false,
            Control::Thrust => self.thrust = false,
            Control::Fire => self.request_fire(),
        }
    }

    /// Arm a single shot for the next tick
    pub fn request_fire(&mut self) {
        self.fire_requested = true;
    }

    pub fn fire_pending(&self) -> bool {
        self.fire_requested
    }

    /// Sample the controls for one tick, consuming any pending shot
    pub fn take_tick_input(&mut self) -> TickInput {
        TickInput {
            left: self.left,
            right: self.right,
            thrust: self.thrust,
            fire: std::mem::take(&mut self.fire_requested),
        }
    }

    /// Drop every held key and pending shot (restart, focus loss)
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
