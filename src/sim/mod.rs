//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (insertion order of the entity lists)
//! - No rendering or platform dependencies

pub mod collision;
pub mod integrate;
pub mod lifecycle;
pub mod policy;
pub mod resolve;
pub mod snapshot;
pub mod state;
pub mod tick;

pub use collision::{Contact, FALLBACK_NORMAL, circle_contact, overlapping_pairs};
pub use policy::{BreakDecision, BreakPolicy, FragilityPolicy, Impact, MassRatioPolicy, ThresholdPolicy};
pub use resolve::{Collision, Fragment, fragment_count, plan_fragments, resolve_pair};
pub use snapshot::{AsteroidView, ShipView, Snapshot};
pub use state::{Asteroid, AsteroidFate, GameEvent, GamePhase, GameState, Laser, Ship};
pub use tick::{TickInput, tick};
