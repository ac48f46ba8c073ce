//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One logical tick per call, all timers in whole ticks
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! The presentation layer reads the `GameState` snapshot after each tick and
//! must not mutate it.

pub mod agents;
pub mod geom;
pub mod level;
pub mod state;
pub mod steering;
pub mod tick;

pub use geom::{Rect, line_of_sight, resolve_against_walls, resolve_penetration};
pub use level::LevelLayout;
pub use state::{
    Callout, Chaser, ChaserBehavior, ChaserState, Coffee, ComplianceTrap, Customer, Decoration,
    DecorationKind, Doorway, GameOverReason, GameState, HudState, Lawyer, Particle, PendingAdvance,
    Player, ProductManager, Robot, SessionPhase, Workstation,
};
pub use tick::{TickInput, tick};
