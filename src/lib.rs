//! Crunch Time - an office stealth/chase arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (agents, collisions, session state)
//!
//! Rendering, input device binding and UI text live in the host; the
//! simulation publishes a serializable snapshot of the whole world every
//! tick for a presentation layer to draw, plus a small derived HUD record.

pub mod sim;

pub use sim::{GameState, HudState, TickInput, tick};

/// Game configuration constants
pub mod consts {
    /// Playfield dimensions (pixels)
    pub const PLAYFIELD_W: f32 = 1000.0;
    pub const PLAYFIELD_H: f32 = 700.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 24.0;
    pub const PLAYER_BASE_SPEED: f32 = 3.0;
    /// Per-axis scale when moving diagonally, so the resultant speed matches
    /// the cardinal speed. Gameplay balance depends on this exact value.
    pub const DIAGONAL_SCALE: f32 = std::f32::consts::FRAC_1_SQRT_2;

    /// Timed player effects (ticks)
    pub const COFFEE_BOOST_TICKS: u32 = 300;
    pub const COFFEE_RESPAWN_TICKS: u32 = 600;
    pub const POWER_UP_TICKS: u32 = 300;
    pub const INVULN_TICKS: u32 = 120;
    /// Speed multipliers - coffee and power-up never stack; whichever is
    /// evaluated last wins for the tick
    pub const COFFEE_SPEED_MULT: f32 = 1.8;
    pub const POWER_UP_SPEED_MULT: f32 = 1.5;

    /// Lawyer drag
    pub const DRAG_SPEED: f32 = 8.0;
    pub const DRAG_ARRIVE_DIST: f32 = 20.0;

    /// Break room score drain per tick
    pub const BREAK_ROOM_DRAIN: f64 = 0.5;

    /// Chasers
    pub const CHASER_SIZE: f32 = 28.0;
    pub const CHASE_TICKS: u32 = 300;
    /// Shorter chase window for chasers alerted by a mastermind
    pub const ALERT_CHASE_TICKS: u32 = 180;
    pub const CHASE_SPEED_MULT: f32 = 1.3;
    pub const SLOW_SPEED_MULT: f32 = 0.3;
    pub const SIZE_MULT_CAP: f32 = 2.5;
    pub const GROW_SIZE_MULT: f32 = 1.3;
    pub const GROW_SIGHT_MULT: f32 = 1.2;
    pub const GROW_SPEED_MULT: f32 = 1.1;
    pub const GROW_ANIM_TICKS: u32 = 60;
    /// Linear extrapolation lookahead (ticks) for predictive archetypes
    pub const PREDICT_LOOKAHEAD: f32 = 30.0;
    pub const PATROL_ARRIVE_DIST: f32 = 40.0;
    pub const WANDER_ARRIVE_DIST: f32 = 30.0;
    /// Displacement below this for STUCK_LIMIT_TICKS consecutive ticks
    /// teleports the chaser to a random spot (anti-deadlock)
    pub const STUCK_EPSILON: f32 = 0.5;
    pub const STUCK_LIMIT_TICKS: u32 = 30;

    /// Helper robot
    pub const ROBOT_SIZE: f32 = 26.0;
    pub const ROBOT_SPEED: f32 = 2.0;
    pub const ROBOT_ARRIVE_DIST: f32 = 20.0;
    pub const ROBOT_ASSIST_RANGE: f32 = 60.0;
    pub const ROBOT_TARGET_RANGE: f32 = 200.0;
    pub const DISTRACT_TICKS: u32 = 120;
    pub const ROBOT_COOLDOWN_TICKS: u32 = 300;

    /// Product manager
    pub const PM_SIZE: f32 = 28.0;
    pub const PM_SPEED: f32 = 4.0;
    pub const PM_ACTIVE_TICKS: u32 = 180;
    pub const PM_SLOW_TICKS: u32 = 180;
    pub const PM_APPROACH_DIST: f32 = 40.0;

    /// Lawyer
    pub const LAWYER_SIZE: f32 = 28.0;
    pub const LAWYER_SPEED: f32 = 1.8;
    pub const LAWYER_SEIZE_DIST: f32 = 30.0;
    pub const LAWYER_COOLDOWN_TICKS: u32 = 600;
    pub const LAWYER_TRIGGER_SCORE: f64 = 100.0;

    /// Customer
    pub const CUSTOMER_SIZE: f32 = 28.0;
    pub const CUSTOMER_DEATH_FADE_TICKS: u32 = 60;
    pub const CUSTOMER_REWARD: f64 = 200.0;

    /// Compliance traps
    pub const TRAP_SIZE: f32 = 40.0;

    /// Workstations
    pub const WORKSTATION_SIZE: f32 = 32.0;
    /// Per-axis reach for "near a workstation"
    pub const WORKSTATION_REACH: f32 = 40.0;
    pub const CODE_RATE_LEVEL_1: u32 = 4;
    pub const CODE_RATE: u32 = 2;

    /// Coffee pickup
    pub const COFFEE_SIZE: f32 = 20.0;

    /// Session / progression
    pub const FINAL_LEVEL: u32 = 5;
    pub const VICTORY_BONUS: f64 = 1000.0;
    pub const LEVEL_BONUS_PER_LEVEL: f64 = 100.0;
    /// Delay between level completion and the rebuild of the next level
    pub const LEVEL_ADVANCE_DELAY_TICKS: u32 = 120;

    /// Transient effects
    pub const CALLOUT_LIFE_TICKS: u32 = 30;
    pub const CALLOUT_DRIFT: f32 = -2.0;
    pub const PARTICLE_LIFE_TICKS: u32 = 30;
    pub const PARTICLE_GRAVITY: f32 = 0.3;
}
