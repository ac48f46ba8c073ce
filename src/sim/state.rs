//! Game state and core simulation types
//!
//! Every entity is a plain value record owned exclusively by `GameState`.
//! The whole aggregate serializes as the per-tick presentation snapshot
//! (the RNG is skipped - it is simulation-internal).

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use super::geom::Rect;
use super::level::LevelLayout;
use crate::consts::*;

/// Where the player respawns at every level start.
pub const PLAYER_START: Vec2 = Vec2::new(500.0, 600.0);

/// Outer session lifecycle. `Ready` is the pre-start lobby; `GameOver` and
/// `Victory` are terminal until [`GameState::start`] rebuilds the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionPhase {
    Ready,
    Running,
    GameOver,
    Victory,
}

/// Why the run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GameOverReason {
    CaughtByChaser,
    ComplianceViolation,
}

impl GameOverReason {
    /// Overlay headline shown by the presentation layer.
    pub fn message(&self) -> &'static str {
        match self {
            GameOverReason::CaughtByChaser => "CAUGHT BY BRAD!",
            GameOverReason::ComplianceViolation => "COMPLIANCE VIOLATION!",
        }
    }
}

/// The office worker.
#[derive(Debug, Clone, Serialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: f32,
    pub base_speed: f32,
    /// Effective speed this tick - always base, coffee-boosted or
    /// power-up-boosted, never a product of the two
    pub speed: f32,
    /// Workstation currently being coded on, if any
    pub coding_at: Option<usize>,
    pub in_break_room: bool,
    pub coffee_boost: u32,
    pub invulnerable: u32,
    /// Destination the lawyer is dragging the player to
    pub dragged_to: Option<Vec2>,
}

impl Player {
    pub fn new() -> Self {
        Self {
            pos: PLAYER_START,
            size: PLAYER_SIZE,
            base_speed: PLAYER_BASE_SPEED,
            speed: PLAYER_BASE_SPEED,
            coding_at: None,
            in_break_room: false,
            coffee_boost: 0,
            invulnerable: 0,
            dragged_to: None,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }

    pub fn is_coding(&self) -> bool {
        self.coding_at.is_some()
    }

    pub fn being_dragged(&self) -> bool {
        self.dragged_to.is_some()
    }

    /// Back to the spawn point with all timed effects cleared.
    pub(crate) fn reset_for_level(&mut self) {
        self.pos = PLAYER_START;
        self.speed = self.base_speed;
        self.coding_at = None;
        self.in_break_room = false;
        self.coffee_boost = 0;
        self.invulnerable = 0;
        self.dragged_to = None;
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new()
    }
}

/// An interactive coding objective.
#[derive(Debug, Clone, Serialize)]
pub struct Workstation {
    pub pos: Vec2,
    pub size: f32,
    pub code_written: u32,
    pub code_required: u32,
    pub completed: bool,
    /// Part of the customer's outstanding requirement
    pub required_by_customer: bool,
}

impl Workstation {
    pub fn new(pos: Vec2, code_required: u32) -> Self {
        Self {
            pos,
            size: WORKSTATION_SIZE,
            code_written: 0,
            code_required,
            completed: false,
            required_by_customer: false,
        }
    }
}

/// Patrol / target-selection strategy. The state machine shape is shared;
/// the archetype only changes where a chaser wants to go.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChaserBehavior {
    Patrol,
    SmartPatrol,
    Predictive,
    Interceptor,
    Mastermind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChaserState {
    Patrol,
    Chase,
    Distracted,
}

/// An antagonist middle manager.
#[derive(Debug, Clone, Serialize)]
pub struct Chaser {
    pub pos: Vec2,
    pub base_size: f32,
    /// Grows on compliance-trap contact, capped, never shrinks
    pub size_multiplier: f32,
    pub base_speed: f32,
    pub speed: f32,
    pub behavior: ChaserBehavior,
    pub state: ChaserState,
    pub sight_range: f32,
    pub chase_timer: u32,
    pub last_seen: Vec2,
    pub predicted: Vec2,
    /// Current random waypoint for plain-patrol wandering
    pub wander_target: Vec2,
    pub patrol_index: usize,
    pub distract_timer: u32,
    pub slow_timer: u32,
    pub stuck_count: u32,
    pub last_pos: Vec2,
    pub grow_timer: u32,
}

impl Chaser {
    pub fn new(x: f32, y: f32, speed: f32, behavior: ChaserBehavior, sight_range: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self {
            pos,
            base_size: CHASER_SIZE,
            size_multiplier: 1.0,
            base_speed: speed,
            speed,
            behavior,
            state: ChaserState::Patrol,
            sight_range,
            chase_timer: 0,
            last_seen: Vec2::ZERO,
            predicted: Vec2::ZERO,
            wander_target: pos,
            patrol_index: 0,
            distract_timer: 0,
            slow_timer: 0,
            stuck_count: 0,
            last_pos: pos,
            grow_timer: 0,
        }
    }

    /// Bounding-box size at the current growth multiplier.
    pub fn scaled_size(&self) -> Vec2 {
        Vec2::splat(self.base_size * self.size_multiplier)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, self.scaled_size())
    }

    /// Mid grow animation; traps cannot re-trigger growth during it.
    pub fn growing(&self) -> bool {
        self.grow_timer > 0
    }
}

/// The friendly office robot. Wanders, and when the player is close it
/// distracts the nearest chasing manager. Purely beneficial.
#[derive(Debug, Clone, Serialize)]
pub struct Robot {
    pub pos: Vec2,
    pub size: f32,
    pub wander_target: Vec2,
    pub distracting: bool,
    pub distract_timer: u32,
    pub cooldown: u32,
}

impl Robot {
    pub fn new(x: f32, y: f32) -> Self {
        let pos = Vec2::new(x, y);
        Self {
            pos,
            size: ROBOT_SIZE,
            wander_target: pos,
            distracting: false,
            distract_timer: 0,
            cooldown: 0,
        }
    }
}

/// Periodically swoops in from off-screen and pulls a chaser into a meeting.
#[derive(Debug, Clone, Serialize)]
pub struct ProductManager {
    pub pos: Vec2,
    pub size: f32,
    pub active: bool,
    /// Index into the chaser roster; may be dangling and is re-resolved
    /// every tick (a dangling target means "no target")
    pub target: Option<usize>,
    /// The slow lands once per activation, not continuously while lingering
    pub slow_applied: bool,
    pub active_timer: u32,
    pub cooldown: u32,
}

impl ProductManager {
    pub fn new(cooldown: u32) -> Self {
        Self {
            pos: Vec2::new(-50.0, 300.0),
            size: PM_SIZE,
            active: false,
            target: None,
            slow_applied: false,
            active_timer: 0,
            cooldown,
        }
    }
}

/// Hunts the player once the score is worth suing over. Level 3 and up.
#[derive(Debug, Clone, Serialize)]
pub struct Lawyer {
    pub pos: Vec2,
    pub size: f32,
    pub hunting: bool,
    pub speed: f32,
    pub cooldown: u32,
    /// Fixed for the level; the drag destination
    pub desk: Vec2,
}

impl Lawyer {
    pub fn new(desk: Vec2) -> Self {
        Self {
            pos: desk,
            size: LAWYER_SIZE,
            hunting: false,
            speed: LAWYER_SPEED,
            cooldown: 0,
            desk,
        }
    }
}

/// Stands around near the entrance with an outstanding requirement.
/// Level 3 and up. Traps can kill them.
#[derive(Debug, Clone, Serialize)]
pub struct Customer {
    pub pos: Vec2,
    pub size: f32,
    pub alive: bool,
    pub has_requirement: bool,
    pub death_timer: u32,
}

impl Customer {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: CUSTOMER_SIZE,
            alive: true,
            has_requirement: true,
            death_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// A cyclically armed hazard zone. `warmup_timer` doubles as the cooldown
/// between active windows.
#[derive(Debug, Clone, Serialize)]
pub struct ComplianceTrap {
    pub pos: Vec2,
    pub size: f32,
    pub active: bool,
    pub warmup_timer: u32,
    pub active_timer: u32,
}

impl ComplianceTrap {
    pub fn new(pos: Vec2, warmup_timer: u32) -> Self {
        Self {
            pos,
            size: TRAP_SIZE,
            active: false,
            warmup_timer,
            active_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// A coffee pickup cycling between available and collected.
#[derive(Debug, Clone, Serialize)]
pub struct Coffee {
    pub pos: Vec2,
    pub size: f32,
    pub collected: bool,
    pub respawn_timer: u32,
}

impl Coffee {
    pub fn new(pos: Vec2) -> Self {
        Self {
            pos,
            size: COFFEE_SIZE,
            collected: false,
            respawn_timer: 0,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.pos, Vec2::splat(self.size))
    }
}

/// An elevator to another floor. The other floors never got built; walking
/// into one emits a "COMING SOON" callout and pushes the player back out.
#[derive(Debug, Clone, Serialize)]
pub struct Doorway {
    pub rect: Rect,
    pub label: &'static str,
    pub destination: &'static str,
    pub color: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DecorationKind {
    Plant,
    WaterCooler,
    Printer,
}

/// Purely cosmetic office furniture, published for the renderer.
#[derive(Debug, Clone, Serialize)]
pub struct Decoration {
    pub kind: DecorationKind,
    pub rect: Rect,
}

/// A short-lived visual spark.
#[derive(Debug, Clone, Serialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: &'static str,
    pub life: u32,
}

/// Floating callout text ("BUSTED!", "CAFFEINE!", ...). The game's whole
/// audio design is text that drifts upward.
#[derive(Debug, Clone, Serialize)]
pub struct Callout {
    pub pos: Vec2,
    pub text: String,
    pub color: &'static str,
    pub size: f32,
    pub life: u32,
    pub vy: f32,
}

/// A level advance that has been earned but not yet performed. Carries the
/// level it was scheduled from so a stale advance (session restarted in the
/// meantime) is dropped instead of firing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingAdvance {
    pub from_level: u32,
    pub ticks: u32,
}

/// Derived UI record published every tick.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HudState {
    pub score: i64,
    pub level: u32,
    pub status: &'static str,
}

/// Complete session state. Mutated only by [`super::tick::tick`]; the
/// presentation layer reads it (or its serialized form) between ticks.
#[derive(Debug, Clone, Serialize)]
pub struct GameState {
    pub seed: u64,
    pub tick_count: u64,
    pub phase: SessionPhase,
    pub game_over_reason: Option<GameOverReason>,
    /// Real-valued (break room drains 0.5/tick), floored for display
    pub score: f64,
    pub level: u32,
    pub screen_shake: u32,
    pub power_up_active: bool,
    pub power_up_timer: u32,
    pub pending_advance: Option<PendingAdvance>,
    pub player: Player,
    pub walls: Vec<Rect>,
    pub break_room: Rect,
    pub doorways: Vec<Doorway>,
    pub decorations: Vec<Decoration>,
    pub workstations: Vec<Workstation>,
    pub coffees: Vec<Coffee>,
    pub traps: Vec<ComplianceTrap>,
    pub chasers: Vec<Chaser>,
    pub robot: Robot,
    pub product_manager: ProductManager,
    pub lawyer: Option<Lawyer>,
    pub customer: Option<Customer>,
    /// Workstation indices the customer needs completed
    pub customer_requirements: Vec<usize>,
    pub particles: Vec<Particle>,
    pub callouts: Vec<Callout>,
    #[serde(skip)]
    pub rng: Pcg32,
}

impl GameState {
    /// Create a session in the `Ready` phase with the level-1 floor laid
    /// out. Nothing moves until [`GameState::start`].
    pub fn new(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let layout = LevelLayout::generate(1, &mut rng);
        let mut state = Self {
            seed,
            tick_count: 0,
            phase: SessionPhase::Ready,
            game_over_reason: None,
            score: 0.0,
            level: 1,
            screen_shake: 0,
            power_up_active: false,
            power_up_timer: 0,
            pending_advance: None,
            player: Player::new(),
            walls: Vec::new(),
            break_room: Rect::from_xywh(0.0, 0.0, 0.0, 0.0),
            doorways: Vec::new(),
            decorations: Vec::new(),
            workstations: Vec::new(),
            coffees: Vec::new(),
            traps: Vec::new(),
            chasers: Vec::new(),
            robot: Robot::new(0.0, 0.0),
            product_manager: ProductManager::new(0),
            lawyer: None,
            customer: None,
            customer_requirements: Vec::new(),
            particles: Vec::new(),
            callouts: Vec::new(),
            rng,
        };
        state.load_layout(layout);
        state
    }

    /// (Re)start the session from level 1 with a zero score. Callable at any
    /// time, including from the terminal phases.
    pub fn start(&mut self) {
        self.score = 0.0;
        self.game_over_reason = None;
        self.phase = SessionPhase::Running;
        self.pending_advance = None;
        self.tick_count = 0;
        self.init_level(1);
    }

    /// Tear down the current entity set and build the given level.
    pub(crate) fn init_level(&mut self, level: u32) {
        self.level = level;
        let layout = LevelLayout::generate(level, &mut self.rng);
        self.load_layout(layout);

        self.player.reset_for_level();
        self.power_up_active = false;
        self.power_up_timer = 0;
        self.screen_shake = 0;
        self.pending_advance = None;
        self.particles.clear();
        self.callouts.clear();

        push_callout(
            &mut self.callouts,
            Vec2::new(PLAYFIELD_W / 2.0, 200.0),
            format!("LEVEL {level}!"),
            "#ffd700",
            32.0,
        );

        log::info!(
            "level {} initialized: {} chasers, {} workstations, {} traps, customer: {}",
            level,
            self.chasers.len(),
            self.workstations.len(),
            self.traps.len(),
            self.customer.is_some(),
        );
        for chaser in &self.chasers {
            log::debug!(
                "  chaser {:?}: speed={}, sight={}",
                chaser.behavior,
                chaser.base_speed,
                chaser.sight_range
            );
        }
    }

    fn load_layout(&mut self, layout: LevelLayout) {
        self.walls = layout.walls;
        self.break_room = layout.break_room;
        self.doorways = layout.doorways;
        self.decorations = layout.decorations;
        self.workstations = layout.workstations;
        self.coffees = layout.coffees;
        self.traps = layout.traps;
        self.chasers = layout.chasers;
        self.robot = layout.robot;
        self.product_manager = layout.product_manager;
        self.lawyer = layout.lawyer;
        self.customer = layout.customer;
        self.customer_requirements = layout.customer_requirements;
    }

    /// The workstation the player can currently work at: not completed and
    /// within reach on both axes. When several qualify the last one in
    /// roster order wins.
    pub fn near_workstation(&self) -> Option<usize> {
        self.workstations
            .iter()
            .enumerate()
            .filter(|(_, ws)| {
                !ws.completed
                    && (self.player.pos.x - ws.pos.x).abs() < WORKSTATION_REACH
                    && (self.player.pos.y - ws.pos.y).abs() < WORKSTATION_REACH
            })
            .map(|(i, _)| i)
            .next_back()
    }

    pub fn any_chaser_chasing(&self) -> bool {
        self.chasers.iter().any(|c| c.state == ChaserState::Chase)
    }

    /// Derived UI state: floored score, level, and the single status line
    /// chosen by fixed precedence.
    pub fn hud(&self) -> HudState {
        let status = if self.player.in_break_room {
            "In Break Room (losing code!)"
        } else if self.player.is_coding() {
            "Writing Code..."
        } else if self.player.being_dragged() {
            "Being sued!"
        } else if self.near_workstation().is_some() {
            "Press SPACE to code"
        } else if self.any_chaser_chasing() {
            "RUN! Brad sees you!"
        } else if self.customer.as_ref().is_some_and(|c| c.has_requirement) {
            "Complete customer requirements!"
        } else if self.power_up_active {
            "SPEED BOOST ACTIVE!"
        } else if self.player.coffee_boost > 0 {
            "COFFEE RUSH!"
        } else if self.lawyer.as_ref().is_some_and(|l| l.hunting) {
            "LAWYER INCOMING!"
        } else {
            "Ready to Code!"
        };

        HudState {
            score: self.score.floor() as i64,
            level: self.level,
            status,
        }
    }
}

/// Burst of particles at a point with random spread.
pub(crate) fn spawn_particles(
    particles: &mut Vec<Particle>,
    rng: &mut Pcg32,
    pos: Vec2,
    color: &'static str,
    count: usize,
) {
    for _ in 0..count {
        particles.push(Particle {
            pos,
            vel: Vec2::new(rng.random_range(-3.0..3.0), rng.random_range(-3.0..3.0)),
            color,
            life: PARTICLE_LIFE_TICKS,
        });
    }
}

/// Floating text callout drifting upward.
pub(crate) fn push_callout(
    callouts: &mut Vec<Callout>,
    pos: Vec2,
    text: impl Into<String>,
    color: &'static str,
    size: f32,
) {
    callouts.push(Callout {
        pos,
        text: text.into(),
        color,
        size,
        life: CALLOUT_LIFE_TICKS,
        vy: CALLOUT_DRIFT,
    });
}
