//! Level construction
//!
//! A level's entire static layout and agent roster is a pure function of the
//! level number plus the injected RNG (trap placement, coffee count, initial
//! trap timers). Tests drive this with a fixed seed and assert exact rosters.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::Rect;
use super::state::{
    Chaser, ChaserBehavior, Coffee, ComplianceTrap, Customer, Decoration, DecorationKind, Doorway,
    Lawyer, ProductManager, Robot, Workstation,
};
use crate::consts::*;

/// Fixed patrol waypoints mixed into the smart-patrol route alongside the
/// incomplete workstations.
pub const PATROL_WAYPOINTS: [Vec2; 5] = [
    Vec2::new(500.0, 350.0),
    Vec2::new(150.0, 150.0),
    Vec2::new(850.0, 150.0),
    Vec2::new(150.0, 550.0),
    Vec2::new(850.0, 550.0),
];

/// Workstation slots in a rough office arrangement: reception, main work
/// area, middle cubicles, back office, conference room.
const WORKSTATION_SLOTS: [Vec2; 13] = [
    Vec2::new(150.0, 150.0),
    Vec2::new(250.0, 250.0),
    Vec2::new(450.0, 250.0),
    Vec2::new(650.0, 250.0),
    Vec2::new(150.0, 400.0),
    Vec2::new(350.0, 400.0),
    Vec2::new(550.0, 400.0),
    Vec2::new(750.0, 400.0),
    Vec2::new(250.0, 550.0),
    Vec2::new(450.0, 550.0),
    Vec2::new(650.0, 550.0),
    Vec2::new(850.0, 250.0),
    Vec2::new(850.0, 350.0),
];

/// Coffee machine spots.
const COFFEE_SLOTS: [Vec2; 4] = [
    Vec2::new(100.0, 300.0),
    Vec2::new(500.0, 150.0),
    Vec2::new(800.0, 450.0),
    Vec2::new(300.0, 500.0),
];

const LAWYER_DESK: Vec2 = Vec2::new(900.0, 400.0);

/// Everything a level starts with. Consumed by `GameState` at level init.
#[derive(Debug, Clone)]
pub struct LevelLayout {
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
    pub customer_requirements: Vec<usize>,
}

impl LevelLayout {
    /// Build the full entity set for `level`.
    pub fn generate(level: u32, rng: &mut Pcg32) -> Self {
        let walls = office_walls();
        let break_room = Rect::from_xywh(850.0, 550.0, 130.0, 130.0);

        let doorways = vec![
            Doorway {
                rect: Rect::from_xywh(400.0, 680.0, 200.0, 20.0),
                label: "TO CAFETERIA",
                destination: "cafeteria",
                color: "#4CAF50",
            },
            Doorway {
                rect: Rect::from_xywh(0.0, 300.0, 20.0, 100.0),
                label: "TO EXECUTIVE",
                destination: "executive",
                color: "#9C27B0",
            },
        ];

        let decorations = vec![
            Decoration {
                kind: DecorationKind::Plant,
                rect: Rect::from_xywh(50.0, 150.0, 20.0, 20.0),
            },
            Decoration {
                kind: DecorationKind::Plant,
                rect: Rect::from_xywh(930.0, 150.0, 20.0, 20.0),
            },
            Decoration {
                kind: DecorationKind::Plant,
                rect: Rect::from_xywh(350.0, 350.0, 20.0, 20.0),
            },
            Decoration {
                kind: DecorationKind::WaterCooler,
                rect: Rect::from_xywh(750.0, 100.0, 24.0, 30.0),
            },
            Decoration {
                kind: DecorationKind::Printer,
                rect: Rect::from_xywh(450.0, 100.0, 30.0, 24.0),
            },
        ];

        // Workstations: 3 + level, capped by the slot list. Level 1 needs
        // less code per station as an easing for the first run.
        let count = ((3 + level) as usize).min(WORKSTATION_SLOTS.len());
        let code_required = if level == 1 { 50 } else { 60 + level * 15 };
        let mut workstations: Vec<Workstation> = WORKSTATION_SLOTS[..count]
            .iter()
            .map(|&pos| Workstation::new(pos, code_required))
            .collect();

        // 2-4 coffee machines
        let coffee_count = 2 + rng.random_range(0..3usize);
        let coffees = COFFEE_SLOTS[..coffee_count]
            .iter()
            .map(|&pos| Coffee::new(pos))
            .collect();

        // Compliance traps appear from level 3, scattered randomly
        let trap_count = if level > 2 { (level - 2).min(5) } else { 0 };
        let traps = (0..trap_count)
            .map(|_| {
                let pos = Vec2::new(
                    150.0 + rng.random_range(0.0..700.0),
                    150.0 + rng.random_range(0.0..400.0),
                );
                ComplianceTrap::new(pos, rng.random_range(60..180))
            })
            .collect();

        let robot = Robot::new(150.0, 100.0);
        let product_manager = ProductManager::new(rng.random_range(600..1200));

        let lawyer = (level > 2).then(|| Lawyer::new(LAWYER_DESK));

        // Customer requires the first few workstations
        let (customer, customer_requirements) = if level > 2 {
            let required = ((1 + level / 2).min(3) as usize).min(workstations.len());
            let mut requirements = Vec::with_capacity(required);
            for (i, ws) in workstations.iter_mut().take(required).enumerate() {
                ws.required_by_customer = true;
                requirements.push(i);
            }
            (Some(Customer::new(100.0, 80.0)), requirements)
        } else {
            (None, Vec::new())
        };

        let chasers = chaser_roster(level);

        Self {
            walls,
            break_room,
            doorways,
            decorations,
            workstations,
            coffees,
            traps,
            chasers,
            robot,
            product_manager,
            lawyer,
            customer,
            customer_requirements,
        }
    }
}

/// Per-level antagonist roster. The curve is deliberately gentle through
/// level 2, introduces prediction at 3, interception at 4, and goes full
/// chaos with a mastermind at 5.
fn chaser_roster(level: u32) -> Vec<Chaser> {
    use ChaserBehavior::*;
    match level {
        1 => vec![Chaser::new(300.0, 300.0, 1.2, SmartPatrol, 150.0)],
        2 => vec![Chaser::new(500.0, 300.0, 1.3, SmartPatrol, 170.0)],
        3 => vec![
            Chaser::new(200.0, 200.0, 1.4, SmartPatrol, 180.0),
            Chaser::new(700.0, 500.0, 1.4, Predictive, 200.0),
            Chaser::new(500.0, 350.0, 1.35, SmartPatrol, 190.0),
        ],
        4 => vec![
            Chaser::new(150.0, 150.0, 1.6, Interceptor, 240.0),
            Chaser::new(850.0, 150.0, 1.6, SmartPatrol, 240.0),
            Chaser::new(150.0, 550.0, 1.6, Predictive, 260.0),
            Chaser::new(850.0, 550.0, 1.5, Interceptor, 280.0),
        ],
        _ => vec![
            Chaser::new(150.0, 150.0, 2.0, Interceptor, 320.0),
            Chaser::new(850.0, 150.0, 2.0, Interceptor, 320.0),
            Chaser::new(150.0, 550.0, 2.0, Predictive, 340.0),
            Chaser::new(850.0, 550.0, 2.0, Predictive, 340.0),
            Chaser::new(500.0, 350.0, 2.3, Mastermind, 400.0),
        ],
    }
}

/// The office floor plan: outer walls with elevator gaps, entrance,
/// reception desk, three cubicle blocks, lower cubicle row, conference room
/// and the break-room enclosure with a door gap.
fn office_walls() -> Vec<Rect> {
    vec![
        // Outer walls, with gaps for the two elevators
        Rect::from_xywh(0.0, 0.0, 1000.0, 20.0),
        Rect::from_xywh(0.0, 680.0, 400.0, 20.0),
        Rect::from_xywh(600.0, 680.0, 400.0, 20.0),
        Rect::from_xywh(0.0, 0.0, 20.0, 300.0),
        Rect::from_xywh(0.0, 400.0, 20.0, 300.0),
        Rect::from_xywh(980.0, 0.0, 20.0, 700.0),
        // Front door area (gap in the top wall)
        Rect::from_xywh(20.0, 20.0, 80.0, 60.0),
        Rect::from_xywh(180.0, 20.0, 820.0, 60.0),
        // Reception desk
        Rect::from_xywh(100.0, 120.0, 200.0, 20.0),
        // Left cubicle block
        Rect::from_xywh(200.0, 200.0, 20.0, 120.0),
        Rect::from_xywh(200.0, 320.0, 120.0, 20.0),
        // Middle cubicle block
        Rect::from_xywh(400.0, 200.0, 20.0, 120.0),
        Rect::from_xywh(420.0, 200.0, 180.0, 20.0),
        Rect::from_xywh(600.0, 200.0, 20.0, 120.0),
        // Right cubicle block
        Rect::from_xywh(700.0, 200.0, 20.0, 120.0),
        Rect::from_xywh(700.0, 320.0, 120.0, 20.0),
        // Lower cubicle row
        Rect::from_xywh(100.0, 450.0, 120.0, 20.0),
        Rect::from_xywh(300.0, 450.0, 120.0, 20.0),
        Rect::from_xywh(500.0, 450.0, 120.0, 20.0),
        Rect::from_xywh(700.0, 450.0, 120.0, 20.0),
        // Conference room
        Rect::from_xywh(800.0, 200.0, 20.0, 200.0),
        Rect::from_xywh(800.0, 400.0, 100.0, 20.0),
        // Break room enclosure, door gap on the left
        Rect::from_xywh(830.0, 530.0, 150.0, 20.0),
        Rect::from_xywh(830.0, 620.0, 20.0, 60.0),
        Rect::from_xywh(830.0, 530.0, 20.0, 40.0),
    ]
}
