//! Steering primitives
//!
//! Straight-line homing plus a greedy one-step local planner. Agents do not
//! path-plan; every tick they pick the best of 8 candidate offsets that does
//! not clip a wall. Crude, but with the stuck-teleport in the chaser update
//! it is enough for an office floor plan.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::geom::Rect;
use crate::consts::DIAGONAL_SCALE;

/// Advance `pos` toward `target` by `speed`, or not at all if already there.
pub fn move_towards(pos: &mut Vec2, target: Vec2, speed: f32) {
    let delta = target - *pos;
    let distance = delta.length();
    if distance > 0.0 {
        *pos += delta / distance * speed;
    }
}

/// The 8 candidate step directions: 4 cardinals at full magnitude, 4
/// diagonals scaled so the step length stays constant.
const STEP_DIRS: [Vec2; 8] = [
    Vec2::new(0.0, -1.0),
    Vec2::new(1.0, 0.0),
    Vec2::new(0.0, 1.0),
    Vec2::new(-1.0, 0.0),
    Vec2::new(DIAGONAL_SCALE, -DIAGONAL_SCALE),
    Vec2::new(DIAGONAL_SCALE, DIAGONAL_SCALE),
    Vec2::new(-DIAGONAL_SCALE, DIAGONAL_SCALE),
    Vec2::new(-DIAGONAL_SCALE, -DIAGONAL_SCALE),
];

/// Greedy obstacle-avoiding step selection.
///
/// Evaluates the 8 candidate offsets scaled by `speed`, discards any whose
/// resulting bounding box would overlap a wall, and returns the survivor
/// closest to `target`. If every candidate is blocked, takes a random
/// cardinal step anyway - clipping a wall beats deadlocking in a corner.
pub fn choose_step(
    pos: Vec2,
    size: Vec2,
    speed: f32,
    target: Vec2,
    walls: &[Rect],
    rng: &mut Pcg32,
) -> Vec2 {
    let mut best: Option<(Vec2, f32)> = None;

    for dir in STEP_DIRS {
        let candidate = pos + dir * speed;
        let blocked = walls
            .iter()
            .any(|wall| Rect::new(candidate, size).overlaps(wall));
        if blocked {
            continue;
        }
        let distance = candidate.distance(target);
        if best.is_none_or(|(_, d)| distance < d) {
            best = Some((candidate, distance));
        }
    }

    match best {
        Some((candidate, _)) => candidate,
        // Boxed in on all 8 sides: escape through a random cardinal
        None => pos + STEP_DIRS[rng.random_range(0..4)] * speed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_move_towards_normalizes() {
        let mut pos = Vec2::ZERO;
        move_towards(&mut pos, Vec2::new(30.0, 40.0), 5.0);
        // Direction (3,4)/5, advanced by 5
        assert!((pos.x - 3.0).abs() < 1e-4);
        assert!((pos.y - 4.0).abs() < 1e-4);
    }

    #[test]
    fn test_move_towards_zero_distance() {
        let mut pos = Vec2::new(7.0, 7.0);
        move_towards(&mut pos, Vec2::new(7.0, 7.0), 5.0);
        assert_eq!(pos, Vec2::new(7.0, 7.0));
    }

    #[test]
    fn test_choose_step_heads_toward_target() {
        let mut rng = Pcg32::seed_from_u64(1);
        let pos = Vec2::new(100.0, 100.0);
        let next = choose_step(pos, Vec2::splat(20.0), 3.0, Vec2::new(500.0, 100.0), &[], &mut rng);
        assert_eq!(next, Vec2::new(103.0, 100.0));
    }

    #[test]
    fn test_choose_step_avoids_walls() {
        let mut rng = Pcg32::seed_from_u64(1);
        // A wall directly to the right blocks the straight-line candidate
        let walls = vec![Rect::from_xywh(110.0, 0.0, 20.0, 300.0)];
        let pos = Vec2::new(100.0, 100.0);
        let next = choose_step(
            pos,
            Vec2::splat(10.0),
            4.0,
            Vec2::new(500.0, 100.0),
            &walls,
            &mut rng,
        );
        assert!(!Rect::new(next, Vec2::splat(10.0)).overlaps(&walls[0]));
        assert_ne!(next, pos);
    }

    #[test]
    fn test_choose_step_boxed_in_takes_random_cardinal() {
        let mut rng = Pcg32::seed_from_u64(42);
        // Ring of walls hugging the entity tightly enough that all 8
        // candidate steps collide while the current position stays clear
        let walls = vec![
            Rect::from_xywh(70.0, 92.0, 80.0, 6.0),
            Rect::from_xywh(70.0, 122.0, 80.0, 6.0),
            Rect::from_xywh(92.0, 70.0, 6.0, 80.0),
            Rect::from_xywh(122.0, 70.0, 6.0, 80.0),
        ];
        let pos = Vec2::new(100.0, 100.0);
        let size = Vec2::splat(20.0);
        let speed = 4.0;
        assert!(!walls.iter().any(|w| Rect::new(pos, size).overlaps(w)));

        for dir in STEP_DIRS {
            let candidate = Rect::new(pos + dir * speed, size);
            assert!(
                walls.iter().any(|w| candidate.overlaps(w)),
                "candidate {dir:?} unexpectedly free"
            );
        }

        let next = choose_step(pos, size, speed, Vec2::new(500.0, 100.0), &walls, &mut rng);
        // The escape valve moves a full cardinal step despite the collision
        let step = next - pos;
        assert!((step.length() - speed).abs() < 1e-4);
        assert!(step.x == 0.0 || step.y == 0.0);
    }
}
