//! Axis-aligned collision geometry
//!
//! Everything in the office is a box: walls, desks, agents, trap zones.
//! Overlap tests use strict inequalities (touching edges do not collide),
//! penetration resolution pushes along the shallow axis, and line of sight
//! is a fixed-count point sample along the segment.

use glam::Vec2;
use serde::Serialize;

/// An axis-aligned rectangle: top-left corner plus size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, size }
    }

    pub const fn from_xywh(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size * 0.5
    }

    /// Strict AABB overlap - rectangles that merely touch do not overlap.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.pos.x < other.pos.x + other.size.x
            && self.pos.x + self.size.x > other.pos.x
            && self.pos.y < other.pos.y + other.size.y
            && self.pos.y + self.size.y > other.pos.y
    }

    /// Strict containment of a point - points on the boundary are outside.
    pub fn contains_point(&self, p: Vec2) -> bool {
        p.x > self.pos.x
            && p.x < self.pos.x + self.size.x
            && p.y > self.pos.y
            && p.y < self.pos.y + self.size.y
    }
}

/// Push a moving box out of an obstacle it overlaps.
///
/// Computes the penetration depth on each axis and resolves along the
/// shallower one, snapping the mover flush to the obstacle edge on the side
/// its center is on. No-op when the boxes do not overlap, so re-running the
/// resolver on an already separated pair changes nothing.
pub fn resolve_penetration(pos: &mut Vec2, size: Vec2, obstacle: &Rect) {
    let mover = Rect::new(*pos, size);
    if !mover.overlaps(obstacle) {
        return;
    }

    let overlap_x = (pos.x + size.x - obstacle.pos.x).min(obstacle.pos.x + obstacle.size.x - pos.x);
    let overlap_y = (pos.y + size.y - obstacle.pos.y).min(obstacle.pos.y + obstacle.size.y - pos.y);

    if overlap_x < overlap_y {
        if mover.center().x < obstacle.center().x {
            pos.x = obstacle.pos.x - size.x;
        } else {
            pos.x = obstacle.pos.x + obstacle.size.x;
        }
    } else if mover.center().y < obstacle.center().y {
        pos.y = obstacle.pos.y - size.y;
    } else {
        pos.y = obstacle.pos.y + obstacle.size.y;
    }
}

/// Resolve a mover against every wall in a single pass.
///
/// Each wall is resolved independently; a push-out from one wall can leave
/// residual overlap with another. That approximation is accepted - there is
/// no convergence loop.
pub fn resolve_against_walls(pos: &mut Vec2, size: Vec2, walls: &[Rect]) {
    for wall in walls {
        resolve_penetration(pos, size, wall);
    }
}

/// Number of points sampled along the sight segment.
const SIGHT_SAMPLES: u32 = 20;

/// Sampled line-of-sight test between two points.
///
/// Walks `SIGHT_SAMPLES` evenly spaced points from `from` toward `to` and
/// fails if any lands strictly inside a wall. Thin walls can slip between
/// samples; that is a known limitation of the sampling approach, not
/// something callers should compensate for.
pub fn line_of_sight(from: Vec2, to: Vec2, walls: &[Rect]) -> bool {
    let step = (to - from) / SIGHT_SAMPLES as f32;
    for i in 0..SIGHT_SAMPLES {
        let point = from + step * i as f32;
        if walls.iter().any(|wall| wall.contains_point(point)) {
            return false;
        }
    }
    true
}
