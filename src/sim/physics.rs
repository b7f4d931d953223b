//! AABB collision and frame integration
//!
//! Stateless helpers. Velocities are expressed in "60 Hz frame" units and
//! every integration step scales the millisecond delta by [`TIME_SCALE`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::{Body, Bounded, Rect};
use super::player::Player;
use crate::consts::*;

/// Side of `b` that `a` hit, seen from `a`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    /// `a` is above `b` (landed on it)
    Top,
    /// `a` is below `b` (bumped its head)
    Bottom,
    /// `a` is left of `b`
    Left,
    /// `a` is right of `b`
    Right,
}

/// Result of a detailed overlap test
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionInfo {
    pub collided: bool,
    pub direction: Option<Direction>,
    pub overlap_x: f32,
    pub overlap_y: f32,
}

impl CollisionInfo {
    pub fn miss() -> Self {
        Self {
            collided: false,
            direction: None,
            overlap_x: 0.0,
            overlap_y: 0.0,
        }
    }
}

/// Strict AABB overlap. Boxes that only share an edge do not collide.
#[inline]
pub fn check_collision(a: &impl Bounded, b: &impl Bounded) -> bool {
    let (a, b) = (a.bounds(), b.bounds());
    a.x < b.right() && a.right() > b.x && a.y < b.bottom() && a.bottom() > b.y
}

/// Overlap test that also reports the shallow axis.
///
/// The shallower penetration axis decides the direction; ties resolve
/// vertically.
pub fn check_collision_detailed(a: &impl Bounded, b: &impl Bounded) -> CollisionInfo {
    if !check_collision(a, b) {
        return CollisionInfo::miss();
    }
    let (a, b) = (a.bounds(), b.bounds());

    let overlap_x = (a.right() - b.x).min(b.right() - a.x);
    let overlap_y = (a.bottom() - b.y).min(b.bottom() - a.y);

    let direction = if overlap_x < overlap_y {
        if a.x < b.x {
            Direction::Left
        } else {
            Direction::Right
        }
    } else if a.y < b.y {
        Direction::Top
    } else {
        Direction::Bottom
    };

    CollisionInfo {
        collided: true,
        direction: Some(direction),
        overlap_x,
        overlap_y,
    }
}

/// Push the player out of a platform along the shallow axis.
///
/// Landing on top is the only way the player becomes grounded.
pub fn resolve_collision(player: &mut Player, platform: &Rect) -> Option<Direction> {
    let info = check_collision_detailed(&player.body, platform);
    let direction = info.direction?;
    let body = &mut player.body;

    match direction {
        Direction::Top => {
            body.pos.y = platform.y - body.size.y;
            body.vel.y = 0.0;
            body.grounded = true;
            player.jump_count = 0;
        }
        Direction::Bottom => {
            body.pos.y = platform.bottom();
            body.vel.y = 0.0;
        }
        Direction::Left => {
            body.pos.x = platform.x - body.size.x;
            body.vel.x = 0.0;
        }
        Direction::Right => {
            body.pos.x = platform.right();
            body.vel.x = 0.0;
        }
    }

    Some(direction)
}

/// Resolve the player against every platform in order.
///
/// Returns true if any platform grounded the player.
pub fn check_platform_collisions(
    player: &mut Player,
    platforms: impl IntoIterator<Item = Rect>,
) -> bool {
    let mut grounded = false;
    for platform in platforms {
        if check_collision(&player.body, &platform) {
            resolve_collision(player, &platform);
            if player.body.grounded {
                grounded = true;
            }
        }
    }
    grounded
}

pub fn apply_gravity(body: &mut Body, dt: f32) {
    if body.grounded || body.ignore_gravity {
        return;
    }
    body.vel.y = (body.vel.y + GRAVITY * dt * TIME_SCALE).min(MAX_FALL_SPEED);
}

pub fn apply_friction(body: &mut Body) {
    body.vel.x *= if body.grounded { FRICTION } else { AIR_RESISTANCE };
    if body.vel.x.abs() < 0.1 {
        body.vel.x = 0.0;
    }
}

#[inline]
pub fn update_position(body: &mut Body, dt: f32) {
    body.pos += body.vel * dt * TIME_SCALE;
}

/// Clamp a body to the left, right and top world edges.
///
/// Returns false once the body has fallen below the world; the caller
/// decides what that means.
pub fn check_world_bounds(body: &mut Body, world_width: f32, world_height: f32) -> bool {
    if body.pos.x < 0.0 {
        body.pos.x = 0.0;
        body.vel.x = 0.0;
    }
    if body.pos.x + body.size.x > world_width {
        body.pos.x = world_width - body.size.x;
        body.vel.x = 0.0;
    }
    if body.pos.y < 0.0 {
        body.pos.y = 0.0;
        body.vel.y = 0.0;
    }
    body.pos.y <= world_height
}

pub fn clamp_velocity(body: &mut Body) {
    body.vel.x = body.vel.x.clamp(-MAX_HORIZONTAL_SPEED, MAX_HORIZONTAL_SPEED);
    body.vel.y = body.vel.y.clamp(-MAX_FALL_SPEED, MAX_FALL_SPEED);
}

/// Base integration: gravity, position, friction, world bounds.
///
/// Returns the in-bounds flag from [`check_world_bounds`].
pub fn step_body(body: &mut Body, dt: f32, world: Vec2) -> bool {
    apply_gravity(body, dt);
    update_position(body, dt);
    apply_friction(body);
    check_world_bounds(body, world.x, world.y)
}

#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Angle (radians) of the vector from `from` to `to`
#[inline]
pub fn angle_between(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    d.y.atan2(d.x)
}

/// Inclusive point-in-rectangle test
pub fn point_in_rect(p: Vec2, r: &Rect) -> bool {
    p.x >= r.x && p.x <= r.right() && p.y >= r.y && p.y <= r.bottom()
}

/// Reflect `incident` about unit `normal`
pub fn calculate_bounce(incident: Vec2, normal: Vec2) -> Vec2 {
    incident - 2.0 * incident.dot(normal) * normal
}

pub fn apply_impulse(body: &mut Body, impulse: Vec2) {
    body.vel += impulse;
}

/// Where a body will be after `frames` frames at its current velocity
pub fn predict_position(body: &Body, frames: f32) -> Vec2 {
    body.pos + body.vel * frames
}

/// Would a box of `size` moving from `start` to `end` touch any obstacle?
///
/// Tests the union of the start and end boxes, which is conservative.
pub fn moving_collision(start: Vec2, end: Vec2, size: Vec2, obstacles: &[Rect]) -> bool {
    let min = start.min(end);
    let max = (start + size).max(end + size);
    let swept = Rect::new(min.x, min.y, max.x - min.x, max.y - min.y);
    obstacles.iter().any(|o| check_collision(&swept, o))
}
