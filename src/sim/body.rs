//! Axis-aligned boxes and the shared physical body every entity embeds

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (top-left origin, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self::new(pos.x, pos.y, size.x, size.y)
    }

    /// Top-left corner
    #[inline]
    pub fn origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.h
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Grow the rectangle by `margin` on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self::new(
            self.x - margin,
            self.y - margin,
            self.w + margin * 2.0,
            self.h + margin * 2.0,
        )
    }
}

/// Anything with an axis-aligned bounding box
pub trait Bounded {
    fn bounds(&self) -> Rect;
}

impl Bounded for Rect {
    fn bounds(&self) -> Rect {
        *self
    }
}

/// Physical state shared by every entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Body {
    /// Top-left corner in world units
    pub pos: Vec2,
    /// Fixed extent
    pub size: Vec2,
    /// Velocity in units per 60 Hz frame
    pub vel: Vec2,
    /// Participates in simulation and collision
    pub active: bool,
    /// Participates in rendering
    pub visible: bool,
    /// Resolved onto a platform top this tick
    pub grounded: bool,
    pub ignore_gravity: bool,
}

impl Body {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(w, h),
            vel: Vec2::ZERO,
            active: true,
            visible: true,
            grounded: false,
            ignore_gravity: false,
        }
    }

    #[inline]
    pub fn rect(&self) -> Rect {
        Rect::from_pos_size(self.pos, self.size)
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }
}

impl Bounded for Body {
    fn bounds(&self) -> Rect {
        self.rect()
    }
}
