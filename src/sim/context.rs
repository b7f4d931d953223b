//! Per-tick handle given to entity updates
//!
//! Entities never reach into the world directly. They read what they need
//! from the context and queue sounds and spawns, which the world applies
//! once the iteration that produced them has finished.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::body::Rect;
use super::enemy::Enemy;
use super::entity::{Platform, Projectile};
use super::state::GameEvent;
use crate::audio::Sound;

/// Something an entity asked the world to create
#[derive(Debug, Clone)]
pub enum Spawn {
    Projectile(Projectile),
    Enemy(Enemy),
}

pub struct TickCtx<'a> {
    /// Frame delta in milliseconds
    pub dt: f32,
    /// Level extent
    pub world: Vec2,
    /// Player box as of the start of the pass
    pub target: Rect,
    pub platforms: &'a [Platform],
    pub rng: &'a mut Pcg32,
    pub events: &'a mut Vec<GameEvent>,
    pub spawns: Vec<Spawn>,
}

impl<'a> TickCtx<'a> {
    pub fn new(
        dt: f32,
        world: Vec2,
        target: Rect,
        platforms: &'a [Platform],
        rng: &'a mut Pcg32,
        events: &'a mut Vec<GameEvent>,
    ) -> Self {
        Self {
            dt,
            world,
            target,
            platforms,
            rng,
            events,
            spawns: Vec::new(),
        }
    }

    pub fn play(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }

    pub fn spawn(&mut self, spawn: Spawn) {
        self.spawns.push(spawn);
    }

    /// True with probability `p`
    pub fn chance(&mut self, p: f64) -> bool {
        self.rng.random_bool(p)
    }

    /// Uniform in [-half, half)
    pub fn jitter(&mut self, half: f32) -> f32 {
        self.rng.random_range(-half..half)
    }
}
