//! Platforms, collectibles, hazards, projectiles and particles

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::{Body, Rect};
use super::physics::{apply_gravity, step_body, update_position};
use crate::consts::MAX_LIVES;

/// Frames a scan highlight lasts (~3 s)
pub const SCAN_HIGHLIGHT_FRAMES: u32 = 180;
/// Frames an entangle link lasts (~2 s)
pub const ENTANGLE_FRAMES: u32 = 120;
pub const COLLECTIBLE_SIZE: f32 = 16.0;
pub const PROJECTILE_TTL: u32 = 300;
pub const PARTICLE_SIZE: f32 = 4.0;

/// Colours used by gameplay spawns (0xRRGGBB)
pub mod colors {
    pub const RED: u32 = 0xff0000;
    pub const YELLOW: u32 = 0xffff00;
    pub const ORANGE: u32 = 0xff8000;
    pub const BOSS_ORANGE: u32 = 0xff8800;
    pub const CYAN: u32 = 0x00ffff;
    pub const GREEN: u32 = 0x00ff00;
    pub const WHITE: u32 = 0xffffff;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlatformKind {
    #[default]
    Normal,
    /// Floats up and down
    Quantum,
    /// Traces an ellipse around its origin
    Moving,
    Holographic,
    /// Solid, and hurts on contact
    Spikes,
    Temple,
}

impl PlatformKind {
    pub fn color(self) -> u32 {
        match self {
            PlatformKind::Normal | PlatformKind::Moving => 0x8b4513,
            PlatformKind::Quantum => 0x00ffff,
            PlatformKind::Holographic => 0x00ff80,
            PlatformKind::Spikes => 0xff0000,
            PlatformKind::Temple => 0xff8800,
        }
    }

    /// Damage dealt to the player on contact
    pub fn contact_damage(self) -> i32 {
        match self {
            PlatformKind::Spikes => 5,
            _ => 0,
        }
    }
}

/// Animation parameters for quantum and moving platforms
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlatformMotion {
    pub float_amplitude: f32,
    pub float_speed: f32,
    pub move_x: f32,
    pub move_y: f32,
    pub move_speed: f32,
}

impl Default for PlatformMotion {
    fn default() -> Self {
        Self {
            float_amplitude: 20.0,
            float_speed: 0.5,
            move_x: 100.0,
            move_y: 50.0,
            move_speed: 1.0,
        }
    }
}

/// Solid, kinematic level geometry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Platform {
    pub kind: PlatformKind,
    pub body: Body,
    /// Anchor the animation oscillates around
    pub origin: Vec2,
    pub motion: PlatformMotion,
    pub phase: f32,
    pub opacity: f32,
}

impl Platform {
    pub fn new(kind: PlatformKind, rect: Rect, motion: PlatformMotion) -> Self {
        let mut body = Body::new(rect.x, rect.y, rect.w, rect.h);
        body.ignore_gravity = true;
        let opacity = match kind {
            PlatformKind::Quantum => 0.7,
            PlatformKind::Holographic => 0.8,
            _ => 1.0,
        };
        Self {
            kind,
            origin: body.pos,
            body,
            motion,
            phase: 0.0,
            opacity,
        }
    }

    pub fn with_phase(mut self, phase: f32) -> Self {
        self.phase = phase;
        self
    }

    /// Whether the platform moves on its own
    pub fn is_animated(&self) -> bool {
        matches!(self.kind, PlatformKind::Quantum | PlatformKind::Moving)
    }

    pub fn rect(&self) -> Rect {
        self.body.rect()
    }

    /// Reposition by absolute assignment; riders are not carried
    pub fn update(&mut self, dt: f32) {
        match self.kind {
            PlatformKind::Quantum => {
                self.phase += dt * 0.001 * self.motion.float_speed;
                self.body.pos.y = self.origin.y + self.phase.sin() * self.motion.float_amplitude;
                self.opacity = 0.7 + (self.phase * 2.0).sin() * 0.3;
            }
            PlatformKind::Moving => {
                self.phase += dt * 0.001 * self.motion.move_speed;
                self.body.pos.x = self.origin.x + self.phase.sin() * self.motion.move_x;
                self.body.pos.y = self.origin.y + self.phase.cos() * self.motion.move_y;
            }
            _ => {}
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HazardKind {
    Spikes,
    Energy,
    Laser,
}

impl HazardKind {
    pub fn contact_damage(self) -> i32 {
        match self {
            HazardKind::Spikes | HazardKind::Energy => 5,
            HazardKind::Laser => 10,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            HazardKind::Spikes => 0xff4444,
            HazardKind::Energy => 0x00ffff,
            HazardKind::Laser => 0xff00ff,
        }
    }
}

/// Non-solid damage zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hazard {
    pub kind: HazardKind,
    pub rect: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectibleKind {
    Banana,
    Key,
    Quantum,
    Health,
}

impl CollectibleKind {
    /// Score (or lives, for health) granted on pickup
    pub fn value(self) -> u32 {
        match self {
            CollectibleKind::Banana => 10,
            CollectibleKind::Key => 100,
            CollectibleKind::Quantum => 50,
            CollectibleKind::Health => 1,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            CollectibleKind::Banana => 0xffff00,
            CollectibleKind::Key => 0xff8800,
            CollectibleKind::Quantum => 0x00ffff,
            CollectibleKind::Health => 0x00ff00,
        }
    }

    pub fn glow_color(self) -> u32 {
        match self {
            CollectibleKind::Banana => 0xffaa00,
            CollectibleKind::Key => 0xffcc00,
            CollectibleKind::Quantum => 0xffffff,
            CollectibleKind::Health => 0x88ff88,
        }
    }
}

/// A pickup. Removed from the world once collected.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub kind: CollectibleKind,
    pub body: Body,
    pub collected: bool,
    /// Frames of scan highlight left
    pub scanned: u32,
    /// Frames of entangle link left
    pub entangled: u32,
    /// Drives the render-only bob
    pub float_phase: f32,
}

impl Collectible {
    pub fn new(kind: CollectibleKind, x: f32, y: f32, float_phase: f32) -> Self {
        let mut body = Body::new(x, y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE);
        body.ignore_gravity = true;
        Self {
            kind,
            body,
            collected: false,
            scanned: 0,
            entangled: 0,
            float_phase,
        }
    }

    pub fn update(&mut self, dt: f32) {
        self.scanned = self.scanned.saturating_sub(1);
        self.entangled = self.entangled.saturating_sub(1);
        self.float_phase += dt * 0.001;
    }

    /// Vertical render offset; the hitbox does not move
    pub fn bob_offset(&self) -> f32 {
        self.float_phase.sin() * 3.0
    }
}

/// A shot. Hostile shots fly straight, friendly ones arc.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub body: Body,
    pub hostile: bool,
    pub damage: i32,
    pub color: u32,
    /// Frames left
    pub ttl: u32,
}

impl Projectile {
    /// Spawn centred on `center`
    pub fn new(center: Vec2, vel: Vec2, hostile: bool, color: u32, size: f32) -> Self {
        let mut body = Body::new(center.x - size / 2.0, center.y - size / 2.0, size, size);
        body.vel = vel;
        body.ignore_gravity = hostile;
        Self {
            body,
            hostile,
            damage: if hostile { 15 } else { 10 },
            color,
            ttl: PROJECTILE_TTL,
        }
    }

    /// Ballistic step, no friction or bounds clamp. Returns false once expired.
    pub fn update(&mut self, dt: f32) -> bool {
        apply_gravity(&mut self.body, dt);
        update_position(&mut self.body, dt);
        self.ttl = self.ttl.saturating_sub(1);
        self.ttl > 0
    }

    /// Still inside the level expanded by `margin`
    pub fn in_bounds(&self, world: Vec2, margin: f32) -> bool {
        let p = self.body.pos;
        p.x >= -margin && p.x <= world.x + margin && p.y >= -margin && p.y <= world.y + margin
    }
}

/// Cosmetic spark. Never collides.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub body: Body,
    pub color: u32,
    pub life: u32,
    pub max_life: u32,
    /// Drawn as a circle instead of a square
    pub round: bool,
}

impl Particle {
    /// Random velocity in ±4 per axis and a life of 20..50 frames
    pub fn burst_one(at: Vec2, color: u32, rng: &mut impl Rng) -> Self {
        let mut body = Body::new(at.x, at.y, PARTICLE_SIZE, PARTICLE_SIZE);
        body.vel = Vec2::new(rng.random_range(-4.0..4.0), rng.random_range(-4.0..4.0));
        let life = rng.random_range(20..50);
        Self {
            body,
            color,
            life,
            max_life: life,
            round: rng.random_bool(0.5),
        }
    }

    /// Returns false once the particle has burned out
    pub fn update(&mut self, dt: f32, world: Vec2) -> bool {
        step_body(&mut self.body, dt, world);
        self.life = self.life.saturating_sub(1);
        self.life > 0
    }

    pub fn opacity(&self) -> f32 {
        if self.max_life == 0 {
            0.0
        } else {
            self.life as f32 / self.max_life as f32
        }
    }
}

/// Lives after picking up a health item
pub fn lives_after_health(lives: i32) -> i32 {
    (lives + CollectibleKind::Health.value() as i32).min(MAX_LIVES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_quantum_platform_floats() {
        let mut p = Platform::new(
            PlatformKind::Quantum,
            Rect::new(100.0, 300.0, 80.0, 20.0),
            PlatformMotion::default(),
        );
        // Quarter period: phase = pi/2 after dt * 0.0005 = pi/2
        let dt = std::f32::consts::FRAC_PI_2 / 0.0005;
        p.update(dt);
        assert!((p.body.pos.y - 320.0).abs() < 1e-3);
        assert_eq!(p.body.pos.x, 100.0);
        assert!(p.opacity >= 0.4 && p.opacity <= 1.0);
    }

    #[test]
    fn test_moving_platform_ellipse() {
        let motion = PlatformMotion {
            move_x: 100.0,
            move_y: 50.0,
            move_speed: 1.0,
            ..Default::default()
        };
        let mut p = Platform::new(PlatformKind::Moving, Rect::new(500.0, 400.0, 100.0, 20.0), motion);
        p.update(0.0);
        // cos(0) = 1: starts below origin by move_y
        assert_eq!(p.body.pos, Vec2::new(500.0, 450.0));
        p.update(std::f32::consts::FRAC_PI_2 / 0.001);
        assert!((p.body.pos.x - 600.0).abs() < 1e-3);
        assert!((p.body.pos.y - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_static_platform_does_not_move() {
        let mut p = Platform::new(PlatformKind::Normal, Rect::new(0.0, 0.0, 10.0, 10.0), PlatformMotion::default());
        p.update(1000.0);
        assert_eq!(p.body.pos, Vec2::ZERO);
    }

    #[test]
    fn test_collectible_values() {
        assert_eq!(CollectibleKind::Banana.value(), 10);
        assert_eq!(CollectibleKind::Key.value(), 100);
        assert_eq!(CollectibleKind::Quantum.value(), 50);
        assert_eq!(CollectibleKind::Health.value(), 1);
        assert_eq!(lives_after_health(3), 4);
        assert_eq!(lives_after_health(5), 5);
    }

    #[test]
    fn test_collectible_timers_count_down() {
        let mut c = Collectible::new(CollectibleKind::Banana, 0.0, 0.0, 0.0);
        c.scanned = 2;
        c.entangled = 1;
        c.update(16.0);
        assert_eq!((c.scanned, c.entangled), (1, 0));
        c.update(16.0);
        assert_eq!(c.scanned, 0);
    }

    #[test]
    fn test_projectile_spawns_centred() {
        let p = Projectile::new(Vec2::new(100.0, 100.0), Vec2::new(8.0, 0.0), true, colors::RED, 8.0);
        assert_eq!(p.body.pos, Vec2::new(96.0, 96.0));
        assert_eq!(p.damage, 15);
        assert!(p.body.ignore_gravity);

        let friendly = Projectile::new(Vec2::ZERO, Vec2::ZERO, false, colors::WHITE, 8.0);
        assert_eq!(friendly.damage, 10);
        assert!(!friendly.body.ignore_gravity);
    }

    #[test]
    fn test_projectile_ttl() {
        let mut p = Projectile::new(Vec2::new(100.0, 100.0), Vec2::ZERO, true, colors::RED, 8.0);
        for _ in 0..(PROJECTILE_TTL - 1) {
            assert!(p.update(16.0));
        }
        assert!(!p.update(16.0));
    }

    #[test]
    fn test_hostile_projectile_flies_straight() {
        let mut p = Projectile::new(Vec2::new(100.0, 100.0), Vec2::new(6.0, 0.0), true, colors::RED, 8.0);
        for _ in 0..10 {
            p.update(1000.0 / 60.0);
        }
        assert_eq!(p.body.vel, Vec2::new(6.0, 0.0));
        assert_eq!(p.body.pos.y, 96.0);
    }

    #[test]
    fn test_projectile_bounds() {
        let world = Vec2::new(1000.0, 500.0);
        let mut p = Projectile::new(Vec2::new(50.0, 50.0), Vec2::ZERO, true, colors::RED, 8.0);
        assert!(p.in_bounds(world, 100.0));
        p.body.pos.x = -101.0;
        assert!(!p.in_bounds(world, 100.0));
        p.body.pos = Vec2::new(500.0, 601.0);
        assert!(!p.in_bounds(world, 100.0));
    }

    #[test]
    fn test_particle_fades_and_dies() {
        let mut rng = Pcg32::seed_from_u64(7);
        let world = Vec2::new(1000.0, 1000.0);
        let mut p = Particle::burst_one(Vec2::new(500.0, 500.0), colors::YELLOW, &mut rng);
        assert!((20..50).contains(&p.life));
        assert!(p.body.vel.x.abs() <= 4.0 && p.body.vel.y.abs() <= 4.0);
        assert_eq!(p.opacity(), 1.0);

        let life = p.life;
        for _ in 0..(life - 1) {
            assert!(p.update(16.0, world));
        }
        assert!(p.opacity() > 0.0);
        assert!(!p.update(16.0, world));
        assert_eq!(p.opacity(), 0.0);
    }
}
