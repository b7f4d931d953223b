//! Enemies and their per-kind behaviour

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::context::{Spawn, TickCtx};
use super::entity::{Platform, Projectile, colors};
use super::level::EnemyDef;
use super::physics::{angle_between, step_body};
use crate::audio::Sound;

pub const AGGRO_RANGE: f32 = 300.0;
pub const ATTACK_RANGE: f32 = 150.0;
pub const DEFAULT_PATROL_RANGE: f32 = 100.0;
pub const DRONE_SHOT_SPEED: f32 = 8.0;
pub const DRONE_COOLDOWN: u32 = 60;
/// How far above the feet a platform top may be and still catch a falling bandit
const LANDING_TOLERANCE: f32 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    /// Ground patroller that chases when close
    Bandit,
    /// Erratic floater that flickers and teleports
    Glitch,
    /// Flying shooter
    Drone,
    Boss,
}

impl EnemyKind {
    pub fn size(self) -> Vec2 {
        match self {
            EnemyKind::Bandit => Vec2::new(28.0, 40.0),
            EnemyKind::Glitch => Vec2::new(32.0, 32.0),
            EnemyKind::Drone => Vec2::new(24.0, 24.0),
            EnemyKind::Boss => Vec2::new(80.0, 80.0),
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            EnemyKind::Bandit => 2.0,
            EnemyKind::Glitch => 1.5,
            EnemyKind::Drone => 3.0,
            EnemyKind::Boss => 1.0,
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            EnemyKind::Boss => 300,
            _ => 100,
        }
    }

    pub fn damage(self) -> i32 {
        match self {
            EnemyKind::Boss => 20,
            _ => 10,
        }
    }

    pub fn ignores_gravity(self) -> bool {
        matches!(self, EnemyKind::Glitch | EnemyKind::Drone)
    }

    /// Score for a kill
    pub fn reward(self) -> u64 {
        match self {
            EnemyKind::Boss => 1000,
            _ => 100,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            EnemyKind::Bandit => 0xff0000,
            EnemyKind::Glitch => 0xff00ff,
            EnemyKind::Drone => 0x00ff80,
            EnemyKind::Boss => 0xff8800,
        }
    }
}

/// Boss attack pattern, chosen by remaining health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BossPhase {
    /// One aimed shot
    Single,
    /// Three-way spread
    Triple,
    /// Three quick shots with random spread
    Rapid,
}

impl BossPhase {
    pub fn for_health(health: i32, max_health: i32) -> Self {
        let (h, max) = (health as f32, max_health as f32);
        if h < max / 3.0 {
            BossPhase::Rapid
        } else if h < max * 2.0 / 3.0 {
            BossPhase::Triple
        } else {
            BossPhase::Single
        }
    }

    /// Frames until the next volley
    pub fn cooldown(self) -> u32 {
        match self {
            BossPhase::Single => 90,
            BossPhase::Triple => 60,
            BossPhase::Rapid => 20,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AiState {
    Patrol,
    Chase,
    Float,
    Boss(BossPhase),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub kind: EnemyKind,
    pub body: Body,
    pub speed: f32,
    pub health: i32,
    pub max_health: i32,
    /// Contact damage
    pub damage: i32,
    /// 1 right, -1 left
    pub direction: f32,
    pub start: Vec2,
    pub patrol_range: f32,
    pub aggro_range: f32,
    pub attack_range: f32,
    /// Frames until the next shot
    pub attack_cooldown: u32,
    pub ai: AiState,
    /// Seconds alive, drives oscillating movement
    pub time: f32,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: f32, y: f32, direction: f32) -> Self {
        let size = kind.size();
        let mut body = Body::new(x, y, size.x, size.y);
        body.ignore_gravity = kind.ignores_gravity();
        let ai = match kind {
            EnemyKind::Bandit | EnemyKind::Drone => AiState::Patrol,
            EnemyKind::Glitch => AiState::Float,
            EnemyKind::Boss => AiState::Boss(BossPhase::Single),
        };
        Self {
            kind,
            body,
            speed: kind.speed(),
            health: kind.max_health(),
            max_health: kind.max_health(),
            damage: kind.damage(),
            direction,
            start: Vec2::new(x, y),
            patrol_range: DEFAULT_PATROL_RANGE,
            aggro_range: AGGRO_RANGE,
            attack_range: ATTACK_RANGE,
            attack_cooldown: 0,
            ai,
            time: 0.0,
        }
    }

    /// Build from level data, facing a random way
    pub fn from_def(def: &EnemyDef, rng: &mut impl Rng) -> Self {
        let direction = if rng.random_bool(0.5) { 1.0 } else { -1.0 };
        let mut enemy = Self::new(def.kind, def.x, def.y, direction);
        if let Some(range) = def.patrol_range {
            enemy.patrol_range = range;
        }
        if let Some(health) = def.health {
            enemy.health = health;
            enemy.max_health = health;
        }
        enemy
    }

    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    pub fn take_damage(&mut self, amount: i32) {
        self.health -= amount;
    }

    pub fn boss_phase(&self) -> BossPhase {
        BossPhase::for_health(self.health, self.max_health)
    }

    /// Advance one tick. Returns false if the enemy fell out of the world.
    pub fn update(&mut self, ctx: &mut TickCtx) -> bool {
        if !self.body.active {
            return true;
        }
        let in_world = step_body(&mut self.body, ctx.dt, ctx.world);
        self.attack_cooldown = self.attack_cooldown.saturating_sub(1);
        self.time += ctx.dt * 0.001;

        match self.kind {
            EnemyKind::Bandit => self.update_bandit(ctx),
            EnemyKind::Glitch => self.update_glitch(ctx),
            EnemyKind::Drone => self.update_drone(ctx),
            EnemyKind::Boss => self.update_boss(ctx),
        }
        in_world
    }

    fn update_bandit(&mut self, ctx: &mut TickCtx) {
        self.settle_on(ctx.platforms);

        self.body.vel.x = self.direction * self.speed;
        if (self.body.pos.x - self.start.x).abs() > self.patrol_range {
            self.direction = -self.direction;
        }

        if self.body.grounded && ctx.chance(0.001) {
            self.body.vel.y = -10.0;
            self.body.grounded = false;
        }

        let target = ctx.target;
        if self.body.center().distance(target.center()) < self.aggro_range {
            self.ai = AiState::Chase;
            self.direction = if target.x - self.body.pos.x > 0.0 { 1.0 } else { -1.0 };
            self.body.vel.x = self.direction * self.speed * 1.5;
        } else {
            self.ai = AiState::Patrol;
        }
    }

    /// Land on a platform whose top the feet just reached
    fn settle_on(&mut self, platforms: &[Platform]) {
        let feet = self.body.rect();
        let ground = platforms.iter().map(Platform::rect).find(|p| {
            feet.x < p.right()
                && feet.right() > p.x
                && p.y >= feet.bottom() - LANDING_TOLERANCE
                && p.y <= feet.bottom()
        });
        match ground {
            Some(p) if self.body.vel.y >= 0.0 => {
                self.body.pos.y = p.y - self.body.size.y;
                self.body.vel.y = 0.0;
                self.body.grounded = true;
            }
            _ => self.body.grounded = false,
        }
    }

    fn update_glitch(&mut self, ctx: &mut TickCtx) {
        self.body.vel.x = (self.time * 2.0).sin() * self.speed;
        self.body.vel.y = (self.time * 1.5).cos() * self.speed;

        if ctx.chance(0.01) {
            self.body.visible = !self.body.visible;
        }
        if ctx.chance(0.005) {
            self.body.pos.x += ctx.jitter(50.0);
            self.body.pos.y += ctx.jitter(50.0);
        }
    }

    fn update_drone(&mut self, ctx: &mut TickCtx) {
        let delta = ctx.target.origin() - self.body.pos;
        let dist = delta.length();

        if dist < self.aggro_range {
            self.ai = AiState::Chase;
            let dir = delta.normalize_or_zero();
            self.body.vel = dir * self.speed;

            if self.attack_cooldown == 0 && dist < self.attack_range {
                let aim = if dir == Vec2::ZERO { Vec2::new(self.direction, 0.0) } else { dir };
                ctx.spawn(Spawn::Projectile(Projectile::new(
                    self.body.center(),
                    aim * DRONE_SHOT_SPEED,
                    true,
                    colors::RED,
                    8.0,
                )));
                ctx.play(Sound::EnemyShoot);
                self.attack_cooldown = DRONE_COOLDOWN;
            }
        } else {
            self.ai = AiState::Patrol;
            self.body.vel = Vec2::new(self.time.sin(), self.time.cos()) * self.speed * 0.5;
        }
    }

    fn update_boss(&mut self, ctx: &mut TickCtx) {
        self.body.vel.y = self.time.sin() * self.speed;

        let dx = ctx.target.x - self.body.pos.x;
        if dx.abs() > 50.0 {
            self.body.vel.x = dx.signum() * self.speed;
        } else {
            self.body.vel.x *= 0.9;
        }

        let phase = self.boss_phase();
        self.ai = AiState::Boss(phase);
        if self.attack_cooldown == 0 {
            self.boss_attack(phase, ctx);
            self.attack_cooldown = phase.cooldown();
        }

        if (self.health as f32) < self.max_health as f32 / 2.0 && ctx.chance(0.001) {
            for i in 0..3 {
                let x = self.body.pos.x + (i as f32 - 1.0) * 50.0;
                let direction = if ctx.chance(0.5) { 1.0 } else { -1.0 };
                ctx.spawn(Spawn::Enemy(Enemy::new(
                    EnemyKind::Bandit,
                    x,
                    self.body.pos.y + 100.0,
                    direction,
                )));
            }
            ctx.play(Sound::Summon);
        }
    }

    fn boss_attack(&self, phase: BossPhase, ctx: &mut TickCtx) {
        let origin = self.body.center();
        let aim = angle_between(self.body.pos, ctx.target.origin());
        let shot = |angle: f32, speed: f32, color: u32, size: f32| {
            Projectile::new(origin, Vec2::from_angle(angle) * speed, true, color, size)
        };

        match phase {
            BossPhase::Single => {
                ctx.spawn(Spawn::Projectile(shot(aim, 6.0, colors::BOSS_ORANGE, 15.0)));
            }
            BossPhase::Triple => {
                for i in -1..=1 {
                    let angle = aim + i as f32 * 0.3;
                    ctx.spawn(Spawn::Projectile(shot(angle, 6.0, colors::BOSS_ORANGE, 15.0)));
                }
            }
            BossPhase::Rapid => {
                for _ in 0..3 {
                    let angle = aim + ctx.jitter(0.25);
                    ctx.spawn(Spawn::Projectile(shot(angle, 8.0, colors::RED, 10.0)));
                }
            }
        }
        ctx.play(Sound::BossShoot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::body::Rect;
    use crate::sim::entity::{PlatformKind, PlatformMotion};
    use crate::sim::state::GameEvent;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1000.0 / 60.0;
    const WORLD: Vec2 = Vec2::new(3000.0, 1000.0);

    struct Harness {
        rng: Pcg32,
        events: Vec<GameEvent>,
        platforms: Vec<Platform>,
    }

    impl Harness {
        fn new() -> Self {
            Self {
                rng: Pcg32::seed_from_u64(42),
                events: Vec::new(),
                platforms: vec![Platform::new(
                    PlatformKind::Normal,
                    Rect::new(0.0, 500.0, 3000.0, 100.0),
                    PlatformMotion::default(),
                )],
            }
        }

        /// Run one enemy update with the player at `target`; returns spawns
        fn step(&mut self, enemy: &mut Enemy, target: Rect) -> Vec<Spawn> {
            let mut ctx = TickCtx::new(DT, WORLD, target, &self.platforms, &mut self.rng, &mut self.events);
            enemy.update(&mut ctx);
            ctx.spawns
        }
    }

    fn far_away() -> Rect {
        Rect::new(2900.0, 0.0, 24.0, 40.0)
    }

    #[test]
    fn test_kind_tables() {
        assert_eq!(EnemyKind::Bandit.size(), Vec2::new(28.0, 40.0));
        assert_eq!(EnemyKind::Boss.max_health(), 300);
        assert_eq!(EnemyKind::Boss.damage(), 20);
        assert_eq!(EnemyKind::Drone.damage(), 10);
        assert!(EnemyKind::Glitch.ignores_gravity());
        assert!(!EnemyKind::Bandit.ignores_gravity());
    }

    #[test]
    fn test_from_def_overrides() {
        let mut rng = Pcg32::seed_from_u64(1);
        let def = EnemyDef {
            x: 10.0,
            y: 20.0,
            kind: EnemyKind::Bandit,
            patrol_range: Some(40.0),
            health: Some(30),
        };
        let e = Enemy::from_def(&def, &mut rng);
        assert_eq!(e.patrol_range, 40.0);
        assert_eq!((e.health, e.max_health), (30, 30));
        assert!(e.direction == 1.0 || e.direction == -1.0);
        assert_eq!(e.start, Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_boss_phase_boundaries() {
        assert_eq!(BossPhase::for_health(300, 300), BossPhase::Single);
        assert_eq!(BossPhase::for_health(200, 300), BossPhase::Single);
        assert_eq!(BossPhase::for_health(199, 300), BossPhase::Triple);
        assert_eq!(BossPhase::for_health(100, 300), BossPhase::Triple);
        assert_eq!(BossPhase::for_health(99, 300), BossPhase::Rapid);
    }

    #[test]
    fn test_bandit_lands_and_patrols() {
        let mut h = Harness::new();
        let mut bandit = Enemy::new(EnemyKind::Bandit, 300.0, 440.0, 1.0);
        bandit.patrol_range = 50.0;
        let mut flipped = false;
        for _ in 0..600 {
            h.step(&mut bandit, far_away());
            if bandit.direction < 0.0 {
                flipped = true;
            }
        }
        assert!(flipped, "bandit never turned around");
        assert_eq!(bandit.ai, AiState::Patrol);
        // Never sinks into the floor
        assert!(bandit.body.bottom() <= 500.0 + 0.01);
    }

    #[test]
    fn test_bandit_chases_player() {
        let mut h = Harness::new();
        let mut bandit = Enemy::new(EnemyKind::Bandit, 300.0, 460.0, 1.0);
        let player = Rect::new(150.0, 460.0, 24.0, 40.0);
        h.step(&mut bandit, player);
        assert_eq!(bandit.ai, AiState::Chase);
        assert_eq!(bandit.direction, -1.0);
        assert_eq!(bandit.body.vel.x, -3.0);
    }

    #[test]
    fn test_drone_fires_when_in_range() {
        let mut h = Harness::new();
        let mut drone = Enemy::new(EnemyKind::Drone, 200.0, 200.0, 1.0);
        let player = Rect::new(300.0, 200.0, 24.0, 40.0);
        let spawns = h.step(&mut drone, player);

        assert_eq!(drone.ai, AiState::Chase);
        assert_eq!(drone.attack_cooldown, DRONE_COOLDOWN);
        let shots: Vec<_> = spawns
            .iter()
            .filter_map(|s| match s {
                Spawn::Projectile(p) => Some(p),
                _ => None,
            })
            .collect();
        assert_eq!(shots.len(), 1);
        assert!(shots[0].hostile);
        assert!((shots[0].body.vel.length() - DRONE_SHOT_SPEED).abs() < 1e-4);
        assert!(shots[0].body.vel.x > 0.0);
        assert!(h.events.contains(&GameEvent::Sound(Sound::EnemyShoot)));

        // Cooldown blocks the next shot
        let spawns = h.step(&mut drone, player);
        assert!(spawns.is_empty());
    }

    #[test]
    fn test_drone_zero_distance_is_finite() {
        let mut h = Harness::new();
        let mut drone = Enemy::new(EnemyKind::Drone, 200.0, 200.0, 1.0);
        let player = Rect::new(200.0, 200.0, 24.0, 40.0);
        let spawns = h.step(&mut drone, player);
        assert!(drone.body.vel.is_finite());
        for s in spawns {
            if let Spawn::Projectile(p) = s {
                assert!(p.body.vel.is_finite());
            }
        }
    }

    #[test]
    fn test_drone_idles_when_far() {
        let mut h = Harness::new();
        let mut drone = Enemy::new(EnemyKind::Drone, 200.0, 200.0, 1.0);
        let spawns = h.step(&mut drone, far_away());
        assert_eq!(drone.ai, AiState::Patrol);
        assert!(spawns.is_empty());
        assert!(drone.body.vel.length() <= drone.speed * 0.5 + 1e-4);
    }

    #[test]
    fn test_boss_volleys_by_phase() {
        let mut h = Harness::new();
        let player = Rect::new(100.0, 400.0, 24.0, 40.0);

        let mut boss = Enemy::new(EnemyKind::Boss, 600.0, 150.0, 1.0);
        let shots = h.step(&mut boss, player).len();
        assert_eq!(shots, 1);
        assert_eq!(boss.attack_cooldown, 90);

        let mut boss = Enemy::new(EnemyKind::Boss, 600.0, 150.0, 1.0);
        boss.health = 150;
        let spawns = h.step(&mut boss, player);
        let shots = spawns.iter().filter(|s| matches!(s, Spawn::Projectile(_))).count();
        assert_eq!(shots, 3);
        assert_eq!(boss.ai, AiState::Boss(BossPhase::Triple));

        let mut boss = Enemy::new(EnemyKind::Boss, 600.0, 150.0, 1.0);
        boss.health = 50;
        let spawns = h.step(&mut boss, player);
        for s in &spawns {
            if let Spawn::Projectile(p) = s {
                assert_eq!(p.body.size, Vec2::splat(10.0));
            }
        }
        assert_eq!(boss.attack_cooldown, 20);
        assert!(h.events.contains(&GameEvent::Sound(Sound::BossShoot)));
    }

    #[test]
    fn test_boss_summons_below_half_health() {
        let mut h = Harness::new();
        let mut boss = Enemy::new(EnemyKind::Boss, 600.0, 150.0, 1.0);
        boss.health = boss.max_health / 2 - 1;

        let mut summoned = Vec::new();
        for _ in 0..20_000 {
            let spawns = h.step(&mut boss, far_away());
            summoned = spawns
                .into_iter()
                .filter_map(|s| match s {
                    Spawn::Enemy(e) => Some(e),
                    _ => None,
                })
                .collect();
            if !summoned.is_empty() {
                break;
            }
        }

        assert_eq!(summoned.len(), 3);
        assert!(summoned.iter().all(|e| e.kind == EnemyKind::Bandit));
        for (i, bandit) in summoned.iter().enumerate() {
            let x = boss.body.pos.x + (i as f32 - 1.0) * 50.0;
            assert_eq!(bandit.body.pos, Vec2::new(x, boss.body.pos.y + 100.0));
        }
        assert!(h.events.contains(&GameEvent::Sound(Sound::Summon)));
    }

    #[test]
    fn test_boss_at_half_health_never_summons() {
        let mut h = Harness::new();
        let mut boss = Enemy::new(EnemyKind::Boss, 600.0, 150.0, 1.0);
        boss.health = boss.max_health / 2;

        for _ in 0..20_000 {
            let spawns = h.step(&mut boss, far_away());
            assert!(!spawns.iter().any(|s| matches!(s, Spawn::Enemy(_))));
        }
        assert!(!h.events.contains(&GameEvent::Sound(Sound::Summon)));
    }

    #[test]
    fn test_glitch_moves_without_gravity() {
        let mut h = Harness::new();
        let mut glitch = Enemy::new(EnemyKind::Glitch, 400.0, 200.0, 1.0);
        for _ in 0..10 {
            h.step(&mut glitch, far_away());
        }
        assert_eq!(glitch.ai, AiState::Float);
        assert!(glitch.body.vel.length() <= glitch.speed * std::f32::consts::SQRT_2 + 1e-4);
    }

    #[test]
    fn test_enemy_falling_out_reports() {
        let mut h = Harness::new();
        h.platforms.clear();
        let mut bandit = Enemy::new(EnemyKind::Bandit, 300.0, 990.0, 1.0);
        let mut alive = true;
        for _ in 0..120 {
            let mut ctx = TickCtx::new(DT, WORLD, far_away(), &h.platforms, &mut h.rng, &mut h.events);
            alive = bandit.update(&mut ctx);
            if !alive {
                break;
            }
        }
        assert!(!alive);
    }
}
