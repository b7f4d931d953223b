//! The player character: movement, jumping and quantum ability timers

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::Body;
use super::physics::{clamp_velocity, step_body};
use super::state::GameEvent;
use super::tick::TickInput;
use crate::audio::Sound;
use crate::consts::INVINCIBILITY_FRAMES;

pub const PLAYER_WIDTH: f32 = 24.0;
pub const PLAYER_HEIGHT: f32 = 40.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const JUMP_FORCE: f32 = -12.0;
/// Air jumps are weaker than ground jumps
pub const AIR_JUMP_FACTOR: f32 = 0.8;
pub const MAX_JUMPS: u32 = 2;
pub const COYOTE_FRAMES: u32 = 10;
pub const JUMP_BUFFER_FRAMES: u32 = 5;
pub const ABILITY_COOLDOWN_FRAMES: u32 = 300;
pub const ABILITY_DURATION_FRAMES: u32 = 180;
pub const MAX_HEALTH: i32 = 100;

/// Animation pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpriteState {
    #[default]
    Idle,
    Walk,
    Jump,
    Fall,
}

/// The three quantum abilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AbilityKind {
    /// Highlight every collectible
    Scan,
    /// Cycle the timeline
    TimeJump,
    /// Link nearby collectibles for a score bonus
    Entangle,
}

impl AbilityKind {
    pub const ALL: [AbilityKind; 3] = [AbilityKind::Scan, AbilityKind::TimeJump, AbilityKind::Entangle];

    /// Quantum energy spent on activation
    pub fn cost(self) -> f32 {
        match self {
            AbilityKind::Scan => 20.0,
            AbilityKind::TimeJump => 30.0,
            AbilityKind::Entangle => 40.0,
        }
    }

    pub fn sound(self) -> Sound {
        match self {
            AbilityKind::Scan => Sound::QuantumScan,
            AbilityKind::TimeJump => Sound::TimeJump,
            AbilityKind::Entangle => Sound::Entangle,
        }
    }
}

/// Cooldown and active window for one ability (frames)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ability {
    pub cooldown: u32,
    pub active: bool,
    pub duration: u32,
}

impl Ability {
    fn tick(&mut self) {
        self.cooldown = self.cooldown.saturating_sub(1);
        if self.active {
            self.duration = self.duration.saturating_sub(1);
            if self.duration == 0 {
                self.active = false;
            }
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Abilities {
    pub scan: Ability,
    pub time_jump: Ability,
    pub entangle: Ability,
}

impl Abilities {
    pub fn get(&self, kind: AbilityKind) -> &Ability {
        match kind {
            AbilityKind::Scan => &self.scan,
            AbilityKind::TimeJump => &self.time_jump,
            AbilityKind::Entangle => &self.entangle,
        }
    }

    pub fn get_mut(&mut self, kind: AbilityKind) -> &mut Ability {
        match kind {
            AbilityKind::Scan => &mut self.scan,
            AbilityKind::TimeJump => &mut self.time_jump,
            AbilityKind::Entangle => &mut self.entangle,
        }
    }

    fn tick(&mut self) {
        self.scan.tick();
        self.time_jump.tick();
        self.entangle.tick();
    }
}

/// The player character
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub body: Body,
    pub speed: f32,
    pub jump_force: f32,
    pub max_jumps: u32,
    /// Jumps taken since last landing
    pub jump_count: u32,
    /// Facing: 1 right, -1 left
    pub direction: f32,
    /// Frames left in which a ground jump is still allowed after leaving a ledge
    pub coyote_time: u32,
    /// Frames a jump press stays queued
    pub jump_buffer: u32,
    pub invincible: bool,
    pub invincible_timer: u32,
    /// Drives the hit flash while invincible
    pub flash_timer: u32,
    pub abilities: Abilities,
    pub sprite_state: SpriteState,
    pub walk_animation: f32,
    /// Milliseconds alive, for render animation
    pub animation_time: f32,
    /// Independent of the world's lives counter
    pub health: i32,
    pub max_health: i32,
    /// Jump key state last tick, for edge detection
    #[serde(skip)]
    jump_held: bool,
}

impl Player {
    pub fn new(x: f32, y: f32) -> Self {
        Self {
            body: Body::new(x, y, PLAYER_WIDTH, PLAYER_HEIGHT),
            speed: PLAYER_SPEED,
            jump_force: JUMP_FORCE,
            max_jumps: MAX_JUMPS,
            jump_count: 0,
            direction: 1.0,
            coyote_time: 0,
            jump_buffer: 0,
            invincible: false,
            invincible_timer: 0,
            flash_timer: 0,
            abilities: Abilities::default(),
            sprite_state: SpriteState::Idle,
            walk_animation: 0.0,
            animation_time: 0.0,
            health: MAX_HEALTH,
            max_health: MAX_HEALTH,
            jump_held: false,
        }
    }

    /// Move to a spawn point and drop all motion
    pub fn respawn(&mut self, at: Vec2) {
        self.body.pos = at;
        self.body.vel = Vec2::ZERO;
        self.body.grounded = false;
        self.jump_count = 0;
        self.coyote_time = 0;
        self.jump_buffer = 0;
    }

    /// Advance one tick. Returns the abilities the input asked for; the
    /// world decides whether they fire.
    pub fn update(
        &mut self,
        input: &TickInput,
        dt: f32,
        world: Vec2,
        events: &mut Vec<GameEvent>,
    ) -> Vec<AbilityKind> {
        let requested = self.handle_input(input, events);
        clamp_velocity(&mut self.body);

        self.animation_time += dt;
        step_body(&mut self.body, dt, world);

        if self.invincible {
            self.invincible_timer = self.invincible_timer.saturating_sub(1);
            self.flash_timer += 1;
            if self.invincible_timer == 0 {
                self.invincible = false;
                self.flash_timer = 0;
            }
        }

        if self.body.grounded {
            self.coyote_time = COYOTE_FRAMES;
            self.jump_count = 0;
        } else if self.coyote_time > 0 {
            self.coyote_time -= 1;
            // Walked off a ledge without jumping: the ground jump is gone
            if self.coyote_time == 0 && self.jump_count == 0 {
                self.jump_count = 1;
            }
        }

        self.jump_buffer = self.jump_buffer.saturating_sub(1);
        self.abilities.tick();
        self.update_animation(dt);

        // Collision sets this again
        self.body.grounded = false;

        requested
    }

    fn handle_input(&mut self, input: &TickInput, events: &mut Vec<GameEvent>) -> Vec<AbilityKind> {
        if input.left {
            self.body.vel.x = -self.speed;
            self.direction = -1.0;
            self.sprite_state = SpriteState::Walk;
        } else if input.right {
            self.body.vel.x = self.speed;
            self.direction = 1.0;
            self.sprite_state = SpriteState::Walk;
        } else {
            self.body.vel.x *= 0.8;
            if self.body.vel.x.abs() < 0.1 {
                self.body.vel.x = 0.0;
            }
        }

        if input.jump && !self.jump_held {
            self.jump_buffer = JUMP_BUFFER_FRAMES;
        }
        self.jump_held = input.jump;

        if self.jump_buffer > 0 && self.jump_count < self.max_jumps {
            let on_ground = self.body.grounded || self.coyote_time > 0;
            self.body.vel.y = if on_ground && self.jump_count == 0 {
                self.jump_force
            } else {
                self.jump_force * AIR_JUMP_FACTOR
            };
            self.body.grounded = false;
            self.coyote_time = 0;
            self.jump_count += 1;
            self.jump_buffer = 0;
            self.sprite_state = SpriteState::Jump;
            events.push(GameEvent::Sound(Sound::Jump));
        }

        let mut requested = Vec::new();
        if input.scan {
            requested.push(AbilityKind::Scan);
        }
        if input.time_jump {
            requested.push(AbilityKind::TimeJump);
        }
        if input.entangle {
            requested.push(AbilityKind::Entangle);
        }
        requested
    }

    fn update_animation(&mut self, dt: f32) {
        let vel = self.body.vel;
        self.sprite_state = if !self.body.grounded && vel.y < 0.0 {
            SpriteState::Jump
        } else if !self.body.grounded && vel.y > 0.0 {
            SpriteState::Fall
        } else if vel.x.abs() > 0.1 {
            self.walk_animation += dt * 0.02;
            SpriteState::Walk
        } else {
            SpriteState::Idle
        };
    }

    /// Enough energy and off cooldown. Pure check.
    pub fn can_use_ability(&self, kind: AbilityKind, energy: f32) -> bool {
        energy >= kind.cost() && self.abilities.get(kind).cooldown == 0
    }

    /// Spend energy and start cooldown and duration. The caller applies the effect.
    pub fn activate_ability(&mut self, kind: AbilityKind, energy: &mut f32) {
        *energy -= kind.cost();
        let ability = self.abilities.get_mut(kind);
        ability.cooldown = ABILITY_COOLDOWN_FRAMES;
        ability.active = true;
        ability.duration = ABILITY_DURATION_FRAMES;
    }

    /// Start the post-hit invincibility window
    pub fn make_invincible(&mut self) {
        self.invincible = true;
        self.invincible_timer = INVINCIBILITY_FRAMES;
    }

    /// Whether the sprite is drawn translucent this frame
    pub fn is_flashing(&self) -> bool {
        self.invincible && (self.flash_timer / 3) % 2 == 0
    }

    /// Health-based damage, separate from the world's lives
    pub fn take_damage(&mut self, amount: i32) {
        if self.invincible {
            return;
        }
        self.health -= amount;
        self.make_invincible();
        if self.health <= 0 {
            self.body.active = false;
        }
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }
}
