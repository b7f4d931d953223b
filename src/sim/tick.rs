//! Per-frame simulation tick
//!
//! Advances the world by one variable-length frame and runs the collision
//! pass in a fixed order.

use glam::Vec2;

use super::body::Rect;
use super::context::{Spawn, TickCtx};
use super::entity::colors;
use super::physics::{check_collision, resolve_collision};
use super::state::{GameEvent, GamePhase, GameState};
use crate::audio::Sound;
use crate::consts::*;

/// Damage a stomp deals
pub const STOMP_DAMAGE: i32 = 50;
/// How far below an enemy's top the feet may have been last frame and still stomp
pub const STOMP_TOLERANCE: f32 = 10.0;
pub const STOMP_BOUNCE: f32 = -15.0;
pub const ENEMY_CONTACT_DAMAGE: i32 = 10;
pub const PROJECTILE_CONTACT_DAMAGE: i32 = 15;
/// Lives lost for falling out of the level
pub const FALL_DAMAGE: i32 = 1;

/// Input for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    /// Held state; the player edge-detects it
    pub jump: bool,
    pub scan: bool,
    pub time_jump: bool,
    pub entangle: bool,
    /// Pause toggle (already edge-triggered)
    pub pause: bool,
}

/// Advance the game state by one frame of `dt` milliseconds
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    let dt = dt.clamp(0.0, MAX_FRAME_DT_MS);

    if input.pause {
        state.toggle_pause();
    }

    match state.phase {
        GamePhase::Playing => {}
        GamePhase::LevelComplete { delay } => {
            if delay > 0 {
                state.phase = GamePhase::LevelComplete { delay: delay - 1 };
                if delay == 1 {
                    let bonus = state.last_bonus.unwrap_or_default();
                    state.events.push(GameEvent::ShowLevelSummary {
                        level: state.current_level,
                        bonus,
                    });
                }
            }
            return;
        }
        GamePhase::GameOver { delay } => {
            if delay > 0 {
                state.phase = GamePhase::GameOver { delay: delay - 1 };
                if delay == 1 {
                    state.events.push(GameEvent::ShowGameOver);
                }
            }
            return;
        }
        GamePhase::Title | GamePhase::Paused | GamePhase::Victory => return,
    }

    state.stats.total_time += f64::from(dt);
    state.frame_count += 1;

    let focus = state.player.body.pos;
    state
        .camera
        .follow(focus, state.viewport, state.level_size, dt, &mut state.rng);

    for platform in &mut state.platforms {
        platform.update(dt);
    }

    update_player(state, input, dt);
    update_enemies(state, dt);
    update_projectiles(state, dt);
    update_particles(state, dt);
    for collectible in &mut state.collectibles {
        collectible.update(dt);
    }

    check_collisions(state);

    if state.is_level_complete() {
        state.complete_level();
    }

    state.stats.quantum_energy = (state.stats.quantum_energy + ENERGY_REGEN).min(MAX_QUANTUM_ENERGY);

    if state.frame_count % AUTO_SAVE_FRAMES == 0 {
        state.events.push(GameEvent::SaveRequested);
    }
}

fn update_player(state: &mut GameState, input: &TickInput, dt: f32) {
    let requested = state
        .player
        .update(input, dt, state.level_size, &mut state.events);

    if state.player.body.pos.y > state.level_size.y {
        log::debug!("Player fell out of level {}", state.current_level);
        state.respawn_player();
        state.player_take_damage(FALL_DAMAGE);
    }

    for kind in requested {
        state.use_ability(kind);
    }
}

fn update_enemies(state: &mut GameState, dt: f32) {
    let mut enemies = std::mem::take(&mut state.enemies);
    let spawns = {
        let mut ctx = TickCtx::new(
            dt,
            state.level_size,
            state.player.body.rect(),
            &state.platforms,
            &mut state.rng,
            &mut state.events,
        );
        // Falling out of the world removes without reward
        enemies.retain_mut(|enemy| enemy.update(&mut ctx));
        ctx.spawns
    };
    state.enemies = enemies;
    state.cull_dead_enemies();
    apply_spawns(state, spawns);
}

fn apply_spawns(state: &mut GameState, spawns: Vec<Spawn>) {
    for spawn in spawns {
        match spawn {
            Spawn::Projectile(p) => state.projectiles.push(p),
            Spawn::Enemy(e) => state.enemies.push(e),
        }
    }
}

fn update_projectiles(state: &mut GameState, dt: f32) {
    let world = state.level_size;
    // Shots keep their speed: no air friction
    state
        .projectiles
        .retain_mut(|p| p.update(dt) && p.in_bounds(world, PROJECTILE_CULL_MARGIN));
}

fn update_particles(state: &mut GameState, dt: f32) {
    let world = state.level_size;
    state.particles.retain_mut(|p| p.update(dt, world));
}

/// Collision pass, in order: platforms and hazards, collectibles, enemies,
/// hostile projectiles, friendly projectiles, projectiles against platforms.
fn check_collisions(state: &mut GameState) {
    player_vs_platforms(state);
    player_vs_collectibles(state);
    player_vs_enemies(state);
    player_vs_projectiles(state);
    friendly_projectiles_vs_enemies(state);
    projectiles_vs_platforms(state);
}

fn player_vs_platforms(state: &mut GameState) {
    let mut damage = 0;
    for platform in &state.platforms {
        let rect = platform.rect();
        if check_collision(&state.player.body, &rect) {
            resolve_collision(&mut state.player, &rect);
            damage = damage.max(platform.kind.contact_damage());
        }
    }
    for hazard in &state.hazards {
        if check_collision(&state.player.body, &hazard.rect) {
            damage = damage.max(hazard.kind.contact_damage());
        }
    }
    if damage > 0 {
        state.player_take_damage(damage);
    }
}

fn player_vs_collectibles(state: &mut GameState) {
    let player = state.player.body.rect();
    let mut picked = Vec::new();
    state.collectibles.retain_mut(|c| {
        if c.collected || !check_collision(&player, &c.body) {
            return true;
        }
        c.collected = true;
        picked.push((c.kind, c.body.center()));
        false
    });
    for (kind, at) in picked {
        state.collect(kind, at);
    }
}

/// A downward hit whose feet were above the enemy's top (plus tolerance)
/// before this frame's fall
pub fn is_stomp(player: &Rect, player_vy: f32, enemy: &Rect) -> bool {
    player_vy > 0.0 && player.bottom() - player_vy <= enemy.y + STOMP_TOLERANCE
}

fn player_vs_enemies(state: &mut GameState) {
    let mut stomped = false;
    for i in 0..state.enemies.len() {
        let enemy = state.enemies[i].body.rect();
        if !state.enemies[i].body.active || !check_collision(&state.player.body, &enemy) {
            continue;
        }
        if is_stomp(&state.player.body.rect(), state.player.body.vel.y, &enemy) {
            state.player.body.vel.y = STOMP_BOUNCE;
            state.damage_enemy(i, STOMP_DAMAGE);
            state.stats.score += 50;
            state.play(Sound::EnemyHit);
            state.shake_camera(5.0, 0.2);
            stomped = true;
        } else if !state.player.invincible {
            state.player_take_damage(ENEMY_CONTACT_DAMAGE);
        }
    }
    if stomped {
        state.cull_dead_enemies();
    }
}

fn player_vs_projectiles(state: &mut GameState) {
    let mut i = 0;
    while i < state.projectiles.len() {
        let p = &state.projectiles[i];
        if p.hostile && check_collision(&state.player.body, &p.body) {
            let at = p.body.pos;
            state.projectiles.remove(i);
            state.player_take_damage(PROJECTILE_CONTACT_DAMAGE);
            state.create_particles(at, 8, colors::RED);
        } else {
            i += 1;
        }
    }
}

fn friendly_projectiles_vs_enemies(state: &mut GameState) {
    let mut hit_any = false;
    let mut i = 0;
    while i < state.projectiles.len() {
        let p = &state.projectiles[i];
        let target = if p.hostile {
            None
        } else {
            state
                .enemies
                .iter()
                .position(|e| e.body.active && check_collision(&p.body, &e.body))
        };
        match target {
            Some(enemy) => {
                let damage = state.projectiles.remove(i).damage;
                state.damage_enemy(enemy, damage);
                hit_any = true;
            }
            None => i += 1,
        }
    }
    if hit_any {
        state.cull_dead_enemies();
    }
}

fn projectiles_vs_platforms(state: &mut GameState) {
    let rects: Vec<Rect> = state.platforms.iter().map(|p| p.rect()).collect();
    let mut hits = Vec::new();
    state.projectiles.retain(|p| {
        let hit = rects.iter().any(|r| check_collision(&p.body, r));
        if hit {
            hits.push(p.body.pos);
        }
        !hit
    });
    for at in hits {
        state.create_particles(at, 5, colors::YELLOW);
    }
}
