//! World drawing
//!
//! Everything is drawn in world coordinates through a [`Pen`], which
//! subtracts the camera position. The debug overlay is drawn in screen
//! space on top.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, PI, TAU};

use glam::Vec2;

use super::{Rgba, Surface, rgb, with_alpha};
use crate::sim::physics::predict_position;
use crate::sim::{
    Collectible, CollectibleKind, Enemy, EnemyKind, Era, GameState, Hazard, HazardKind, Particle,
    Platform, PlatformKind, Player, Projectile, Rect, SpriteState,
};

const BLACK: Rgba = rgb(0x000000);
const WHITE: Rgba = rgb(0xffffff);
const CYAN: Rgba = rgb(0x00ffff);
const MAGENTA: Rgba = rgb(0xff00ff);
const BROWN: Rgba = rgb(0x8b4513);
const NEON_GREEN: Rgba = rgb(0x00ff80);

/// Camera-offset wrapper over a surface
struct Pen<'a> {
    surface: &'a mut dyn Surface,
    offset: Vec2,
}

impl Pen<'_> {
    fn shift(&self, r: Rect) -> Rect {
        Rect::new(r.x - self.offset.x, r.y - self.offset.y, r.w, r.h)
    }

    fn rect(&mut self, r: Rect, color: Rgba) {
        let r = self.shift(r);
        self.surface.fill_rect(r, color);
    }

    fn stroke(&mut self, r: Rect, color: Rgba, width: f32) {
        let r = self.shift(r);
        self.surface.stroke_rect(r, color, width);
    }

    fn gradient(&mut self, r: Rect, stops: &[(f32, Rgba)]) {
        let r = self.shift(r);
        self.surface.gradient_rect(r, stops);
    }

    fn circle(&mut self, c: Vec2, radius: f32, color: Rgba) {
        self.surface.circle(c - self.offset, radius.max(0.0), color);
    }

    fn line(&mut self, a: Vec2, b: Vec2, color: Rgba, width: f32) {
        self.surface.line(a - self.offset, b - self.offset, color, width);
    }

    fn polygon(&mut self, points: &[Vec2], color: Rgba) {
        let shifted: Vec<Vec2> = points.iter().map(|p| *p - self.offset).collect();
        self.surface.polygon(&shifted, color);
    }

    fn alpha(&mut self, alpha: f32) {
        self.surface.set_alpha(alpha.clamp(0.0, 1.0));
    }
}

/// Points on a rotated ellipse
fn ellipse(center: Vec2, rx: f32, ry: f32, rotation: f32, segments: usize) -> Vec<Vec2> {
    let rot = Vec2::from_angle(rotation);
    (0..segments)
        .map(|i| {
            let a = i as f32 / segments as f32 * TAU;
            center + rot.rotate(Vec2::new(a.cos() * rx, a.sin() * ry))
        })
        .collect()
}

/// Draw the whole scene. `time` is milliseconds of play, for animation.
pub fn render_world(state: &GameState, surface: &mut dyn Surface, time: f64) {
    surface.set_alpha(1.0);
    surface.clear(BLACK);

    let extent = if state.level_size == Vec2::ZERO {
        state.viewport * 2.0
    } else {
        state.level_size
    };

    {
        let mut pen = Pen {
            surface: &mut *surface,
            offset: state.camera.pos,
        };
        let bg_time = if state.animated_background { time } else { 0.0 };
        draw_background(&mut pen, state.stats.timeline, extent, bg_time);
        for platform in &state.platforms {
            draw_platform(&mut pen, platform);
        }
        for hazard in &state.hazards {
            draw_hazard(&mut pen, hazard);
        }
        for c in state.collectibles.iter().filter(|c| !c.collected && c.body.visible) {
            draw_collectible(&mut pen, c);
        }
        for e in state.enemies.iter().filter(|e| e.body.active && e.body.visible) {
            draw_enemy(&mut pen, e);
        }
        for p in &state.projectiles {
            draw_projectile(&mut pen, p);
        }
        for p in &state.particles {
            draw_particle(&mut pen, p);
        }
        if state.player.body.active {
            draw_player(&mut pen, &state.player, state.stats.timeline);
        }
        if state.debug {
            draw_hitboxes(&mut pen, state);
        }
    }

    if state.debug {
        draw_debug_text(surface, state);
    }
}

fn draw_background(pen: &mut Pen, era: Era, extent: Vec2, time: f64) {
    let (width, height) = (extent.x, extent.y);
    let bounds = Rect::new(0.0, 0.0, width, height);
    let t = (time / 1000.0) as f32;

    match era {
        Era::Classic => {
            pen.rect(bounds, rgb(0x006400));
            let mut x = 0.0;
            while x < width {
                pen.rect(Rect::new(x + 20.0, height - 100.0, 15.0, 80.0), BROWN);
                pen.rect(Rect::new(x, height - 120.0, 55.0, 40.0), rgb(0x228b22));
                x += 80.0;
            }
            pen.circle(Vec2::new(100.0, 80.0), 30.0, rgb(0xffff00));
        }
        Era::Quantum => {
            pen.gradient(
                bounds,
                &[(0.0, rgb(0x001122)), (0.5, rgb(0x003322)), (1.0, rgb(0x001133))],
            );
            // Energy streams
            for i in 0..10 {
                let base = 100.0 + i as f32 * 40.0;
                let point = |j: i32| {
                    Vec2::new(j as f32 * 40.0, base + (t + j as f32 + i as f32).sin() * 30.0)
                };
                let mut prev = Vec2::new(0.0, base);
                for j in 0..20 {
                    let next = point(j);
                    pen.line(prev, next, CYAN, 2.0);
                    prev = next;
                }
            }
        }
        Era::Future => {
            pen.rect(bounds, rgb(0x001100));
            let mut x = 0.0;
            while x < width {
                pen.line(Vec2::new(x, 0.0), Vec2::new(x, height), NEON_GREEN, 1.0);
                x += 40.0;
            }
            let mut y = 0.0;
            while y < height {
                pen.line(Vec2::new(0.0, y), Vec2::new(width, y), NEON_GREEN, 1.0);
                y += 40.0;
            }
            // Floating data nodes
            let t = t / 2.0;
            for i in 0..20 {
                let fi = i as f32;
                let x = ((t + fi).sin() * 100.0 + fi * 100.0).rem_euclid(width.max(1.0));
                let y = ((t + fi).cos() * 50.0 + fi * 50.0).rem_euclid(height.max(1.0));
                pen.circle(Vec2::new(x, y), 3.0, NEON_GREEN);
            }
        }
    }
}

fn draw_platform(pen: &mut Pen, platform: &Platform) {
    if !platform.body.visible {
        return;
    }
    let r = platform.rect();
    let color = rgb(platform.kind.color());

    pen.alpha(platform.opacity);
    pen.rect(r, color);

    match platform.kind {
        PlatformKind::Quantum => {
            for i in 0..3 {
                let y = r.y + i as f32 * 5.0;
                pen.line(Vec2::new(r.x, y), Vec2::new(r.right(), y), WHITE, 2.0);
            }
        }
        PlatformKind::Holographic => {
            let mut i = 0;
            while (i as f32) < r.h {
                let c = if i % 6 == 0 { WHITE } else { color };
                pen.rect(Rect::new(r.x, r.y + i as f32, r.w, 1.0), c);
                i += 3;
            }
        }
        PlatformKind::Spikes => draw_spikes(pen, r, rgb(0xff4444)),
        PlatformKind::Temple => {
            let gold = rgb(0xffff00);
            pen.rect(Rect::new(r.x + 10.0, r.y + 5.0, r.w - 20.0, 5.0), gold);
            pen.rect(Rect::new(r.x + 5.0, r.y + 15.0, r.w - 10.0, 5.0), gold);
        }
        PlatformKind::Normal | PlatformKind::Moving => {}
    }

    pen.alpha(1.0);
}

/// Row of triangles pointing up, 10 units wide each
fn draw_spikes(pen: &mut Pen, r: Rect, color: Rgba) {
    let mut x = 0.0;
    while x < r.w {
        pen.polygon(
            &[
                Vec2::new(r.x + x, r.bottom()),
                Vec2::new(r.x + x + 5.0, r.y),
                Vec2::new(r.x + x + 10.0, r.bottom()),
            ],
            color,
        );
        x += 10.0;
    }
}

fn draw_hazard(pen: &mut Pen, hazard: &Hazard) {
    let color = rgb(hazard.kind.color());
    pen.alpha(0.6);
    match hazard.kind {
        HazardKind::Spikes => draw_spikes(pen, hazard.rect, color),
        HazardKind::Energy | HazardKind::Laser => pen.rect(hazard.rect, color),
    }
    pen.alpha(1.0);
}

fn draw_collectible(pen: &mut Pen, c: &Collectible) {
    let r = c.body.rect();
    let origin = Vec2::new(r.x, r.y + c.bob_offset());
    let center = origin + Vec2::splat(8.0);
    let phase = c.float_phase;
    let color = rgb(c.kind.color());
    let glow = rgb(c.kind.glow_color());

    if c.scanned > 0 {
        pen.circle(center, 14.0, with_alpha(glow, 0.4));
    }
    if c.entangled > 0 {
        pen.circle(center, 12.0, with_alpha(MAGENTA, 0.4));
    }

    let at = |x: f32, y: f32| origin + Vec2::new(x, y);
    match c.kind {
        CollectibleKind::Banana => {
            let pulse = (phase * 2.0).sin() * 2.0;
            pen.polygon(&ellipse(at(8.0 + pulse, 8.0), 8.0 + pulse / 2.0, 4.0, FRAC_PI_4, 16), color);
            pen.rect(Rect::new(origin.x + 10.0, origin.y + 2.0, 2.0, 6.0), BROWN);
            pen.polygon(&ellipse(at(10.0, 6.0), 3.0, 2.0, FRAC_PI_4, 8), rgb(0xffffaa));
        }
        CollectibleKind::Key => {
            let pulse = (phase * 3.0).sin() * 1.5;
            pen.circle(center, 6.0 + pulse, color);
            pen.rect(Rect::new(origin.x + 8.0, origin.y + 2.0, 8.0 + pulse, 4.0), color);
            pen.rect(Rect::new(origin.x + 14.0, origin.y + 4.0, 2.0 + pulse / 2.0, 4.0), color);
            pen.rect(Rect::new(origin.x + 14.0, origin.y + 8.0, 4.0 + pulse / 2.0, 2.0), color);
            pen.circle(at(7.0, 7.0), 3.0, rgb(0xffcc88));
        }
        CollectibleKind::Quantum => {
            let pulse = (phase * 4.0).sin() * 3.0;
            pen.circle(center, 8.0 + pulse, color);
            pen.circle(center, 4.0, glow);
            for i in 0..4 {
                let angle = i as f32 / 4.0 * TAU + phase;
                pen.circle(center + Vec2::from_angle(angle) * (6.0 + pulse), 2.0, WHITE);
            }
        }
        CollectibleKind::Health => {
            let pulse = (phase * 2.0).sin() * 2.0;
            pen.rect(
                Rect::new(origin.x + 6.0, origin.y + 2.0 + pulse, 4.0, 12.0 - pulse * 2.0),
                color,
            );
            pen.rect(
                Rect::new(origin.x + 2.0, origin.y + 6.0 + pulse, 12.0 - pulse * 2.0, 4.0),
                color,
            );
            if (phase * 3.0).sin() > 0.0 {
                pen.stroke(Rect::new(origin.x, origin.y, 16.0, 16.0), glow, 2.0);
            }
            pen.circle(center, 8.0 + pulse, with_alpha(glow, 0.5));
        }
    }
}

fn draw_enemy(pen: &mut Pen, enemy: &Enemy) {
    let r = enemy.body.rect();
    let t = enemy.time;
    let color = rgb(enemy.kind.color());
    let center = r.center();

    // Damage flash
    let base_alpha = if enemy.health < enemy.max_health {
        0.7 + (t * 10.0).sin() * 0.3
    } else {
        1.0
    };
    pen.alpha(base_alpha);

    match enemy.kind {
        EnemyKind::Bandit => {
            pen.rect(r, color);
            pen.rect(Rect::new(r.x + 6.0, r.y + 10.0, 4.0, 4.0), BLACK);
            pen.rect(Rect::new(r.x + 18.0, r.y + 10.0, 4.0, 4.0), BLACK);
            pen.rect(Rect::new(r.x + 10.0, r.y + 20.0, 8.0, 2.0), BLACK);
            let leg = (t * 3.0).sin() * 3.0;
            pen.rect(Rect::new(r.x + 4.0, r.bottom() - 4.0, 6.0, 4.0 + leg), BROWN);
            pen.rect(Rect::new(r.x + 18.0, r.bottom() - 4.0, 6.0, 4.0 - leg), BROWN);
        }
        EnemyKind::Glitch => {
            let offset = Vec2::new((t * 5.0).sin(), (t * 5.0).cos()) * 2.0;
            pen.rect(Rect::new(r.x + offset.x, r.y + offset.y, r.w, r.h), color);
            for i in 0..4 {
                let y = r.y + i as f32 * 8.0 + (t * 2.0 + i as f32).sin() * 2.0;
                pen.rect(Rect::new(r.x, y, r.w, 2.0), WHITE);
            }
            pen.alpha(base_alpha * 0.3);
            pen.rect(Rect::new(r.x + offset.x * 2.0, r.y + offset.y * 2.0, r.w, r.h), BLACK);
        }
        EnemyKind::Drone => {
            let radius = r.w / 2.0;
            pen.circle(center, radius, color);
            for i in 0..4 {
                let angle = t * 5.0 + i as f32 * FRAC_PI_2;
                pen.line(center, center + Vec2::from_angle(angle) * radius, WHITE, 2.0);
            }
            pen.circle(center, 4.0, BLACK);
        }
        EnemyKind::Boss => {
            let radius = r.w / 2.0;
            pen.circle(center, radius, rgb(0xff4400));
            pen.circle(center, radius * 0.7, color);
            pen.circle(center, radius * 0.3, rgb(0xffff00));
            pen.circle(center + Vec2::new(-15.0, -10.0), 6.0, BLACK);
            pen.circle(center + Vec2::new(15.0, -10.0), 6.0, BLACK);
            // Mouth
            let mouth = center + Vec2::new(0.0, 10.0);
            let steps = 8;
            for i in 0..steps {
                let a0 = 0.2 + (PI - 0.4) * i as f32 / steps as f32;
                let a1 = 0.2 + (PI - 0.4) * (i + 1) as f32 / steps as f32;
                pen.line(
                    mouth + Vec2::from_angle(a0) * 15.0,
                    mouth + Vec2::from_angle(a1) * 15.0,
                    BLACK,
                    4.0,
                );
            }
            // Crown
            for i in 0..5 {
                let base = Vec2::new(center.x - 20.0 + i as f32 * 10.0, center.y - 40.0);
                pen.polygon(
                    &[base, base + Vec2::new(5.0, -10.0), base + Vec2::new(10.0, 0.0)],
                    rgb(0xffdd00),
                );
            }
        }
    }

    pen.alpha(1.0);
    if enemy.kind == EnemyKind::Boss {
        draw_health_bar(pen, enemy);
    }
}

fn draw_health_bar(pen: &mut Pen, enemy: &Enemy) {
    let r = enemy.body.rect();
    let bar = Rect::new(r.center().x - 50.0, r.y - 20.0, 100.0, 8.0);
    let pct = (enemy.health as f32 / enemy.max_health.max(1) as f32).clamp(0.0, 1.0);
    let fill = if pct > 0.5 {
        rgb(0x00ff00)
    } else if pct > 0.25 {
        rgb(0xffff00)
    } else {
        rgb(0xff0000)
    };

    pen.rect(bar, rgb(0x333333));
    pen.rect(Rect::new(bar.x, bar.y, bar.w * pct, bar.h), fill);
    pen.stroke(bar, WHITE, 1.0);
}

fn draw_projectile(pen: &mut Pen, p: &Projectile) {
    let r = p.body.rect();
    let center = r.center();
    let radius = r.w / 2.0;
    let color = rgb(p.color);

    if p.hostile {
        // Spiky star
        let points: Vec<Vec2> = (0..16)
            .map(|i| {
                let len = if i % 2 == 0 { radius } else { radius * 0.5 };
                center + Vec2::from_angle(i as f32 / 16.0 * TAU) * len
            })
            .collect();
        pen.polygon(&points, color);
    } else {
        pen.circle(center, radius, color);
        pen.circle(center, radius / 2.0, WHITE);
    }
}

fn draw_particle(pen: &mut Pen, p: &Particle) {
    let r = p.body.rect();
    pen.alpha(p.opacity());
    if p.round {
        pen.circle(r.center(), r.w / 2.0, rgb(p.color));
    } else {
        pen.rect(r, rgb(p.color));
    }
    pen.alpha(1.0);
}

fn draw_player(pen: &mut Pen, player: &Player, era: Era) {
    let r = player.body.rect();
    let (x, y) = (r.x, r.y);
    let base_alpha = if player.is_flashing() { 0.5 } else { 1.0 };
    pen.alpha(base_alpha);

    match era {
        Era::Classic => {
            pen.rect(r, CYAN);
            pen.rect(Rect::new(x + 4.0, y + 4.0, 16.0, 12.0), rgb(0xffff00));
            let eye = if player.direction > 0.0 { 2.0 } else { -2.0 };
            pen.rect(Rect::new(x + 8.0 + eye, y + 8.0, 3.0, 3.0), BLACK);
            pen.rect(Rect::new(x + 16.0 + eye, y + 8.0, 3.0, 3.0), BLACK);
            pen.rect(Rect::new(x + 2.0, y + 16.0, 20.0, 20.0), rgb(0x00ff00));

            let leg = if player.sprite_state == SpriteState::Walk {
                player.walk_animation.sin() * 3.0
            } else {
                0.0
            };
            let blue = rgb(0x0000ff);
            pen.rect(Rect::new(x + 4.0, y + 36.0, 6.0, 4.0 + leg), blue);
            pen.rect(Rect::new(x + 14.0, y + 36.0, 6.0, 4.0 - leg), blue);

            if matches!(player.sprite_state, SpriteState::Jump | SpriteState::Fall) {
                pen.rect(Rect::new(x + 8.0, y + 36.0, 8.0, 4.0), MAGENTA);
            }
        }
        Era::Quantum => {
            pen.gradient(r, &[(0.0, CYAN), (0.5, rgb(0x0088ff)), (1.0, CYAN)]);
            pen.rect(Rect::new(x + 8.0, y + 8.0, 8.0, 24.0), WHITE);
            for i in 0..3 {
                let ly = y + 10.0 + i as f32 * 10.0;
                pen.line(Vec2::new(x, ly), Vec2::new(r.right(), ly), WHITE, 2.0);
            }
        }
        Era::Future => {
            pen.alpha(base_alpha * 0.9);
            let mut i = 0;
            while (i as f32) < r.h {
                let c = if i % 8 == 0 { NEON_GREEN } else { rgb(0x00cc66) };
                pen.rect(Rect::new(x, y + i as f32, r.w, 2.0), c);
                i += 4;
            }
            pen.stroke(r, NEON_GREEN, 2.0);
            pen.rect(Rect::new(x + r.w / 2.0 - 2.0, y + 8.0, 4.0, 24.0), WHITE);
        }
    }

    draw_ability_effects(pen, player);
    pen.alpha(1.0);
}

fn draw_ability_effects(pen: &mut Pen, player: &Player) {
    let center = player.body.center();
    let secs = player.animation_time * 0.001;

    if player.abilities.scan.active {
        // Dashed ring
        let dashes = 36;
        for i in (0..dashes).step_by(2) {
            let a0 = i as f32 / dashes as f32 * TAU;
            let a1 = (i + 1) as f32 / dashes as f32 * TAU;
            pen.line(
                center + Vec2::from_angle(a0) * 100.0,
                center + Vec2::from_angle(a1) * 100.0,
                CYAN,
                2.0,
            );
        }
    }

    if player.abilities.entangle.active {
        for i in 0..8 {
            let fi = i as f32;
            let angle = fi / 8.0 * TAU + secs * 6.0;
            let radius = 50.0 + (secs * 12.0 + fi).sin() * 20.0;
            pen.line(center, center + Vec2::from_angle(angle) * radius, MAGENTA, 1.0);
        }
    }
}

fn draw_hitboxes(pen: &mut Pen, state: &GameState) {
    let red = rgb(0xff0000);
    for e in &state.enemies {
        pen.stroke(e.body.rect(), red, 1.0);
    }
    for h in &state.hazards {
        pen.stroke(h.rect, red, 1.0);
    }

    let player = &state.player;
    pen.stroke(player.body.rect(), rgb(0x00ff00), 1.0);
    let ahead = predict_position(&player.body, 10.0);
    pen.stroke(
        Rect::from_pos_size(ahead, player.body.size),
        with_alpha(rgb(0xffff00), 0.6),
        1.0,
    );
}

fn draw_debug_text(surface: &mut dyn Surface, state: &GameState) {
    let p = &state.player.body;
    let lines = [
        format!("Player: ({}, {})", p.pos.x.floor(), p.pos.y.floor()),
        format!("Velocity: ({:.2}, {:.2})", p.vel.x, p.vel.y),
        format!(
            "Camera: ({}, {})",
            state.camera.pos.x.floor(),
            state.camera.pos.y.floor()
        ),
        format!("Level: {}", state.current_level),
        format!(
            "Entities: {}",
            state.enemies.len() + state.collectibles.len()
        ),
        format!("Frame: {}", state.frame_count),
        format!("Time: {}s", (state.stats.total_time / 1000.0).floor()),
    ];

    for (i, line) in lines.iter().enumerate() {
        surface.text(Vec2::new(10.0, 20.0 + i as f32 * 15.0), line, WHITE, 12.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DrawCmd, RecordingSurface};
    use crate::sim::entity::PlatformMotion;

    fn loaded() -> GameState {
        let mut state = GameState::new(9);
        state.start_new_game(1).unwrap();
        state
    }

    fn render(state: &GameState) -> RecordingSurface {
        let mut surface = RecordingSurface::new();
        render_world(state, &mut surface, 1234.0);
        surface
    }

    #[test]
    fn test_title_screen_renders() {
        let state = GameState::new(1);
        let surface = render(&state);
        assert_eq!(surface.commands.first(), Some(&DrawCmd::Alpha(1.0)));
        assert_eq!(surface.commands.get(1), Some(&DrawCmd::Clear(BLACK)));
        assert!(surface.texts().is_empty());
    }

    #[test]
    fn test_background_per_era() {
        let mut state = loaded();

        state.stats.timeline = Era::Classic;
        assert!(render(&state).filled_with(rgb(0x006400)));

        state.stats.timeline = Era::Quantum;
        let s = render(&state);
        assert!(s.count(|c| matches!(c, DrawCmd::Gradient(_))) >= 1);
        assert!(!s.filled_with(rgb(0x006400)));

        state.stats.timeline = Era::Future;
        assert!(render(&state).filled_with(rgb(0x001100)));
    }

    #[test]
    fn test_camera_offset_applied() {
        let mut state = loaded();
        state.platforms = vec![Platform::new(
            PlatformKind::Normal,
            Rect::new(300.0, 400.0, 120.0, 20.0),
            PlatformMotion::default(),
        )];
        state.camera.pos = Vec2::new(100.0, 50.0);

        let s = render(&state);
        let expected = DrawCmd::FillRect(Rect::new(200.0, 350.0, 120.0, 20.0), rgb(0x8b4513));
        assert!(s.commands.contains(&expected));
    }

    #[test]
    fn test_collected_items_not_drawn() {
        let mut state = loaded();
        state.stats.timeline = Era::Future;
        state.collectibles = vec![Collectible::new(CollectibleKind::Quantum, 500.0, 300.0, 0.0)];
        let cyan_circles = |s: &RecordingSurface| {
            s.count(|c| matches!(c, DrawCmd::Circle { color, .. } if *color == CYAN))
        };

        assert_eq!(cyan_circles(&render(&state)), 1);
        state.collectibles[0].collected = true;
        assert_eq!(cyan_circles(&render(&state)), 0);
    }

    #[test]
    fn test_entangle_draws_eight_rays() {
        let mut state = loaded();
        state.player.abilities.entangle.active = true;
        let s = render(&state);
        let rays = s.count(|c| matches!(c, DrawCmd::Line { color, .. } if *color == MAGENTA));
        assert_eq!(rays, 8);
    }

    #[test]
    fn test_projectile_shapes() {
        let mut state = loaded();
        state.stats.timeline = Era::Classic;
        state.projectiles = vec![
            Projectile::new(Vec2::new(400.0, 300.0), Vec2::ZERO, true, 0x123456, 8.0),
            Projectile::new(Vec2::new(420.0, 300.0), Vec2::ZERO, false, 0x654321, 8.0),
        ];
        let s = render(&state);

        let star = s.commands.iter().find_map(|c| match c {
            DrawCmd::Polygon { points, color } if *color == rgb(0x123456) => Some(points.len()),
            _ => None,
        });
        assert_eq!(star, Some(16));
        assert_eq!(
            s.count(|c| matches!(c, DrawCmd::Circle { color, .. } if *color == rgb(0x654321))),
            1
        );
    }

    #[test]
    fn test_debug_overlay() {
        let mut state = loaded();
        assert!(render(&state).texts().is_empty());

        state.debug = true;
        let s = render(&state);
        let texts = s.texts();
        assert_eq!(texts.len(), 7);
        assert!(texts.contains(&"Level: 1"));
        assert!(texts[0].starts_with("Player: ("));
    }

    #[test]
    fn test_boss_health_bar() {
        let mut state = GameState::new(3);
        state.start_new_game(3).unwrap();
        let boss = state
            .enemies
            .iter()
            .find(|e| e.kind == EnemyKind::Boss)
            .unwrap()
            .body
            .rect();
        let s = render(&state);
        let bar_bg = s.commands.iter().any(|c| {
            matches!(c, DrawCmd::FillRect(r, color)
                if *color == rgb(0x333333) && (r.y - (boss.y - 20.0)).abs() < 1e-3)
        });
        assert!(bar_bg);
    }
}
