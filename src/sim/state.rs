//! World state and progression
//!
//! Everything the tick mutates lives here: stats, camera, the live entity
//! collections and the event queue the platform layer drains each frame.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::body::Rect;
use super::enemy::Enemy;
use super::entity::{
    Collectible, CollectibleKind, Hazard, Particle, Platform, Projectile, colors, lives_after_health,
    ENTANGLE_FRAMES, SCAN_HIGHLIGHT_FRAMES,
};
use super::level::{level, level_count, Requirement};
use super::player::{AbilityKind, Player};
use crate::audio::Sound;
use crate::consts::*;
use crate::error::{LevelError, UnknownEra};
use crate::persistence::SaveData;
use crate::settings::Settings;

/// Radius within which entangle links collectibles
pub const ENTANGLE_RADIUS: f32 = 200.0;

/// Timeline the world is currently in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
pub enum Era {
    Classic,
    Quantum,
    Future,
}

impl Era {
    pub const ALL: [Era; 3] = [Era::Classic, Era::Quantum, Era::Future];

    pub fn year(self) -> u16 {
        match self {
            Era::Classic => 1994,
            Era::Quantum => 2026,
            Era::Future => 2048,
        }
    }

    /// 1994 -> 2026 -> 2048 -> 1994
    pub fn next(self) -> Self {
        match self {
            Era::Classic => Era::Quantum,
            Era::Quantum => Era::Future,
            Era::Future => Era::Classic,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Era::Classic => "Classic Jungle",
            Era::Quantum => "Quantum Jungle",
            Era::Future => "Future Jungle",
        }
    }
}

impl From<Era> for u16 {
    fn from(era: Era) -> u16 {
        era.year()
    }
}

impl TryFrom<u16> for Era {
    type Error = UnknownEra;

    fn try_from(year: u16) -> Result<Self, Self::Error> {
        Era::ALL.into_iter().find(|e| e.year() == year).ok_or(UnknownEra(year))
    }
}

/// Run statistics, persisted in saves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub score: u64,
    /// Signed: damage can drive it well below zero
    pub lives: i32,
    pub bananas: u32,
    pub keys: u32,
    /// 0..=100
    pub quantum_energy: f32,
    pub timeline: Era,
    /// Milliseconds played across the whole run
    pub total_time: f64,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            score: 0,
            lives: STARTING_LIVES,
            bananas: 0,
            keys: 0,
            quantum_energy: MAX_QUANTUM_ENERGY,
            timeline: Era::Quantum,
            total_time: 0.0,
        }
    }
}

/// Where the player resumes
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Checkpoint {
    pub x: f32,
    pub y: f32,
    pub level: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Camera {
    pub pos: Vec2,
    pub target: Vec2,
    pub smoothing: f32,
    pub shake_amount: f32,
    /// Milliseconds of shake left
    pub shake_duration: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            pos: Vec2::ZERO,
            target: Vec2::ZERO,
            smoothing: CAMERA_SMOOTHING,
            shake_amount: 0.0,
            shake_duration: 0.0,
        }
    }
}

impl Camera {
    pub fn shake(&mut self, amount: f32, seconds: f32) {
        self.shake_amount = amount;
        self.shake_duration = seconds * 1000.0;
    }

    /// Ease toward `focus` centred in the viewport, clamped to the level
    pub fn follow(&mut self, focus: Vec2, viewport: Vec2, level: Vec2, dt: f32, rng: &mut impl Rng) {
        self.target = (focus - viewport / 2.0).min(level - viewport).max(Vec2::ZERO);
        self.pos += (self.target - self.pos) * self.smoothing;

        if self.shake_duration > 0.0 {
            self.shake_duration -= dt;
            let offset = Vec2::new(rng.random::<f32>() - 0.5, rng.random::<f32>() - 0.5);
            self.pos += offset * self.shake_amount;
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Nothing loaded yet
    Title,
    Playing,
    Paused,
    /// Frozen; `delay` frames until the summary screen
    LevelComplete { delay: u32 },
    /// Frozen; `delay` frames until the game over screen
    GameOver { delay: u32 },
    /// Every level finished
    Victory,
}

/// Score awarded for finishing a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LevelBonus {
    pub time: u64,
    pub bananas: u64,
    pub level: u64,
    pub total: u64,
}

impl LevelBonus {
    pub fn compute(stats: &Stats, level: u32) -> Self {
        let seconds = (stats.total_time / 1000.0).floor().max(0.0) as u64;
        let time = 300u64.saturating_sub(seconds) * 10;
        let bananas = u64::from(stats.bananas) * 5;
        let level = u64::from(level) * 500;
        Self {
            time,
            bananas,
            level,
            total: time + bananas + level,
        }
    }
}

/// Outbound notifications, drained by the platform layer each frame
#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    Sound(Sound),
    LevelCompleted { level: u32, bonus: LevelBonus },
    /// The completion delay ran out
    ShowLevelSummary { level: u32, bonus: LevelBonus },
    ShowGameOver,
    SaveRequested,
    Victory,
}

/// Developer shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cheat {
    AddScore,
    CycleTimeline,
    AddBananas,
    AddLives,
    NextLevel,
    /// Reload the current level, keeping stats
    ResetLevel,
}

#[derive(Debug, Clone)]
pub struct GameState {
    pub(crate) rng: Pcg32,
    pub phase: GamePhase,
    pub stats: Stats,
    /// 1-based
    pub current_level: u32,
    pub level_name: String,
    /// Level extent in world units
    pub level_size: Vec2,
    pub requirement: Option<Requirement>,
    pub player_start: Vec2,
    pub checkpoint: Option<Checkpoint>,
    pub camera: Camera,
    pub viewport: Vec2,
    pub player: Player,
    pub platforms: Vec<Platform>,
    pub collectibles: Vec<Collectible>,
    pub enemies: Vec<Enemy>,
    pub projectiles: Vec<Projectile>,
    pub particles: Vec<Particle>,
    pub hazards: Vec<Hazard>,
    pub events: Vec<GameEvent>,
    /// Frames simulated while playing
    pub frame_count: u64,
    pub last_bonus: Option<LevelBonus>,
    pub max_particles: usize,
    pub screen_shake: bool,
    /// Background motion; off on the low preset
    pub animated_background: bool,
    /// Draw hitboxes and the predicted player position
    pub debug: bool,
}

impl GameState {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Title,
            stats: Stats::default(),
            current_level: 1,
            level_name: String::new(),
            level_size: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            requirement: None,
            player_start: Vec2::ZERO,
            checkpoint: None,
            camera: Camera::default(),
            viewport: Vec2::new(VIEWPORT_WIDTH, VIEWPORT_HEIGHT),
            player: Player::new(0.0, 0.0),
            platforms: Vec::new(),
            collectibles: Vec::new(),
            enemies: Vec::new(),
            projectiles: Vec::new(),
            particles: Vec::new(),
            hazards: Vec::new(),
            events: Vec::new(),
            frame_count: 0,
            last_bonus: None,
            max_particles: DEFAULT_MAX_PARTICLES,
            screen_shake: true,
            animated_background: true,
            debug: false,
        }
    }

    pub fn apply_settings(&mut self, settings: &Settings) {
        self.max_particles = settings.max_particles();
        self.screen_shake = settings.effective_screen_shake();
        self.animated_background = settings.quality.animated_background() && !settings.reduced_motion;
        self.debug = settings.debug;
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Replace every dynamic collection with level `number`'s layout.
    ///
    /// On error nothing is touched.
    pub fn load_level(&mut self, number: u32) -> Result<(), LevelError> {
        let def = level(number).inspect_err(|e| log::error!("Cannot load level: {}", e))?;

        let rng = &mut self.rng;
        self.platforms = def
            .platforms
            .iter()
            .map(|p| {
                let mut platform = Platform::new(p.kind, p.rect(), p.motion());
                if platform.is_animated() {
                    platform = platform.with_phase(rng.random_range(0.0..std::f32::consts::TAU));
                }
                if let Some(alpha) = p.alpha {
                    platform.opacity = alpha;
                }
                platform
            })
            .collect();
        self.collectibles = def
            .collectibles
            .iter()
            .map(|c| Collectible::new(c.kind, c.x, c.y, rng.random_range(0.0..std::f32::consts::TAU)))
            .collect();
        self.enemies = def.enemies.iter().map(|e| Enemy::from_def(e, &mut *rng)).collect();
        self.hazards = def
            .hazards
            .iter()
            .map(|h| Hazard {
                kind: h.kind,
                rect: Rect::new(h.x, h.y, h.width, h.height),
            })
            .collect();
        self.projectiles.clear();
        self.particles.clear();

        self.player_start = Vec2::new(def.player_start.x, def.player_start.y);
        self.player = Player::new(self.player_start.x, self.player_start.y);
        self.camera = Camera::default();
        self.current_level = number;
        self.level_name = def.name.clone();
        self.level_size = Vec2::new(def.width, def.height);
        self.requirement = Some(def.completion_requirement);
        self.last_bonus = None;
        self.phase = GamePhase::Playing;

        log::info!(
            "Level {} loaded: {} platforms, {} collectibles, {} enemies",
            number,
            self.platforms.len(),
            self.collectibles.len(),
            self.enemies.len()
        );
        Ok(())
    }

    /// Fresh stats, then `number`
    pub fn start_new_game(&mut self, number: u32) -> Result<(), LevelError> {
        level(number)?;
        self.stats = Stats::default();
        self.checkpoint = None;
        self.frame_count = 0;
        self.load_level(number)
    }

    /// Resume from a save, placing the player at its checkpoint
    pub fn continue_game(&mut self, save: &SaveData) -> Result<(), LevelError> {
        let number = save.level.max(1);
        level(number)?;
        self.stats = save.stats.clone();
        self.checkpoint = save.checkpoint;
        self.load_level(number)?;
        if let Some(cp) = self.checkpoint.filter(|cp| cp.level == number) {
            self.player.respawn(Vec2::new(cp.x, cp.y));
        }
        log::info!("Game loaded from level {}", number);
        Ok(())
    }

    /// Next level, or victory after the last one
    pub fn continue_to_next_level(&mut self) -> Result<(), LevelError> {
        let next = self.current_level + 1;
        if next <= level_count() {
            self.load_level(next)
        } else {
            self.phase = GamePhase::Victory;
            self.play(Sound::Victory);
            self.events.push(GameEvent::Victory);
            Ok(())
        }
    }

    pub fn restart_level(&mut self) -> Result<(), LevelError> {
        self.stats.lives = STARTING_LIVES;
        self.load_level(self.current_level)
    }

    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            GamePhase::Playing => GamePhase::Paused,
            GamePhase::Paused => GamePhase::Playing,
            other => other,
        };
    }

    pub fn is_paused(&self) -> bool {
        self.phase == GamePhase::Paused
    }

    pub fn save_data(&self, timestamp: u64) -> SaveData {
        SaveData {
            stats: self.stats.clone(),
            level: self.current_level,
            checkpoint: self.checkpoint,
            timestamp,
        }
    }

    pub fn apply_cheat(&mut self, cheat: Cheat) -> Result<(), LevelError> {
        log::info!("Cheat: {:?}", cheat);
        match cheat {
            Cheat::AddScore => self.stats.score += 1000,
            Cheat::CycleTimeline => {
                self.stats.timeline = match self.stats.timeline {
                    Era::Quantum => Era::Future,
                    _ => Era::Quantum,
                }
            }
            Cheat::AddBananas => self.stats.bananas += 10,
            Cheat::AddLives => self.stats.lives += 3,
            Cheat::NextLevel => {
                if self.current_level < level_count() {
                    self.load_level(self.current_level + 1)?;
                }
            }
            Cheat::ResetLevel => self.load_level(self.current_level)?,
        }
        Ok(())
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
    }

    /// Take the events queued since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn play(&mut self, sound: Sound) {
        self.events.push(GameEvent::Sound(sound));
    }

    pub fn shake_camera(&mut self, amount: f32, seconds: f32) {
        if self.screen_shake {
            self.camera.shake(amount, seconds);
        }
    }

    /// Burst `count` particles, dropping the oldest past the cap
    pub fn create_particles(&mut self, at: Vec2, count: u32, color: u32) {
        for _ in 0..count {
            self.particles.push(Particle::burst_one(at, color, &mut self.rng));
        }
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// The world's damage path. Touches lives, never `Player::health`.
    pub fn player_take_damage(&mut self, amount: i32) {
        if self.player.invincible || matches!(self.phase, GamePhase::GameOver { .. }) {
            return;
        }
        self.stats.lives -= amount;
        self.player.make_invincible();

        self.play(Sound::Hit);
        self.create_particles(self.player.body.center(), 20, colors::RED);
        self.shake_camera(10.0, 0.3);

        self.player.body.vel.y = -10.0;
        self.player.body.vel.x = -self.player.direction * 8.0;

        if self.stats.lives <= 0 {
            self.game_over();
        }
    }

    fn game_over(&mut self) {
        if matches!(self.phase, GamePhase::GameOver { .. }) {
            return;
        }
        self.phase = GamePhase::GameOver {
            delay: PRESENTATION_DELAY_FRAMES,
        };
        self.play(Sound::GameOver);
        log::info!("Game over on level {} with score {}", self.current_level, self.stats.score);
    }

    /// Try an ability; returns whether it fired
    pub fn use_ability(&mut self, kind: AbilityKind) -> bool {
        if !self.player.can_use_ability(kind, self.stats.quantum_energy) {
            return false;
        }
        self.player.activate_ability(kind, &mut self.stats.quantum_energy);
        self.play(kind.sound());

        match kind {
            AbilityKind::Scan => {
                for c in &mut self.collectibles {
                    c.scanned = SCAN_HIGHLIGHT_FRAMES;
                }
            }
            AbilityKind::TimeJump => {
                self.stats.timeline = self.stats.timeline.next();
                self.create_particles(self.player.body.center(), 50, colors::CYAN);
            }
            AbilityKind::Entangle => {
                let center = self.player.body.center();
                let mut linked = 0u64;
                for c in self.collectibles.iter_mut().filter(|c| !c.collected) {
                    if c.body.center().distance(center) < ENTANGLE_RADIUS {
                        c.entangled = ENTANGLE_FRAMES;
                        linked += 1;
                    }
                }
                if linked >= 2 {
                    self.stats.score += linked * 50;
                }
            }
        }
        true
    }

    /// Apply a pickup's effect. The caller removes the item.
    pub fn collect(&mut self, kind: CollectibleKind, at: Vec2) {
        let (sound, burst, color) = match kind {
            CollectibleKind::Banana => {
                self.stats.bananas += 1;
                self.stats.score += u64::from(kind.value());
                (Sound::Collect, 8, colors::YELLOW)
            }
            CollectibleKind::Key => {
                self.stats.keys += 1;
                self.stats.score += u64::from(kind.value());
                (Sound::Key, 12, colors::ORANGE)
            }
            CollectibleKind::Quantum => {
                self.stats.quantum_energy = (self.stats.quantum_energy + 25.0).min(MAX_QUANTUM_ENERGY);
                self.stats.score += u64::from(kind.value());
                (Sound::Quantum, 15, colors::CYAN)
            }
            CollectibleKind::Health => {
                self.stats.lives = lives_after_health(self.stats.lives);
                (Sound::Health, 10, colors::GREEN)
            }
        };
        self.play(sound);
        self.create_particles(at, burst, color);
    }

    /// Damage feedback for a hit enemy; death is handled by the cull
    pub fn damage_enemy(&mut self, index: usize, amount: i32) {
        let Some(enemy) = self.enemies.get_mut(index) else {
            return;
        };
        enemy.take_damage(amount);
        let at = enemy.body.center();
        self.create_particles(at, 10, colors::RED);
    }

    /// Remove dead enemies with their reward
    pub fn cull_dead_enemies(&mut self) {
        let (dead, alive): (Vec<Enemy>, Vec<Enemy>) =
            std::mem::take(&mut self.enemies).into_iter().partition(Enemy::is_dead);
        self.enemies = alive;
        for enemy in dead {
            self.create_particles(enemy.body.center(), 15, colors::RED);
            self.stats.score += enemy.kind.reward();
            self.play(Sound::EnemyDeath);
        }
    }

    pub fn is_level_complete(&self) -> bool {
        match self.requirement {
            Some(Requirement::Keys(n)) => self.stats.keys >= n,
            Some(Requirement::Quantum(_)) => !self
                .collectibles
                .iter()
                .any(|c| c.kind == CollectibleKind::Quantum && !c.collected),
            Some(Requirement::Boss(_)) => self.enemies.is_empty(),
            Some(Requirement::Bananas(n)) => self.stats.bananas >= n,
            None => false,
        }
    }

    /// Freeze the level and award the bonus. Only fires while playing.
    pub fn complete_level(&mut self) {
        if self.phase != GamePhase::Playing {
            return;
        }
        let bonus = LevelBonus::compute(&self.stats, self.current_level);
        self.stats.score += bonus.total;
        self.checkpoint = Some(Checkpoint {
            x: self.player.body.pos.x,
            y: self.player.body.pos.y,
            level: self.current_level,
        });
        self.last_bonus = Some(bonus);
        self.phase = GamePhase::LevelComplete {
            delay: PRESENTATION_DELAY_FRAMES,
        };

        self.play(Sound::LevelComplete);
        self.events.push(GameEvent::LevelCompleted {
            level: self.current_level,
            bonus,
        });
        self.events.push(GameEvent::SaveRequested);
        log::info!("Level {} complete, bonus {}", self.current_level, bonus.total);
    }

    /// Send the player back to the checkpoint for this level, or its start
    pub fn respawn_player(&mut self) {
        let at = self
            .checkpoint
            .filter(|cp| cp.level == self.current_level)
            .map(|cp| Vec2::new(cp.x, cp.y))
            .unwrap_or(self.player_start);
        self.player.respawn(at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::enemy::EnemyKind;

    fn playing(level: u32) -> GameState {
        let mut state = GameState::new(12345);
        state.start_new_game(level).unwrap();
        state
    }

    #[test]
    fn test_era_cycle_and_serde() {
        assert_eq!(Era::Classic.next(), Era::Quantum);
        assert_eq!(Era::Quantum.next(), Era::Future);
        assert_eq!(Era::Future.next(), Era::Classic);
        assert_eq!(serde_json::to_string(&Era::Future).unwrap(), "2048");
        assert_eq!(serde_json::from_str::<Era>("1994").unwrap(), Era::Classic);
        assert!(serde_json::from_str::<Era>("2000").is_err());
        assert_eq!(Era::try_from(2001), Err(UnknownEra(2001)));
    }

    #[test]
    fn test_apply_low_preset() {
        let mut state = playing(1);
        let mut settings = Settings::from_preset(crate::settings::QualityPreset::Low);
        state.apply_settings(&settings);
        assert_eq!(state.max_particles, 128);
        assert!(!state.animated_background);

        settings.quality = crate::settings::QualityPreset::High;
        settings.reduced_motion = true;
        state.apply_settings(&settings);
        assert!(!state.animated_background);
        assert!(!state.screen_shake);
    }

    #[test]
    fn test_new_game_defaults() {
        let state = playing(1);
        assert_eq!(state.phase, GamePhase::Playing);
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.quantum_energy, 100.0);
        assert_eq!(state.stats.timeline, Era::Quantum);
        assert!(!state.platforms.is_empty());
        assert_eq!(state.player.body.pos, state.player_start);
    }

    #[test]
    fn test_failed_load_leaves_state_untouched() {
        let mut state = playing(2);
        state.stats.score = 77;
        let platforms = state.platforms.len();
        let enemies = state.enemies.len();

        assert!(matches!(state.load_level(99), Err(LevelError::NotFound(99))));
        assert!(state.start_new_game(0).is_err());
        assert_eq!(state.current_level, 2);
        assert_eq!(state.stats.score, 77);
        assert_eq!(state.platforms.len(), platforms);
        assert_eq!(state.enemies.len(), enemies);
    }

    #[test]
    fn test_damage_and_invincibility() {
        let mut state = playing(1);
        state.player_take_damage(1);
        assert_eq!(state.stats.lives, 2);
        assert!(state.player.invincible);
        assert_eq!(state.player.body.vel.y, -10.0);
        assert_eq!(state.player.body.vel.x, -8.0);
        assert!(state.events.contains(&GameEvent::Sound(Sound::Hit)));

        // Blocked while invincible
        state.player_take_damage(1);
        assert_eq!(state.stats.lives, 2);
        // Player health is a separate counter
        assert_eq!(state.player.health, state.player.max_health);
    }

    #[test]
    fn test_game_over_exactly_once() {
        let mut state = playing(1);
        state.player_take_damage(10);
        assert_eq!(state.stats.lives, -7);
        assert!(matches!(state.phase, GamePhase::GameOver { .. }));

        state.player.invincible = false;
        state.player_take_damage(10);
        assert_eq!(state.stats.lives, -7);
        let overs = state
            .events
            .iter()
            .filter(|e| **e == GameEvent::Sound(Sound::GameOver))
            .count();
        assert_eq!(overs, 1);
    }

    #[test]
    fn test_collect_effects() {
        let mut state = playing(1);
        state.stats.quantum_energy = 90.0;
        state.collect(CollectibleKind::Quantum, Vec2::ZERO);
        assert_eq!(state.stats.quantum_energy, 100.0);
        assert_eq!(state.stats.score, 50);

        state.collect(CollectibleKind::Key, Vec2::ZERO);
        assert_eq!(state.stats.keys, 1);
        assert_eq!(state.stats.score, 150);

        state.stats.lives = 5;
        state.collect(CollectibleKind::Health, Vec2::ZERO);
        assert_eq!(state.stats.lives, 5);
        assert_eq!(state.stats.score, 150);
    }

    #[test]
    fn test_ability_rejection_has_no_side_effects() {
        let mut state = playing(1);
        state.stats.quantum_energy = 10.0;
        let before = state.stats.clone();
        assert!(!state.use_ability(AbilityKind::Scan));
        assert_eq!(state.stats, before);
        assert_eq!(state.player.abilities.scan.cooldown, 0);
        assert!(state.events.is_empty());
    }

    #[test]
    fn test_scan_marks_collectibles() {
        let mut state = playing(1);
        assert!(state.use_ability(AbilityKind::Scan));
        assert_eq!(state.stats.quantum_energy, 80.0);
        assert!(state.collectibles.iter().all(|c| c.scanned == SCAN_HIGHLIGHT_FRAMES));
        // Cooldown blocks a second use
        assert!(!state.use_ability(AbilityKind::Scan));
    }

    #[test]
    fn test_time_jump_cycles_timeline() {
        let mut state = playing(1);
        assert!(state.use_ability(AbilityKind::TimeJump));
        assert_eq!(state.stats.timeline, Era::Future);
        assert_eq!(state.particles.len(), 50);
        assert!(state.events.contains(&GameEvent::Sound(Sound::TimeJump)));
    }

    #[test]
    fn test_entangle_bonus() {
        let mut state = playing(1);
        state.collectibles.clear();
        let p = state.player.body.center();
        for dx in [30.0, 60.0, 500.0] {
            state.collectibles.push(Collectible::new(CollectibleKind::Banana, p.x + dx, p.y, 0.0));
        }
        assert!(state.use_ability(AbilityKind::Entangle));
        assert_eq!(state.stats.score, 100);
        assert_eq!(state.collectibles[0].entangled, ENTANGLE_FRAMES);
        assert_eq!(state.collectibles[2].entangled, 0);
    }

    #[test]
    fn test_entangle_single_link_no_bonus() {
        let mut state = playing(1);
        state.collectibles.clear();
        let p = state.player.body.center();
        state.collectibles.push(Collectible::new(CollectibleKind::Banana, p.x, p.y, 0.0));
        assert!(state.use_ability(AbilityKind::Entangle));
        assert_eq!(state.stats.score, 0);
        assert_eq!(state.collectibles[0].entangled, ENTANGLE_FRAMES);
    }

    #[test]
    fn test_level_bonus() {
        let stats = Stats {
            bananas: 4,
            total_time: 12_500.0,
            ..Default::default()
        };
        let bonus = LevelBonus::compute(&stats, 2);
        assert_eq!(bonus.time, (300 - 12) * 10);
        assert_eq!(bonus.bananas, 20);
        assert_eq!(bonus.level, 1000);
        assert_eq!(bonus.total, 2880 + 20 + 1000);

        let slow = Stats {
            total_time: 1_000_000.0,
            ..Default::default()
        };
        assert_eq!(LevelBonus::compute(&slow, 1).time, 0);
    }

    #[test]
    fn test_complete_level_once() {
        let mut state = playing(1);
        state.complete_level();
        let score = state.stats.score;
        assert!(matches!(state.phase, GamePhase::LevelComplete { .. }));
        assert_eq!(state.checkpoint.map(|c| c.level), Some(1));
        state.complete_level();
        assert_eq!(state.stats.score, score);
        let completions = state
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::LevelCompleted { .. }))
            .count();
        assert_eq!(completions, 1);
    }

    #[test]
    fn test_requirements() {
        let mut state = playing(1);
        assert!(!state.is_level_complete());
        state.stats.keys = 5;
        assert!(state.is_level_complete());

        let mut state = playing(3);
        assert!(!state.is_level_complete());
        state.enemies.clear();
        assert!(state.is_level_complete());

        let mut state = playing(2);
        assert!(!state.is_level_complete());
        for c in state.collectibles.iter_mut().filter(|c| c.kind == CollectibleKind::Quantum) {
            c.collected = true;
        }
        assert!(state.is_level_complete());
    }

    #[test]
    fn test_cull_rewards() {
        let mut state = playing(1);
        state.enemies.clear();
        let mut boss = Enemy::new(EnemyKind::Boss, 100.0, 100.0, 1.0);
        boss.health = 0;
        state.enemies.push(boss);
        state.enemies.push(Enemy::new(EnemyKind::Bandit, 300.0, 100.0, 1.0));
        state.cull_dead_enemies();
        assert_eq!(state.enemies.len(), 1);
        assert_eq!(state.stats.score, 1000);
        assert!(state.events.contains(&GameEvent::Sound(Sound::EnemyDeath)));
        // Already removed: a second cull scores nothing
        state.cull_dead_enemies();
        assert_eq!(state.stats.score, 1000);
    }

    #[test]
    fn test_damage_enemy_bursts_at_center() {
        let mut state = playing(1);
        state.enemies.clear();
        state.particles.clear();
        state.enemies.push(Enemy::new(EnemyKind::Drone, 300.0, 100.0, 1.0));
        let center = state.enemies[0].body.center();

        state.damage_enemy(0, 10);
        assert_eq!(state.enemies[0].health, EnemyKind::Drone.max_health() - 10);
        assert_eq!(state.particles.len(), 10);
        assert!(state.particles.iter().all(|p| p.color == colors::RED && p.body.pos == center));

        // Out of range is ignored
        state.damage_enemy(5, 10);
        assert_eq!(state.particles.len(), 10);
    }

    #[test]
    fn test_animated_platforms_get_own_phase() {
        let state = playing(2);
        let phases: Vec<f32> = state
            .platforms
            .iter()
            .filter(|p| p.is_animated())
            .map(|p| p.phase)
            .collect();
        assert!(phases.len() >= 2);
        assert!(phases.iter().all(|ph| (0.0..std::f32::consts::TAU).contains(ph)));
        assert!(phases.windows(2).any(|w| w[0] != w[1]));
        assert!(
            state
                .platforms
                .iter()
                .filter(|p| !p.is_animated())
                .all(|p| p.phase == 0.0)
        );
    }

    #[test]
    fn test_particle_cap_drops_oldest() {
        let mut state = playing(1);
        state.max_particles = 10;
        state.create_particles(Vec2::ZERO, 8, colors::RED);
        state.create_particles(Vec2::ZERO, 8, colors::GREEN);
        assert_eq!(state.particles.len(), 10);
        assert!(state.particles.iter().filter(|p| p.color == colors::GREEN).count() == 8);
    }

    #[test]
    fn test_next_level_and_victory() {
        let mut state = playing(4);
        state.continue_to_next_level().unwrap();
        assert_eq!(state.phase, GamePhase::Victory);
        assert!(state.events.contains(&GameEvent::Victory));

        let mut state = playing(1);
        state.continue_to_next_level().unwrap();
        assert_eq!(state.current_level, 2);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_restart_resets_lives() {
        let mut state = playing(2);
        state.stats.lives = -4;
        state.stats.score = 500;
        state.restart_level().unwrap();
        assert_eq!(state.stats.lives, 3);
        assert_eq!(state.stats.score, 500);
        assert_eq!(state.phase, GamePhase::Playing);
    }

    #[test]
    fn test_continue_from_save() {
        let mut state = playing(2);
        state.stats.score = 1234;
        state.checkpoint = Some(Checkpoint {
            x: 321.0,
            y: 123.0,
            level: 2,
        });
        let save = state.save_data(42);

        let mut resumed = GameState::new(1);
        resumed.continue_game(&save).unwrap();
        assert_eq!(resumed.current_level, 2);
        assert_eq!(resumed.stats.score, 1234);
        assert_eq!(resumed.player.body.pos, Vec2::new(321.0, 123.0));
    }

    #[test]
    fn test_pause_toggle() {
        let mut state = playing(1);
        state.toggle_pause();
        assert!(state.is_paused());
        state.toggle_pause();
        assert_eq!(state.phase, GamePhase::Playing);

        let mut title = GameState::new(1);
        title.toggle_pause();
        assert_eq!(title.phase, GamePhase::Title);
    }

    #[test]
    fn test_cheats() {
        let mut state = playing(1);
        state.apply_cheat(Cheat::AddScore).unwrap();
        state.apply_cheat(Cheat::AddBananas).unwrap();
        state.apply_cheat(Cheat::AddLives).unwrap();
        assert_eq!(state.stats.score, 1000);
        assert_eq!(state.stats.bananas, 10);
        assert_eq!(state.stats.lives, 6);

        state.apply_cheat(Cheat::CycleTimeline).unwrap();
        assert_eq!(state.stats.timeline, Era::Future);
        state.apply_cheat(Cheat::CycleTimeline).unwrap();
        assert_eq!(state.stats.timeline, Era::Quantum);

        state.apply_cheat(Cheat::NextLevel).unwrap();
        assert_eq!(state.current_level, 2);
        state.stats.keys = 2;
        state.apply_cheat(Cheat::ResetLevel).unwrap();
        assert_eq!(state.current_level, 2);
        assert_eq!(state.stats.keys, 2);

        let mut last = playing(4);
        last.apply_cheat(Cheat::NextLevel).unwrap();
        assert_eq!(last.current_level, 4);
    }

    #[test]
    fn test_camera_clamps_to_level() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut camera = Camera::default();
        camera.smoothing = 1.0;
        let viewport = Vec2::new(800.0, 600.0);
        let level = Vec2::new(2000.0, 600.0);

        camera.follow(Vec2::new(10.0, 10.0), viewport, level, 16.0, &mut rng);
        assert_eq!(camera.pos, Vec2::ZERO);
        camera.follow(Vec2::new(1990.0, 500.0), viewport, level, 16.0, &mut rng);
        assert_eq!(camera.pos, Vec2::new(1200.0, 0.0));
        camera.follow(Vec2::new(1000.0, 300.0), viewport, level, 16.0, &mut rng);
        assert_eq!(camera.pos, Vec2::new(600.0, 0.0));
    }

    #[test]
    fn test_camera_smoothing() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut camera = Camera::default();
        let viewport = Vec2::new(800.0, 600.0);
        let level = Vec2::new(5000.0, 5000.0);
        camera.follow(Vec2::new(1400.0, 300.0), viewport, level, 16.0, &mut rng);
        assert!((camera.pos.x - 100.0).abs() < 1e-3);
        assert_eq!(camera.pos.y, 0.0);
    }
}
