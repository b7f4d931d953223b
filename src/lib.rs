//! Jungle Quest - a 2D platformer across three timelines
//!
//! Core modules:
//! - `sim`: Simulation (physics, entities, collisions, game state)
//! - `renderer`: Draw commands over a 2D surface (Canvas 2D on web)
//! - `platform`: Browser/native platform abstraction (input, storage, time)
//! - `persistence`: Save/continue envelope
//! - `audio`: Procedural sound effects
//! - `settings`: Player preferences

pub mod audio;
pub mod error;
pub mod hud;
pub mod persistence;
pub mod platform;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::{LevelError, SaveError};
pub use settings::{QualityPreset, Settings};

/// Game configuration constants
pub mod consts {
    /// Downward acceleration per scaled millisecond
    pub const GRAVITY: f32 = 0.5;
    /// Horizontal damping while grounded
    pub const FRICTION: f32 = 0.85;
    /// Horizontal damping while airborne
    pub const AIR_RESISTANCE: f32 = 0.95;
    pub const MAX_FALL_SPEED: f32 = 20.0;
    pub const MAX_HORIZONTAL_SPEED: f32 = 10.0;
    /// Converts millisecond deltas into "60 fps frame" units
    pub const TIME_SCALE: f32 = 0.016;
    /// Largest frame delta the loop will simulate (ms)
    pub const MAX_FRAME_DT_MS: f32 = 100.0;

    /// Visible area in world units
    pub const VIEWPORT_WIDTH: f32 = 800.0;
    pub const VIEWPORT_HEIGHT: f32 = 600.0;
    pub const CAMERA_SMOOTHING: f32 = 0.1;

    pub const STARTING_LIVES: i32 = 3;
    pub const MAX_LIVES: i32 = 5;
    pub const MAX_QUANTUM_ENERGY: f32 = 100.0;
    /// Energy regained every tick
    pub const ENERGY_REGEN: f32 = 0.3;

    /// Frames between automatic saves (~60 s)
    pub const AUTO_SAVE_FRAMES: u64 = 3600;
    /// Frames between a level/game ending and its summary screen (~1 s)
    pub const PRESENTATION_DELAY_FRAMES: u32 = 60;
    /// Frames the player stays invincible after a hit
    pub const INVINCIBILITY_FRAMES: u32 = 60;

    /// Projectiles farther than this outside the level are culled
    pub const PROJECTILE_CULL_MARGIN: f32 = 100.0;
    pub const DEFAULT_MAX_PARTICLES: usize = 512;
}
