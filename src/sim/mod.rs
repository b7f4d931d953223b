//! Simulation module
//!
//! All gameplay logic lives here, free of rendering and browser
//! dependencies. Randomness comes from the world's seeded RNG.

pub mod body;
pub mod context;
pub mod enemy;
pub mod entity;
pub mod level;
pub mod physics;
pub mod player;
pub mod state;
pub mod tick;

pub use body::{Body, Bounded, Rect};
pub use enemy::{AiState, BossPhase, Enemy, EnemyKind};
pub use entity::{
    Collectible, CollectibleKind, Hazard, HazardKind, Particle, Platform, PlatformKind, Projectile,
};
pub use level::{LevelDef, Requirement};
pub use player::{AbilityKind, Player, SpriteState};
pub use state::{Camera, Cheat, Era, GameEvent, GamePhase, GameState, LevelBonus, Stats};
pub use tick::{TickInput, tick};
