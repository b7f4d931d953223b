//! Game settings and preferences
//!
//! Persisted separately from game saves, as JSON in the key/value store.

use serde::{Deserialize, Serialize};

use crate::error::SaveError;
use crate::platform::storage::KeyValueStore;

/// Quality preset levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum QualityPreset {
    Low,
    #[default]
    Medium,
    High,
}

impl QualityPreset {
    pub const ALL: [QualityPreset; 3] = [QualityPreset::Low, QualityPreset::Medium, QualityPreset::High];

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            QualityPreset::Low => "QUALITY: LOW",
            QualityPreset::Medium => "QUALITY: MEDIUM",
            QualityPreset::High => "QUALITY: HIGH",
        }
    }

    /// Low -> Medium -> High -> Low
    pub fn next(self) -> Self {
        match self {
            QualityPreset::Low => QualityPreset::Medium,
            QualityPreset::Medium => QualityPreset::High,
            QualityPreset::High => QualityPreset::Low,
        }
    }

    /// Maximum live particles for this preset
    pub fn max_particles(self) -> usize {
        match self {
            QualityPreset::Low => 128,
            QualityPreset::Medium => 512,
            QualityPreset::High => 1024,
        }
    }

    /// Whether era backgrounds draw their animated layers
    pub fn animated_background(self) -> bool {
        !matches!(self, QualityPreset::Low)
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Graphics quality preset
    pub quality: QualityPreset,

    // === Visual Effects ===
    /// Screen shake on hits and stomps
    pub screen_shake: bool,
    /// Particle bursts
    pub particles: bool,
    /// Scanline overlay on the canvas
    pub crt_effect: bool,

    // === Controls ===
    /// On-screen touch buttons
    pub mobile_controls: bool,

    // === Audio ===
    pub sound_enabled: bool,
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Mute when window loses focus
    pub mute_on_blur: bool,

    // === Accessibility ===
    /// Reduced motion (no shake)
    pub reduced_motion: bool,

    // === Debug ===
    /// Hitboxes and predicted player position
    pub debug: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            quality: QualityPreset::Medium,

            screen_shake: true,
            particles: true,
            crt_effect: true,

            mobile_controls: true,

            sound_enabled: true,
            master_volume: 0.7,
            sfx_volume: 0.8,
            mute_on_blur: true,

            reduced_motion: false,

            debug: false,
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "jungleQuest2026_settings";

    /// Create settings from a quality preset
    pub fn from_preset(preset: QualityPreset) -> Self {
        Self {
            quality: preset,
            ..Self::default()
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }

    /// Effective particle count cap
    pub fn max_particles(&self) -> usize {
        if !self.particles {
            0
        } else {
            self.quality.max_particles()
        }
    }

    /// Load from the store, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings");
                    return settings;
                }
                Err(e) => log::warn!("Ignoring unreadable settings: {}", e),
            },
            Ok(None) => {}
            Err(e) => log::warn!("Settings unavailable: {}", e),
        }
        log::info!("Using default settings");
        Self::default()
    }

    pub fn save(&self, store: &dyn KeyValueStore) -> Result<(), SaveError> {
        let json = serde_json::to_string(self)?;
        store.set(Self::STORAGE_KEY, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
