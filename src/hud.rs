//! HUD snapshot
//!
//! A read-only copy of what the overlay shows. Building one never touches
//! the simulation, so the DOM layer can refresh it every frame.

use serde::Serialize;

use crate::sim::GameState;

/// Colour band for the quantum energy bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum EnergyBand {
    Low,
    Medium,
    High,
}

impl EnergyBand {
    pub fn for_energy(energy: f32) -> Self {
        if energy < 20.0 {
            EnergyBand::Low
        } else if energy < 50.0 {
            EnergyBand::Medium
        } else {
            EnergyBand::High
        }
    }

    /// CSS background for the bar
    pub fn css(self) -> &'static str {
        match self {
            EnergyBand::Low => "#f00",
            EnergyBand::Medium => "#ff0",
            EnergyBand::High => "linear-gradient(90deg, #00f, #0ff)",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HudSnapshot {
    pub score: u64,
    /// Never negative, even when stats are
    pub lives: i32,
    pub bananas: u32,
    pub keys: u32,
    /// Percentage, used as the bar width
    pub energy: f32,
    pub energy_band: EnergyBand,
    pub timeline: String,
    pub level: u32,
    pub level_name: String,
}

impl HudSnapshot {
    pub fn from_state(state: &GameState) -> Self {
        let stats = &state.stats;
        Self {
            score: stats.score,
            lives: stats.lives.max(0),
            bananas: stats.bananas,
            keys: stats.keys,
            energy: stats.quantum_energy,
            energy_band: EnergyBand::for_energy(stats.quantum_energy),
            timeline: format!("TIMELINE: {}", stats.timeline.year()),
            level: state.current_level,
            level_name: state.level_name.clone(),
        }
    }

    /// Width style for the energy bar
    pub fn energy_width(&self) -> String {
        format!("{}%", self.energy.clamp(0.0, 100.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Era;

    #[test]
    fn test_energy_bands() {
        assert_eq!(EnergyBand::for_energy(0.0), EnergyBand::Low);
        assert_eq!(EnergyBand::for_energy(19.9), EnergyBand::Low);
        assert_eq!(EnergyBand::for_energy(20.0), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_energy(49.9), EnergyBand::Medium);
        assert_eq!(EnergyBand::for_energy(50.0), EnergyBand::High);
        assert_eq!(EnergyBand::for_energy(100.0), EnergyBand::High);
    }

    #[test]
    fn test_snapshot_floors_lives() {
        let mut state = GameState::new(1);
        state.stats.lives = -7;
        state.stats.timeline = Era::Future;
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.lives, 0);
        assert_eq!(hud.timeline, "TIMELINE: 2048");
    }

    #[test]
    fn test_snapshot_after_load() {
        let mut state = GameState::new(1);
        state.start_new_game(1).unwrap();
        state.stats.quantum_energy = 35.0;
        let hud = HudSnapshot::from_state(&state);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.level_name, "Vine Canyon");
        assert_eq!(hud.energy_band, EnergyBand::Medium);
        assert_eq!(hud.energy_width(), "35%");
    }
}
