//! Audio system using Web Audio API
//!
//! Procedurally generated beeps - no external files needed. Each [`Sound`]
//! is a short table of tones; the manager turns them into oscillators
//! scheduled on the audio clock.

use serde::{Deserialize, Serialize};

/// Sound effect vocabulary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    Jump,
    /// Banana picked up
    Collect,
    Key,
    Quantum,
    Health,
    /// Player took damage
    Hit,
    /// Enemy stomped
    EnemyHit,
    EnemyDeath,
    EnemyShoot,
    BossShoot,
    QuantumScan,
    TimeJump,
    Entangle,
    Victory,
    LevelComplete,
    GameOver,
    /// Boss calls in bandits
    Summon,
}

impl Sound {
    pub const ALL: [Sound; 17] = [
        Sound::Jump,
        Sound::Collect,
        Sound::Key,
        Sound::Quantum,
        Sound::Health,
        Sound::Hit,
        Sound::EnemyHit,
        Sound::EnemyDeath,
        Sound::EnemyShoot,
        Sound::BossShoot,
        Sound::QuantumScan,
        Sound::TimeJump,
        Sound::Entangle,
        Sound::Victory,
        Sound::LevelComplete,
        Sound::GameOver,
        Sound::Summon,
    ];

    /// Kebab-case name, as used by page scripts
    pub fn name(self) -> &'static str {
        match self {
            Sound::Jump => "jump",
            Sound::Collect => "collect",
            Sound::Key => "key",
            Sound::Quantum => "quantum",
            Sound::Health => "health",
            Sound::Hit => "hit",
            Sound::EnemyHit => "enemy-hit",
            Sound::EnemyDeath => "enemy-death",
            Sound::EnemyShoot => "enemy-shoot",
            Sound::BossShoot => "boss-shoot",
            Sound::QuantumScan => "quantum-scan",
            Sound::TimeJump => "time-jump",
            Sound::Entangle => "entangle",
            Sound::Victory => "victory",
            Sound::LevelComplete => "level-complete",
            Sound::GameOver => "game-over",
            Sound::Summon => "summon",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }

    /// The tones that make up this sound
    pub fn tones(self) -> &'static [Tone] {
        use Waveform::*;
        match self {
            Sound::Jump => const { &[Tone::note(523.25, 0.1, Sine, 0.0)] },
            Sound::Collect => const { &[Tone::note(659.25, 0.05, Square, 0.0)] },
            Sound::Key => const {
                &[
                    Tone::note(880.0, 0.1, Sawtooth, 0.0),
                    Tone::note(987.77, 0.1, Sawtooth, 0.05),
                ]
            },
            Sound::Quantum => const {
                &[
                    Tone::note(1046.5, 0.2, Sine, 0.0),
                    Tone::note(1318.51, 0.2, Sine, 0.1),
                ]
            },
            Sound::Health => const {
                &[
                    Tone::note(783.99, 0.15, Triangle, 0.0),
                    Tone::note(1046.5, 0.15, Triangle, 0.05),
                ]
            },
            Sound::Hit => const {
                &[
                    Tone::note(220.0, 0.3, Square, 0.0),
                    Tone::note(165.0, 0.3, Square, 0.05),
                ]
            },
            Sound::EnemyHit => const { &[Tone::note(330.0, 0.2, Square, 0.0)] },
            Sound::EnemyDeath => const {
                &[
                    Tone::note(165.0, 0.5, Sawtooth, 0.0),
                    Tone::note(110.0, 0.5, Sawtooth, 0.1),
                ]
            },
            Sound::EnemyShoot => const { &[Tone::note(440.0, 0.1, Square, 0.0)] },
            Sound::BossShoot => const {
                &[
                    Tone::note(220.0, 0.2, Sawtooth, 0.0),
                    Tone::note(165.0, 0.2, Sawtooth, 0.05),
                ]
            },
            Sound::QuantumScan => const { &[Tone::sweep(200.0, 1000.0, 0.3, Sine)] },
            Sound::TimeJump => const { &[Tone::sweep(1000.0, 200.0, 0.4, Sawtooth)] },
            Sound::Entangle => const {
                &[
                    Tone::note(1567.98, 0.5, Square, 0.0),
                    Tone::note(1975.53, 0.5, Square, 0.1),
                ]
            },
            Sound::Victory => const {
                &[
                    Tone::note(523.25, 0.3, Sine, 0.0),
                    Tone::note(659.25, 0.3, Sine, 0.2),
                    Tone::note(783.99, 0.3, Sine, 0.4),
                    Tone::note(1046.5, 0.3, Sine, 0.6),
                    Tone::note(1318.51, 0.3, Sine, 0.8),
                    Tone::note(1567.98, 0.3, Sine, 1.0),
                ]
            },
            Sound::LevelComplete => const {
                &[
                    Tone::note(659.25, 0.2, Triangle, 0.0),
                    Tone::note(783.99, 0.2, Triangle, 0.15),
                    Tone::note(1046.5, 0.2, Triangle, 0.3),
                ]
            },
            Sound::GameOver => const {
                &[
                    Tone::note(220.0, 0.5, Sawtooth, 0.0),
                    Tone::note(165.0, 0.5, Sawtooth, 0.3),
                    Tone::note(110.0, 0.5, Sawtooth, 0.6),
                ]
            },
            Sound::Summon => const { &[Tone::sweep(50.0, 400.0, 0.5, Triangle)] },
        }
    }

    /// Seconds from trigger until the last tone ends
    pub fn length(self) -> f64 {
        self.tones()
            .iter()
            .map(|t| t.delay + t.duration)
            .fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Waveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One oscillator burst
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tone {
    /// Start frequency in Hz
    pub freq: f32,
    /// Linear glide target, if any
    pub end_freq: Option<f32>,
    /// Seconds
    pub duration: f64,
    pub waveform: Waveform,
    /// Seconds after the trigger
    pub delay: f64,
}

impl Tone {
    const fn note(freq: f32, duration: f64, waveform: Waveform, delay: f64) -> Self {
        Self {
            freq,
            end_freq: None,
            duration,
            waveform,
            delay,
        }
    }

    const fn sweep(from: f32, to: f32, duration: f64, waveform: Waveform) -> Self {
        Self {
            freq: from,
            end_freq: Some(to),
            duration,
            waveform,
            delay: 0.0,
        }
    }
}

/// Gain each tone starts at, before master and sfx volume
const TONE_GAIN: f32 = 0.1;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{Sound, TONE_GAIN, Tone, Waveform};
    use crate::settings::Settings;

    impl From<Waveform> for OscillatorType {
        fn from(w: Waveform) -> Self {
            match w {
                Waveform::Sine => OscillatorType::Sine,
                Waveform::Square => OscillatorType::Square,
                Waveform::Sawtooth => OscillatorType::Sawtooth,
                Waveform::Triangle => OscillatorType::Triangle,
            }
        }
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        muted: bool,
    }

    impl Default for AudioManager {
        fn default() -> Self {
            Self::new()
        }
    }

    impl AudioManager {
        pub fn new() -> Self {
            // May fail outside a secure context
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: 0.7,
                sfx_volume: 0.8,
                muted: false,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        pub fn apply_settings(&mut self, settings: &Settings) {
            self.set_master_volume(settings.master_volume);
            self.set_sfx_volume(settings.sfx_volume);
            self.set_muted(!settings.sound_enabled);
        }

        /// Set master volume (0.0 - 1.0)
        pub fn set_master_volume(&mut self, vol: f32) {
            self.master_volume = vol.clamp(0.0, 1.0);
        }

        /// Set SFX volume (0.0 - 1.0)
        pub fn set_sfx_volume(&mut self, vol: f32) {
            self.sfx_volume = vol.clamp(0.0, 1.0);
        }

        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
        }

        fn effective_volume(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        /// Fire and forget
        pub fn play(&self, sound: Sound) {
            let vol = self.effective_volume();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };

            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            for tone in sound.tones() {
                self.play_tone(ctx, tone, vol);
            }
        }

        /// Play by kebab-case name; unknown names are logged and ignored
        pub fn play_named(&self, name: &str) {
            match Sound::from_name(name) {
                Some(sound) => self.play(sound),
                None => log::warn!("Sound '{}' not found", name),
            }
        }

        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        fn play_tone(&self, ctx: &AudioContext, tone: &Tone, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, tone.freq, tone.waveform.into()) else {
                return;
            };
            let t = ctx.current_time() + tone.delay;
            let end = t + tone.duration;

            if let Some(to) = tone.end_freq {
                osc.frequency().set_value_at_time(tone.freq, t).ok();
                osc.frequency().linear_ramp_to_value_at_time(to, end).ok();
            }
            gain.gain().set_value_at_time(vol * TONE_GAIN, t).ok();
            gain.gain().exponential_ramp_to_value_at_time(0.01, end).ok();

            osc.start_with_when(t).ok();
            osc.stop_with_when(end).ok();
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

/// Silent stand-in for native builds
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct AudioManager {
    played: std::cell::RefCell<Vec<Sound>>,
}

#[cfg(not(target_arch = "wasm32"))]
impl AudioManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn play(&self, sound: Sound) {
        log::trace!("sound: {}", sound.name());
        self.played.borrow_mut().push(sound);
    }

    pub fn play_named(&self, name: &str) {
        match Sound::from_name(name) {
            Some(sound) => self.play(sound),
            None => log::warn!("Sound '{}' not found", name),
        }
    }

    /// Everything played so far
    pub fn history(&self) -> Vec<Sound> {
        self.played.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for sound in Sound::ALL {
            assert_eq!(Sound::from_name(sound.name()), Some(sound));
        }
        assert_eq!(Sound::from_name("enemy-hit"), Some(Sound::EnemyHit));
        assert_eq!(Sound::from_name("kazoo"), None);
    }

    #[test]
    fn test_every_sound_has_tones() {
        let tables: Vec<&'static [Tone]> = Sound::ALL.iter().map(|s| s.tones()).collect();
        assert_eq!(tables.len(), Sound::ALL.len());
        for sound in Sound::ALL {
            let tones = sound.tones();
            assert!(!tones.is_empty(), "{} is silent", sound.name());
            for t in tones {
                assert!(t.freq > 0.0 && t.duration > 0.0 && t.delay >= 0.0);
            }
        }
    }

    #[test]
    fn test_sequences() {
        let victory: &'static [Tone] = Sound::Victory.tones();
        assert_eq!(victory.len(), 6);
        assert!((victory[5].delay - 1.0).abs() < 1e-9);
        assert!((Sound::GameOver.length() - 1.1).abs() < 1e-9);
        assert_eq!(Sound::TimeJump.tones()[0].end_freq, Some(200.0));
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_native_manager_ignores_unknown() {
        let audio = AudioManager::new();
        audio.play_named("jump");
        audio.play_named("does-not-exist");
        assert_eq!(audio.history(), vec![Sound::Jump]);
    }
}
