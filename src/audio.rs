//! Sound cues
//!
//! The simulation only names sounds. Playback belongs to whatever backend the
//! host wires in; [`AudioManager`] applies the volume settings on the way.

use serde::{Deserialize, Serialize};

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SoundEffect {
    /// Hostile stomped
    Stomp,
    /// Coin collected or released
    Coin,
    /// Block bumped from below, or a shell hit a wall
    Bump,
    /// Hostile knocked away, shell kicked
    Kick,
    /// Powerup collected
    Powerup,
    /// Powerup rising out of a block
    PowerupAppears,
    /// Player shrinking after a hit
    Pipe,
    BrickSmash,
    OneUp,
    Fireball,
    Death,
    Flagpole,
    /// Remaining time ticking into the score
    CountDown,
}

impl SoundEffect {
    pub const ALL: [SoundEffect; 13] = [
        SoundEffect::Stomp,
        SoundEffect::Coin,
        SoundEffect::Bump,
        SoundEffect::Kick,
        SoundEffect::Powerup,
        SoundEffect::PowerupAppears,
        SoundEffect::Pipe,
        SoundEffect::BrickSmash,
        SoundEffect::OneUp,
        SoundEffect::Fireball,
        SoundEffect::Death,
        SoundEffect::Flagpole,
        SoundEffect::CountDown,
    ];

    /// Asset key the backend resolves to a sample
    pub fn key(self) -> &'static str {
        match self {
            SoundEffect::Stomp => "stomp",
            SoundEffect::Coin => "coin",
            SoundEffect::Bump => "bump",
            SoundEffect::Kick => "kick",
            SoundEffect::Powerup => "powerup",
            SoundEffect::PowerupAppears => "powerup_appears",
            SoundEffect::Pipe => "pipe",
            SoundEffect::BrickSmash => "brick_smash",
            SoundEffect::OneUp => "one_up",
            SoundEffect::Fireball => "fireball",
            SoundEffect::Death => "death",
            SoundEffect::Flagpole => "flagpole",
            SoundEffect::CountDown => "count_down",
        }
    }
}

/// Something that can actually make noise
pub trait SoundBackend {
    /// Play the sample registered under `key` at `volume` (0.0 - 1.0)
    fn play(&mut self, key: &str, volume: f32);
}

/// Backend that only logs what would have played
#[derive(Debug, Default)]
pub struct LogBackend;

impl SoundBackend for LogBackend {
    fn play(&mut self, key: &str, volume: f32) {
        log::debug!("sound '{key}' at volume {volume:.2}");
    }
}

/// Audio manager for the game
pub struct AudioManager<B: SoundBackend> {
    backend: B,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl<B: SoundBackend> AudioManager<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Take volume and mute from the player's settings
    pub fn apply_settings(&mut self, settings: &Settings) {
        self.set_master_volume(settings.master_volume);
        self.set_sfx_volume(settings.sfx_volume);
        self.set_muted(settings.muted);
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Set SFX volume (0.0 - 1.0)
    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
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

    /// Play a sound effect
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume();
        if vol <= 0.0 {
            return;
        }
        self.backend.play(effect.key(), vol);
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }
}
