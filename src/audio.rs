//! Sound effect triggering
//!
//! The game only decides *what* to play and *where*; playback belongs to
//! whatever backend implements `AudioService`.

use glam::Vec3;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Snowball released
    Toss,
    /// Snowball bounced off the environment
    Bounce,
    /// Snowball burst
    Burst,
    /// Splat decal left on a surface
    Splat,
    /// Snowring appeared
    RingSpawn,
    /// Snowball passed through a ring
    RingScore,
    /// New high score
    HighScore,
}

impl SoundEffect {
    /// Clip identifier for asset-backed players
    pub fn clip_name(&self) -> &'static str {
        match self {
            SoundEffect::Toss => "toss",
            SoundEffect::Bounce => "bounce",
            SoundEffect::Burst => "burst",
            SoundEffect::Splat => "splat",
            SoundEffect::RingSpawn => "ring_spawn",
            SoundEffect::RingScore => "ring_score",
            SoundEffect::HighScore => "high_score",
        }
    }
}

/// Fire-and-forget positional audio
pub trait AudioService {
    fn play_at(&mut self, effect: SoundEffect, position: Vec3);
}

/// A sound that was requested, with the volume it would play at
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayedSound {
    pub effect: SoundEffect,
    pub position: Vec3,
    pub volume: f32,
}

/// Audio manager: applies volume/mute and records what was played
#[derive(Debug, Clone)]
pub struct AudioManager {
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
    /// Sounds played so far (newest last)
    pub played: Vec<PlayedSound>,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
            played: Vec::new(),
        }
    }

    /// Create a manager using the volumes from player settings
    pub fn from_settings(settings: &crate::Settings) -> Self {
        let mut manager = Self::new();
        manager.set_master_volume(settings.master_volume);
        manager.set_sfx_volume(settings.sfx_volume);
        manager.set_muted(settings.muted);
        manager
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

    /// Get effective volume
    fn effective_volume(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume
        }
    }

    pub fn count(&self, effect: SoundEffect) -> usize {
        self.played.iter().filter(|s| s.effect == effect).count()
    }
}

impl AudioService for AudioManager {
    fn play_at(&mut self, effect: SoundEffect, position: Vec3) {
        let volume = self.effective_volume();
        if volume <= 0.0 {
            return;
        }
        log::debug!("Play {} at {:?} (vol {:.2})", effect.clip_name(), position, volume);
        self.played.push(PlayedSound {
            effect,
            position,
            volume,
        });
    }
}
