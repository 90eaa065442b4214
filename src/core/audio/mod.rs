//=========================================================================
// Audio
//=========================================================================
//
// Audio collaborator contract.
//
// The app only needs cached sound loading and fire-and-forget playback;
// mixing and decoding live behind the `AudioSystem` trait.
//
// Lifecycle: startup() → [begin_frame() → ... → end_frame()]* → shutdown()
//
//=========================================================================

//=== Module Declarations =================================================

mod headless;

//=== Public API ==========================================================

pub use headless::{HeadlessAudio, PlaybackRecord};

//=== Internal Dependencies ===============================================

use crate::core::error::AudioError;

//=== Identifiers =========================================================

/// Cached sound asset. Stable for the lifetime of the audio system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SoundId(pub(crate) u32);

/// One started playback of a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PlaybackId(pub(crate) u64);

//=== SoundDimension ======================================================

/// Whether a sound is positional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SoundDimension {
    #[default]
    Sound2D,
    Sound3D,
}

//=== SoundPlayback =======================================================

/// Playback parameters for [`AudioSystem::start_sound`].
///
/// Defaults: not looped, volume 1.0, centered pan, normal speed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SoundPlayback {
    pub looped: bool,
    /// Linear gain, 0.0 silent to 1.0 full.
    pub volume: f32,
    /// -1.0 left to +1.0 right.
    pub balance: f32,
    /// Playback rate multiplier.
    pub speed: f32,
}

impl SoundPlayback {
    /// Builder-style speed override.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }
}

impl Default for SoundPlayback {
    fn default() -> Self {
        Self {
            looped: false,
            volume: 1.0,
            balance: 0.0,
            speed: 1.0,
        }
    }
}

//=== AudioSystem =========================================================

/// Sound loading and playback.
pub trait AudioSystem {
    fn startup(&mut self) -> Result<(), AudioError>;
    fn shutdown(&mut self);

    fn begin_frame(&mut self);
    fn end_frame(&mut self);

    /// Loads `path` once; later calls with the same path return the same id.
    fn create_or_get_sound(
        &mut self,
        path: &str,
        dimension: SoundDimension,
    ) -> Result<SoundId, AudioError>;

    fn start_sound(&mut self, sound: SoundId, playback: SoundPlayback)
        -> Result<PlaybackId, AudioError>;

    /// Stops a playback. Unknown or finished playbacks are ignored.
    fn stop_sound(&mut self, playback: PlaybackId);
}

//=========================================================================
// Unit Tests
//=========================================================================
