//=========================================================================
// Headless Audio
//=========================================================================
//
// Bookkeeping `AudioSystem`: caches sounds by path and records every
// playback instead of producing sound. Used by the binary when no device
// backend is wired in, and by tests to observe what the game played.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;

use log::{debug, info};

//=== Internal Dependencies ===============================================

use super::{AudioSystem, PlaybackId, SoundDimension, SoundId, SoundPlayback};
use crate::core::error::AudioError;

//=== PlaybackRecord ======================================================

/// One `start_sound` call as observed by [`HeadlessAudio`].
#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackRecord {
    pub id: PlaybackId,
    pub sound: SoundId,
    pub playback: SoundPlayback,
    pub stopped: bool,
}

//=== HeadlessAudio =======================================================

#[derive(Default)]
pub struct HeadlessAudio {
    started: bool,
    sounds: Vec<(String, SoundDimension)>,
    by_path: HashMap<String, SoundId>,
    playbacks: Vec<PlaybackRecord>,
    next_playback: u64,
}

impl HeadlessAudio {
    pub fn new() -> Self {
        Self::default()
    }

    //--- Inspection -------------------------------------------------------

    pub fn sound_count(&self) -> usize {
        self.sounds.len()
    }

    pub fn sound_path(&self, sound: SoundId) -> Option<&str> {
        self.sounds.get(sound.0 as usize).map(|(path, _)| path.as_str())
    }

    /// Every playback started so far, oldest first.
    pub fn playbacks(&self) -> &[PlaybackRecord] {
        &self.playbacks
    }

    pub fn is_started(&self) -> bool {
        self.started
    }
}

impl AudioSystem for HeadlessAudio {
    fn startup(&mut self) -> Result<(), AudioError> {
        self.started = true;
        info!(target: "audio", "Headless audio started");
        Ok(())
    }

    fn shutdown(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        for record in self.playbacks.iter_mut() {
            record.stopped = true;
        }
        info!(
            target: "audio",
            "Headless audio shut down ({} sounds, {} playbacks)",
            self.sounds.len(),
            self.playbacks.len()
        );
    }

    fn begin_frame(&mut self) {}

    fn end_frame(&mut self) {}

    fn create_or_get_sound(
        &mut self,
        path: &str,
        dimension: SoundDimension,
    ) -> Result<SoundId, AudioError> {
        if !self.started {
            return Err(AudioError::NotStarted);
        }
        if path.is_empty() {
            return Err(AudioError::Load {
                path: String::new(),
                reason: "empty path".into(),
            });
        }

        if let Some(&id) = self.by_path.get(path) {
            return Ok(id);
        }

        let id = SoundId(self.sounds.len() as u32);
        self.sounds.push((path.to_string(), dimension));
        self.by_path.insert(path.to_string(), id);
        debug!(target: "audio", "Loaded sound '{}' as {:?}", path, id);
        Ok(id)
    }

    fn start_sound(
        &mut self,
        sound: SoundId,
        playback: SoundPlayback,
    ) -> Result<PlaybackId, AudioError> {
        if !self.started {
            return Err(AudioError::NotStarted);
        }
        if sound.0 as usize >= self.sounds.len() {
            return Err(AudioError::UnknownSound(sound));
        }

        let id = PlaybackId(self.next_playback);
        self.next_playback += 1;
        self.playbacks.push(PlaybackRecord {
            id,
            sound,
            playback,
            stopped: false,
        });
        debug!(target: "audio", "Started {:?} of {:?} ({:?})", id, sound, playback);
        Ok(id)
    }

    fn stop_sound(&mut self, playback: PlaybackId) {
        if let Some(record) = self.playbacks.iter_mut().find(|r| r.id == playback) {
            record.stopped = true;
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
