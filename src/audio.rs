//! Procedural audio engine
//!
//! Sounds are plain data (`SoundDef`) handed to a `ToneBackend`. The backend
//! is opened lazily on the first sound and every failure degrades to silence.
//!
//! The background melody loops by re-arming an external timer. Each pass is
//! tagged with a generation so a stale timer from an earlier run does nothing.

use std::fmt;

pub mod envelope;
pub mod sounds;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use envelope::{Envelope, EnvelopePoint, Ramp, SoundDef, ToneDef, Waveform};
pub use sounds::{MELODY_LOOP_MS, SoundEffect, melody};

/// Audio failures. None of them are fatal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioError {
    /// The audio subsystem couldn't be opened
    Unavailable(String),
    /// A sound couldn't be scheduled
    Schedule(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::Unavailable(msg) => write!(f, "audio unavailable: {}", msg),
            AudioError::Schedule(msg) => write!(f, "failed to schedule sound: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

/// Something that can play a `SoundDef` starting now
pub trait ToneBackend {
    /// Handle to a playing sound, used to cut it short
    type Voice;

    fn schedule(&mut self, sound: &SoundDef) -> Result<Self::Voice, AudioError>;

    fn stop(&mut self, voice: &Self::Voice);
}

/// Backend that accepts everything and plays nothing (headless builds)
#[derive(Debug, Default)]
pub struct SilentBackend;

impl ToneBackend for SilentBackend {
    type Voice = ();

    fn schedule(&mut self, sound: &SoundDef) -> Result<(), AudioError> {
        log::debug!(
            "(silent) {} tone(s) for {:.2}s",
            sound.tones.len(),
            sound.duration
        );
        Ok(())
    }

    fn stop(&mut self, _voice: &()) {}
}

/// Opens a backend; called again after every failure
pub type BackendOpener<B> = Box<dyn FnMut() -> Result<B, AudioError>>;

/// Timer request for the next melody pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MelodyTicket {
    pub generation: u64,
    /// Delay before calling `AudioEngine::melody_finished`
    pub delay_ms: u32,
}

/// Audio engine for the game
pub struct AudioEngine<B: ToneBackend> {
    opener: BackendOpener<B>,
    backend: Option<B>,
    enabled: bool,
    melody_playing: bool,
    melody_voice: Option<B::Voice>,
    generation: u64,
}

impl<B: ToneBackend> AudioEngine<B> {
    pub fn new(opener: BackendOpener<B>, enabled: bool) -> Self {
        Self {
            opener,
            backend: None,
            enabled,
            melody_playing: false,
            melody_voice: None,
            generation: 0,
        }
    }

    pub fn is_available(&self) -> bool {
        self.backend.is_some()
    }

    pub fn melody_playing(&self) -> bool {
        self.melody_playing
    }

    /// Turn sound on or off. Turning it off silences the melody at once.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.stop_melody();
        }
    }

    /// Open the backend if it isn't already (browsers want this on a user gesture)
    pub fn warm_up(&mut self) -> bool {
        if self.backend.is_some() {
            return true;
        }
        match (self.opener)() {
            Ok(backend) => {
                log::info!("Audio initialized");
                self.backend = Some(backend);
                true
            }
            Err(e) => {
                log::warn!("{} - audio disabled for now", e);
                false
            }
        }
    }

    /// Play a sound effect (fire-and-forget)
    pub fn play(&mut self, effect: SoundEffect) {
        if !self.enabled || !self.warm_up() {
            return;
        }
        let Some(backend) = self.backend.as_mut() else {
            return;
        };
        if let Err(e) = backend.schedule(&effect.definition()) {
            log::error!("{:?} sound error: {}", effect, e);
        }
    }

    /// Start one pass of the background melody.
    ///
    /// Returns the timer to arm, or None if nothing started (disabled,
    /// unavailable, or a pass is already playing).
    pub fn start_melody(&mut self) -> Option<MelodyTicket> {
        if !self.enabled {
            log::debug!("Audio disabled, skipping melody");
            return None;
        }
        if self.melody_playing {
            log::debug!("Melody already playing");
            return None;
        }
        if !self.warm_up() {
            return None;
        }
        let backend = self.backend.as_mut()?;

        if let Some(stale) = self.melody_voice.take() {
            backend.stop(&stale);
        }

        match backend.schedule(&melody()) {
            Ok(voice) => {
                self.generation += 1;
                self.melody_voice = Some(voice);
                self.melody_playing = true;
                log::debug!("Melody pass {} started", self.generation);
                Some(MelodyTicket {
                    generation: self.generation,
                    delay_ms: MELODY_LOOP_MS,
                })
            }
            Err(e) => {
                log::error!("Melody error: {}", e);
                None
            }
        }
    }

    /// Timer callback for a melody pass. Loops while `running`.
    pub fn melody_finished(&mut self, generation: u64, running: bool) -> Option<MelodyTicket> {
        if generation != self.generation {
            log::debug!("Ignoring stale melody timer {}", generation);
            return None;
        }
        self.melody_playing = false;
        self.melody_voice = None;

        if running && self.enabled {
            self.start_melody()
        } else {
            None
        }
    }

    /// Cut the melody and invalidate any pending loop timer
    pub fn stop_melody(&mut self) {
        if let Some(voice) = self.melody_voice.take() {
            if let Some(backend) = self.backend.as_mut() {
                backend.stop(&voice);
            }
        }
        if self.melody_playing {
            log::debug!("Melody stopped");
        }
        self.melody_playing = false;
        self.generation += 1;
    }
}
