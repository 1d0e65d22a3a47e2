//! Game controller
//!
//! Owns the session, the audio engine and the score store, and turns
//! simulation events into sounds and saved scores. Platform code drives it:
//! one `update` per frame, plus the user actions (pick, restart, mute).

use crate::audio::{AudioEngine, MelodyTicket, SoundEffect, ToneBackend};
use crate::config::GameConfig;
use crate::highscore::{self, ScoreStore};
use crate::sim::{GameEvent, GameSession, TickInput, ToppingKind, tick};

/// Direction buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Left,
    Right,
}

/// Game instance holding all state
pub struct Game<B: ToneBackend, S: ScoreStore> {
    pub session: GameSession,
    pub audio: AudioEngine<B>,
    store: S,
    input: TickInput,
}

impl<B: ToneBackend, S: ScoreStore> Game<B, S> {
    pub fn new(config: &GameConfig, seed: u64, audio: AudioEngine<B>, store: S) -> Self {
        let high_score = highscore::load(&store);
        log::info!("Game initialized with seed: {}", seed);
        Self {
            session: GameSession::new(config, seed, high_score),
            audio,
            store,
            input: TickInput::default(),
        }
    }

    pub fn input(&self) -> TickInput {
        self.input
    }

    /// Press or release a direction. Presses only count during a run.
    pub fn set_direction(&mut self, direction: Direction, held: bool) {
        if held && !self.session.is_running() {
            return;
        }
        match direction {
            Direction::Left => self.input.left = held,
            Direction::Right => self.input.right = held,
        }
    }

    /// UI feedback blip
    pub fn click(&mut self) {
        self.audio.play(SoundEffect::Click);
    }

    /// Start a run avoiding `kind`; returns the melody timer to arm, if any
    pub fn start(&mut self, kind: ToppingKind, now_ms: f64) -> Option<MelodyTicket> {
        if !self.session.start(kind, now_ms) {
            return None;
        }
        self.audio.start_melody()
    }

    /// Step one frame and react to what happened
    pub fn update(&mut self, now_ms: f64) -> Vec<GameEvent> {
        let events = tick(&mut self.session, &self.input, now_ms);

        for event in &events {
            match *event {
                GameEvent::Collision(_) => self.audio.play(SoundEffect::Collision),
                GameEvent::GameOver { high_score, new_record, .. } => {
                    self.audio.stop_melody();
                    self.audio.play(SoundEffect::GameOver);
                    if new_record {
                        self.store.set(high_score);
                    }
                    self.input = TickInput::default();
                }
                GameEvent::LevelUp(_) | GameEvent::Spawned(_) => {}
            }
        }

        events
    }

    /// Leave the game-over screen for topping selection
    pub fn restart(&mut self) -> bool {
        if !self.session.restart() {
            return false;
        }
        self.audio.stop_melody();
        self.click();
        true
    }

    /// Flip sound on/off; returns the melody timer to arm when sound comes back mid-run
    pub fn toggle_audio(&mut self) -> Option<MelodyTicket> {
        let enabled = !self.session.audio_enabled;
        self.session.audio_enabled = enabled;
        self.audio.set_enabled(enabled);
        log::info!("Audio toggled: {}", if enabled { "ON" } else { "OFF" });

        let ticket = if enabled {
            self.audio.warm_up();
            if self.session.is_running() {
                self.audio.start_melody()
            } else {
                None
            }
        } else {
            None
        };

        self.click();
        ticket
    }

    /// Melody timer fired
    pub fn melody_finished(&mut self, generation: u64) -> Option<MelodyTicket> {
        let running = self.session.is_running();
        self.audio.melody_finished(generation, running)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.resize(width, height);
    }
}
