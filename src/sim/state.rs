//! Game session and entity types
//!
//! One `GameSession` holds everything the simulation mutates.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::topping::ToppingKind;
use crate::config::GameConfig;

/// Lifecycle phase of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to pick a topping
    #[default]
    Idle,
    /// Active run
    Running,
    /// Run ended by a collision
    GameOver,
}

/// Drawable area size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: f32,
    pub height: f32,
}

/// The player's noodle bowl
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame while a direction is held
    pub speed: f32,
    /// Gap between the canvas bottom and the bowl's top edge
    bottom_offset: f32,
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            pos: Vec2::ZERO,
            size: Vec2::splat(config.player_size),
            speed: config.player_speed,
            bottom_offset: config.player_bottom_offset,
        }
    }

    /// Center horizontally near the bottom of the canvas
    pub fn reset(&mut self, canvas: Canvas) {
        self.pos = Vec2::new(
            canvas.width / 2.0 - self.size.x / 2.0,
            canvas.height - self.bottom_offset,
        );
    }

    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Largest x that keeps the bowl fully on screen
    pub fn max_x(&self, canvas_width: f32) -> f32 {
        (canvas_width - self.size.x).max(0.0)
    }

    /// Move by one step in the held direction. Always clamped to the
    /// canvas, so a shrinking canvas pulls the bowl back in.
    pub fn step(&mut self, left: bool, right: bool, canvas_width: f32) {
        let mut dx = 0.0;
        if left {
            dx -= self.speed;
        }
        if right {
            dx += self.speed;
        }
        self.pos.x = (self.pos.x + dx).clamp(0.0, self.max_x(canvas_width));
    }
}

/// A falling topping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topping {
    pub kind: ToppingKind,
    pub pos: Vec2,
    pub size: Vec2,
    /// Pixels per frame, fixed at spawn
    pub speed: f32,
    /// Degrees, visual only
    pub rotation: f32,
}

impl Topping {
    pub fn rect(&self) -> Rect {
        Rect {
            pos: self.pos,
            size: self.size,
        }
    }

    /// Fall one frame and spin
    pub fn advance(&mut self) {
        self.pos.y += self.speed;
        self.rotation += self.speed / 2.0;
    }

    /// True once the top edge has passed the bottom of the canvas
    pub fn is_off_screen(&self, canvas_height: f32) -> bool {
        self.pos.y > canvas_height
    }
}

/// Events produced by a simulation step, consumed by audio and UI
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GameEvent {
    /// Difficulty went up
    LevelUp(u32),
    /// A topping entered from the top
    Spawned(ToppingKind),
    /// The player touched the topping they were avoiding
    Collision(ToppingKind),
    /// Run ended
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameSession {
    pub phase: GamePhase,
    /// Survival score (tenths of a second)
    pub score: u64,
    /// Wall-clock start of the current run (ms)
    pub start_time_ms: f64,
    /// Frames stepped this run
    pub frame_count: u64,
    /// Topping to avoid this run
    pub selected: Option<ToppingKind>,
    pub difficulty_level: u32,
    pub audio_enabled: bool,
    /// Best score so far, never decreases
    pub high_score: u64,
    pub player: Player,
    /// Active toppings, in spawn order
    pub toppings: Vec<Topping>,
    pub canvas: Canvas,
    pub(crate) rng: Pcg32,
}

impl GameSession {
    /// Create an idle session
    pub fn new(config: &GameConfig, seed: u64, high_score: u64) -> Self {
        let canvas = Canvas {
            width: config.canvas_width,
            height: config.canvas_height,
        };
        let mut player = Player::new(config);
        player.reset(canvas);

        Self {
            phase: GamePhase::Idle,
            score: 0,
            start_time_ms: 0.0,
            frame_count: 0,
            selected: None,
            difficulty_level: 0,
            audio_enabled: config.audio_enabled,
            high_score,
            player,
            toppings: Vec::new(),
            canvas,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    /// Begin a run avoiding `kind`. Only valid from Idle.
    pub fn start(&mut self, kind: ToppingKind, now_ms: f64) -> bool {
        if self.phase != GamePhase::Idle {
            log::warn!("Ignoring start while {:?}", self.phase);
            return false;
        }

        self.phase = GamePhase::Running;
        self.selected = Some(kind);
        self.score = 0;
        self.start_time_ms = now_ms;
        self.frame_count = 0;
        self.difficulty_level = 0;
        self.player.reset(self.canvas);
        self.toppings.clear();

        log::info!("Run started, avoiding {}", kind);
        true
    }

    /// Back to topping selection. Only valid from GameOver.
    pub fn restart(&mut self) -> bool {
        if self.phase != GamePhase::GameOver {
            log::warn!("Ignoring restart while {:?}", self.phase);
            return false;
        }
        self.phase = GamePhase::Idle;
        self.selected = None;
        true
    }

    /// Canvas resized; affects new spawns and movement bounds from now on
    pub fn resize(&mut self, width: f32, height: f32) {
        self.canvas = Canvas { width, height };
    }

    /// Transition Running -> GameOver, recording a new best score
    pub(crate) fn end_run(&mut self) -> GameEvent {
        self.phase = GamePhase::GameOver;

        let new_record = self.score > self.high_score;
        if new_record {
            self.high_score = self.score;
        }

        log::info!(
            "Game over: score {} (best {}){}",
            self.score,
            self.high_score,
            if new_record { " - new record!" } else { "" }
        );

        GameEvent::GameOver {
            score: self.score,
            high_score: self.high_score,
            new_record,
        }
    }
}
