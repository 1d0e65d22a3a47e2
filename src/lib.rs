//! Topping Dodge - a noodle-bowl arcade dodger
//!
//! Core modules:
//! - `sim`: Frame-stepped simulation (movement, spawning, difficulty, collisions)
//! - `audio`: Procedural sound effects and the looping background melody
//! - `render`: Draw-call layer over a 2D canvas-like surface
//! - `highscore`: Single best-score persistence
//! - `config`: Data-driven tuning loaded from JSON
//! - `game`: Controller tying simulation, audio and persistence together

pub mod audio;
pub mod config;
pub mod game;
pub mod highscore;
pub mod render;
pub mod sim;

pub use config::GameConfig;
pub use game::Game;

/// Game configuration constants
pub mod consts {
    /// Default canvas dimensions (desktop layout)
    pub const CANVAS_WIDTH: f32 = 800.0;
    pub const CANVAS_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_SIZE: f32 = 50.0;
    /// Pixels moved per frame while a direction is held
    pub const PLAYER_SPEED: f32 = 5.0;
    /// Distance from the canvas bottom to the player's top edge
    pub const PLAYER_BOTTOM_OFFSET: f32 = 80.0;

    /// Milliseconds of survival per score point
    pub const SCORE_TICK_MS: f64 = 100.0;

    /// Score needed per difficulty level
    pub const SCORE_PER_LEVEL: u64 = 150;
    /// Spawn interval at level 0 (frames)
    pub const BASE_SPAWN_INTERVAL: u32 = 30;
    /// Frames removed from the spawn interval per level
    pub const SPAWN_INTERVAL_STEP: u32 = 5;
    /// Cap on the total spawn interval reduction
    pub const MAX_SPAWN_REDUCTION: u32 = 20;
    /// Spawn interval floor (frames)
    pub const MIN_SPAWN_INTERVAL: u32 = 10;
    /// Fall speed multiplier gained per level
    pub const SPEED_STEP: f32 = 0.2;
    /// Fall speed multiplier cap
    pub const MAX_SPEED_MULTIPLIER: f32 = 2.0;

    /// Delay between picking a topping and the run starting (browser only)
    pub const SELECT_DELAY_MS: i32 = 300;
}
