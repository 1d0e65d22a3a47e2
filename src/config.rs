//! Game configuration
//!
//! Tunables with sensible defaults. The browser build reads an optional JSON
//! override from the page; missing fields fall back to the defaults.

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Data-driven game configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Canvas width used until the page reports its real size
    pub canvas_width: f32,
    /// Canvas height used until the page reports its real size
    pub canvas_height: f32,

    // === Player ===
    pub player_size: f32,
    pub player_speed: f32,
    pub player_bottom_offset: f32,

    // === Audio ===
    /// Whether sound starts enabled
    pub audio_enabled: bool,

    /// Fixed RNG seed (None = seed from the clock)
    pub seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,

            player_size: PLAYER_SIZE,
            player_speed: PLAYER_SPEED,
            player_bottom_offset: PLAYER_BOTTOM_OFFSET,

            audio_enabled: true,

            seed: None,
        }
    }
}

impl GameConfig {
    /// Parse a configuration from JSON, falling back to defaults per field
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load from JSON, logging and using defaults when it doesn't parse
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(config) => {
                log::info!("Loaded game config");
                config
            }
            Err(e) => {
                log::warn!("Invalid game config ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Resolve the RNG seed, preferring the configured one
    pub fn seed_or(&self, fallback: u64) -> u64 {
        self.seed.unwrap_or(fallback)
    }
}
