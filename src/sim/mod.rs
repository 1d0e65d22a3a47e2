//! Simulation module
//!
//! All gameplay logic lives here:
//! - One step per rendered frame
//! - Seeded RNG only
//! - No rendering, audio or platform dependencies

pub mod collision;
pub mod difficulty;
pub mod state;
pub mod tick;
pub mod topping;

pub use collision::Rect;
pub use difficulty::{difficulty_level, spawn_interval_frames, speed_multiplier};
pub use state::{Canvas, GameEvent, GamePhase, GameSession, Player, Topping};
pub use tick::{TickInput, spawn_topping, tick};
pub use topping::{ToppingKind, ToppingSpec, UnknownTopping, scaled_size, size_multiplier};
