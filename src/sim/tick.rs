//! Per-frame simulation step
//!
//! One call per rendered frame. Score comes from wall-clock time so it
//! doesn't depend on frame rate; spawning is counted in frames.

use glam::Vec2;
use rand::Rng;

use super::difficulty::{difficulty_level, spawn_interval_frames, speed_multiplier};
use super::state::{GameEvent, GameSession, Topping};
use super::topping::{ToppingKind, scaled_size};
use crate::consts::SCORE_TICK_MS;

/// Held-direction input for a frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
}

/// Advance the session by one frame
pub fn tick(state: &mut GameSession, input: &TickInput, now_ms: f64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    if !state.is_running() {
        return events;
    }

    state.frame_count += 1;

    let canvas_width = state.canvas.width;
    state.player.step(input.left, input.right, canvas_width);

    // Score is derived from elapsed time and never goes backwards
    let elapsed = (now_ms - state.start_time_ms).max(0.0);
    let score = (elapsed / SCORE_TICK_MS).floor() as u64;
    state.score = state.score.max(score);

    let level = difficulty_level(state.score);
    if level != state.difficulty_level {
        state.difficulty_level = level;
        log::info!("Difficulty level {} (score {})", level, state.score);
        events.push(GameEvent::LevelUp(level));
    }

    if state.frame_count % spawn_interval_frames(level) as u64 == 0 {
        let kind = spawn_topping(state);
        events.push(GameEvent::Spawned(kind));
    }

    advance_toppings(state);

    if let Some(kind) = check_collisions(state) {
        events.push(GameEvent::Collision(kind));
        events.push(state.end_run());
    }

    events
}

/// Drop a random topping in from above the canvas
pub fn spawn_topping(state: &mut GameSession) -> ToppingKind {
    let kind = ToppingKind::ALL[state.rng.random_range(0..ToppingKind::ALL.len())];
    let size = scaled_size(kind, state.canvas.width);

    let span = (state.canvas.width - size).max(0.0);
    let x = if span > 0.0 {
        state.rng.random_range(0.0..span)
    } else {
        0.0
    };

    state.toppings.push(Topping {
        kind,
        pos: Vec2::new(x, -size),
        size: Vec2::splat(size),
        speed: kind.spec().base_speed * speed_multiplier(state.difficulty_level),
        rotation: 0.0,
    });

    kind
}

/// Move every topping and drop the ones that fell off the bottom
fn advance_toppings(state: &mut GameSession) {
    let canvas_height = state.canvas.height;
    state.toppings.retain_mut(|topping| {
        topping.advance();
        !topping.is_off_screen(canvas_height)
    });
}

/// First selected-kind topping touching the player, if any
fn check_collisions(state: &GameSession) -> Option<ToppingKind> {
    let selected = state.selected?;
    let player = state.player.rect();
    state
        .toppings
        .iter()
        .filter(|t| t.kind == selected)
        .find(|t| t.rect().overlaps(&player))
        .map(|t| t.kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::sim::state::GamePhase;
    use proptest::prelude::*;

    fn running(kind: ToppingKind) -> GameSession {
        let mut state = GameSession::new(&GameConfig::default(), 12345, 0);
        state.start(kind, 0.0);
        state
    }

    fn topping(kind: ToppingKind, x: f32, y: f32, size: f32, speed: f32) -> Topping {
        Topping {
            kind,
            pos: Vec2::new(x, y),
            size: Vec2::splat(size),
            speed,
            rotation: 0.0,
        }
    }

    #[test]
    fn test_tick_noop_when_not_running() {
        let mut state = GameSession::new(&GameConfig::default(), 1, 0);
        let input = TickInput {
            left: true,
            ..Default::default()
        };
        let x = state.player.pos.x;
        assert!(tick(&mut state, &input, 5000.0).is_empty());
        assert_eq!(state.frame_count, 0);
        assert_eq!(state.player.pos.x, x);
        assert!(state.toppings.is_empty());
    }

    #[test]
    fn test_score_from_elapsed_time() {
        let mut state = running(ToppingKind::Sambal);
        let input = TickInput::default();
        tick(&mut state, &input, 99.0);
        assert_eq!(state.score, 0);
        tick(&mut state, &input, 1234.0);
        assert_eq!(state.score, 12);
        // Clock stepping backwards doesn't lower the score
        tick(&mut state, &input, 500.0);
        assert_eq!(state.score, 12);
    }

    #[test]
    fn test_level_up_event() {
        let mut state = running(ToppingKind::Sambal);
        let input = TickInput::default();
        let events = tick(&mut state, &input, 15_000.0);
        assert!(events.contains(&GameEvent::LevelUp(1)));
        assert_eq!(state.difficulty_level, 1);

        // Same level again is a no-op
        let events = tick(&mut state, &input, 15_050.0);
        assert!(!events.iter().any(|e| matches!(e, GameEvent::LevelUp(_))));
    }

    #[test]
    fn test_spawn_every_interval() {
        let mut state = running(ToppingKind::Sambal);
        let input = TickInput::default();
        for frame in 1..=29 {
            let events = tick(&mut state, &input, frame as f64);
            assert!(!events.iter().any(|e| matches!(e, GameEvent::Spawned(_))));
        }
        let events = tick(&mut state, &input, 30.0);
        assert!(events.iter().any(|e| matches!(e, GameEvent::Spawned(_))));
        assert_eq!(state.toppings.len(), 1);
    }

    #[test]
    fn test_spawned_topping_geometry() {
        let mut state = running(ToppingKind::Sambal);
        state.resize(640.0, 480.0);
        state.difficulty_level = 2;
        for _ in 0..200 {
            spawn_topping(&mut state);
        }
        for t in &state.toppings {
            let spec = t.kind.spec();
            let size = (spec.base_size * 0.85).floor();
            assert_eq!(t.size, Vec2::splat(size));
            assert_eq!(t.pos.y, -size);
            assert!(t.pos.x >= 0.0 && t.pos.x + size <= 640.0);
            assert!((t.speed - spec.base_speed * 1.4).abs() < 1e-5);
        }
        // All kinds show up
        for kind in ToppingKind::ALL {
            assert!(state.toppings.iter().any(|t| t.kind == kind));
        }
    }

    #[test]
    fn test_spawn_is_deterministic_per_seed() {
        let mut a = running(ToppingKind::Sambal);
        let mut b = running(ToppingKind::Sambal);
        for _ in 0..20 {
            assert_eq!(spawn_topping(&mut a), spawn_topping(&mut b));
        }
        let xs_a: Vec<f32> = a.toppings.iter().map(|t| t.pos.x).collect();
        let xs_b: Vec<f32> = b.toppings.iter().map(|t| t.pos.x).collect();
        assert_eq!(xs_a, xs_b);
    }

    #[test]
    fn test_off_screen_removal_keeps_others() {
        let mut state = running(ToppingKind::Sambal);
        state.toppings = vec![
            topping(ToppingKind::Pangsit, 0.0, 599.0, 50.0, 2.0),
            topping(ToppingKind::Pangsit, 100.0, 598.0, 50.0, 2.0),
            topping(ToppingKind::Pangsit, 200.0, 10.0, 50.0, 2.0),
            topping(ToppingKind::Pangsit, 300.0, 599.5, 50.0, 2.0),
        ];
        tick(&mut state, &TickInput::default(), 0.0);

        let ys: Vec<f32> = state.toppings.iter().map(|t| t.pos.y).collect();
        assert_eq!(ys, vec![600.0, 12.0]);
        assert_eq!(state.toppings[1].rotation, 1.0);
    }

    #[test]
    fn test_collision_scenario_ends_run() {
        let mut state = running(ToppingKind::Sambal);
        state.high_score = 5;
        assert_eq!(state.player.rect().pos, Vec2::new(375.0, 520.0));
        state
            .toppings
            .push(topping(ToppingKind::Sambal, 380.0, 550.0, 40.0, 3.0));

        let events = tick(&mut state, &TickInput::default(), 2_000.0);
        assert_eq!(state.phase, GamePhase::GameOver);
        assert_eq!(
            events[events.len() - 2..],
            [
                GameEvent::Collision(ToppingKind::Sambal),
                GameEvent::GameOver {
                    score: 20,
                    high_score: 20,
                    new_record: true
                }
            ]
        );

        // Nothing moves after game over
        let frames = state.frame_count;
        assert!(tick(&mut state, &TickInput::default(), 3_000.0).is_empty());
        assert_eq!(state.frame_count, frames);
    }

    #[test]
    fn test_other_kinds_pass_through() {
        let mut state = running(ToppingKind::Sambal);
        let player = state.player.rect();
        state.toppings.push(topping(
            ToppingKind::Pangsit,
            player.pos.x,
            player.pos.y,
            50.0,
            0.0,
        ));
        state.toppings.push(topping(
            ToppingKind::DaunBawang,
            player.pos.x,
            player.pos.y,
            50.0,
            0.0,
        ));
        let events = tick(&mut state, &TickInput::default(), 100.0);
        assert!(state.is_running());
        assert!(!events.iter().any(|e| matches!(e, GameEvent::Collision(_))));
    }

    #[test]
    fn test_touching_topping_is_not_a_hit() {
        let mut state = running(ToppingKind::Sambal);
        // Bottom edge lands exactly on the player's top edge after advancing
        state
            .toppings
            .push(topping(ToppingKind::Sambal, 380.0, 477.0, 40.0, 3.0));
        tick(&mut state, &TickInput::default(), 100.0);
        assert!(state.is_running());
    }

    #[test]
    fn test_shrinking_canvas_pulls_player_back() {
        let mut state = running(ToppingKind::Pangsit);
        state.selected = None;
        let right = TickInput {
            right: true,
            ..Default::default()
        };
        for _ in 0..200 {
            tick(&mut state, &right, 0.0);
        }
        assert_eq!(state.player.pos.x, 750.0);

        state.resize(500.0, 600.0);
        tick(&mut state, &TickInput::default(), 0.0);
        assert_eq!(state.player.pos.x, state.player.max_x(500.0));
        assert_eq!(state.player.pos.x, 450.0);
    }

    proptest! {
        #[test]
        fn prop_player_stays_on_canvas(
            moves in proptest::collection::vec((any::<bool>(), any::<bool>()), 0..400),
            width in 60.0f32..1200.0,
        ) {
            let mut state = GameSession::new(&GameConfig::default(), 3, 0);
            state.resize(width, 600.0);
            state.start(ToppingKind::Pangsit, 0.0);
            // Keep the run alive regardless of spawns
            state.selected = None;
            let max_x = width - state.player.size.x;
            for (left, right) in moves {
                tick(&mut state, &TickInput { left, right }, 0.0);
                let x = state.player.pos.x;
                prop_assert!(x >= 0.0);
                prop_assert!(x <= max_x);
            }
        }

        #[test]
        fn prop_no_topping_survives_past_bottom(frames in 1usize..600) {
            let mut state = running(ToppingKind::Sambal);
            state.selected = None;
            for frame in 0..frames {
                tick(&mut state, &TickInput::default(), frame as f64 * 16.0);
                for t in &state.toppings {
                    prop_assert!(t.pos.y <= state.canvas.height);
                }
            }
        }
    }
}
