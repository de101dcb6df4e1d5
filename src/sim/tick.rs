//! Per-frame simulation step
//!
//! `handle_input` then `update`, once per display frame, with the frame's
//! elapsed time in seconds.

use glam::Vec2;

use super::collision::{hit_floor, is_caught};
use super::state::{GameEvent, GamePhase, GameState};
use crate::consts::SPAWN_TOLERANCE;

/// Input for a single frame, already in playfield coordinates
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
    /// Pointer held/dragging at this position
    pub pointer: Option<Vec2>,
    /// Pointer pressed this frame at this position
    pub tap: Option<Vec2>,
    /// Idle/demo mode - the autopilot plays the game
    pub idle_mode: bool,
}

/// Apply player input. Movement is not clamped here; `update` clamps.
pub fn handle_input(state: &mut GameState, input: &TickInput, dt: f32) {
    if state.phase == GamePhase::GameOver {
        let restart = state.tuning.restart_bounds();
        if input.tap.is_some_and(|tap| restart.contains(tap)) {
            state.restart();
        }
        return;
    }

    let step = state.tuning.bucket_speed * dt;
    if input.right {
        state.bucket.pos.x += step;
    } else if input.left {
        state.bucket.pos.x -= step;
    }

    if let Some(pointer) = input.pointer {
        state.bucket.center_on(pointer.x);
    }
}

/// Advance the session by `dt` seconds
///
/// The spawn timer accumulates in f32, so the threshold allows
/// `SPAWN_TOLERANCE` of rounding: sixty frames of 1/60 s spawn on the
/// sixtieth frame.
pub fn update(state: &mut GameState, dt: f32) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    let max_x = state.tuning.bucket_max_x();
    state.bucket.pos.x = state.bucket.pos.x.clamp(0.0, max_x);

    let bucket = state.bucket.rect();
    let fall = state.tuning.fall_speed * dt;
    let band = state.tuning.capture_band;

    // Newest first: removing index i leaves 0..i untouched
    for i in (0..state.droplets.len()).rev() {
        let drop = &mut state.droplets[i];
        drop.pos.y -= fall;
        let rect = drop.rect();
        let id = drop.id;

        if hit_floor(&rect) {
            state.phase = GamePhase::GameOver;
            state.events.push(GameEvent::Missed { id });
            log::info!("Game over: droplet {} missed, final score {}", id, state.score);
            return;
        }

        if is_caught(&rect, &bucket, band) {
            state.droplets.remove(i);
            state.score += 1;
            state.events.push(GameEvent::Caught { id });
            log::debug!("Caught droplet {} (score {})", id, state.score);
        }
    }

    state.spawn_timer += dt;
    if state.spawn_timer >= state.tuning.spawn_interval - SPAWN_TOLERANCE {
        state.spawn_timer = 0.0;
        state.spawn_droplet();
    }
}

/// Run one full frame: input (or autopilot) then update
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    if input.idle_mode {
        let auto = autopilot(state);
        handle_input(state, &auto, dt);
    } else {
        handle_input(state, input, dt);
    }
    update(state, dt);
}

/// Demo-mode input: chase the lowest droplet, restart when the run is over
pub fn autopilot(state: &GameState) -> TickInput {
    if state.phase == GamePhase::GameOver {
        return TickInput {
            tap: Some(state.tuning.restart_bounds().center()),
            idle_mode: true,
            ..Default::default()
        };
    }

    let target = state
        .droplets
        .iter()
        .min_by(|a, b| {
            a.pos
                .y
                .partial_cmp(&b.pos.y)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|d| d.rect().center());

    TickInput {
        pointer: target,
        idle_mode: true,
        ..Default::default()
    }
}
