//! Simulation module
//!
//! All gameplay logic lives here. This module must stay free of rendering
//! and platform dependencies:
//! - Elapsed time is supplied by the caller
//! - Seeded RNG only
//! - Droplets are scanned newest-first so removal never skips an entry

pub mod collision;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{hit_floor, in_capture_band, is_caught};
pub use rect::Rect;
pub use state::{Bucket, Droplet, GameEvent, GamePhase, GameState};
pub use tick::{TickInput, autopilot, handle_input, tick, update};
