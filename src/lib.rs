//! Drop Catcher - catch the falling droplets before they hit the floor
//!
//! Core modules:
//! - `sim`: Simulation (bucket, droplets, collisions, game state)
//! - `tuning`: Data-driven game balance
//! - `viewport`: Device pixels <-> playfield mapping
//! - `app`: Lifecycle state machine and per-frame driver
//! - `renderer`: WebGPU rendering pipeline
//! - `audio`: Sound cues (Web Audio on wasm32)

pub mod app;
pub mod audio;
pub mod hud;
pub mod renderer;
pub mod settings;
pub mod sim;
pub mod tuning;
pub mod viewport;

pub use app::{App, Lifecycle, LifecycleError, RawInput};
pub use settings::Settings;
pub use tuning::{ConfigError, Tuning};
pub use viewport::Viewport;

/// Game configuration constants
pub mod consts {
    /// Logical playfield size in world units
    pub const PLAYFIELD_WIDTH: f32 = 64.0;
    pub const PLAYFIELD_HEIGHT: f32 = 40.0;

    /// Bucket defaults
    pub const BUCKET_SIZE: f32 = 6.0;
    /// Vertical offset of the bucket from the floor
    pub const BUCKET_Y: f32 = 2.0;
    /// Horizontal speed for keyboard input (units/s)
    pub const BUCKET_SPEED: f32 = 20.0;

    /// Droplet defaults
    pub const DROPLET_SIZE: f32 = 6.0;
    /// Constant descent speed (units/s)
    pub const FALL_SPEED: f32 = 6.0;
    /// Seconds between spawns
    pub const SPAWN_INTERVAL: f32 = 1.0;
    /// Slack on the spawn threshold; summing 1/60 sixty times in f32 lands
    /// just under 1.0
    pub const SPAWN_TOLERANCE: f32 = 1e-4;

    /// Height of the catch window below the bucket's top edge
    pub const CAPTURE_BAND: f32 = 1.0;

    /// Restart control (shown on game over, bottom-right corner)
    pub const RESTART_SIZE: f32 = 10.0;
    pub const RESTART_MARGIN_X: f32 = 2.0;
    pub const RESTART_MARGIN_Y: f32 = 1.0;

    /// Largest frame delta fed into the simulation (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;
    /// Nominal frame delta used for the very first frame
    pub const NOMINAL_DT: f32 = 1.0 / 60.0;
}
