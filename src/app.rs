//! Application shell: lifecycle state machine and per-frame driver
//!
//! The host (browser glue or the native demo) owns an `App` and calls
//! `create`, then `frame` once per display frame, and finally `dispose`.
//! Rendering and audio stay with the host; `frame` hands back the events
//! they need.

use glam::Vec2;
use thiserror::Error;

use crate::consts::MAX_FRAME_DT;
use crate::hud::{FpsCounter, HudText};
use crate::settings::Settings;
use crate::sim::{GameEvent, GameState, TickInput, tick};
use crate::tuning::Tuning;
use crate::viewport::Viewport;

/// Where the application is in its life
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Constructed, no session yet
    Uninitialized,
    /// Session running (frames are skipped while paused)
    Ready { paused: bool },
    /// Resources released; terminal
    Disposed,
}

impl Lifecycle {
    fn name(&self) -> &'static str {
        match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::Ready { .. } => "ready",
            Lifecycle::Disposed => "disposed",
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("cannot {action} while {state}")]
    InvalidTransition {
        action: &'static str,
        state: &'static str,
    },
}

/// Raw per-frame input in screen pixels (origin top-left, y down)
#[derive(Debug, Clone, Default)]
pub struct RawInput {
    pub left: bool,
    pub right: bool,
    /// Pointer held at this pixel
    pub pointer_down: Option<Vec2>,
    /// Pointer pressed this frame at this pixel
    pub tapped: Option<Vec2>,
    /// Let the autopilot play
    pub idle_mode: bool,
}

pub struct App {
    lifecycle: Lifecycle,
    session: Option<GameState>,
    tuning: Tuning,
    settings: Settings,
    viewport: Viewport,
    fps: FpsCounter,
}

impl App {
    pub fn new(tuning: Tuning, settings: Settings) -> Self {
        let viewport = Viewport::new(tuning.playfield_width, tuning.playfield_height);
        Self {
            lifecycle: Lifecycle::Uninitialized,
            session: None,
            tuning,
            settings,
            viewport,
            fps: FpsCounter::new(),
        }
    }

    fn invalid(&self, action: &'static str) -> LifecycleError {
        LifecycleError::InvalidTransition {
            action,
            state: self.lifecycle.name(),
        }
    }

    fn ensure_ready(&self, action: &'static str) -> Result<bool, LifecycleError> {
        match self.lifecycle {
            Lifecycle::Ready { paused } => Ok(paused),
            _ => Err(self.invalid(action)),
        }
    }

    /// Start the first session for a screen of the given size
    pub fn create(&mut self, seed: u64, width: u32, height: u32) -> Result<(), LifecycleError> {
        if self.lifecycle != Lifecycle::Uninitialized {
            return Err(self.invalid("create"));
        }
        self.viewport.update(width, height);
        self.session = Some(GameState::with_tuning(seed, self.tuning.clone()));
        self.lifecycle = Lifecycle::Ready { paused: false };
        log::info!("App created ({}x{}, seed {})", width, height, seed);
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), LifecycleError> {
        self.ensure_ready("resize")?;
        self.viewport.update(width, height);
        log::debug!("Resized to {}x{}", width, height);
        Ok(())
    }

    pub fn pause(&mut self) -> Result<(), LifecycleError> {
        self.ensure_ready("pause")?;
        self.lifecycle = Lifecycle::Ready { paused: true };
        log::info!("Paused");
        Ok(())
    }

    /// Leave a pause. Returns `false` (and changes nothing) when the app
    /// was already running.
    pub fn resume(&mut self) -> Result<bool, LifecycleError> {
        if !self.ensure_ready("resume")? {
            return Ok(false);
        }
        self.lifecycle = Lifecycle::Ready { paused: false };
        log::info!("Resumed");
        Ok(true)
    }

    /// Run one frame: input, then update. `dt` is in seconds, `now_ms`
    /// feeds the FPS counter. Returns the events raised this frame.
    pub fn frame(
        &mut self,
        input: &RawInput,
        dt: f32,
        now_ms: f64,
    ) -> Result<Vec<GameEvent>, LifecycleError> {
        if self.ensure_ready("run a frame")? {
            return Ok(Vec::new());
        }
        self.fps.record(now_ms);

        // Long stalls (tab switches, breakpoints) must not teleport droplets
        let dt = dt.max(0.0).min(MAX_FRAME_DT);
        let tick_input = TickInput {
            left: input.left,
            right: input.right,
            pointer: input.pointer_down.map(|p| self.viewport.unproject(p)),
            tap: input.tapped.map(|p| self.viewport.unproject(p)),
            idle_mode: input.idle_mode,
        };

        let missing = self.invalid("run a frame");
        let session = self.session.as_mut().ok_or(missing)?;
        tick(session, &tick_input, dt);
        Ok(session.drain_events())
    }

    /// Release the session; calling again is a no-op
    pub fn dispose(&mut self) -> Result<(), LifecycleError> {
        match self.lifecycle {
            Lifecycle::Disposed => Ok(()),
            Lifecycle::Uninitialized => Err(self.invalid("dispose")),
            Lifecycle::Ready { .. } => {
                self.session = None;
                self.lifecycle = Lifecycle::Disposed;
                log::info!("App disposed");
                Ok(())
            }
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn session(&self) -> Option<&GameState> {
        self.session.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Flip the FPS readout; returns the new value
    pub fn toggle_show_fps(&mut self) -> bool {
        self.settings.show_fps = !self.settings.show_fps;
        log::info!("Show FPS: {}", self.settings.show_fps);
        self.settings.show_fps
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    /// Status text for the current frame
    pub fn hud(&self) -> Option<HudText> {
        self.session
            .as_ref()
            .map(|s| HudText::for_state(s, self.fps.fps(), self.settings.show_fps))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;

    fn ready_app() -> App {
        let mut app = App::new(Tuning::default(), Settings::default());
        app.create(12345, 640, 400).unwrap();
        app
    }

    #[test]
    fn test_lifecycle_happy_path() {
        let mut app = App::new(Tuning::default(), Settings::default());
        assert_eq!(app.lifecycle(), Lifecycle::Uninitialized);
        assert!(app.session().is_none());

        app.create(1, 640, 400).unwrap();
        assert_eq!(app.lifecycle(), Lifecycle::Ready { paused: false });

        app.pause().unwrap();
        assert_eq!(app.lifecycle(), Lifecycle::Ready { paused: true });
        assert!(app.resume().unwrap());

        app.dispose().unwrap();
        assert_eq!(app.lifecycle(), Lifecycle::Disposed);
        assert!(app.session().is_none());
        // Idempotent
        assert!(app.dispose().is_ok());
    }

    #[test]
    fn test_invalid_transitions() {
        let mut app = App::new(Tuning::default(), Settings::default());
        assert!(app.frame(&RawInput::default(), 0.016, 0.0).is_err());
        assert!(app.resize(10, 10).is_err());
        assert!(app.dispose().is_err());

        app.create(1, 640, 400).unwrap();
        assert_eq!(
            app.create(1, 640, 400),
            Err(LifecycleError::InvalidTransition {
                action: "create",
                state: "ready"
            })
        );

        app.dispose().unwrap();
        assert!(app.frame(&RawInput::default(), 0.016, 0.0).is_err());
        assert!(app.pause().is_err());
        assert!(app.resume().is_err());
    }

    #[test]
    fn test_resume_only_after_pause() {
        let mut app = ready_app();
        // Focus without a prior blur: nothing to resume
        assert_eq!(app.resume(), Ok(false));
        assert_eq!(app.lifecycle(), Lifecycle::Ready { paused: false });

        app.pause().unwrap();
        assert_eq!(app.resume(), Ok(true));
        assert_eq!(app.resume(), Ok(false));
    }

    #[test]
    fn test_toggle_show_fps() {
        let mut app = ready_app();
        app.frame(&RawInput::default(), 0.016, 16.0).unwrap();
        assert!(app.hud().unwrap().secondary.is_some());

        assert!(!app.toggle_show_fps());
        assert!(!app.settings().show_fps);
        assert_eq!(app.hud().unwrap().secondary, None);

        assert!(app.toggle_show_fps());
        assert!(app.hud().unwrap().secondary.is_some());
    }

    #[test]
    fn test_first_frame_reports_restart() {
        let mut app = ready_app();
        let events = app.frame(&RawInput::default(), 0.016, 16.0).unwrap();
        assert_eq!(events, vec![GameEvent::Restarted]);
    }

    #[test]
    fn test_pointer_is_unprojected() {
        let mut app = ready_app();
        // 10px per unit: pixel x=100 is world x=10
        let input = RawInput {
            pointer_down: Some(Vec2::new(100.0, 300.0)),
            ..Default::default()
        };
        app.frame(&input, 0.016, 16.0).unwrap();
        assert_eq!(app.session().unwrap().bucket.pos.x, 7.0);
    }

    #[test]
    fn test_paused_frames_do_nothing() {
        let mut app = ready_app();
        app.frame(&RawInput::default(), 0.016, 16.0).unwrap();
        app.pause().unwrap();
        for i in 0..100 {
            let events = app.frame(&RawInput::default(), 0.1, i as f64).unwrap();
            assert!(events.is_empty());
        }
        let session = app.session().unwrap();
        assert!(session.droplets.is_empty());
        assert!(session.spawn_timer < 0.1);
    }

    #[test]
    fn test_long_frames_are_clamped() {
        let mut app = ready_app();
        app.frame(&RawInput::default(), 5.0, 16.0).unwrap();
        let session = app.session().unwrap();
        assert!((session.spawn_timer - MAX_FRAME_DT).abs() < 1e-6);
        assert!(session.droplets.is_empty());
    }

    #[test]
    fn test_restart_by_tapping_control() {
        let mut app = ready_app();
        // Keep the bucket far left and let the first droplet land
        let hold_left = RawInput {
            left: true,
            ..Default::default()
        };
        let mut now = 0.0;
        let mut missed = false;
        for _ in 0..2000 {
            now += 16.0;
            let events = app.frame(&hold_left, 1.0 / 60.0, now).unwrap();
            if events.iter().any(|e| matches!(e, GameEvent::Missed { .. })) {
                missed = true;
                break;
            }
        }
        assert!(missed);
        assert_eq!(app.session().unwrap().phase, GamePhase::GameOver);
        assert_eq!(app.hud().unwrap().primary, "GAME OVER");

        // Restart control spans world (52..62, 1..11) -> pixels (520..620, 290..390)
        let tap = RawInput {
            tapped: Some(Vec2::new(570.0, 340.0)),
            ..Default::default()
        };
        let events = app.frame(&tap, 1.0 / 60.0, now + 16.0).unwrap();
        assert!(events.contains(&GameEvent::Restarted));
        let session = app.session().unwrap();
        assert_eq!(session.phase, GamePhase::Playing);
        assert_eq!(session.score, 0);
    }
}
