//! HUD: frame-rate counter and status text

use crate::sim::{GamePhase, GameState};

/// Number of frame timestamps averaged for the FPS readout
const FPS_WINDOW: usize = 60;

/// Rolling frame-rate counter over the last 60 frame timestamps
#[derive(Debug, Clone)]
pub struct FpsCounter {
    frame_times: [f64; FPS_WINDOW],
    frame_index: usize,
    fps: u32,
}

impl Default for FpsCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl FpsCounter {
    pub fn new() -> Self {
        Self {
            frame_times: [0.0; FPS_WINDOW],
            frame_index: 0,
            fps: 0,
        }
    }

    /// Record a frame at `time_ms` (monotonic milliseconds)
    pub fn record(&mut self, time_ms: f64) {
        self.frame_times[self.frame_index] = time_ms;
        self.frame_index = (self.frame_index + 1) % FPS_WINDOW;

        // Slot we are about to overwrite holds the oldest sample
        let oldest = self.frame_times[self.frame_index];
        if oldest > 0.0 {
            let elapsed = time_ms - oldest;
            if elapsed > 0.0 {
                self.fps = ((FPS_WINDOW - 1) as f64 * 1000.0 / elapsed).round() as u32;
            }
        }
    }

    pub fn fps(&self) -> u32 {
        self.fps
    }
}

/// The two lines of status text drawn over the playfield
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudText {
    pub primary: String,
    pub secondary: Option<String>,
}

impl HudText {
    pub fn for_state(state: &GameState, fps: u32, show_fps: bool) -> Self {
        match state.phase {
            GamePhase::Playing => Self {
                primary: format!("Score: {}", state.score),
                secondary: show_fps.then(|| format!("FPS: {}", fps)),
            },
            GamePhase::GameOver => Self {
                primary: "GAME OVER".to_string(),
                secondary: Some(format!("Score: {}", state.score)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_steady_60() {
        let mut counter = FpsCounter::new();
        let frame = 1000.0 / 60.0;
        for i in 1..=120 {
            counter.record(i as f64 * frame);
        }
        assert_eq!(counter.fps(), 60);
    }

    #[test]
    fn test_fps_zero_until_window_full() {
        let mut counter = FpsCounter::new();
        for i in 1..30 {
            counter.record(i as f64 * 16.0);
        }
        assert_eq!(counter.fps(), 0);
    }

    #[test]
    fn test_hud_playing() {
        let mut state = GameState::new(1);
        state.score = 7;
        let hud = HudText::for_state(&state, 58, true);
        assert_eq!(hud.primary, "Score: 7");
        assert_eq!(hud.secondary.as_deref(), Some("FPS: 58"));

        let hud = HudText::for_state(&state, 58, false);
        assert_eq!(hud.secondary, None);
    }

    #[test]
    fn test_hud_game_over() {
        let mut state = GameState::new(1);
        state.score = 3;
        state.phase = GamePhase::GameOver;
        let hud = HudText::for_state(&state, 60, true);
        assert_eq!(hud.primary, "GAME OVER");
        assert_eq!(hud.secondary.as_deref(), Some("Score: 3"));
    }
}
