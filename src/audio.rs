//! Audio cues
//!
//! The simulation only emits events; this module decides what they sound
//! like. On wasm32 the sounds are generated with the Web Audio API - no
//! external files needed.

use crate::sim::GameEvent;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Droplet landed in the bucket
    Catch,
    /// Droplet hit the floor
    Miss,
}

/// Fire-and-forget instruction for the audio player
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    Play(SoundEffect),
    StartMusic,
    StopMusic,
}

/// Audio cues triggered by a session event
pub fn cues_for(event: &GameEvent) -> &'static [AudioCue] {
    match event {
        GameEvent::Caught { .. } => &[AudioCue::Play(SoundEffect::Catch)],
        GameEvent::Missed { .. } => &[AudioCue::Play(SoundEffect::Miss), AudioCue::StopMusic],
        GameEvent::Restarted => &[AudioCue::StartMusic],
        GameEvent::Spawned { .. } => &[],
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::AudioManager;

#[cfg(target_arch = "wasm32")]
mod web {
    use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

    use super::{AudioCue, SoundEffect};

    /// Background loop: a soft drone with a slow tremolo
    struct MusicLoop {
        voice: OscillatorNode,
        lfo: OscillatorNode,
    }

    /// Audio manager for the game
    pub struct AudioManager {
        ctx: Option<AudioContext>,
        master_volume: f32,
        sfx_volume: f32,
        music_volume: f32,
        muted: bool,
        music: Option<MusicLoop>,
    }

    impl AudioManager {
        pub fn new(master_volume: f32, sfx_volume: f32, music_volume: f32) -> Self {
            // Try to create audio context (may fail if not in secure context)
            let ctx = AudioContext::new().ok();
            if ctx.is_none() {
                log::warn!("Failed to create AudioContext - audio disabled");
            }
            Self {
                ctx,
                master_volume: master_volume.clamp(0.0, 1.0),
                sfx_volume: sfx_volume.clamp(0.0, 1.0),
                music_volume: music_volume.clamp(0.0, 1.0),
                muted: false,
                music: None,
            }
        }

        /// Resume audio context (required after user gesture)
        pub fn resume(&self) {
            if let Some(ctx) = &self.ctx {
                let _ = ctx.resume();
            }
        }

        /// Mute/unmute all audio
        pub fn set_muted(&mut self, muted: bool) {
            self.muted = muted;
            if muted {
                self.stop_music();
            }
        }

        fn sfx_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.sfx_volume
            }
        }

        fn music_gain(&self) -> f32 {
            if self.muted {
                0.0
            } else {
                self.master_volume * self.music_volume
            }
        }

        pub fn apply(&mut self, cue: AudioCue) {
            match cue {
                AudioCue::Play(effect) => self.play(effect),
                AudioCue::StartMusic => self.start_music(),
                AudioCue::StopMusic => self.stop_music(),
            }
        }

        /// Play a sound effect
        pub fn play(&self, effect: SoundEffect) {
            let vol = self.sfx_gain();
            if vol <= 0.0 {
                return;
            }

            let Some(ctx) = &self.ctx else { return };

            // Resume context if suspended (browsers require user gesture)
            if ctx.state() == web_sys::AudioContextState::Suspended {
                let _ = ctx.resume();
            }

            match effect {
                SoundEffect::Catch => self.play_catch(ctx, vol),
                SoundEffect::Miss => self.play_miss(ctx, vol),
            }
        }

        /// Start the background loop (restarts it if already playing)
        pub fn start_music(&mut self) {
            self.stop_music();
            let vol = self.music_gain();
            if vol <= 0.0 {
                return;
            }
            let Some(ctx) = &self.ctx else { return };
            self.music = Self::create_music(ctx, vol);
            if self.music.is_none() {
                log::warn!("Failed to start background music");
            }
        }

        pub fn stop_music(&mut self) {
            if let Some(music) = self.music.take() {
                music.voice.stop().ok();
                music.lfo.stop().ok();
            }
        }

        fn create_music(ctx: &AudioContext, vol: f32) -> Option<MusicLoop> {
            let voice = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;
            voice.set_type(OscillatorType::Triangle);
            voice.frequency().set_value(110.0);
            gain.gain().set_value(vol * 0.15);

            // Tremolo: LFO modulates the gain
            let lfo = ctx.create_oscillator().ok()?;
            let depth = ctx.create_gain().ok()?;
            lfo.frequency().set_value(0.5);
            depth.gain().set_value(vol * 0.05);
            lfo.connect_with_audio_node(&depth).ok()?;
            depth.connect_with_audio_param(&gain.gain()).ok()?;

            voice.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            voice.start().ok()?;
            lfo.start().ok()?;
            Some(MusicLoop { voice, lfo })
        }

        // === Sound generators ===

        /// Create an oscillator with gain envelope
        fn create_osc(
            &self,
            ctx: &AudioContext,
            freq: f32,
            osc_type: OscillatorType,
        ) -> Option<(OscillatorNode, GainNode)> {
            let osc = ctx.create_oscillator().ok()?;
            let gain = ctx.create_gain().ok()?;

            osc.set_type(osc_type);
            osc.frequency().set_value(freq);
            osc.connect_with_audio_node(&gain).ok()?;
            gain.connect_with_audio_node(&ctx.destination()).ok()?;

            Some((osc, gain))
        }

        /// Catch - bright rising plink
        fn play_catch(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 660.0, OscillatorType::Sine) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.4, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.12)
                .ok();
            osc.frequency().set_value_at_time(660.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(1320.0, t + 0.08)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }

        /// Miss - long falling tone
        fn play_miss(&self, ctx: &AudioContext, vol: f32) {
            let Some((osc, gain)) = self.create_osc(ctx, 440.0, OscillatorType::Sawtooth) else {
                return;
            };
            let t = ctx.current_time();

            gain.gain().set_value_at_time(vol * 0.35, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.9)
                .ok();
            osc.frequency().set_value_at_time(440.0, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(80.0, t + 0.8)
                .ok();

            osc.start().ok();
            osc.stop_with_when(t + 1.0).ok();
        }
    }

    impl Drop for AudioManager {
        fn drop(&mut self) {
            self.stop_music();
            if let Some(ctx) = &self.ctx {
                let _ = ctx.close();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catch_plays_sound() {
        assert_eq!(
            cues_for(&GameEvent::Caught { id: 3 }),
            &[AudioCue::Play(SoundEffect::Catch)]
        );
    }

    #[test]
    fn test_miss_stops_music() {
        let cues = cues_for(&GameEvent::Missed { id: 3 });
        assert!(cues.contains(&AudioCue::Play(SoundEffect::Miss)));
        assert!(cues.contains(&AudioCue::StopMusic));
    }

    #[test]
    fn test_restart_starts_music() {
        assert_eq!(cues_for(&GameEvent::Restarted), &[AudioCue::StartMusic]);
        assert!(cues_for(&GameEvent::Spawned { id: 1 }).is_empty());
    }
}
