//! Audio system using the Web Audio API
//!
//! Procedurally generated sound effects - no external files needed.
//! Playback is best-effort: every Web Audio call swallows its error so a
//! blocked autoplay context can never disturb the frame loop.

use web_sys::{AudioContext, GainNode, OscillatorNode, OscillatorType};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Player autofire volley
    Laser,
    /// Enemy destroyed
    Explosion,
    /// Shield absorbed a hit
    ShieldHit,
    /// Power-up collected
    PowerUp,
    /// Run ended
    GameOver,
}

/// Audio manager for the game
pub struct AudioManager {
    ctx: Option<AudioContext>,
    master_volume: f32,
    sfx_volume: f32,
    muted: bool,
}

impl Default for AudioManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioManager {
    pub fn new() -> Self {
        let ctx = AudioContext::new().ok();
        if ctx.is_none() {
            log::warn!("Failed to create AudioContext - audio disabled");
        }
        Self {
            ctx,
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,
        }
    }

    /// Resume audio context (required after user gesture)
    pub fn resume(&self) {
        if let Some(ctx) = &self.ctx {
            let _ = ctx.resume();
        }
    }

    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_sfx_volume(&mut self, vol: f32) {
        self.sfx_volume = vol.clamp(0.0, 1.0);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, volume: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * self.sfx_volume * volume
        }
    }

    /// Fire-and-forget playback at the given volume scale
    pub fn play(&self, effect: SoundEffect, volume: f32) {
        self.play_for(effect, None, volume, 1.0);
    }

    /// Playback with an explicit cutoff and pitch multiplier
    pub fn play_for(
        &self,
        effect: SoundEffect,
        duration_secs: Option<f32>,
        volume: f32,
        pitch: f32,
    ) {
        let vol = self.effective_volume(volume);
        if vol <= 0.0 {
            return;
        }

        let Some(ctx) = &self.ctx else { return };

        if ctx.state() == web_sys::AudioContextState::Suspended {
            let _ = ctx.resume();
        }

        match effect {
            SoundEffect::Laser => self.play_laser(ctx, vol, duration_secs, pitch),
            SoundEffect::Explosion => self.play_explosion(ctx, vol, duration_secs, pitch),
            SoundEffect::ShieldHit => self.play_shield_hit(ctx, vol, duration_secs, pitch),
            SoundEffect::PowerUp => self.play_powerup(ctx, vol, duration_secs, pitch),
            SoundEffect::GameOver => self.play_game_over(ctx, vol, duration_secs, pitch),
        }
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

    /// Short descending zap
    fn play_laser(&self, ctx: &AudioContext, vol: f32, duration: Option<f32>, pitch: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 880.0 * pitch, OscillatorType::Square) else {
            return;
        };
        let t = ctx.current_time();
        let dur = duration.unwrap_or(0.08) as f64;

        gain.gain().set_value_at_time(vol * 0.2, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur)
            .ok();
        osc.frequency().set_value_at_time(880.0 * pitch, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(220.0 * pitch, t + dur)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + dur + 0.02).ok();
    }

    /// Boom with a high crack on top
    fn play_explosion(&self, ctx: &AudioContext, vol: f32, duration: Option<f32>, pitch: f32) {
        let t = ctx.current_time();
        let dur = duration.unwrap_or(0.4) as f64;

        if let Some((osc, gain)) = self.create_osc(ctx, 100.0 * pitch, OscillatorType::Sawtooth) {
            gain.gain().set_value_at_time(vol * 0.5, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + dur)
                .ok();
            osc.frequency().set_value_at_time(100.0 * pitch, t).ok();
            osc.frequency()
                .exponential_ramp_to_value_at_time(30.0 * pitch, t + dur)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + dur + 0.1).ok();
        }

        if let Some((osc, gain)) = self.create_osc(ctx, 1500.0 * pitch, OscillatorType::Square) {
            gain.gain().set_value_at_time(vol * 0.2, t).ok();
            gain.gain()
                .exponential_ramp_to_value_at_time(0.01, t + 0.1)
                .ok();
            osc.start().ok();
            osc.stop_with_when(t + 0.15).ok();
        }
    }

    /// Metallic ping for an absorbed hit
    fn play_shield_hit(&self, ctx: &AudioContext, vol: f32, duration: Option<f32>, pitch: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 500.0 * pitch, OscillatorType::Triangle)
        else {
            return;
        };
        let t = ctx.current_time();
        let dur = duration.unwrap_or(0.15) as f64;

        gain.gain().set_value_at_time(vol * 0.35, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur)
            .ok();
        osc.frequency().set_value_at_time(500.0 * pitch, t).ok();
        osc.frequency().set_value_at_time(350.0 * pitch, t + 0.05).ok();

        osc.start().ok();
        osc.stop_with_when(t + dur + 0.05).ok();
    }

    /// Rising two-note chirp
    fn play_powerup(&self, ctx: &AudioContext, vol: f32, duration: Option<f32>, pitch: f32) {
        let t = ctx.current_time();
        let dur = duration.unwrap_or(0.3) as f64;

        for (i, freq) in [660.0, 990.0].iter().enumerate() {
            let delay = i as f64 * 0.08;
            if let Some((osc, gain)) = self.create_osc(ctx, freq * pitch, OscillatorType::Sine) {
                gain.gain().set_value_at_time(vol * 0.3, t + delay).ok();
                gain.gain()
                    .exponential_ramp_to_value_at_time(0.01, t + delay + dur / 2.0)
                    .ok();
                osc.start_with_when(t + delay).ok();
                osc.stop_with_when(t + delay + dur / 2.0 + 0.05).ok();
            }
        }
    }

    /// Slow falling dirge
    fn play_game_over(&self, ctx: &AudioContext, vol: f32, duration: Option<f32>, pitch: f32) {
        let Some((osc, gain)) = self.create_osc(ctx, 220.0 * pitch, OscillatorType::Sawtooth)
        else {
            return;
        };
        let t = ctx.current_time();
        let dur = duration.unwrap_or(0.8) as f64;

        gain.gain().set_value_at_time(vol * 0.4, t).ok();
        gain.gain()
            .exponential_ramp_to_value_at_time(0.01, t + dur)
            .ok();
        osc.frequency().set_value_at_time(220.0 * pitch, t).ok();
        osc.frequency()
            .exponential_ramp_to_value_at_time(55.0 * pitch, t + dur)
            .ok();

        osc.start().ok();
        osc.stop_with_when(t + dur + 0.1).ok();
    }
}
