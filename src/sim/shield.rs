//! Player shield: elliptical dome with an open bottom
//!
//! Three independent lifecycles share one visual output: the active
//! gate with its 10-second countdown, a 1-second hit flash, and a
//! 1.5-second expiration flicker. They live in a named-timer struct and
//! a single pure function folds them into the final tint, so no field
//! mutation order can change what gets drawn.

use glam::Vec2;

use super::collider::EllipticalCollider;
use super::rect::Rect;
use crate::content::{SpriteAtlas, TextureId};
use crate::renderer::{Color, SpriteBatch};

const SHIELD_SPRITE: &str = "shield1";

/// Shield lifetime after activation, ms
pub const SHIELD_DURATION: f32 = 10_000.0;

/// Hit flash length, ms
const HIT_FLASH_DURATION: f32 = 1_000.0;

/// Opacity flicker begins this long before expiry, ms
const EXPIRE_WARNING: f32 = 1_500.0;

/// White-to-red oscillation rate, radians per ms
const FLASH_RATE: f32 = 0.015;

/// Expiration flicker rate, radians per ms
const FLICKER_RATE: f32 = 0.02;

/// Dome padding around the player rect
const PADDING: f32 = 20.0;
const PADDING_SHRUNK: f32 = 15.0;

/// The shield's independent sub-timers, all in ms
#[derive(Debug, Clone, Copy, Default)]
pub struct ShieldTimers {
    /// Countdown until auto-deactivation; only meaningful while active
    pub remaining: f32,
    /// Time left on the white-to-red damage flash
    pub hit_flash: f32,
    /// Accumulated sim time driving the oscillator phases
    pub elapsed: f32,
}

/// Fold the timers into the drawn tint. Pure: same timers, same color.
pub fn compose_color(timers: &ShieldTimers) -> Color {
    let mut color = Color::WHITE;

    if timers.hit_flash > 0.0 {
        // Oscillate white -> red while reacting to damage
        let intensity = ((timers.elapsed * FLASH_RATE).sin() + 1.0) / 2.0;
        color.g = 1.0 - intensity;
        color.b = 1.0 - intensity;
    }

    if timers.remaining > 0.0 && timers.remaining < EXPIRE_WARNING {
        // Flicker opacity as the countdown runs out
        let flicker = ((timers.elapsed * FLICKER_RATE).sin() + 1.0) / 2.0;
        color.a = 0.35 + 0.65 * flicker;
    }

    color
}

/// Elliptical shield following the player
pub struct Shield {
    pub active: bool,
    pub draw_rect: Rect,
    pub elliptical_collider: EllipticalCollider,
    pub timers: ShieldTimers,
    source_rect: Rect,
    texture: TextureId,
}

impl Shield {
    pub fn new(atlas: &SpriteAtlas) -> Self {
        let sprite = atlas.sprite(SHIELD_SPRITE);
        Self {
            active: false,
            draw_rect: sprite.draw_rect,
            elliptical_collider: EllipticalCollider::default(),
            timers: ShieldTimers::default(),
            source_rect: sprite.source_rect,
            texture: sprite.texture,
        }
    }

    /// Raise the dome and restart the countdown
    pub fn activate(&mut self) {
        self.active = true;
        self.timers.remaining = SHIELD_DURATION;
    }

    /// Start (or restart) the damage flash
    pub fn on_hit(&mut self) {
        self.timers.hit_flash = HIT_FLASH_DURATION;
    }

    /// Advance timers and follow the player rect. Runs every frame even
    /// while inactive so activation never causes a position jump.
    pub fn update(&mut self, dt: f32, player_rect: &Rect, is_shrunk: bool) {
        self.timers.elapsed += dt;

        if self.active {
            self.timers.remaining -= dt;
            if self.timers.remaining <= 0.0 {
                self.timers.remaining = 0.0;
                self.active = false;
            }
        }

        if self.timers.hit_flash > 0.0 {
            self.timers.hit_flash = (self.timers.hit_flash - dt).max(0.0);
        }

        let padding = if is_shrunk { PADDING_SHRUNK } else { PADDING };
        self.draw_rect.width = player_rect.width + padding;
        self.draw_rect.height = player_rect.height + padding;
        self.draw_rect.x = player_rect.x - (self.draw_rect.width - player_rect.width) / 2.0;
        self.draw_rect.y = player_rect.y - (self.draw_rect.height - player_rect.height) / 2.0;

        self.elliptical_collider.update(&self.draw_rect);
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        if !self.active {
            return;
        }
        batch.draw_sprite_source(
            self.texture,
            self.draw_rect,
            self.source_rect,
            compose_color(&self.timers),
            0.0,
            Vec2::new(0.5, 0.5),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shield() -> Shield {
        Shield::new(&SpriteAtlas::space_shooter())
    }

    #[test]
    fn test_countdown_deactivates_at_boundary() {
        let rect = Rect::new(100.0, 100.0, 112.0, 75.0);
        let mut s = shield();
        s.activate();

        // 9999ms accumulated in odd steps: still up
        for _ in 0..9 {
            s.update(1_000.0, &rect, false);
        }
        s.update(999.0, &rect, false);
        assert!(s.active);

        s.update(1.0, &rect, false);
        assert!(!s.active);
    }

    #[test]
    fn test_countdown_independent_of_step_size() {
        let rect = Rect::new(0.0, 0.0, 112.0, 75.0);

        let mut coarse = shield();
        coarse.activate();
        coarse.update(10_000.0, &rect, false);

        let mut fine = shield();
        fine.activate();
        for _ in 0..100 {
            fine.update(100.0, &rect, false);
        }

        assert_eq!(coarse.active, fine.active);
        assert!(!fine.active);
    }

    #[test]
    fn test_follows_player_while_inactive() {
        let mut s = shield();
        s.update(16.0, &Rect::new(300.0, 500.0, 112.0, 75.0), false);

        // Dome centered on the player with padding 20
        assert_eq!(s.draw_rect.width, 132.0);
        assert_eq!(s.draw_rect.x, 290.0);
        assert_eq!(s.draw_rect.y, 490.0);

        // Inactive shields are not drawn
        let mut batch = SpriteBatch::new();
        s.draw(&mut batch);
        assert!(batch.is_empty());
    }

    #[test]
    fn test_shrunk_padding() {
        let mut s = shield();
        s.update(16.0, &Rect::new(0.0, 0.0, 56.0, 37.5), true);
        assert_eq!(s.draw_rect.width, 71.0);
    }

    #[test]
    fn test_hit_flash_reddens_then_clears() {
        let rect = Rect::new(0.0, 0.0, 112.0, 75.0);
        let mut s = shield();
        s.activate();
        s.on_hit();

        // Sample a few phases during the flash: green/blue dip below 1
        let mut saw_red = false;
        for _ in 0..10 {
            s.update(50.0, &rect, false);
            let c = compose_color(&s.timers);
            assert_eq!(c.r, 1.0);
            if c.g < 0.99 {
                saw_red = true;
            }
        }
        assert!(saw_red);

        // After the flash window the tint returns to pure white
        s.update(1_000.0, &rect, false);
        let c = compose_color(&s.timers);
        assert_eq!(c.g, 1.0);
        assert_eq!(c.b, 1.0);
    }

    #[test]
    fn test_expiration_flicker_window() {
        let rect = Rect::new(0.0, 0.0, 112.0, 75.0);
        let mut s = shield();
        s.activate();

        // Mid-lifetime: fully opaque
        s.update(5_000.0, &rect, false);
        assert_eq!(compose_color(&s.timers).a, 1.0);

        // Inside the final 1500ms the alpha oscillates below 1
        let mut saw_flicker = false;
        while s.active {
            s.update(40.0, &rect, false);
            if s.active && compose_color(&s.timers).a < 0.99 {
                saw_flicker = true;
            }
        }
        assert!(saw_flicker);
    }

    #[test]
    fn test_compose_color_is_pure() {
        let timers = ShieldTimers {
            remaining: 800.0,
            hit_flash: 300.0,
            elapsed: 12_345.0,
        };
        assert_eq!(compose_color(&timers), compose_color(&timers));
    }
}
