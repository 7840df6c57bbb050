//! Player ship: movement, shrink mode, speed boost
//!
//! Eight-directional held-key movement with normalized diagonals. The
//! shrink mode is a held-button toggle (not a timed buff): geometry
//! scales by a fixed factor and is recentered so the collider midpoint
//! never moves. The player owns its shield, which follows every frame.

use glam::Vec2;

use super::collider::CircleCollider;
use super::rect::Rect;
use super::shield::Shield;
use crate::content::{SpriteAtlas, TextureId};
use crate::input::InputManager;
use crate::renderer::SpriteBatch;

/// Base movement speed, units per ms
const PLAYER_SPEED: f32 = 0.25;
/// Geometry scale while shrunk
const SHRINK_FACTOR: f32 = 0.5;
/// Speed multiplier while the boost button is held
const SPEED_BOOST_MULTIPLIER: f32 = 1.2;
/// Starting gap above the bottom edge
const BOTTOM_MARGIN: f32 = 20.0;

const PLAYER_SPRITE: &str = "playerShip2_green";

pub struct Player {
    pub draw_rect: Rect,
    pub circle_collider: CircleCollider,
    pub shield: Shield,
    source_rect: Rect,
    texture: TextureId,
    original_width: f32,
    original_height: f32,
    is_shrunk: bool,
    bounds: Vec2,
}

impl Player {
    pub fn new(atlas: &SpriteAtlas, bounds: Vec2) -> Self {
        let sprite = atlas.sprite(PLAYER_SPRITE);
        let mut draw_rect = sprite.draw_rect;
        draw_rect.x = bounds.x / 2.0 - draw_rect.width / 2.0;
        draw_rect.y = bounds.y - draw_rect.height - BOTTOM_MARGIN;

        let mut player = Self {
            draw_rect,
            circle_collider: CircleCollider::default(),
            shield: Shield::new(atlas),
            source_rect: sprite.source_rect,
            texture: sprite.texture,
            original_width: sprite.draw_rect.width,
            original_height: sprite.draw_rect.height,
            is_shrunk: false,
            bounds,
        };
        player.circle_collider.update(&player.draw_rect);
        player
    }

    pub fn is_shrunk(&self) -> bool {
        self.is_shrunk
    }

    fn clamp_to_bounds(&mut self) {
        if self.draw_rect.x < 0.0 {
            self.draw_rect.x = 0.0;
        }
        if self.draw_rect.y < 0.0 {
            self.draw_rect.y = 0.0;
        }
        if self.draw_rect.right() > self.bounds.x {
            self.draw_rect.x = self.bounds.x - self.draw_rect.width;
        }
        if self.draw_rect.bottom() > self.bounds.y {
            self.draw_rect.y = self.bounds.y - self.draw_rect.height;
        }
    }

    pub fn update(&mut self, dt: f32, input: &mut InputManager) {
        let mut direction = Vec2::ZERO;

        if input.is_key_down("arrowright") || input.is_key_down("d") {
            direction.x = 1.0;
        }
        if input.is_key_down("arrowleft") || input.is_key_down("a") {
            direction.x = -1.0;
        }
        if input.is_key_down("arrowup") || input.is_key_down("w") {
            direction.y = -1.0;
        }
        if input.is_key_down("arrowdown") || input.is_key_down("s") {
            direction.y = 1.0;
        }

        if direction != Vec2::ZERO {
            direction = direction.normalize();
        }

        // Shrink while the left button is held; both transitions keep
        // the rect midpoint fixed
        if input.is_left_mouse_down() && !self.is_shrunk {
            self.is_shrunk = true;
            self.draw_rect.width = self.original_width * SHRINK_FACTOR;
            self.draw_rect.height = self.original_height * SHRINK_FACTOR;
            self.draw_rect.x += self.original_width * (1.0 - SHRINK_FACTOR) * 0.5;
            self.draw_rect.y += self.original_height * (1.0 - SHRINK_FACTOR) * 0.5;
        }

        if input.is_left_mouse_released() && self.is_shrunk {
            self.is_shrunk = false;
            self.draw_rect.x -= self.original_width * (1.0 - SHRINK_FACTOR) * 0.5;
            self.draw_rect.y -= self.original_height * (1.0 - SHRINK_FACTOR) * 0.5;
            self.draw_rect.width = self.original_width;
            self.draw_rect.height = self.original_height;
        }

        let speed = if input.is_right_mouse_down() {
            PLAYER_SPEED * SPEED_BOOST_MULTIPLIER
        } else {
            PLAYER_SPEED
        };

        self.draw_rect.x += direction.x * speed * dt;
        self.draw_rect.y += direction.y * speed * dt;

        self.clamp_to_bounds();
        self.circle_collider.update(&self.draw_rect);

        let (rect, shrunk) = (self.draw_rect, self.is_shrunk);
        self.shield.update(dt, &rect, shrunk);
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        batch.draw_sprite(self.texture, self.draw_rect, self.source_rect);
        self.shield.draw(batch);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(&SpriteAtlas::space_shooter(), Vec2::new(800.0, 1000.0))
    }

    #[test]
    fn test_starts_bottom_center() {
        let p = player();
        assert_eq!(p.draw_rect.x, 400.0 - 56.0);
        assert_eq!(p.draw_rect.y, 1000.0 - 75.0 - 20.0);
    }

    #[test]
    fn test_diagonal_movement_normalized() {
        let mut p = player();
        let mut input = InputManager::new();
        input.set_key("arrowleft", true);
        input.set_key("arrowup", true);

        let start = p.draw_rect.center();
        p.update(100.0, &mut input);
        let moved = start - p.draw_rect.center();

        // 100ms at 0.25 u/ms = 25 units of travel, split across the
        // diagonal
        let expected = 25.0 / std::f32::consts::SQRT_2;
        assert!((moved.x - expected).abs() < 0.01);
        assert!((moved.y - expected).abs() < 0.01);
    }

    #[test]
    fn test_boost_multiplies_speed() {
        let mut p = player();
        let mut input = InputManager::new();
        input.set_key("arrowleft", true);
        input.set_mouse_button(2, true);

        let x0 = p.draw_rect.x;
        p.update(100.0, &mut input);
        assert!((x0 - p.draw_rect.x - 30.0).abs() < 0.01);
    }

    #[test]
    fn test_clamped_to_bounds() {
        let mut p = player();
        let mut input = InputManager::new();
        input.set_key("arrowright", true);

        for _ in 0..100 {
            p.update(100.0, &mut input);
        }
        assert_eq!(p.draw_rect.right(), 800.0);
    }

    #[test]
    fn test_shrink_preserves_midpoint() {
        let mut p = player();
        let mut input = InputManager::new();
        let center = p.draw_rect.center();

        input.set_mouse_button(0, true);
        p.update(0.0, &mut input);
        assert!(p.is_shrunk());
        assert_eq!(p.draw_rect.width, 56.0);
        assert_eq!(p.draw_rect.center(), center);

        input.set_mouse_button(0, false);
        p.update(0.0, &mut input);
        assert!(!p.is_shrunk());
        assert_eq!(p.draw_rect.width, 112.0);
        assert_eq!(p.draw_rect.center(), center);
    }

    #[test]
    fn test_collider_tracks_rect() {
        let mut p = player();
        let mut input = InputManager::new();
        input.set_key("w", true);
        p.update(50.0, &mut input);
        assert_eq!(p.circle_collider.center, p.draw_rect.center());
    }
}
