//! Sprite batch: the draw-call recording surface between simulation and GPU
//!
//! The simulation knows nothing about devices or pipelines; each frame it
//! records textured quads here in draw order. Submission order is the only
//! z-ordering the game has.

use glam::Vec2;

use super::vertex::Color;
use crate::content::TextureId;
use crate::sim::Rect;

/// One recorded sprite draw
#[derive(Debug, Clone, Copy)]
pub struct SpriteQuad {
    pub texture: TextureId,
    pub dst: Rect,
    pub src: Rect,
    pub tint: Color,
    /// Rotation in radians around `origin`
    pub rotation: f32,
    /// Rotation anchor in normalized dst coordinates (0.5, 0.5 = center)
    pub origin: Vec2,
}

/// Per-frame list of sprite draws
#[derive(Default)]
pub struct SpriteBatch {
    quads: Vec<SpriteQuad>,
}

impl SpriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all recorded quads, keeping capacity for the next frame
    pub fn clear(&mut self) {
        self.quads.clear();
    }

    pub fn len(&self) -> usize {
        self.quads.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quads.is_empty()
    }

    pub fn quads(&self) -> &[SpriteQuad] {
        &self.quads
    }

    /// Record an untinted, unrotated sprite
    pub fn draw_sprite(&mut self, texture: TextureId, dst: Rect, src: Rect) {
        self.draw_sprite_source(texture, dst, src, Color::WHITE, 0.0, Vec2::new(0.5, 0.5));
    }

    /// Record a sprite with tint and rotation
    pub fn draw_sprite_source(
        &mut self,
        texture: TextureId,
        dst: Rect,
        src: Rect,
        tint: Color,
        rotation: f32,
        origin: Vec2,
    ) {
        self.quads.push(SpriteQuad {
            texture,
            dst,
            src,
            tint,
            rotation,
            origin,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_submission_order() {
        let mut batch = SpriteBatch::new();
        batch.draw_sprite(TextureId::ATLAS, Rect::new(0.0, 0.0, 10.0, 10.0), Rect::default());
        batch.draw_sprite(
            TextureId::BACKGROUND,
            Rect::new(5.0, 5.0, 10.0, 10.0),
            Rect::default(),
        );

        assert_eq!(batch.len(), 2);
        assert_eq!(batch.quads()[0].texture, TextureId::ATLAS);
        assert_eq!(batch.quads()[1].texture, TextureId::BACKGROUND);

        batch.clear();
        assert!(batch.is_empty());
    }
}
