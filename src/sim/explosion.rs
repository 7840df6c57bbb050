//! Explosion flipbook pool
//!
//! A destroyed enemy plays a one-shot 8x3 sheet animation at 30 fps over
//! its own draw rect, then returns to the pool.

use super::rect::Rect;
use crate::content::TextureId;
use crate::renderer::SpriteBatch;

/// ms per animation frame (30 fps)
const TIME_TO_NEXT_FRAME: f32 = 1000.0 / 30.0;

const COLS: u32 = 8;
const ROWS: u32 = 3;
const FRAME_SIZE: f32 = 64.0;

/// Pooled one-shot animation
pub struct Explosion {
    pub active: bool,
    draw_rect: Rect,
    time_to_next_frame: f32,
    column: u32,
    row: u32,
}

impl Explosion {
    fn new() -> Self {
        Self {
            active: false,
            draw_rect: Rect::default(),
            time_to_next_frame: 0.0,
            column: 0,
            row: 0,
        }
    }

    /// Restart the animation over the given rect
    fn play(&mut self, draw_rect: Rect) {
        self.active = true;
        self.time_to_next_frame = 0.0;
        self.column = 0;
        self.row = 0;
        self.draw_rect = draw_rect;
    }

    fn update(&mut self, dt: f32) {
        self.time_to_next_frame += dt;
        if self.time_to_next_frame > TIME_TO_NEXT_FRAME {
            self.time_to_next_frame = 0.0;
            self.column += 1;

            if self.column >= COLS {
                self.column = 0;
                self.row += 1;
                if self.row >= ROWS {
                    self.row = 0;
                    self.active = false;
                }
            }
        }
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        let src = Rect::new(
            self.column as f32 * FRAME_SIZE,
            self.row as f32 * FRAME_SIZE,
            FRAME_SIZE,
            FRAME_SIZE,
        );
        batch.draw_sprite(TextureId::EXPLOSION, self.draw_rect, src);
    }
}

/// Pool of explosion animations
#[derive(Default)]
pub struct ExplosionManager {
    pool: Vec<Explosion>,
}

impl ExplosionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Play an explosion over `draw_rect`, reusing an inactive slot
    pub fn create(&mut self, draw_rect: Rect) {
        let slot = match self.pool.iter().position(|e| !e.active) {
            Some(i) => i,
            None => {
                self.pool.push(Explosion::new());
                self.pool.len() - 1
            }
        };
        self.pool[slot].play(draw_rect);
    }

    pub fn update(&mut self, dt: f32) {
        for explosion in &mut self.pool {
            if explosion.active {
                explosion.update(dt);
            }
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        for explosion in &self.pool {
            if explosion.active {
                explosion.draw(batch);
            }
        }
    }

    #[cfg(test)]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    #[cfg(test)]
    pub fn active_count(&self) -> usize {
        self.pool.iter().filter(|e| e.active).count()
    }
}
