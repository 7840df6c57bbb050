//! Bullet pool and shot timing
//!
//! One `BulletManager` instance serves the player (autofire with
//! rapid-fire buff) and another serves enemies (on-demand spawns only).
//! Both share the pool contract: linear scan for the first inactive slot,
//! append when the pool is saturated, never shrink.

use super::collider::CircleCollider;
use super::events::GameEvent;
use super::rect::Rect;
use crate::content::{SpriteAtlas, TextureId};
use crate::renderer::SpriteBatch;

/// Player bullets travel upward, units per ms
const PLAYER_BULLET_SPEED: f32 = 0.75;
/// Enemy bullets travel downward, units per ms
const ENEMY_BULLET_SPEED: f32 = 0.35;

/// Autofire interval in ms
const NORMAL_SPAWN_INTERVAL: f32 = 250.0;
/// Autofire interval while rapid fire is active
const RAPID_SPAWN_INTERVAL: f32 = 150.0;

/// Horizontal spread of the rapid-fire triple shot
const TRIPLE_SHOT_OFFSET: f32 = 15.0;

/// Bullets are culled this far past the screen edge
const CULL_MARGIN: f32 = 100.0;

const PLAYER_BULLET_SPRITE: &str = "laserBlue01";
const ENEMY_BULLET_SPRITE: &str = "laserRed05";

/// Who fired the bullet; decides sprite, direction and speed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletKind {
    Player,
    Enemy,
}

/// Pooled projectile
pub struct Bullet {
    pub active: bool,
    pub kind: BulletKind,
    pub draw_rect: Rect,
    pub collider: CircleCollider,
    source_rect: Rect,
    texture: TextureId,
}

impl Bullet {
    fn new(atlas: &SpriteAtlas, kind: BulletKind) -> Self {
        let mut bullet = Self {
            active: false,
            kind,
            draw_rect: Rect::default(),
            collider: CircleCollider::default(),
            source_rect: Rect::default(),
            texture: TextureId::ATLAS,
        };
        bullet.load_sprite(atlas, kind);
        bullet
    }

    fn load_sprite(&mut self, atlas: &SpriteAtlas, kind: BulletKind) {
        let name = match kind {
            BulletKind::Player => PLAYER_BULLET_SPRITE,
            BulletKind::Enemy => ENEMY_BULLET_SPRITE,
        };
        let sprite = atlas.sprite(name);
        self.kind = kind;
        self.texture = sprite.texture;
        self.source_rect = sprite.source_rect;
        self.draw_rect.width = sprite.draw_rect.width;
        self.draw_rect.height = sprite.draw_rect.height;
    }

    /// Activate the bullet centered on `source`, just above it for player
    /// bullets, just below for enemy bullets. Collider refreshed
    /// immediately so a spawn-frame collision is possible.
    fn spawn(&mut self, source: &Rect, offset_x: f32) {
        self.active = true;
        self.draw_rect.x =
            source.x + source.width / 2.0 - self.draw_rect.width / 2.0 + offset_x;
        self.draw_rect.y = match self.kind {
            BulletKind::Player => source.y - self.draw_rect.height,
            BulletKind::Enemy => source.bottom(),
        };
        self.collider.update(&self.draw_rect);
    }

    fn update(&mut self, dt: f32, bounds_height: f32) {
        match self.kind {
            BulletKind::Player => {
                self.draw_rect.y -= PLAYER_BULLET_SPEED * dt;
                if self.draw_rect.bottom() < -CULL_MARGIN {
                    self.active = false;
                }
            }
            BulletKind::Enemy => {
                self.draw_rect.y += ENEMY_BULLET_SPEED * dt;
                if self.draw_rect.y > bounds_height + CULL_MARGIN {
                    self.active = false;
                }
            }
        }
        self.collider.update(&self.draw_rect);
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        batch.draw_sprite(self.texture, self.draw_rect, self.source_rect);
    }
}

/// Pool of bullets plus spawn timing for the player-owned instance
pub struct BulletManager {
    pool: Vec<Bullet>,
    owner: BulletKind,
    bounds_height: f32,
    time_to_next_spawn: f32,
    rapid_fire_timer: f32,
}

impl BulletManager {
    /// Player-owned manager: autofires every update cycle
    pub fn new_player(bounds_height: f32) -> Self {
        Self::new(BulletKind::Player, bounds_height)
    }

    /// Enemy-owned manager: spawns only via `fire_enemy_bullet`
    pub fn new_enemy(bounds_height: f32) -> Self {
        Self::new(BulletKind::Enemy, bounds_height)
    }

    fn new(owner: BulletKind, bounds_height: f32) -> Self {
        Self {
            pool: Vec::new(),
            owner,
            bounds_height,
            time_to_next_spawn: 0.0,
            rapid_fire_timer: 0.0,
        }
    }

    /// Shorten the autofire interval and enable the triple shot for
    /// `duration` ms
    pub fn activate_rapid_fire(&mut self, duration: f32) {
        self.rapid_fire_timer = duration;
    }

    pub fn rapid_fire_active(&self) -> bool {
        self.rapid_fire_timer > 0.0
    }

    /// Fire one player volley: a single centered bullet, or three at
    /// fixed offsets while rapid fire is active
    pub fn fire(&mut self, source: &Rect, atlas: &SpriteAtlas) {
        if self.rapid_fire_timer > 0.0 {
            self.spawn_single(source, -TRIPLE_SHOT_OFFSET, atlas);
            self.spawn_single(source, 0.0, atlas);
            self.spawn_single(source, TRIPLE_SHOT_OFFSET, atlas);
        } else {
            self.spawn_single(source, 0.0, atlas);
        }
    }

    /// Spawn one downward bullet from an enemy rect
    pub fn fire_enemy_bullet(&mut self, source: &Rect, atlas: &SpriteAtlas) {
        self.spawn_single(source, 0.0, atlas);
    }

    fn spawn_single(&mut self, source: &Rect, offset_x: f32, atlas: &SpriteAtlas) {
        let slot = match self.pool.iter().position(|b| !b.active) {
            Some(i) => i,
            None => {
                self.pool.push(Bullet::new(atlas, self.owner));
                self.pool.len() - 1
            }
        };
        self.pool[slot].spawn(source, offset_x);
    }

    /// Consume the first active bullet overlapping `target`, if any
    pub fn intersects(&mut self, target: &CircleCollider) -> bool {
        for bullet in self.pool.iter_mut().rev() {
            if bullet.active && bullet.collider.intersects(target) {
                bullet.active = false;
                return true;
            }
        }
        false
    }

    /// Advance autofire timers (player mode) and all active bullets
    pub fn update(
        &mut self,
        dt: f32,
        source: &Rect,
        atlas: &SpriteAtlas,
        events: &mut Vec<GameEvent>,
    ) {
        if self.owner == BulletKind::Player {
            let interval = if self.rapid_fire_timer > 0.0 {
                RAPID_SPAWN_INTERVAL
            } else {
                NORMAL_SPAWN_INTERVAL
            };
            if self.rapid_fire_timer > 0.0 {
                self.rapid_fire_timer -= dt;
            }

            self.time_to_next_spawn += dt;
            if self.time_to_next_spawn > interval {
                self.time_to_next_spawn = 0.0;
                self.fire(source, atlas);
                events.push(GameEvent::PlayerShot);
            }
        }

        for bullet in &mut self.pool {
            if bullet.active {
                bullet.update(dt, self.bounds_height);
            }
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        for bullet in &self.pool {
            if bullet.active {
                bullet.draw(batch);
            }
        }
    }

    #[cfg(test)]
    pub fn pool_len(&self) -> usize {
        self.pool.len()
    }

    #[cfg(test)]
    pub fn active_positions(&self) -> Vec<(f32, f32)> {
        self.pool
            .iter()
            .filter(|b| b.active)
            .map(|b| (b.draw_rect.x, b.draw_rect.y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn atlas() -> SpriteAtlas {
        SpriteAtlas::space_shooter()
    }

    fn player_rect() -> Rect {
        Rect::new(100.0, 800.0, 112.0, 75.0)
    }

    #[test]
    fn test_single_shot_centered() {
        let atlas = atlas();
        let mut bullets = BulletManager::new_player(1000.0);
        bullets.fire(&player_rect(), &atlas);

        let positions = bullets.active_positions();
        assert_eq!(positions.len(), 1);
        // Centered on the player: 100 + 112/2 - 9/2
        assert!((positions[0].0 - 151.5).abs() < 0.001);
        // Bottom flush with the player's top edge
        assert!((positions[0].1 - (800.0 - 54.0)).abs() < 0.001);
    }

    #[test]
    fn test_rapid_fire_triple_shot_offsets() {
        let atlas = atlas();
        let mut bullets = BulletManager::new_player(1000.0);
        bullets.activate_rapid_fire(7000.0);
        bullets.fire(&player_rect(), &atlas);

        let mut xs: Vec<f32> = bullets.active_positions().iter().map(|p| p.0).collect();
        xs.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(xs.len(), 3);
        let center = 151.5;
        assert!((xs[0] - (center - 15.0)).abs() < 0.001);
        assert!((xs[1] - center).abs() < 0.001);
        assert!((xs[2] - (center + 15.0)).abs() < 0.001);
    }

    #[test]
    fn test_rapid_fire_expires() {
        let atlas = atlas();
        let mut events = Vec::new();
        let mut bullets = BulletManager::new_player(1000.0);
        bullets.activate_rapid_fire(500.0);
        assert!(bullets.rapid_fire_active());

        for _ in 0..6 {
            bullets.update(100.0, &player_rect(), &atlas, &mut events);
        }
        assert!(!bullets.rapid_fire_active());
    }

    #[test]
    fn test_pool_reuse_never_exceeds_high_water_mark() {
        let atlas = atlas();
        let rect = player_rect();
        let mut bullets = BulletManager::new_player(1000.0);

        for _ in 0..50 {
            bullets.fire(&rect, &atlas);
            // Deactivate everything: next spawn must reuse slot 0
            for b in &mut bullets.pool {
                b.active = false;
            }
        }
        assert_eq!(bullets.pool_len(), 1);
    }

    #[test]
    fn test_player_bullet_culled_above_screen() {
        let atlas = atlas();
        let mut events = Vec::new();
        let mut bullets = BulletManager::new_player(1000.0);
        bullets.fire(&Rect::new(100.0, 60.0, 112.0, 75.0), &atlas);

        // Starting near the top, 400ms at 0.75 u/ms travels 300 units
        bullets.update(400.0, &player_rect(), &atlas, &mut events);
        // The autofire timer may have spawned a fresh bullet; the
        // original one must be gone
        assert!(bullets
            .active_positions()
            .iter()
            .all(|p| p.1 > -154.0 - 100.0));
    }

    #[test]
    fn test_enemy_bullet_travels_down_and_culls() {
        let atlas = atlas();
        let mut events = Vec::new();
        let mut bullets = BulletManager::new_enemy(500.0);
        let enemy = Rect::new(200.0, 100.0, 93.0, 84.0);
        bullets.fire_enemy_bullet(&enemy, &atlas);

        let y0 = bullets.active_positions()[0].1;
        assert!((y0 - 184.0).abs() < 0.001);

        bullets.update(100.0, &enemy, &atlas, &mut events);
        let y1 = bullets.active_positions()[0].1;
        assert!((y1 - (y0 + 35.0)).abs() < 0.001);
        // No autofire for enemy-owned managers
        assert_eq!(bullets.active_positions().len(), 1);

        // Push it far past the bottom edge
        for _ in 0..20 {
            bullets.update(100.0, &enemy, &atlas, &mut events);
        }
        assert!(bullets.active_positions().is_empty());
    }

    #[test]
    fn test_intersects_consumes_one_bullet() {
        let atlas = atlas();
        let mut bullets = BulletManager::new_player(1000.0);
        bullets.activate_rapid_fire(1000.0);
        bullets.fire(&player_rect(), &atlas);

        let mut target = CircleCollider::default();
        target.update(&Rect::new(100.0, 700.0, 112.0, 75.0));

        assert!(bullets.intersects(&target));
        assert_eq!(bullets.active_positions().len(), 2);
    }

    proptest! {
        #[test]
        fn prop_bullet_motion_frame_rate_independent(steps in 1u32..20) {
            let atlas = atlas();
            let mut events = Vec::new();
            let rect = Rect::new(100.0, 900.0, 112.0, 75.0);

            let mut coarse = BulletManager::new_enemy(10_000.0);
            coarse.fire_enemy_bullet(&rect, &atlas);
            coarse.update(1000.0, &rect, &atlas, &mut events);

            let mut fine = BulletManager::new_enemy(10_000.0);
            fine.fire_enemy_bullet(&rect, &atlas);
            let dt = 1000.0 / steps as f32;
            for _ in 0..steps {
                fine.update(dt, &rect, &atlas, &mut events);
            }

            let a = coarse.active_positions()[0].1;
            let b = fine.active_positions()[0].1;
            prop_assert!((a - b).abs() < 0.01);
        }
    }
}
