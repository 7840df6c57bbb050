//! Falling power-ups: shield capsules and rapid-fire bolts
//!
//! Both kinds share the drop behavior (random fall speed, pulsing glow,
//! cull below the screen) and differ only in spawn cadence and the buff
//! applied on pickup. Managers are pooled like every other entity class.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::bullet::BulletManager;
use super::collider::CircleCollider;
use super::events::GameEvent;
use super::player::Player;
use super::rect::Rect;
use crate::content::{SpriteAtlas, TextureId};
use crate::renderer::{Color, SpriteBatch};

/// Fall speed range, units per ms
const FALL_SPEED_MIN: f32 = 0.15;
const FALL_SPEED_MAX: f32 = 0.25;

/// Shield capsules drop every 5-15 seconds
const SHIELD_SPAWN_MIN: f32 = 5_000.0;
const SHIELD_SPAWN_MAX: f32 = 15_000.0;

/// Bolts are rarer: every 10-20 seconds
const BOLT_SPAWN_MIN: f32 = 10_000.0;
const BOLT_SPAWN_MAX: f32 = 20_000.0;

/// Rapid fire granted per bolt, ms
const RAPID_FIRE_DURATION: f32 = 7_000.0;

/// Glow pulse rate, radians per ms of alive time
const PULSE_RATE: f32 = 0.005;

const SHIELD_SPRITE: &str = "powerupGreen_shield";
const BOLT_SPRITE: &str = "powerupBlue_bolt";

/// Pooled falling pickup
pub struct PowerUp {
    pub active: bool,
    pub draw_rect: Rect,
    pub collider: CircleCollider,
    source_rect: Rect,
    texture: TextureId,
    speed: f32,
    alive_time: f32,
}

impl PowerUp {
    fn new(atlas: &SpriteAtlas, sprite: &str) -> Self {
        let def = atlas.sprite(sprite);
        Self {
            active: false,
            draw_rect: def.draw_rect,
            collider: CircleCollider::default(),
            source_rect: def.source_rect,
            texture: def.texture,
            speed: FALL_SPEED_MIN,
            alive_time: 0.0,
        }
    }

    /// Drop from a random x along the top edge with a fresh speed roll
    fn spawn(&mut self, rng: &mut Pcg32, bounds_width: f32) {
        self.active = true;
        self.alive_time = 0.0;
        self.speed = rng.random_range(FALL_SPEED_MIN..FALL_SPEED_MAX);
        self.draw_rect.x = rng.random_range(0.0..(bounds_width - self.draw_rect.width));
        self.draw_rect.y = -self.draw_rect.height;
        self.collider.update(&self.draw_rect);
    }

    fn update(&mut self, dt: f32, bounds_height: f32) {
        self.alive_time += dt;
        self.draw_rect.y += self.speed * dt;
        self.collider.update(&self.draw_rect);

        if self.draw_rect.y > bounds_height {
            self.active = false;
        }
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        // Pulse toward white so the pickup reads as "glowing"
        let pulse = ((self.alive_time * PULSE_RATE).sin() + 1.0) / 2.0;
        let tint = Color::new(1.0, 0.7 + 0.3 * pulse, 0.7 + 0.3 * pulse);
        batch.draw_sprite_source(
            self.texture,
            self.draw_rect,
            self.source_rect,
            tint,
            0.0,
            Vec2::new(0.5, 0.5),
        );
    }
}

/// Shared pool + spawn-window logic for both managers
struct DropPool {
    pool: Vec<PowerUp>,
    sprite: &'static str,
    spawn_timer: f32,
    next_spawn_time: f32,
    spawn_min: f32,
    spawn_max: f32,
    bounds_width: f32,
    bounds_height: f32,
}

impl DropPool {
    fn new(
        sprite: &'static str,
        spawn_min: f32,
        spawn_max: f32,
        bounds_width: f32,
        bounds_height: f32,
        rng: &mut Pcg32,
    ) -> Self {
        let mut pool = Self {
            pool: Vec::new(),
            sprite,
            spawn_timer: 0.0,
            next_spawn_time: 0.0,
            spawn_min,
            spawn_max,
            bounds_width,
            bounds_height,
        };
        pool.roll_next_spawn(rng);
        pool
    }

    fn roll_next_spawn(&mut self, rng: &mut Pcg32) {
        self.next_spawn_time = rng.random_range(self.spawn_min..self.spawn_max);
        self.spawn_timer = 0.0;
    }

    /// Advance the spawn window and all active drops; returns true when
    /// the first active drop overlapping `player` was collected.
    fn update(
        &mut self,
        dt: f32,
        rng: &mut Pcg32,
        atlas: &SpriteAtlas,
        player: &CircleCollider,
    ) -> bool {
        self.spawn_timer += dt;
        if self.spawn_timer >= self.next_spawn_time {
            let slot = match self.pool.iter().position(|p| !p.active) {
                Some(i) => i,
                None => {
                    self.pool.push(PowerUp::new(atlas, self.sprite));
                    self.pool.len() - 1
                }
            };
            self.pool[slot].spawn(rng, self.bounds_width);
            self.roll_next_spawn(rng);
        }

        let mut collected = false;
        for drop in &mut self.pool {
            if !drop.active {
                continue;
            }
            drop.update(dt, self.bounds_height);

            if !collected && drop.active && drop.collider.intersects(player) {
                drop.active = false;
                collected = true;
            }
        }
        collected
    }

    fn draw(&self, batch: &mut SpriteBatch) {
        for drop in &self.pool {
            if drop.active {
                drop.draw(batch);
            }
        }
    }
}

/// Drops shield capsules; collection raises the player's shield
pub struct PowerUpManager {
    drops: DropPool,
}

impl PowerUpManager {
    pub fn new(bounds_width: f32, bounds_height: f32, rng: &mut Pcg32) -> Self {
        Self {
            drops: DropPool::new(
                SHIELD_SPRITE,
                SHIELD_SPAWN_MIN,
                SHIELD_SPAWN_MAX,
                bounds_width,
                bounds_height,
                rng,
            ),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut Pcg32,
        atlas: &SpriteAtlas,
        player: &mut Player,
        events: &mut Vec<GameEvent>,
    ) {
        if self
            .drops
            .update(dt, rng, atlas, &player.circle_collider)
        {
            player.shield.activate();
            events.push(GameEvent::PowerUpCollected);
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        self.drops.draw(batch);
    }
}

/// Drops rapid-fire bolts; collection buffs the player's bullet manager
pub struct PowerBoltManager {
    drops: DropPool,
}

impl PowerBoltManager {
    pub fn new(bounds_width: f32, bounds_height: f32, rng: &mut Pcg32) -> Self {
        Self {
            drops: DropPool::new(
                BOLT_SPRITE,
                BOLT_SPAWN_MIN,
                BOLT_SPAWN_MAX,
                bounds_width,
                bounds_height,
                rng,
            ),
        }
    }

    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut Pcg32,
        atlas: &SpriteAtlas,
        player: &CircleCollider,
        player_bullets: &mut BulletManager,
        events: &mut Vec<GameEvent>,
    ) {
        if self.drops.update(dt, rng, atlas, player) {
            player_bullets.activate_rapid_fire(RAPID_FIRE_DURATION);
            events.push(GameEvent::PowerUpCollected);
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        self.drops.draw(batch);
    }
}
