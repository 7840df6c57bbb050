//! Enemy entities: falling meteors and zigzagging fire ships
//!
//! Both variants share the pooled-entity surface (active flag, draw
//! rect, circle collider, danger tint) and differ in a behavior sum
//! type dispatched by `match` — no downcasting, and pools stay
//! partitioned by kind.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::bullet::BulletManager;
use super::collider::CircleCollider;
use super::rect::Rect;
use crate::content::{SpriteAtlas, TextureId};
use crate::renderer::{Color, SpriteBatch};

const METEOR_SPRITES: [&str; 12] = [
    "meteorBrown_big1",
    "meteorBrown_big2",
    "meteorBrown_big3",
    "meteorBrown_big4",
    "meteorBrown_med1",
    "meteorBrown_med3",
    "meteorGrey_big1",
    "meteorGrey_big2",
    "meteorGrey_big3",
    "meteorGrey_big4",
    "meteorGrey_med1",
    "meteorGrey_med2",
];

const FIRE_SPRITES: [&str; 4] = ["enemyBlack2", "enemyBlue1", "enemyGreen3", "enemyRed4"];

/// Meteor fall speed range, units per ms
const METEOR_MIN_SPEED: f32 = 0.05;
const METEOR_MAX_SPEED: f32 = 0.25;

/// Fire ship fall speed range
const FIRE_MIN_SPEED: f32 = 0.08;
const FIRE_MAX_SPEED: f32 = 0.15;

/// Meteors switch to attack inside this distance to the player. No
/// hysteresis: an enemy sitting at the boundary may oscillate between
/// modes, which is accepted jitter.
pub const ATTACK_RANGE: f32 = 220.0;

/// Attack-mode acceleration toward the player, units per ms^2
const ATTACK_ACCEL: f32 = 0.0006;

/// Wander drift is re-rolled on this interval, ms
const DRIFT_INTERVAL_MIN: f32 = 800.0;
const DRIFT_INTERVAL_MAX: f32 = 2_000.0;

/// Horizontal drift speed range, units per ms
const DRIFT_SPEED: f32 = 0.08;

/// Meteors despawn this far outside bounds in any direction
const METEOR_CULL_MARGIN: f32 = 400.0;

/// Fire ships despawn this far below the screen
const FIRE_CULL_MARGIN: f32 = 200.0;

/// Fire ship shot cadence, ms
const SHOOT_INTERVAL: f32 = 1_500.0;

/// Default zigzag shape (pack spawns override these)
const ZIGZAG_AMPLITUDE: f32 = 150.0;
const ZIGZAG_FREQUENCY: f32 = 0.002;

/// Danger tint logistic steepness (per unit of distance)
const TINT_STEEPNESS: f32 = 0.005;

/// Exponential smoothing factor per update for the danger tint
const TINT_SMOOTHING: f32 = 0.1;

/// Discriminant used to partition pools
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyKind {
    Meteor,
    Fire,
}

/// Meteor AI mode, switched purely by distance each frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeteorMode {
    Wander,
    Attack,
}

/// Variant-specific state
#[derive(Debug, Clone)]
pub enum EnemyBehavior {
    Meteor {
        mode: MeteorMode,
        fall_speed: f32,
        drift: f32,
        drift_timer: f32,
        drift_interval: f32,
        /// Velocity accumulated while homing in attack mode
        velocity: Vec2,
    },
    Fire {
        total_time: f32,
        amplitude: f32,
        frequency: f32,
        start_x: f32,
        group_offset: f32,
        fall_speed: f32,
        shoot_timer: f32,
    },
}

/// Pooled enemy
pub struct Enemy {
    pub active: bool,
    pub draw_rect: Rect,
    pub circle_collider: CircleCollider,
    /// Proximity warning level, 0 (calm) to 1 (on top of the player)
    pub reddish_scale: f32,
    pub behavior: EnemyBehavior,
    source_rect: Rect,
    texture: TextureId,
    rotation: f32,
    rotation_speed: f32,
    danger_distance: f32,
}

impl Enemy {
    /// Fresh meteor at a random x along the top edge
    pub fn meteor(atlas: &SpriteAtlas, rng: &mut Pcg32, bounds: Vec2) -> Self {
        let mut enemy = Self::empty();
        enemy.reset_as_meteor(atlas, rng, bounds);
        enemy
    }

    /// Fresh fire ship; packs reposition it via `configure_pack`
    pub fn fire(atlas: &SpriteAtlas, rng: &mut Pcg32, bounds: Vec2) -> Self {
        let mut enemy = Self::empty();
        enemy.reset_as_fire(atlas, rng, bounds);
        enemy
    }

    fn empty() -> Self {
        Self {
            active: false,
            draw_rect: Rect::default(),
            circle_collider: CircleCollider::default(),
            reddish_scale: 0.0,
            behavior: EnemyBehavior::Meteor {
                mode: MeteorMode::Wander,
                fall_speed: METEOR_MIN_SPEED,
                drift: 0.0,
                drift_timer: 0.0,
                drift_interval: DRIFT_INTERVAL_MIN,
                velocity: Vec2::ZERO,
            },
            source_rect: Rect::default(),
            texture: TextureId::ATLAS,
            rotation: 0.0,
            rotation_speed: 0.0,
            danger_distance: 0.0,
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            EnemyBehavior::Meteor { .. } => EnemyKind::Meteor,
            EnemyBehavior::Fire { .. } => EnemyKind::Fire,
        }
    }

    /// Re-roll everything for a recycled meteor slot
    pub fn reset_as_meteor(&mut self, atlas: &SpriteAtlas, rng: &mut Pcg32, bounds: Vec2) {
        let sprite = atlas.sprite(METEOR_SPRITES[rng.random_range(0..METEOR_SPRITES.len())]);
        self.texture = sprite.texture;
        self.source_rect = sprite.source_rect;
        self.draw_rect = sprite.draw_rect;

        self.draw_rect.x = rng.random_range(0.0..(bounds.x - self.draw_rect.width));
        self.draw_rect.y = -self.draw_rect.height;

        self.rotation = 0.0;
        self.rotation_speed = (rng.random::<f32>() - 0.5) * 0.005;
        self.reddish_scale = 0.0;
        self.danger_distance = bounds.y * 0.5;

        self.behavior = EnemyBehavior::Meteor {
            mode: MeteorMode::Wander,
            fall_speed: rng.random_range(METEOR_MIN_SPEED..METEOR_MAX_SPEED),
            drift: rng.random_range(-DRIFT_SPEED..DRIFT_SPEED),
            drift_timer: 0.0,
            drift_interval: rng.random_range(DRIFT_INTERVAL_MIN..DRIFT_INTERVAL_MAX),
            velocity: Vec2::ZERO,
        };

        self.active = true;
        self.circle_collider.update(&self.draw_rect);
    }

    /// Re-roll everything for a recycled fire slot
    pub fn reset_as_fire(&mut self, atlas: &SpriteAtlas, rng: &mut Pcg32, bounds: Vec2) {
        let sprite = atlas.sprite(FIRE_SPRITES[rng.random_range(0..FIRE_SPRITES.len())]);
        self.texture = sprite.texture;
        self.source_rect = sprite.source_rect;
        self.draw_rect = sprite.draw_rect;

        let scale = rng.random_range(0.5..1.0);
        self.draw_rect.width *= scale;
        self.draw_rect.height *= scale;

        let start_x = rng.random_range(0.0..(bounds.x - self.draw_rect.width));
        self.draw_rect.x = start_x;
        self.draw_rect.y = -self.draw_rect.height;

        self.rotation = 0.0;
        self.rotation_speed = 0.0;
        self.reddish_scale = 0.0;
        self.danger_distance = bounds.y * 0.5;

        self.behavior = EnemyBehavior::Fire {
            total_time: 0.0,
            amplitude: ZIGZAG_AMPLITUDE,
            frequency: ZIGZAG_FREQUENCY,
            start_x,
            group_offset: 0.0,
            fall_speed: rng.random_range(FIRE_MIN_SPEED..FIRE_MAX_SPEED),
            // Random initial phase so pack members never volley in sync
            shoot_timer: rng.random_range(0.0..1_000.0),
        };

        self.active = true;
        self.circle_collider.update(&self.draw_rect);
    }

    /// Apply shared formation parameters to a pack member
    pub fn configure_pack(
        &mut self,
        frequency: f32,
        amplitude: f32,
        start_x: f32,
        fall_speed: f32,
        group_offset: f32,
    ) {
        if let EnemyBehavior::Fire {
            total_time,
            amplitude: amp,
            frequency: freq,
            start_x: sx,
            group_offset: off,
            fall_speed: speed,
            ..
        } = &mut self.behavior
        {
            *total_time = 0.0;
            *amp = amplitude;
            *freq = frequency;
            *sx = start_x;
            *off = group_offset;
            *speed = fall_speed;
        }
        self.draw_rect.y = -self.draw_rect.height - group_offset.abs();
    }

    /// Advance one frame. Fire ships may emit bullets into
    /// `enemy_bullets`.
    pub fn update(
        &mut self,
        dt: f32,
        player_center: Vec2,
        bounds: Vec2,
        enemy_bullets: &mut BulletManager,
        atlas: &SpriteAtlas,
        rng: &mut Pcg32,
    ) {
        match &mut self.behavior {
            EnemyBehavior::Meteor {
                mode,
                fall_speed,
                drift,
                drift_timer,
                drift_interval,
                velocity,
            } => {
                let center = self.draw_rect.center();
                let distance = center.distance(player_center);

                // Pure distance threshold, re-evaluated every frame
                *mode = if distance < ATTACK_RANGE {
                    MeteorMode::Attack
                } else {
                    MeteorMode::Wander
                };

                match mode {
                    MeteorMode::Wander => {
                        *drift_timer += dt;
                        if *drift_timer >= *drift_interval {
                            *drift_timer = 0.0;
                            *drift_interval =
                                rng.random_range(DRIFT_INTERVAL_MIN..DRIFT_INTERVAL_MAX);
                            *drift = rng.random_range(-DRIFT_SPEED..DRIFT_SPEED);
                        }
                        *velocity = Vec2::ZERO;
                        self.draw_rect.y += *fall_speed * dt;
                        self.draw_rect.x += *drift * dt;
                    }
                    MeteorMode::Attack => {
                        let to_player = (player_center - center).normalize_or_zero();
                        *velocity += to_player * ATTACK_ACCEL * dt;
                        self.draw_rect.x += velocity.x * dt;
                        self.draw_rect.y += velocity.y * dt;
                    }
                }

                if self.draw_rect.x < -METEOR_CULL_MARGIN
                    || self.draw_rect.x > bounds.x + METEOR_CULL_MARGIN
                    || self.draw_rect.y < -METEOR_CULL_MARGIN
                    || self.draw_rect.y > bounds.y + METEOR_CULL_MARGIN
                {
                    self.active = false;
                }
            }
            EnemyBehavior::Fire {
                total_time,
                amplitude,
                frequency,
                start_x,
                group_offset,
                fall_speed,
                shoot_timer,
            } => {
                *total_time += dt;

                self.draw_rect.y += *fall_speed * dt;
                let center_line = *start_x + *group_offset;
                self.draw_rect.x = center_line + (*total_time * *frequency).sin() * *amplitude;

                *shoot_timer += dt;
                if *shoot_timer >= SHOOT_INTERVAL {
                    *shoot_timer = 0.0;
                    enemy_bullets.fire_enemy_bullet(&self.draw_rect, atlas);
                }

                if self.draw_rect.y > bounds.y + FIRE_CULL_MARGIN {
                    self.active = false;
                }
            }
        }

        self.rotation += self.rotation_speed * dt;
        self.circle_collider.update(&self.draw_rect);

        // Danger tint: logistic in distance, smoothed so the warning
        // eases in and out
        let distance = self.draw_rect.center().distance(player_center);
        let target = 1.0 / (1.0 + (TINT_STEEPNESS * (distance - self.danger_distance)).exp());
        self.reddish_scale += (target - self.reddish_scale) * TINT_SMOOTHING;
    }

    pub fn draw(&self, batch: &mut SpriteBatch) {
        let tint = Color::new(1.0, 1.0 - self.reddish_scale, 1.0 - self.reddish_scale);
        batch.draw_sprite_source(
            self.texture,
            self.draw_rect,
            self.source_rect,
            tint,
            self.rotation,
            Vec2::new(0.5, 0.5),
        );
    }
}
