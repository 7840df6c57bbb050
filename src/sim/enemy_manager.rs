//! Enemy orchestration: spawning, fire packs, collision resolution
//!
//! Per-kind pools with free lists; active enemies live in a swap-remove
//! index list so the per-frame loop never walks inactive slots. The
//! collision checks run in fixed priority order and the first match
//! wins, so a single enemy can never both score a kill and end the run
//! in the same frame.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::bullet::BulletManager;
use super::enemy::{Enemy, EnemyKind};
use super::events::GameEvent;
use super::explosion::ExplosionManager;
use super::player::Player;
use crate::content::SpriteAtlas;
use crate::renderer::SpriteBatch;

/// ms between spawn rolls
const SPAWN_INTERVAL: f32 = 1_200.0;

/// Chance that a spawn roll produces a fire pack instead of a meteor
const FIRE_PACK_CHANCE: f64 = 0.3;

/// Enemies below screen bottom plus this margin are culled silently
const CULL_MARGIN: f32 = 200.0;

/// Pack formation spacing between members
const PACK_SPACING: f32 = 80.0;

/// Fixed-capacity-style pool: slots plus a free list of inactive indices
struct EnemyPool {
    slots: Vec<Enemy>,
    free: Vec<usize>,
}

impl EnemyPool {
    fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn release(&mut self, index: usize) {
        self.slots[index].active = false;
        self.free.push(index);
    }
}

/// Owns all enemies and the authoritative game-over flag
pub struct EnemyManager {
    bounds: Vec2,
    time_to_spawn: f32,
    meteors: EnemyPool,
    fires: EnemyPool,
    active: Vec<(EnemyKind, usize)>,
    pub is_game_over: bool,
}

impl EnemyManager {
    pub fn new(bounds: Vec2) -> Self {
        Self {
            bounds,
            time_to_spawn: 0.0,
            meteors: EnemyPool::new(),
            fires: EnemyPool::new(),
            active: Vec::new(),
            is_game_over: false,
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    fn enemy_mut(&mut self, kind: EnemyKind, index: usize) -> &mut Enemy {
        match kind {
            EnemyKind::Meteor => &mut self.meteors.slots[index],
            EnemyKind::Fire => &mut self.fires.slots[index],
        }
    }

    /// Roll the spawn table once the interval has elapsed
    fn spawn_enemies(&mut self, rng: &mut Pcg32, atlas: &SpriteAtlas) {
        if self.time_to_spawn <= SPAWN_INTERVAL {
            return;
        }
        self.time_to_spawn = 0.0;

        if rng.random_bool(FIRE_PACK_CHANCE) {
            // A coherent formation: shared zigzag parameters, members
            // offset vertically and in phase
            let count = rng.random_range(1..=3);
            let frequency = rng.random_range(0.0015..0.0025);
            let amplitude = rng.random_range(80.0..180.0);
            let start_x = rng.random_range(150.0..(self.bounds.x - 150.0));
            let fall_speed = rng.random_range(0.08..0.13);

            let bounds = self.bounds;
            for i in 0..count {
                let slot = match self.fires.free.pop() {
                    Some(recycled) => {
                        self.fires.slots[recycled].reset_as_fire(atlas, rng, bounds);
                        recycled
                    }
                    None => {
                        self.fires.slots.push(Enemy::fire(atlas, rng, bounds));
                        self.fires.slots.len() - 1
                    }
                };
                let group_offset = (i as f32 - (count - 1) as f32 / 2.0) * PACK_SPACING;
                self.fires.slots[slot]
                    .configure_pack(frequency, amplitude, start_x, fall_speed, group_offset);
                self.active.push((EnemyKind::Fire, slot));
            }
        } else {
            let bounds = self.bounds;
            let slot = match self.meteors.free.pop() {
                Some(recycled) => {
                    self.meteors.slots[recycled].reset_as_meteor(atlas, rng, bounds);
                    recycled
                }
                None => {
                    self.meteors.slots.push(Enemy::meteor(atlas, rng, bounds));
                    self.meteors.slots.len() - 1
                }
            };
            self.active.push((EnemyKind::Meteor, slot));
        }
    }

    /// Advance spawning, enemy bullets, all active enemies, and resolve
    /// collisions in priority order.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        dt: f32,
        rng: &mut Pcg32,
        atlas: &SpriteAtlas,
        player: &mut Player,
        player_bullets: &mut BulletManager,
        enemy_bullets: &mut BulletManager,
        explosions: &mut ExplosionManager,
        score: &mut u32,
        events: &mut Vec<GameEvent>,
    ) {
        if self.is_game_over {
            return;
        }

        self.time_to_spawn += dt;
        self.spawn_enemies(rng, atlas);

        // 1. Enemy bullets fly first so a bullet spawned last frame can
        // connect this frame
        let player_rect = player.draw_rect;
        enemy_bullets.update(dt, &player_rect, atlas, events);

        // 2. Enemy bullet vs player
        if enemy_bullets.intersects(&player.circle_collider) {
            if player.shield.active {
                player.shield.on_hit();
                events.push(GameEvent::ShieldHit);
            } else {
                self.is_game_over = true;
                events.push(GameEvent::GameOver);
                return;
            }
        }

        let player_center = player.circle_collider.center;

        // 3. Active enemies, iterated backwards for swap-remove
        let mut i = self.active.len();
        while i > 0 {
            i -= 1;
            let (kind, slot) = self.active[i];
            let bounds = self.bounds;

            let enemy = self.enemy_mut(kind, slot);
            enemy.update(dt, player_center, bounds, enemy_bullets, atlas, rng);

            let shield_active = player.shield.active;
            let enemy_rect = enemy.draw_rect;
            let collider = enemy.circle_collider;

            // Priority order; first match deactivates the enemy
            let mut destroyed = false;

            // A. Shield dome vs enemy body
            if shield_active && player.shield.elliptical_collider.intersects(&collider) {
                explosions.create(enemy_rect);
                player.shield.on_hit();
                events.push(GameEvent::ShieldHit);
                destroyed = true;
            }
            // B. Player body vs enemy body
            else if collider.intersects(&player.circle_collider) {
                explosions.create(enemy_rect);
                if shield_active {
                    player.shield.on_hit();
                    events.push(GameEvent::ShieldHit);
                } else {
                    self.is_game_over = true;
                    events.push(GameEvent::GameOver);
                }
                destroyed = true;
            }
            // C. Player bullets vs enemy body
            else if player_bullets.intersects(&collider) {
                explosions.create(enemy_rect);
                events.push(GameEvent::EnemyExploded);
                *score += 1;
                destroyed = true;
            }
            // D. Bounds cull (includes enemies that deactivated
            // themselves during update): silent, no score, no explosion
            else if enemy_rect.y > bounds.y + CULL_MARGIN || !self.enemy_mut(kind, slot).active
            {
                destroyed = true;
            }

            if destroyed {
                match kind {
                    EnemyKind::Meteor => self.meteors.release(slot),
                    EnemyKind::Fire => self.fires.release(slot),
                }
                self.active.swap_remove(i);
            }
        }
    }

    pub fn draw(&self, batch: &mut SpriteBatch, enemy_bullets: &BulletManager) {
        for &(kind, slot) in &self.active {
            let enemy = match kind {
                EnemyKind::Meteor => &self.meteors.slots[slot],
                EnemyKind::Fire => &self.fires.slots[slot],
            };
            enemy.draw(batch);
        }
        enemy_bullets.draw(batch);
    }

    #[cfg(test)]
    fn force_spawn_meteor(&mut self, rng: &mut Pcg32, atlas: &SpriteAtlas) -> usize {
        let bounds = self.bounds;
        let slot = match self.meteors.free.pop() {
            Some(recycled) => {
                self.meteors.slots[recycled].reset_as_meteor(atlas, rng, bounds);
                recycled
            }
            None => {
                self.meteors.slots.push(Enemy::meteor(atlas, rng, bounds));
                self.meteors.slots.len() - 1
            }
        };
        self.active.push((EnemyKind::Meteor, slot));
        slot
    }

    #[cfg(test)]
    fn meteor_at(&mut self, slot: usize) -> &mut Enemy {
        &mut self.meteors.slots[slot]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::rect::Rect;
    use rand::SeedableRng;

    const BOUNDS: Vec2 = Vec2::new(800.0, 1000.0);

    struct Fixture {
        atlas: SpriteAtlas,
        rng: Pcg32,
        player: Player,
        player_bullets: BulletManager,
        enemy_bullets: BulletManager,
        explosions: ExplosionManager,
        score: u32,
        events: Vec<GameEvent>,
        manager: EnemyManager,
    }

    impl Fixture {
        fn new() -> Self {
            let atlas = SpriteAtlas::space_shooter();
            let mut player = Player::new(&atlas, BOUNDS);
            // Snap the shield onto the player so the ellipse sits where
            // the world loop would put it
            let rect = player.draw_rect;
            player.shield.update(0.0, &rect, false);
            Self {
                atlas,
                rng: Pcg32::seed_from_u64(3),
                player,
                player_bullets: BulletManager::new_player(BOUNDS.y),
                enemy_bullets: BulletManager::new_enemy(BOUNDS.y),
                explosions: ExplosionManager::new(),
                score: 0,
                events: Vec::new(),
                manager: EnemyManager::new(BOUNDS),
            }
        }

        fn update(&mut self, dt: f32) {
            self.manager.update(
                dt,
                &mut self.rng,
                &self.atlas,
                &mut self.player,
                &mut self.player_bullets,
                &mut self.enemy_bullets,
                &mut self.explosions,
                &mut self.score,
                &mut self.events,
            );
        }

        /// Park an active meteor exactly on the player's center
        fn meteor_on_player(&mut self) -> usize {
            let slot = self
                .manager
                .force_spawn_meteor(&mut self.rng, &self.atlas);
            let center = self.player.circle_collider.center;
            let e = self.manager.meteor_at(slot);
            e.draw_rect.x = center.x - e.draw_rect.width / 2.0;
            e.draw_rect.y = center.y - e.draw_rect.height / 2.0;
            e.circle_collider.update(&e.draw_rect);
            slot
        }
    }

    #[test]
    fn test_spawn_interval_gates_spawning() {
        let mut f = Fixture::new();
        f.update(1_000.0);
        assert_eq!(f.manager.active_count(), 0);

        f.update(300.0);
        assert!(f.manager.active_count() >= 1);
    }

    #[test]
    fn test_shield_takes_priority_over_lethal_collision() {
        let mut f = Fixture::new();
        f.player.shield.activate();
        f.meteor_on_player();

        // The meteor overlaps both the shield ellipse and the player
        // circle; the shield path must win
        f.update(0.0);

        assert!(!f.manager.is_game_over);
        assert_eq!(f.manager.active_count(), 0);
        assert!(f.events.contains(&GameEvent::ShieldHit));
        assert!(!f.events.contains(&GameEvent::GameOver));
        assert_eq!(f.score, 0);
        assert_eq!(f.explosions.active_count(), 1);
    }

    #[test]
    fn test_unshielded_body_collision_ends_run() {
        let mut f = Fixture::new();
        f.meteor_on_player();
        f.update(0.0);

        assert!(f.manager.is_game_over);
        assert!(f.events.contains(&GameEvent::GameOver));
    }

    #[test]
    fn test_bullet_kill_awards_point() {
        let mut f = Fixture::new();
        let slot = f.manager.force_spawn_meteor(&mut f.rng, &f.atlas);
        {
            let e = f.manager.meteor_at(slot);
            e.draw_rect.x = 400.0;
            e.draw_rect.y = 300.0;
            e.circle_collider.update(&e.draw_rect);
        }

        // Place a player bullet inside the meteor
        f.player_bullets
            .fire(&Rect::new(400.0, 360.0, 30.0, 30.0), &f.atlas);

        f.update(0.0);

        assert_eq!(f.score, 1);
        assert_eq!(f.manager.active_count(), 0);
        assert!(f.events.contains(&GameEvent::EnemyExploded));
        assert!(!f.manager.is_game_over);
    }

    #[test]
    fn test_bounds_cull_is_silent() {
        let mut f = Fixture::new();
        let slot = f.manager.force_spawn_meteor(&mut f.rng, &f.atlas);
        {
            let e = f.manager.meteor_at(slot);
            e.draw_rect.x = 400.0;
            e.draw_rect.y = BOUNDS.y + CULL_MARGIN + 1.0;
            e.circle_collider.update(&e.draw_rect);
        }

        f.update(0.0);

        assert_eq!(f.manager.active_count(), 0);
        assert_eq!(f.score, 0);
        assert_eq!(f.explosions.active_count(), 0);
        assert!(!f.manager.is_game_over);
    }

    #[test]
    fn test_shield_absorbs_enemy_bullet() {
        let mut f = Fixture::new();
        f.player.shield.activate();
        // Shoot from just above the player so the bullet lands inside
        // the player circle immediately
        let above = Rect::new(
            f.player.draw_rect.x,
            f.player.draw_rect.y - 40.0,
            f.player.draw_rect.width,
            2.0,
        );
        f.enemy_bullets.fire_enemy_bullet(&above, &f.atlas);

        f.update(16.0);

        assert!(!f.manager.is_game_over);
        assert!(f.events.contains(&GameEvent::ShieldHit));
    }

    #[test]
    fn test_enemy_bullet_without_shield_ends_run() {
        let mut f = Fixture::new();
        let above = Rect::new(
            f.player.draw_rect.x,
            f.player.draw_rect.y - 40.0,
            f.player.draw_rect.width,
            2.0,
        );
        f.enemy_bullets.fire_enemy_bullet(&above, &f.atlas);

        f.update(16.0);

        assert!(f.manager.is_game_over);
        // Once over, nothing advances
        let before = f.manager.active_count();
        f.update(5_000.0);
        assert_eq!(f.manager.active_count(), before);
    }

    #[test]
    fn test_pool_high_water_mark() {
        let mut f = Fixture::new();
        for _ in 0..30 {
            let slot = f.manager.force_spawn_meteor(&mut f.rng, &f.atlas);
            {
                let e = f.manager.meteor_at(slot);
                e.draw_rect.y = BOUNDS.y + CULL_MARGIN + 1.0;
            }
            f.update(0.0);
        }
        // One enemy alive at a time: the pool never grows past one slot
        assert_eq!(f.manager.meteors.slots.len(), 1);
    }

    #[test]
    fn test_fire_pack_spawns_share_formation() {
        let mut f = Fixture::new();
        // Park the player far off-field so stray enemy bullets cannot
        // end the run mid-test
        f.player.draw_rect.x = -5_000.0;
        let rect = f.player.draw_rect;
        f.player.circle_collider.update(&rect);
        f.player.shield.update(0.0, &rect, false);

        // Keep rolling spawn windows until a pack appears
        for _ in 0..200 {
            f.update(1_300.0);
            if f.manager.active_count() >= 2 {
                break;
            }
            // Clear singles so the count check stays unambiguous
            let mut i = f.manager.active.len();
            while i > 0 {
                i -= 1;
                let (kind, slot) = f.manager.active[i];
                match kind {
                    EnemyKind::Meteor => f.manager.meteors.release(slot),
                    EnemyKind::Fire => f.manager.fires.release(slot),
                }
                f.manager.active.swap_remove(i);
            }
        }
        assert!(
            f.manager.active_count() >= 2,
            "no fire pack within 200 spawn rolls"
        );

        let members: Vec<&Enemy> = f
            .manager
            .active
            .iter()
            .map(|&(_, slot)| &f.manager.fires.slots[slot])
            .collect();
        let params: Vec<(f32, f32, f32)> = members
            .iter()
            .map(|e| match e.behavior {
                crate::sim::enemy::EnemyBehavior::Fire {
                    amplitude,
                    frequency,
                    start_x,
                    ..
                } => (amplitude, frequency, start_x),
                _ => panic!("pack member is not a fire enemy"),
            })
            .collect();
        assert!(params.windows(2).all(|w| w[0] == w[1]));
    }
}
