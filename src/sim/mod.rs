//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must stay pure with
//! respect to the platform:
//! - Timers in milliseconds, integrated by accumulation
//! - Seeded RNG only (one `Pcg32` per world)
//! - No rendering or platform dependencies beyond the draw-recording
//!   and input-snapshot interfaces

pub mod background;
pub mod bullet;
pub mod collider;
pub mod enemy;
pub mod enemy_manager;
pub mod events;
pub mod explosion;
pub mod player;
pub mod powerup;
pub mod rect;
pub mod shield;
pub mod world;

pub use bullet::{BulletKind, BulletManager};
pub use collider::{CircleCollider, EllipticalCollider};
pub use enemy::{Enemy, EnemyBehavior, EnemyKind, MeteorMode};
pub use enemy_manager::EnemyManager;
pub use events::GameEvent;
pub use explosion::ExplosionManager;
pub use player::Player;
pub use powerup::{PowerBoltManager, PowerUpManager};
pub use rect::Rect;
pub use shield::{Shield, ShieldTimers, compose_color};
pub use world::World;
