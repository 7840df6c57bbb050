//! Events emitted by the simulation for the platform layer
//!
//! The sim never touches audio or the DOM directly; it queues events and
//! the harness drains them after each update (sound triggers are
//! fire-and-forget, so dropping the queue on restart is harmless).

/// One simulation-side occurrence the platform may react to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    /// Player autofire released a volley
    PlayerShot,
    /// Shield absorbed a hit (enemy body or enemy bullet)
    ShieldHit,
    /// An enemy was destroyed by a player bullet
    EnemyExploded,
    /// A power-up capsule or bolt was collected
    PowerUpCollected,
    /// The run ended
    GameOver,
}
