//! WebGPU sprite rendering
//!
//! The simulation records textured quads into a `SpriteBatch`; the
//! `SpriteRenderState` turns the batch into vertex data and draw calls,
//! one batch break per texture change, preserving submission order.

pub mod batch;
pub mod pipeline;
pub mod vertex;

pub use batch::{SpriteBatch, SpriteQuad};
pub use pipeline::SpriteRenderState;
pub use vertex::{Color, SpriteVertex};
