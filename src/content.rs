//! Sprite atlas registry
//!
//! One registry object built at startup and passed by reference to every
//! consumer; entities copy the rects they need and never mutate shared
//! atlas state. Geometry lives here so the simulation stays free of
//! texture decoding concerns — the platform layer uploads the matching
//! pixel data under the same `TextureId`s.
//!
//! A missing sprite key is a content bug, not a runtime condition: lookup
//! panics with the key name so integration fails loudly instead of the
//! simulation discovering a hole mid-frame.

use std::collections::HashMap;

use crate::sim::Rect;

/// Handle to one of the game's textures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(pub u32);

impl TextureId {
    /// Kenney space-shooter sheet with all ship/laser/power-up sprites
    pub const ATLAS: TextureId = TextureId(0);
    /// 8x3 explosion flipbook
    pub const EXPLOSION: TextureId = TextureId(1);
    /// Tiling starfield
    pub const BACKGROUND: TextureId = TextureId(2);

    pub const COUNT: usize = 3;
}

/// One named atlas entry: natural draw size plus source sub-region
#[derive(Debug, Clone, Copy)]
pub struct AtlasSprite {
    pub texture: TextureId,
    pub draw_rect: Rect,
    pub source_rect: Rect,
}

/// Read-only sprite lookup by string key
pub struct SpriteAtlas {
    sprites: HashMap<&'static str, AtlasSprite>,
    texture_sizes: [(u32, u32); TextureId::COUNT],
}

/// Sheet regions for the sprites the game uses. Draw size equals the
/// source size; entities scale their own copies where needed.
const SHEET: &[(&str, f32, f32, f32, f32)] = &[
    ("playerShip2_green", 112.0, 866.0, 112.0, 75.0),
    ("shield1", 0.0, 412.0, 133.0, 108.0),
    ("laserBlue01", 856.0, 421.0, 9.0, 54.0),
    ("laserRed05", 858.0, 475.0, 9.0, 37.0),
    ("powerupGreen_shield", 776.0, 894.0, 34.0, 33.0),
    ("powerupBlue_bolt", 778.0, 824.0, 34.0, 33.0),
    ("meteorBrown_big1", 224.0, 664.0, 101.0, 84.0),
    ("meteorBrown_big2", 0.0, 520.0, 120.0, 98.0),
    ("meteorBrown_big3", 518.0, 810.0, 89.0, 82.0),
    ("meteorBrown_big4", 327.0, 452.0, 98.0, 96.0),
    ("meteorBrown_med1", 651.0, 447.0, 43.0, 43.0),
    ("meteorBrown_med3", 237.0, 452.0, 45.0, 40.0),
    ("meteorGrey_big1", 425.0, 468.0, 101.0, 84.0),
    ("meteorGrey_big2", 120.0, 527.0, 120.0, 98.0),
    ("meteorGrey_big3", 846.0, 984.0, 89.0, 82.0),
    ("meteorGrey_big4", 620.0, 686.0, 98.0, 96.0),
    ("meteorGrey_med1", 651.0, 490.0, 43.0, 43.0),
    ("meteorGrey_med2", 237.0, 492.0, 45.0, 40.0),
    ("enemyBlack2", 120.0, 604.0, 104.0, 84.0),
    ("enemyBlue1", 425.0, 552.0, 93.0, 84.0),
    ("enemyGreen3", 325.0, 664.0, 103.0, 76.0),
    ("enemyRed4", 520.0, 577.0, 82.0, 84.0),
];

impl SpriteAtlas {
    /// Build the registry for the space-shooter sheet
    pub fn space_shooter() -> Self {
        let mut sprites = HashMap::with_capacity(SHEET.len() + 2);

        for &(name, x, y, w, h) in SHEET {
            sprites.insert(
                name,
                AtlasSprite {
                    texture: TextureId::ATLAS,
                    draw_rect: Rect::new(0.0, 0.0, w, h),
                    source_rect: Rect::new(x, y, w, h),
                },
            );
        }

        // Full-texture entries for the flipbook and background
        sprites.insert(
            "explosion",
            AtlasSprite {
                texture: TextureId::EXPLOSION,
                draw_rect: Rect::new(0.0, 0.0, 64.0, 64.0),
                source_rect: Rect::new(0.0, 0.0, 64.0, 64.0),
            },
        );
        sprites.insert(
            "background",
            AtlasSprite {
                texture: TextureId::BACKGROUND,
                draw_rect: Rect::new(0.0, 0.0, 256.0, 256.0),
                source_rect: Rect::new(0.0, 0.0, 256.0, 256.0),
            },
        );

        Self {
            sprites,
            texture_sizes: [(1024, 1024), (512, 192), (256, 256)],
        }
    }

    /// Look up a sprite by name. Panics on a missing key: content
    /// validation is a load-time responsibility.
    pub fn sprite(&self, name: &str) -> &AtlasSprite {
        match self.sprites.get(name) {
            Some(sprite) => sprite,
            None => panic!("sprite atlas has no entry named '{name}'"),
        }
    }

    /// Pixel dimensions of a texture, for UV mapping
    pub fn texture_size(&self, id: TextureId) -> (u32, u32) {
        self.texture_sizes[id.0 as usize]
    }
}
