use crate::app::scene::Vec2;

/// Logical framebuffer resolution: one map tile is this many pixels.
pub const TILE_SIZE_PX: u32 = 20;

#[derive(Debug, Clone, Copy)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Framebuffer sized to show a whole map of the given tile dimensions.
    pub fn for_map(width_tiles: u32, height_tiles: u32) -> Self {
        Self {
            width: width_tiles * TILE_SIZE_PX,
            height: height_tiles * TILE_SIZE_PX,
        }
    }
}

/// Tile coordinates to framebuffer pixels. The map origin is the top-left
/// corner; y grows downward in both spaces.
pub fn tile_to_screen_px(world: Vec2) -> (i32, i32) {
    let x = (world.x * TILE_SIZE_PX as f32).round() as i32;
    let y = (world.y * TILE_SIZE_PX as f32).round() as i32;
    (x, y)
}
