mod renderer;
mod transform;

pub use renderer::Renderer;
pub use transform::{tile_to_screen_px, Viewport, TILE_SIZE_PX};
