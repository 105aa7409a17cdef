use std::f32::consts::TAU;
use std::sync::Arc;

use pixels::{Error, Pixels, SurfaceTexture};
use winit::window::Window;

use crate::app::animation::ANIMATION_FRAME_COUNT;
use crate::app::scene::{EntityKind, NpcKind, Scene, TerrainKind, Vec2};
use crate::app::sim::TickSnapshot;
use crate::app::Direction;

use super::transform::{tile_to_screen_px, Viewport, TILE_SIZE_PX};

const TERRAIN_GRASS_COLOR: [u8; 4] = [88, 160, 88, 255];
const TERRAIN_FLOOR_COLOR: [u8; 4] = [196, 164, 120, 255];
const TERRAIN_WATER_COLOR: [u8; 4] = [64, 112, 200, 255];
const TERRAIN_FOREST_COLOR: [u8; 4] = [40, 96, 48, 255];

const BUILDING_WALL_COLOR: [u8; 4] = [188, 140, 100, 255];
const BUILDING_ROOF_COLOR: [u8; 4] = [168, 64, 56, 255];
const BUILDING_OUTLINE_COLOR: [u8; 4] = [72, 48, 36, 255];
const ROOF_BAND_TILES: f32 = 2.0;

const TREE_COLOR: [u8; 4] = [32, 112, 48, 255];
const FENCE_COLOR: [u8; 4] = [140, 108, 64, 255];
const SIGN_COLOR: [u8; 4] = [212, 188, 120, 255];
const DOOR_COLOR: [u8; 4] = [96, 60, 36, 255];
const BED_COLOR: [u8; 4] = [200, 80, 88, 255];
const TABLE_COLOR: [u8; 4] = [156, 116, 72, 255];
const CHAIR_COLOR: [u8; 4] = [172, 136, 92, 255];
const SHELF_COLOR: [u8; 4] = [120, 88, 56, 255];

const NPC_OAK_COLOR: [u8; 4] = [224, 224, 224, 255];
const NPC_MOM_COLOR: [u8; 4] = [224, 144, 168, 255];
const NPC_RIVAL_COLOR: [u8; 4] = [96, 96, 160, 255];

const PLAYER_BODY_COLOR: [u8; 4] = [220, 56, 56, 255];
const PLAYER_FACING_COLOR: [u8; 4] = [255, 224, 160, 255];
const PLAYER_LEG_COLOR: [u8; 4] = [48, 48, 96, 255];

const PLAYER_INSET_PX: i32 = 3;
const FACING_NOTCH_PX: i32 = 4;
const LEG_WIDTH_PX: i32 = 4;
const LEG_HEIGHT_PX: i32 = 5;
const STRIDE_AMPLITUDE_PX: f32 = 2.0;

/// Flat-color framebuffer renderer. The logical resolution covers the
/// whole map at [`TILE_SIZE_PX`]; pixels scales it to the window.
pub struct Renderer {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    buffer: Viewport,
}

impl Renderer {
    pub fn new(window: Arc<Window>, buffer: Viewport) -> Result<Self, Error> {
        let size = window.inner_size();
        let pixels = Self::build_pixels(Arc::clone(&window), size.width, size.height, buffer)?;
        Ok(Self {
            window,
            pixels,
            buffer,
        })
    }

    pub fn resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.pixels = Self::build_pixels(Arc::clone(&self.window), width, height, self.buffer)?;
        Ok(())
    }

    fn build_pixels(
        window: Arc<Window>,
        surface_width: u32,
        surface_height: u32,
        buffer: Viewport,
    ) -> Result<Pixels<'static>, Error> {
        let surface = SurfaceTexture::new(surface_width, surface_height, window);
        Pixels::new(buffer.width, buffer.height, surface)
    }

    pub fn render_scene(&mut self, scene: &Scene, snapshot: &TickSnapshot) -> Result<(), Error> {
        let buffer = self.buffer;
        let frame = self.pixels.frame_mut();

        draw_terrain(frame, buffer, scene);
        draw_buildings(frame, buffer, scene);
        draw_objects(frame, buffer, scene);
        draw_npcs(frame, buffer, scene);
        draw_player(frame, buffer, snapshot);

        self.pixels.render()
    }
}

fn draw_terrain(frame: &mut [u8], buffer: Viewport, scene: &Scene) {
    for y in 0..scene.height() as i64 {
        for x in 0..scene.width() as i64 {
            let color = terrain_color(scene.terrain.kind_at(x, y));
            fill_rect_px(
                frame,
                buffer,
                x as i32 * TILE_SIZE_PX as i32,
                y as i32 * TILE_SIZE_PX as i32,
                TILE_SIZE_PX as i32,
                TILE_SIZE_PX as i32,
                color,
            );
        }
    }
}

fn draw_buildings(frame: &mut [u8], buffer: Viewport, scene: &Scene) {
    for building in &scene.buildings {
        fill_tile_rect(frame, buffer, building.origin, building.size, BUILDING_WALL_COLOR);
        let roof_tiles = ROOF_BAND_TILES.min(building.size.y);
        fill_tile_rect(
            frame,
            buffer,
            building.origin,
            Vec2 {
                x: building.size.x,
                y: roof_tiles,
            },
            BUILDING_ROOF_COLOR,
        );
        outline_tile_rect(frame, buffer, building.origin, building.size, BUILDING_OUTLINE_COLOR);
    }
}

fn draw_objects(frame: &mut [u8], buffer: Viewport, scene: &Scene) {
    for object in &scene.objects {
        fill_tile_rect(frame, buffer, object.origin, object.size, object_color(object.kind));
    }
}

fn draw_npcs(frame: &mut [u8], buffer: Viewport, scene: &Scene) {
    for npc in &scene.npcs {
        let (left, top) = tile_to_screen_px(npc.position);
        fill_rect_px(
            frame,
            buffer,
            left + PLAYER_INSET_PX,
            top + PLAYER_INSET_PX,
            TILE_SIZE_PX as i32 - 2 * PLAYER_INSET_PX,
            TILE_SIZE_PX as i32 - 2 * PLAYER_INSET_PX,
            npc_color(npc.kind),
        );
    }
}

fn draw_player(frame: &mut [u8], buffer: Viewport, snapshot: &TickSnapshot) {
    let (left, top) = tile_to_screen_px(snapshot.position);
    let tile = TILE_SIZE_PX as i32;
    let body_left = left + PLAYER_INSET_PX;
    let body_top = top + PLAYER_INSET_PX;
    let body_size = tile - 2 * PLAYER_INSET_PX;
    fill_rect_px(frame, buffer, body_left, body_top, body_size, body_size, PLAYER_BODY_COLOR);

    // Facing notch on the leading edge of the body.
    let (notch_left, notch_top, notch_w, notch_h) = match snapshot.direction {
        Direction::Up => (body_left, body_top, body_size, FACING_NOTCH_PX),
        Direction::Down => (
            body_left,
            body_top + body_size - FACING_NOTCH_PX,
            body_size,
            FACING_NOTCH_PX,
        ),
        Direction::Left => (body_left, body_top, FACING_NOTCH_PX, body_size),
        Direction::Right => (
            body_left + body_size - FACING_NOTCH_PX,
            body_top,
            FACING_NOTCH_PX,
            body_size,
        ),
    };
    fill_rect_px(frame, buffer, notch_left, notch_top, notch_w, notch_h, PLAYER_FACING_COLOR);

    // Legs swing in opposition along the stride waveform.
    let swing = stride_swing_px(snapshot.animation_frame, snapshot.is_moving);
    let legs_top = top + tile - LEG_HEIGHT_PX;
    fill_rect_px(
        frame,
        buffer,
        body_left + 1,
        legs_top + swing,
        LEG_WIDTH_PX,
        LEG_HEIGHT_PX,
        PLAYER_LEG_COLOR,
    );
    fill_rect_px(
        frame,
        buffer,
        body_left + body_size - LEG_WIDTH_PX - 1,
        legs_top - swing,
        LEG_WIDTH_PX,
        LEG_HEIGHT_PX,
        PLAYER_LEG_COLOR,
    );
}

fn terrain_color(kind: TerrainKind) -> [u8; 4] {
    match kind {
        TerrainKind::Grass => TERRAIN_GRASS_COLOR,
        TerrainKind::Floor => TERRAIN_FLOOR_COLOR,
        TerrainKind::Water => TERRAIN_WATER_COLOR,
        TerrainKind::Forest => TERRAIN_FOREST_COLOR,
    }
}

fn object_color(kind: EntityKind) -> [u8; 4] {
    match kind {
        EntityKind::Tree => TREE_COLOR,
        EntityKind::Fence => FENCE_COLOR,
        EntityKind::Sign => SIGN_COLOR,
        EntityKind::Door => DOOR_COLOR,
        EntityKind::Bed => BED_COLOR,
        EntityKind::Table => TABLE_COLOR,
        EntityKind::Chair => CHAIR_COLOR,
        EntityKind::Shelf => SHELF_COLOR,
    }
}

fn npc_color(kind: NpcKind) -> [u8; 4] {
    match kind {
        NpcKind::Oak => NPC_OAK_COLOR,
        NpcKind::Mom => NPC_MOM_COLOR,
        NpcKind::Rival => NPC_RIVAL_COLOR,
    }
}

fn stride_swing_px(animation_frame: u32, is_moving: bool) -> i32 {
    if !is_moving {
        return 0;
    }
    let phase = animation_frame as f32 / ANIMATION_FRAME_COUNT as f32;
    (STRIDE_AMPLITUDE_PX * (phase * TAU).sin()).round() as i32
}

fn fill_tile_rect(frame: &mut [u8], buffer: Viewport, origin: Vec2, size: Vec2, color: [u8; 4]) {
    let (left, top) = tile_to_screen_px(origin);
    let width = (size.x * TILE_SIZE_PX as f32).round() as i32;
    let height = (size.y * TILE_SIZE_PX as f32).round() as i32;
    fill_rect_px(frame, buffer, left, top, width, height, color);
}

fn outline_tile_rect(frame: &mut [u8], buffer: Viewport, origin: Vec2, size: Vec2, color: [u8; 4]) {
    let (left, top) = tile_to_screen_px(origin);
    let width = (size.x * TILE_SIZE_PX as f32).round() as i32;
    let height = (size.y * TILE_SIZE_PX as f32).round() as i32;
    fill_rect_px(frame, buffer, left, top, width, 1, color);
    fill_rect_px(frame, buffer, left, top + height - 1, width, 1, color);
    fill_rect_px(frame, buffer, left, top, 1, height, color);
    fill_rect_px(frame, buffer, left + width - 1, top, 1, height, color);
}

fn fill_rect_px(
    frame: &mut [u8],
    buffer: Viewport,
    left: i32,
    top: i32,
    width: i32,
    height: i32,
    color: [u8; 4],
) {
    let x0 = left.max(0);
    let y0 = top.max(0);
    let x1 = (left + width).min(buffer.width as i32);
    let y1 = (top + height).min(buffer.height as i32);
    for y in y0..y1 {
        for x in x0..x1 {
            let index = ((y as usize) * (buffer.width as usize) + (x as usize)) * 4;
            frame[index..index + 4].copy_from_slice(&color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_frame(buffer: Viewport) -> Vec<u8> {
        vec![0; (buffer.width * buffer.height * 4) as usize]
    }

    #[test]
    fn fill_rect_writes_only_inside_its_bounds() {
        let buffer = Viewport {
            width: 8,
            height: 8,
        };
        let mut frame = blank_frame(buffer);
        fill_rect_px(&mut frame, buffer, 2, 2, 3, 3, [255, 0, 0, 255]);

        let at = |x: usize, y: usize| &frame[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
        assert_eq!(at(2, 2), [255, 0, 0, 255]);
        assert_eq!(at(4, 4), [255, 0, 0, 255]);
        assert_eq!(at(1, 2), [0, 0, 0, 0]);
        assert_eq!(at(5, 4), [0, 0, 0, 0]);
    }

    #[test]
    fn fill_rect_clips_at_the_frame_edges() {
        let buffer = Viewport {
            width: 4,
            height: 4,
        };
        let mut frame = blank_frame(buffer);
        fill_rect_px(&mut frame, buffer, -2, -2, 10, 10, [1, 2, 3, 4]);

        assert!(frame.chunks_exact(4).all(|px| px == [1, 2, 3, 4]));
    }

    #[test]
    fn stride_swing_is_zero_while_idle() {
        assert_eq!(stride_swing_px(15, false), 0);
    }

    #[test]
    fn stride_swing_peaks_a_quarter_through_the_cycle() {
        assert_eq!(stride_swing_px(0, true), 0);
        assert_eq!(stride_swing_px(15, true), STRIDE_AMPLITUDE_PX as i32);
        assert_eq!(stride_swing_px(45, true), -(STRIDE_AMPLITUDE_PX as i32));
    }

    #[test]
    fn every_terrain_kind_has_a_color() {
        assert_ne!(terrain_color(TerrainKind::Grass), terrain_color(TerrainKind::Floor));
        assert_ne!(terrain_color(TerrainKind::Water), terrain_color(TerrainKind::Forest));
    }
}
