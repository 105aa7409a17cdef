mod animation;
mod collision;
mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;
mod sim;
mod transition;

pub use animation::{AnimationClock, ANIMATION_FRAME_COUNT};
pub use collision::{position_blocked, COLLISION_MARGIN};
pub use input::{
    dominant_axis_direction, Direction, InputBuffer, InputToken, AXIS_THRESHOLD,
    REPEAT_DELAY_SECONDS, REPEAT_INTERVAL_SECONDS,
};
pub use loop_runner::{run_app, run_app_with_metrics, AppError, LoopConfig};
pub use metrics::{LoopMetricsSnapshot, MetricsHandle};
pub use rendering::{tile_to_screen_px, Renderer, Viewport, TILE_SIZE_PX};
pub use scene::{
    Building, EntityKind, Npc, NpcKind, Scene, SceneKey, ScenePair, StaticEntity, TerrainError,
    TerrainGrid, TerrainKind, Vec2,
};
pub use sim::{Simulation, TickError, TickSnapshot};
pub use transition::{TransitionDetector, DOOR_PROXIMITY_RADIUS};
