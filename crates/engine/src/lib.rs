pub mod app;

pub use app::{
    dominant_axis_direction, position_blocked, run_app, run_app_with_metrics, tile_to_screen_px,
    AnimationClock, AppError, Building, Direction, EntityKind, InputBuffer, InputToken,
    LoopConfig, LoopMetricsSnapshot, MetricsHandle, Npc, NpcKind, Renderer, Scene, SceneKey,
    ScenePair, Simulation, StaticEntity, TerrainError, TerrainGrid, TerrainKind, TickError,
    TickSnapshot, TransitionDetector, Vec2, Viewport, ANIMATION_FRAME_COUNT, AXIS_THRESHOLD,
    COLLISION_MARGIN, DOOR_PROXIMITY_RADIUS, REPEAT_DELAY_SECONDS, REPEAT_INTERVAL_SECONDS,
    TILE_SIZE_PX,
};
