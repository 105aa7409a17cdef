use super::scene::{Scene, Vec2};

/// Symmetric margin applied to the moving entity only, in tiles.
pub const COLLISION_MARGIN: f32 = 0.5;

/// Pure predicate over the active scene's blocking geometry. No side
/// effects; safe to call speculatively before committing a step.
pub fn position_blocked(scene: &Scene, proposed: Vec2) -> bool {
    let buildings = scene
        .buildings
        .iter()
        .map(|building| (building.origin, building.size));
    let objects = scene
        .objects
        .iter()
        .filter(|object| object.kind.blocks())
        .map(|object| (object.origin, object.size));

    buildings
        .chain(objects)
        .any(|(origin, size)| overlaps_with_margin(proposed, origin, size))
}

// Strict inequalities: exact edge contact is legal.
fn overlaps_with_margin(position: Vec2, origin: Vec2, size: Vec2) -> bool {
    position.x + COLLISION_MARGIN < origin.x + size.x
        && position.x - COLLISION_MARGIN > origin.x
        && position.y + COLLISION_MARGIN < origin.y + size.y
        && position.y - COLLISION_MARGIN > origin.y
}
