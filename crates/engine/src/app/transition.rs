use super::scene::{Scene, Vec2};

/// A door triggers when the player comes within this many tiles of it.
pub const DOOR_PROXIMITY_RADIUS: f32 = 1.2;

/// Edge-triggered door proximity. A transition fires only when the player
/// moves from outside every door's radius to inside one; standing in a
/// doorway never retriggers.
#[derive(Debug, Default)]
pub struct TransitionDetector {
    near_door: bool,
}

impl TransitionDetector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates proximity against the active scene and reports whether a
    /// transition fires this tick.
    pub fn step(&mut self, scene: &Scene, player: Vec2) -> bool {
        let near = scene
            .doors()
            .any(|door| door.origin.distance_to(player) < DOOR_PROXIMITY_RADIUS);
        let fired = near && !self.near_door;
        self.near_door = near;
        fired
    }

    /// Marks the proximity state occupied after a teleport. The outside
    /// entry anchor sits inside its own door's radius, so the state must
    /// read "already near" until the player actually walks away.
    pub fn suppress_until_departure(&mut self) {
        self.near_door = true;
    }

    pub fn reset(&mut self) {
        self.near_door = false;
    }
}
