use thiserror::Error;

use super::animation::AnimationClock;
use super::collision::position_blocked;
use super::input::{Direction, InputBuffer};
use super::scene::{Scene, SceneKey, ScenePair, Vec2};
use super::transition::TransitionDetector;

#[derive(Debug, Clone, Copy)]
struct PlayerState {
    position: Vec2,
    direction: Direction,
    is_moving: bool,
}

/// Immutable per-tick view handed to the rendering shell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickSnapshot {
    pub position: Vec2,
    pub direction: Direction,
    pub is_moving: bool,
    pub animation_frame: u32,
    pub scene: SceneKey,
}

/// Post-tick invariant violations. These cannot occur through the normal
/// step path (positions are clamped before collision testing); a value
/// here means corrupt state, and the loop halts rather than continuing.
#[derive(Debug, Error, PartialEq)]
pub enum TickError {
    #[error("player position ({x}, {y}) left the {width}x{height} map bounds")]
    OutOfBounds {
        x: f32,
        y: f32,
        width: u32,
        height: u32,
    },
    #[error("player position ({x}, {y}) overlaps a blocking entity")]
    BlockedOverlap { x: f32, y: f32 },
}

/// Owns the whole per-tick pipeline: input draining, grid stepping with
/// clamping and collision, door transitions, the animation clock, and
/// snapshot publication. Player state is mutated only inside `tick`.
#[derive(Debug)]
pub struct Simulation {
    scenes: ScenePair,
    active: SceneKey,
    player: PlayerState,
    input: InputBuffer,
    transition: TransitionDetector,
    clock: AnimationClock,
}

impl Simulation {
    pub fn new(scenes: ScenePair, starting_scene: SceneKey) -> Self {
        let spawn = scenes.scene(starting_scene).spawn_point;
        Self {
            scenes,
            active: starting_scene,
            player: PlayerState {
                position: spawn,
                direction: Direction::Down,
                is_moving: false,
            },
            input: InputBuffer::new(),
            transition: TransitionDetector::new(),
            clock: AnimationClock::new(),
        }
    }

    /// Input events land here; they enqueue only and never touch player
    /// state directly.
    pub fn input_mut(&mut self) -> &mut InputBuffer {
        &mut self.input
    }

    pub fn active_scene(&self) -> &Scene {
        self.scenes.scene(self.active)
    }

    pub fn active_scene_key(&self) -> SceneKey {
        self.active
    }

    pub fn player_position(&self) -> Vec2 {
        self.player.position
    }

    /// Scenario hook: places the avatar directly, bypassing movement.
    /// Invariants are still validated on the next tick.
    pub fn place_player(&mut self, position: Vec2) {
        self.player.position = position;
    }

    pub fn snapshot(&self) -> TickSnapshot {
        TickSnapshot {
            position: self.player.position,
            direction: self.player.direction,
            is_moving: self.player.is_moving,
            animation_frame: self.clock.frame(),
            scene: self.active,
        }
    }

    /// One fixed-rate tick: reset request, at most one movement intent,
    /// clamp, collision, commit, transition, animation, validation.
    pub fn tick(&mut self, fixed_dt_seconds: f32) -> Result<TickSnapshot, TickError> {
        if self.input.take_reset_requested() {
            self.reset_player();
        }

        let moved = match self.input.drain_intent(fixed_dt_seconds) {
            Some(direction) => self.try_grid_step(direction),
            None => false,
        };
        self.player.is_moving = moved;

        if self
            .transition
            .step(self.scenes.scene(self.active), self.player.position)
        {
            self.switch_scene();
        }

        self.clock.advance(moved);
        self.validate_invariants()?;
        Ok(self.snapshot())
    }

    /// Spawn point of the active scene, facing down, frame zero, all
    /// in-flight input dropped. The scene selector is left alone.
    pub fn reset_player(&mut self) {
        self.player.position = self.scenes.scene(self.active).spawn_point;
        self.player.direction = Direction::Down;
        self.player.is_moving = false;
        self.clock.reset();
        self.input.clear();
        self.transition.reset();
    }

    // One full tile step. The avatar faces the direction even when the
    // step is clamped away or rejected; collision is all-or-nothing.
    fn try_grid_step(&mut self, direction: Direction) -> bool {
        self.player.direction = direction;

        let scene = self.scenes.scene(self.active);
        let current = self.player.position;
        let step = direction.step();
        let proposed = clamp_to_bounds(
            Vec2 {
                x: current.x + step.x,
                y: current.y + step.y,
            },
            scene.width(),
            scene.height(),
        );
        if proposed == current {
            return false;
        }
        if position_blocked(scene, proposed) {
            return false;
        }
        self.player.position = proposed;
        true
    }

    fn switch_scene(&mut self) {
        let destination = self.active.linked();
        self.active = destination;
        self.player.position = self.scenes.scene(destination).entry_anchor;
        self.transition.suppress_until_departure();
    }

    fn validate_invariants(&self) -> Result<(), TickError> {
        let scene = self.scenes.scene(self.active);
        let position = self.player.position;
        let max_x = scene.width().saturating_sub(1) as f32;
        let max_y = scene.height().saturating_sub(1) as f32;
        if !(0.0..=max_x).contains(&position.x) || !(0.0..=max_y).contains(&position.y) {
            return Err(TickError::OutOfBounds {
                x: position.x,
                y: position.y,
                width: scene.width(),
                height: scene.height(),
            });
        }
        if position_blocked(scene, position) {
            return Err(TickError::BlockedOverlap {
                x: position.x,
                y: position.y,
            });
        }
        Ok(())
    }
}

fn clamp_to_bounds(position: Vec2, width: u32, height: u32) -> Vec2 {
    Vec2 {
        x: position.x.clamp(0.0, width.saturating_sub(1) as f32),
        y: position.y.clamp(0.0, height.saturating_sub(1) as f32),
    }
}
