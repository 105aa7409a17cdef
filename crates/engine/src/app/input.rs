use super::scene::Vec2;

pub const REPEAT_DELAY_SECONDS: f32 = 0.3;
pub const REPEAT_INTERVAL_SECONDS: f32 = 0.12;
pub const AXIS_THRESHOLD: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// One-tile step offset in grid coordinates (y grows downward).
    pub fn step(self) -> Vec2 {
        match self {
            Direction::Up => Vec2 { x: 0.0, y: -1.0 },
            Direction::Down => Vec2 { x: 0.0, y: 1.0 },
            Direction::Left => Vec2 { x: -1.0, y: 0.0 },
            Direction::Right => Vec2 { x: 1.0, y: 0.0 },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputToken {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    KeyW,
    KeyS,
    KeyA,
    KeyD,
    AxisUp,
    AxisDown,
    AxisLeft,
    AxisRight,
    Reset,
}

impl InputToken {
    pub fn direction(self) -> Option<Direction> {
        match self {
            InputToken::ArrowUp | InputToken::KeyW | InputToken::AxisUp => Some(Direction::Up),
            InputToken::ArrowDown | InputToken::KeyS | InputToken::AxisDown => {
                Some(Direction::Down)
            }
            InputToken::ArrowLeft | InputToken::KeyA | InputToken::AxisLeft => {
                Some(Direction::Left)
            }
            InputToken::ArrowRight | InputToken::KeyD | InputToken::AxisRight => {
                Some(Direction::Right)
            }
            InputToken::Reset => None,
        }
    }

    /// The token a controller shell presses once an axis sample resolves
    /// to a direction.
    pub fn axis(direction: Direction) -> InputToken {
        match direction {
            Direction::Up => InputToken::AxisUp,
            Direction::Down => InputToken::AxisDown,
            Direction::Left => InputToken::AxisLeft,
            Direction::Right => InputToken::AxisRight,
        }
    }
}

/// Resolves a controller axis sample to its dominant direction, if any
/// component clears the dead-zone threshold. Positive y points down the
/// map, matching grid coordinates.
pub fn dominant_axis_direction(x: f32, y: f32) -> Option<Direction> {
    if x.abs() <= AXIS_THRESHOLD && y.abs() <= AXIS_THRESHOLD {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x > 0.0 {
            Direction::Right
        } else {
            Direction::Left
        })
    } else {
        Some(if y > 0.0 {
            Direction::Down
        } else {
            Direction::Up
        })
    }
}

#[derive(Debug, Clone, Copy)]
struct ActiveHold {
    token: InputToken,
    direction: Direction,
    held_seconds: f32,
    next_repeat_at: f32,
}

/// Press/release bookkeeping with one-active-input exclusivity and
/// tick-driven key repeat. Event handlers only enqueue here; movement is
/// resolved when the simulation drains an intent inside a tick.
#[derive(Debug, Default)]
pub struct InputBuffer {
    active: Option<ActiveHold>,
    pending_intent: Option<Direction>,
    reset_requested: bool,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a press. The first directional token wins; further tokens
    /// are ignored until it releases. The reset token bypasses
    /// exclusivity entirely.
    pub fn press(&mut self, token: InputToken) {
        let Some(direction) = token.direction() else {
            self.reset_requested = true;
            return;
        };
        if self.active.is_some() {
            return;
        }
        self.active = Some(ActiveHold {
            token,
            direction,
            held_seconds: 0.0,
            // The repeat interval arms only once the delay elapses, so the
            // first repeat lands at delay + interval.
            next_repeat_at: REPEAT_DELAY_SECONDS + REPEAT_INTERVAL_SECONDS,
        });
        self.pending_intent = Some(direction);
    }

    /// Releasing a token that is not the active one is a no-op. A pending
    /// immediate intent survives release so a tap between ticks still
    /// moves one tile.
    pub fn release(&mut self, token: InputToken) {
        if self.active.map(|hold| hold.token) == Some(token) {
            self.active = None;
        }
    }

    pub fn clear(&mut self) {
        self.active = None;
        self.pending_intent = None;
        self.reset_requested = false;
    }

    pub fn active_token(&self) -> Option<InputToken> {
        self.active.map(|hold| hold.token)
    }

    pub fn take_reset_requested(&mut self) -> bool {
        let requested = self.reset_requested;
        self.reset_requested = false;
        requested
    }

    /// Called once per tick with the fixed timestep. Emits at most one
    /// movement intent: the pending immediate press if any, otherwise a
    /// due repeat for the held token.
    pub fn drain_intent(&mut self, fixed_dt_seconds: f32) -> Option<Direction> {
        if let Some(hold) = self.active.as_mut() {
            hold.held_seconds += fixed_dt_seconds;
        }

        if let Some(direction) = self.pending_intent.take() {
            return Some(direction);
        }

        let hold = self.active.as_mut()?;
        if hold.held_seconds >= hold.next_repeat_at {
            hold.next_repeat_at += REPEAT_INTERVAL_SECONDS;
            return Some(hold.direction);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TICK: f32 = 1.0 / 60.0;

    #[test]
    fn press_emits_one_immediate_intent() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowUp);

        assert_eq!(input.drain_intent(TICK), Some(Direction::Up));
        assert_eq!(input.drain_intent(TICK), None);
    }

    #[test]
    fn second_press_is_ignored_while_one_is_active() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowUp);
        input.press(InputToken::ArrowLeft);

        assert_eq!(input.active_token(), Some(InputToken::ArrowUp));
        assert_eq!(input.drain_intent(TICK), Some(Direction::Up));
        assert_eq!(input.drain_intent(TICK), None);
    }

    #[test]
    fn repress_of_active_token_is_a_no_op() {
        let mut input = InputBuffer::new();
        input.press(InputToken::KeyD);
        assert_eq!(input.drain_intent(TICK), Some(Direction::Right));

        input.press(InputToken::KeyD);
        assert_eq!(input.drain_intent(TICK), None);
    }

    #[test]
    fn releasing_inactive_token_is_a_no_op() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowDown);
        input.release(InputToken::ArrowLeft);

        assert_eq!(input.active_token(), Some(InputToken::ArrowDown));
    }

    #[test]
    fn release_cancels_repeat_but_keeps_pending_tap() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowRight);
        input.release(InputToken::ArrowRight);

        assert_eq!(input.drain_intent(TICK), Some(Direction::Right));
        for _ in 0..120 {
            assert_eq!(input.drain_intent(TICK), None);
        }
    }

    #[test]
    fn release_frees_the_slot_for_the_next_press() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowUp);
        assert_eq!(input.drain_intent(TICK), Some(Direction::Up));
        input.release(InputToken::ArrowUp);
        input.press(InputToken::KeyA);

        assert_eq!(input.drain_intent(TICK), Some(Direction::Left));
    }

    #[test]
    fn hold_produces_four_intents_over_delay_plus_three_intervals() {
        // 300ms delay + 3 * 120ms intervals = 660ms = 40 ticks at 60 Hz.
        let mut input = InputBuffer::new();
        input.press(InputToken::KeyS);

        let mut intents = 0;
        for _ in 0..40 {
            if input.drain_intent(TICK).is_some() {
                intents += 1;
            }
        }
        assert_eq!(intents, 4);
    }

    #[test]
    fn no_repeat_before_the_delay_elapses() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowLeft);
        assert_eq!(input.drain_intent(TICK), Some(Direction::Left));

        // 17 further ticks reach 300ms held, before the first repeat at 420ms.
        for _ in 0..17 {
            assert_eq!(input.drain_intent(TICK), None);
        }
    }

    #[test]
    fn reset_token_bypasses_exclusivity() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowUp);
        input.press(InputToken::Reset);

        assert!(input.take_reset_requested());
        assert!(!input.take_reset_requested());
        assert_eq!(input.active_token(), Some(InputToken::ArrowUp));
    }

    #[test]
    fn clear_drops_hold_pending_and_reset() {
        let mut input = InputBuffer::new();
        input.press(InputToken::ArrowUp);
        input.press(InputToken::Reset);
        input.clear();

        assert_eq!(input.active_token(), None);
        assert_eq!(input.drain_intent(TICK), None);
        assert!(!input.take_reset_requested());
    }

    #[test]
    fn axis_below_threshold_resolves_to_none() {
        assert_eq!(dominant_axis_direction(0.4, -0.5), None);
        assert_eq!(dominant_axis_direction(0.0, 0.0), None);
    }

    #[test]
    fn axis_resolves_to_dominant_direction() {
        assert_eq!(dominant_axis_direction(0.9, 0.2), Some(Direction::Right));
        assert_eq!(dominant_axis_direction(-0.8, 0.3), Some(Direction::Left));
        assert_eq!(dominant_axis_direction(0.1, 0.7), Some(Direction::Down));
        assert_eq!(dominant_axis_direction(-0.2, -0.6), Some(Direction::Up));
    }

    #[test]
    fn axis_tokens_round_trip_their_direction() {
        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            assert_eq!(InputToken::axis(direction).direction(), Some(direction));
        }
    }

    #[test]
    fn wasd_and_arrows_map_to_the_same_directions() {
        assert_eq!(InputToken::KeyW.direction(), InputToken::ArrowUp.direction());
        assert_eq!(InputToken::KeyA.direction(), InputToken::ArrowLeft.direction());
        assert_eq!(InputToken::Reset.direction(), None);
    }
}
