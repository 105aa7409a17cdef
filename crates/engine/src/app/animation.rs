/// The stride cycle wraps after this many advanced frames.
pub const ANIMATION_FRAME_COUNT: u32 = 60;

/// Wrapping frame counter that advances only while the avatar is moving.
/// The renderer derives its waveform from the counter; the core owns only
/// the integer.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnimationClock {
    frame: u32,
}

impl AnimationClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, moving: bool) {
        if moving {
            self.frame = (self.frame + 1) % ANIMATION_FRAME_COUNT;
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    pub fn reset(&mut self) {
        self.frame = 0;
    }
}
