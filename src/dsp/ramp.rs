//! Linear parameter ramps.
//!
//! Live parameters arrive once per block. Jumping straight to a new carrier
//! or gain at a block boundary clicks, so the engine can spread each change
//! over the following block instead:
//!
//! ```text
//!  value
//!   new ┤            ╭──────────
//!       │          ╱
//!       │        ╱    ← one block
//!   old ┼──────╯
//!       └──────┴─────┴──────────→ samples
//! ```
//!
//! The increment is computed once when the target is set; `next` is an add
//! and a compare.

#[derive(Debug, Clone, Copy, Default)]
pub struct Ramp {
    current: f32,
    target: f32,
    step: f32,
    remaining: u32,
}

impl Ramp {
    pub fn new(value: f32) -> Self {
        Self {
            current: value,
            target: value,
            step: 0.0,
            remaining: 0,
        }
    }

    /// Move towards `target` over `frames` samples. Zero frames jumps.
    pub fn set_target(&mut self, target: f32, frames: u32) {
        self.target = target;
        if frames == 0 || target == self.current {
            self.jump(target);
            return;
        }
        self.step = (target - self.current) / frames as f32;
        self.remaining = frames;
    }

    /// Set the value immediately, cancelling any ramp in progress.
    pub fn jump(&mut self, value: f32) {
        self.current = value;
        self.target = value;
        self.step = 0.0;
        self.remaining = 0;
    }

    /// Advance one sample and return the new value. A ramp over `n` frames
    /// returns the target on its `n`th call.
    #[inline]
    pub fn next(&mut self) -> f32 {
        if self.remaining > 0 {
            self.remaining -= 1;
            self.current = if self.remaining == 0 {
                self.target
            } else {
                self.current + self.step
            };
        }
        self.current
    }

    #[inline]
    pub fn value(&self) -> f32 {
        self.current
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    pub fn is_ramping(&self) -> bool {
        self.remaining > 0
    }
}
