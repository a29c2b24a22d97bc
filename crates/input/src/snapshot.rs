use crate::action::{InputEvent, MoveKey};
use glam::Vec2;

/// Which movement directions are currently held.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    pub fn any(&self) -> bool {
        self.forward || self.backward || self.left || self.right
    }

    fn set(&mut self, key: MoveKey, held: bool) {
        match key {
            MoveKey::Forward => self.forward = held,
            MoveKey::Backward => self.backward = held,
            MoveKey::Left => self.left = held,
            MoveKey::Right => self.right = held,
        }
    }
}

/// Input consumed by one simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FrameInput {
    pub intent: MoveIntent,
    /// Mouse motion accumulated since the previous frame.
    pub mouse_delta: Vec2,
    pub quit: bool,
}

/// Accumulates raw events between frames.
///
/// Key state is last-write-wins per key. Quit latches: once observed it is
/// reported by every later frame.
#[derive(Debug, Clone, Default)]
pub struct InputSnapshot {
    intent: MoveIntent,
    mouse_delta: Vec2,
    quit: bool,
}

impl InputSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown(key) => self.intent.set(key, true),
            InputEvent::KeyUp(key) => self.intent.set(key, false),
            InputEvent::MouseDelta { dx, dy } => self.add_mouse_delta(dx, dy),
            InputEvent::Quit => {
                if !self.quit {
                    tracing::debug!("quit requested");
                }
                self.quit = true;
            }
        }
    }

    /// Non-finite deltas are dropped so they never reach the orientation math.
    pub fn add_mouse_delta(&mut self, dx: f32, dy: f32) {
        if !dx.is_finite() || !dy.is_finite() {
            tracing::warn!(dx, dy, "discarding non-finite mouse delta");
            return;
        }
        self.mouse_delta += Vec2::new(dx, dy);
    }

    /// Forget held keys and pending mouse motion, e.g. when the window loses
    /// focus and key releases can no longer be observed. Quit still latches.
    pub fn release_all(&mut self) {
        if self.intent.any() {
            tracing::debug!(intent = ?self.intent, "releasing held keys");
        }
        self.intent = MoveIntent::default();
        self.mouse_delta = Vec2::ZERO;
    }

    pub fn intent(&self) -> MoveIntent {
        self.intent
    }

    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Take this frame's input and reset the mouse delta.
    pub fn consume(&mut self) -> FrameInput {
        let frame = FrameInput {
            intent: self.intent,
            mouse_delta: self.mouse_delta,
            quit: self.quit,
        };
        self.mouse_delta = Vec2::ZERO;
        frame
    }
}
