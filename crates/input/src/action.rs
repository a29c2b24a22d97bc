/// A movement direction bound to a held key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MoveKey {
    Forward,
    Backward,
    Left,
    Right,
}

/// A raw input event as delivered by the window host.
///
/// Hosts produce these; the [`InputSnapshot`](crate::InputSnapshot) folds them
/// into per-frame state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// A movement key went down.
    KeyDown(MoveKey),
    /// A movement key went up.
    KeyUp(MoveKey),
    /// Raw pointer motion in device counts.
    MouseDelta { dx: f32, dy: f32 },
    /// The host asked the application to stop.
    Quit,
}
