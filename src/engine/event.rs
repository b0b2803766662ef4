//! Discrete input events delivered by the embedding shell

/// Keys the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    /// Deletes in a focused field, otherwise goes back
    Backspace,
    /// Submits the focused field's form
    Enter,
    /// Drops field focus
    Escape,
    /// Explicit history back (toolbar button, Alt+Left)
    Back,
}

/// One input event
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Key(Key),
    /// Pointer click in viewport coordinates
    Click { x: f32, y: f32 },
    /// Typed characters
    Text(String),
    /// Wheel or trackpad movement in pixels, positive is down
    Scroll(f32),
    Resize { width: f32, height: f32 },
    Quit,
}

/// What handling an event did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing changed
    Ignored,
    /// Same page, needs repainting
    Redraw,
    /// A new page was loaded
    Navigated,
    Quit,
}
