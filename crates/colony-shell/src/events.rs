//! Input events as the shell sees them, independent of the window backend.

/// Result of an event handling operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Event changed state; a redraw is needed
    Handled,
    /// Event was not handled
    Ignored,
}

impl EventResult {
    pub fn is_handled(&self) -> bool {
        matches!(self, EventResult::Handled)
    }

    pub fn from_bool(handled: bool) -> Self {
        if handled { EventResult::Handled } else { EventResult::Ignored }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Mouse button press in window coordinates.
#[derive(Debug, Clone, Copy)]
pub struct MouseEvent {
    pub x: f32,
    pub y: f32,
    pub button: MouseButton,
    /// 1 = single, 2 = double
    pub click_count: u32,
}

impl MouseEvent {
    pub fn left(x: f32, y: f32) -> Self {
        Self { x, y, button: MouseButton::Left, click_count: 1 }
    }

    pub fn pos(&self) -> [f32; 2] {
        [self.x, self.y]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    Enter,
    Escape,
    Backspace,
    Delete,
    Tab,
    Home,
    End,
    PageUp,
    PageDown,
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub cmd: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

impl KeyEvent {
    pub fn plain(key: KeyCode) -> Self {
        Self { key, modifiers: Modifiers::default() }
    }

    pub fn shifted(key: KeyCode) -> Self {
        Self { key, modifiers: Modifiers { shift: true, ..Modifiers::default() } }
    }
}

/// Everything the window host forwards to the application.
#[derive(Debug, Clone)]
pub enum InputEvent {
    PointerDown(MouseEvent),
    PointerUp { x: f32, y: f32 },
    PointerMove { x: f32, y: f32 },
    /// `dy` in wheel notches; positive scrolls content up (wheel away from
    /// the user).
    Wheel { x: f32, y: f32, dy: f32 },
    Key(KeyEvent),
    /// Committed text input (already filtered of control characters).
    Text(String),
}

/// Append printable characters of `text` to `buffer`.
pub(crate) fn push_text(buffer: &mut String, text: &str) -> bool {
    let before = buffer.len();
    buffer.extend(text.chars().filter(|c| !c.is_control()));
    buffer.len() != before
}
