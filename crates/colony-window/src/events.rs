//! Translation from winit window events to the shell's [`InputEvent`]s.

use std::time::{Duration, Instant};

use colony_shell::scroll::WHEEL_STEP;
use colony_shell::{InputEvent, KeyCode, KeyEvent, Modifiers, MouseButton, MouseEvent};
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, ModifiersState, NamedKey};

/// Second press within this window (and radius) counts as a double click.
const DOUBLE_CLICK_TIME: Duration = Duration::from_millis(400);
const DOUBLE_CLICK_RADIUS: f32 = 4.0;

pub fn translate_named_key(key: NamedKey) -> Option<KeyCode> {
    let code = match key {
        NamedKey::ArrowLeft => KeyCode::ArrowLeft,
        NamedKey::ArrowRight => KeyCode::ArrowRight,
        NamedKey::ArrowUp => KeyCode::ArrowUp,
        NamedKey::ArrowDown => KeyCode::ArrowDown,
        NamedKey::Enter => KeyCode::Enter,
        NamedKey::Escape => KeyCode::Escape,
        NamedKey::Backspace => KeyCode::Backspace,
        NamedKey::Delete => KeyCode::Delete,
        NamedKey::Tab => KeyCode::Tab,
        NamedKey::Home => KeyCode::Home,
        NamedKey::End => KeyCode::End,
        NamedKey::PageUp => KeyCode::PageUp,
        NamedKey::PageDown => KeyCode::PageDown,
        _ => return None,
    };
    Some(code)
}

pub fn translate_modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
        ctrl: state.control_key(),
        alt: state.alt_key(),
        cmd: state.super_key(),
    }
}

pub fn translate_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Left),
        winit::event::MouseButton::Right => Some(MouseButton::Right),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        _ => None,
    }
}

/// Wheel delta in notches: positive scrolls content toward the top. Pixel
/// deltas from touchpads are converted at one notch per wheel step.
pub fn wheel_delta(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / WHEEL_STEP,
    }
}

/// Counts consecutive presses of the same button at nearly the same spot.
#[derive(Debug, Default)]
pub struct ClickTracker {
    last: Option<(Instant, [f32; 2], MouseButton)>,
    count: u32,
}

impl ClickTracker {
    pub fn press(&mut self, at: Instant, pos: [f32; 2], button: MouseButton) -> u32 {
        let repeat = self.last.is_some_and(|(t, p, b)| {
            b == button
                && at.saturating_duration_since(t) <= DOUBLE_CLICK_TIME
                && (p[0] - pos[0]).abs() <= DOUBLE_CLICK_RADIUS
                && (p[1] - pos[1]).abs() <= DOUBLE_CLICK_RADIUS
        });
        // Triple clicks restart the cycle; nothing in the shell uses them.
        self.count = if repeat && self.count == 1 { 2 } else { 1 };
        self.last = Some((at, pos, button));
        self.count
    }
}

/// Per-window input state needed to turn raw events into shell events.
#[derive(Debug, Default)]
pub struct InputTranslator {
    cursor: [f32; 2],
    modifiers: Modifiers,
    clicks: ClickTracker,
}

impl InputTranslator {
    pub fn cursor(&self) -> [f32; 2] {
        self.cursor
    }

    /// Shell events produced by one window event, in dispatch order.
    pub fn translate(&mut self, event: &WindowEvent, now: Instant) -> Vec<InputEvent> {
        let [x, y] = self.cursor;
        match event {
            WindowEvent::ModifiersChanged(m) => {
                self.modifiers = translate_modifiers(m.state());
                Vec::new()
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor = [position.x as f32, position.y as f32];
                vec![InputEvent::PointerMove { x: self.cursor[0], y: self.cursor[1] }]
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let Some(button) = translate_button(*button) else {
                    return Vec::new();
                };
                match state {
                    ElementState::Pressed => {
                        let click_count = self.clicks.press(now, self.cursor, button);
                        vec![InputEvent::PointerDown(MouseEvent { x, y, button, click_count })]
                    }
                    ElementState::Released => vec![InputEvent::PointerUp { x, y }],
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let dy = wheel_delta(*delta);
                if dy == 0.0 { Vec::new() } else { vec![InputEvent::Wheel { x, y, dy }] }
            }
            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                let mut out = Vec::new();
                if let Key::Named(named) = &event.logical_key
                    && let Some(key) = translate_named_key(*named)
                {
                    out.push(InputEvent::Key(KeyEvent { key, modifiers: self.modifiers }));
                }
                let shortcut = self.modifiers.ctrl || self.modifiers.cmd;
                if !shortcut
                    && let Some(text) = &event.text
                    && text.chars().any(|c| !c.is_control())
                {
                    out.push(InputEvent::Text(text.to_string()));
                }
                out
            }
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_keys_map_and_others_are_dropped() {
        assert_eq!(translate_named_key(NamedKey::Escape), Some(KeyCode::Escape));
        assert_eq!(translate_named_key(NamedKey::PageDown), Some(KeyCode::PageDown));
        assert_eq!(translate_named_key(NamedKey::F5), None);
    }

    #[test]
    fn second_nearby_press_is_a_double_click() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        assert_eq!(clicks.press(t0, [10.0, 10.0], MouseButton::Left), 1);
        assert_eq!(clicks.press(t0 + Duration::from_millis(150), [12.0, 11.0], MouseButton::Left), 2);
        assert_eq!(clicks.press(t0 + Duration::from_millis(250), [12.0, 11.0], MouseButton::Left), 1);
    }

    #[test]
    fn slow_or_distant_press_restarts_count() {
        let mut clicks = ClickTracker::default();
        let t0 = Instant::now();
        clicks.press(t0, [10.0, 10.0], MouseButton::Left);
        assert_eq!(clicks.press(t0 + Duration::from_millis(900), [10.0, 10.0], MouseButton::Left), 1);
        assert_eq!(clicks.press(t0 + Duration::from_millis(950), [40.0, 10.0], MouseButton::Left), 1);
        assert_eq!(clicks.press(t0 + Duration::from_millis(1000), [40.0, 10.0], MouseButton::Right), 1);
    }

    #[test]
    fn wheel_reports_notches() {
        use winit::dpi::PhysicalPosition;
        assert_eq!(wheel_delta(MouseScrollDelta::LineDelta(0.0, -2.0)), -2.0);
        let px = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, WHEEL_STEP as f64));
        assert_eq!(wheel_delta(px), 1.0);
    }

    #[test]
    fn modifiers_follow_state_bits() {
        let m = translate_modifiers(ModifiersState::SHIFT | ModifiersState::CONTROL);
        assert!(m.shift && m.ctrl && !m.alt && !m.cmd);
    }
}
