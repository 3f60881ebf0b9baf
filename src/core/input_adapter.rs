use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use super::controller::{Button, Controller};
use super::events::{InputEvent, KeyEvent, PointerSample, ResizeEvent};

/// Button that has to be held for pointer motion to orbit the camera
pub const ORBIT_TRIGGER: Button = Button::MouseLeft;

/// Adapter that bridges Winit events to the Controller trait and viewer input events
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// All pressed buttons as a vec (for efficient get_down_keys)
    pressed_vec: Vec<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<Vec2>,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Update button/cursor tracking and translate discrete events.
    ///
    /// Key repeats update nothing and produce no event.
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<InputEvent> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                if event.repeat {
                    return None;
                }
                let pressed = event.state == ElementState::Pressed;
                self.set_pressed(button, pressed);
                button
                    .key()
                    .map(|key| InputEvent::Key(KeyEvent { key, pressed }))
            }
            WindowEvent::MouseInput { state, button, .. } => {
                let button = Self::mouse_button_to_button(*button)?;
                self.set_pressed(button, *state == ElementState::Pressed);
                None
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Some(Vec2::new(position.x as f32, position.y as f32));
                None
            }
            WindowEvent::Resized(size) => Some(InputEvent::Resize(ResizeEvent {
                width: size.width,
                height: size.height,
            })),
            WindowEvent::Focused(false) => {
                // Releases are not delivered to unfocused windows
                self.release_all();
                None
            }
            _ => None,
        }
    }

    /// Pointer state for this frame, once the cursor has entered the window
    pub fn pointer_sample(&self) -> Option<InputEvent> {
        self.mouse_position.map(|position| {
            InputEvent::Pointer(PointerSample {
                position,
                trigger_held: self.is_down(ORBIT_TRIGGER),
            })
        })
    }

    fn set_pressed(&mut self, button: Button, pressed: bool) {
        if pressed {
            if self.pressed_keys.insert(button) {
                self.pressed_vec.push(button);
            }
        } else if self.pressed_keys.remove(&button) {
            self.pressed_vec.retain(|&b| b != button);
        }
    }

    fn release_all(&mut self) {
        self.pressed_keys.clear();
        self.pressed_vec.clear();
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::Enter | KeyCode::NumpadEnter => Some(Button::Enter),
            KeyCode::Digit1 | KeyCode::Numpad1 => Some(Button::Digit1),
            KeyCode::Digit2 | KeyCode::Numpad2 => Some(Button::Digit2),
            KeyCode::Digit3 | KeyCode::Numpad3 => Some(Button::Digit3),
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyS => Some(Button::KeyS),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }

    /// Map Winit MouseButton to Button
    fn mouse_button_to_button(button: MouseButton) -> Option<Button> {
        match button {
            MouseButton::Left => Some(Button::MouseLeft),
            MouseButton::Right => Some(Button::MouseRight),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }

    fn get_down_keys(&self) -> &[Button] {
        &self.pressed_vec
    }
}
