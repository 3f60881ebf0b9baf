use super::events::Key;

/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    Enter,
    Digit1,
    Digit2,
    Digit3,
    KeyW,
    KeyS,
    Escape,
    MouseLeft,
    MouseRight,
}

impl Button {
    /// Keyboard buttons map onto viewer keys; mouse buttons do not
    pub fn key(self) -> Option<Key> {
        match self {
            Button::Enter => Some(Key::Enter),
            Button::Digit1 => Some(Key::Digit1),
            Button::Digit2 => Some(Key::Digit2),
            Button::Digit3 => Some(Key::Digit3),
            Button::KeyW => Some(Key::W),
            Button::KeyS => Some(Key::S),
            Button::Escape => Some(Key::Escape),
            Button::MouseLeft | Button::MouseRight => None,
        }
    }
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;

    /// Get all currently pressed buttons
    fn get_down_keys(&self) -> &[Button];
}
