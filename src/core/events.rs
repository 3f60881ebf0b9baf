use glam::Vec2;

use crate::error::ViewerError;
use crate::state::ViewerState;

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Enter,
    Digit1,
    Digit2,
    Digit3,
    W,
    S,
    Escape,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: Key,
    pub pressed: bool,
}

impl KeyEvent {
    pub fn press(key: Key) -> Self {
        Self { key, pressed: true }
    }

    pub fn release(key: Key) -> Self {
        Self { key, pressed: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeEvent {
    pub width: u32,
    pub height: u32,
}

/// Pointer position sampled once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerSample {
    pub position: Vec2,
    pub trigger_held: bool,
}

/// Orbit angles in degrees produced from a pointer sample
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDelta {
    pub angles: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Resize(ResizeEvent),
    Pointer(PointerSample),
    Key(KeyEvent),
}

pub type Handler<E> = Box<dyn Fn(&E, &ViewerState) -> Result<ViewerState, ViewerError>>;

/// Routes input events to registered handlers.
///
/// Handlers never mutate shared state: each one receives the current state
/// and returns its replacement, so advancing a frame is a fold over the
/// frame's events.
#[derive(Default)]
pub struct EventDispatcher {
    resize_handlers: Vec<Handler<ResizeEvent>>,
    pointer_handlers: Vec<Handler<PointerDelta>>,
    key_handlers: Vec<Handler<KeyEvent>>,
}

impl EventDispatcher {
    /// Dispatcher with no handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Dispatcher with the stock viewer bindings
    pub fn with_default_bindings() -> Self {
        let mut dispatcher = Self::new();
        dispatcher.on_resize(resize_camera);
        dispatcher.on_pointer_delta(orbit_camera);
        dispatcher.on_key_event(handle_key);
        dispatcher
    }

    pub fn on_resize<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&ResizeEvent, &ViewerState) -> Result<ViewerState, ViewerError> + 'static,
    {
        self.resize_handlers.push(Box::new(handler));
        self
    }

    pub fn on_pointer_delta<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&PointerDelta, &ViewerState) -> Result<ViewerState, ViewerError> + 'static,
    {
        self.pointer_handlers.push(Box::new(handler));
        self
    }

    pub fn on_key_event<F>(&mut self, handler: F) -> &mut Self
    where
        F: Fn(&KeyEvent, &ViewerState) -> Result<ViewerState, ViewerError> + 'static,
    {
        self.key_handlers.push(Box::new(handler));
        self
    }

    /// Applies one event and returns the resulting state
    pub fn dispatch(&self, event: &InputEvent, state: ViewerState) -> Result<ViewerState, ViewerError> {
        match event {
            InputEvent::Resize(resize) => run(&self.resize_handlers, resize, state),
            InputEvent::Key(key) => run(&self.key_handlers, key, state),
            InputEvent::Pointer(sample) => {
                let mut state = state;
                match state.orbit.sample(sample.position, sample.trigger_held) {
                    Some(angles) => run(&self.pointer_handlers, &PointerDelta { angles }, state),
                    None => Ok(state),
                }
            }
        }
    }

    /// Folds a frame's events into the state
    pub fn advance(&self, state: ViewerState, events: &[InputEvent]) -> Result<ViewerState, ViewerError> {
        events
            .iter()
            .try_fold(state, |state, event| self.dispatch(event, state))
    }
}

fn run<E>(handlers: &[Handler<E>], event: &E, state: ViewerState) -> Result<ViewerState, ViewerError> {
    handlers
        .iter()
        .try_fold(state, |state, handler| handler(event, &state))
}

/// Minimized windows report a zero extent; those resizes keep the old aspect ratio.
pub fn resize_camera(event: &ResizeEvent, state: &ViewerState) -> Result<ViewerState, ViewerError> {
    let mut next = *state;
    if event.width == 0 || event.height == 0 {
        log::debug!("Ignoring resize to {}x{}", event.width, event.height);
        return Ok(next);
    }
    next.camera
        .set_aspect_ratio(event.width as f32 / event.height as f32)?;
    Ok(next)
}

pub fn orbit_camera(delta: &PointerDelta, state: &ViewerState) -> Result<ViewerState, ViewerError> {
    let mut next = *state;
    next.camera.orbit(delta.angles, state.orbit.pivot())?;
    Ok(next)
}

pub fn handle_key(event: &KeyEvent, state: &ViewerState) -> Result<ViewerState, ViewerError> {
    let mut next = *state;
    if !event.pressed {
        return Ok(next);
    }

    match event.key {
        Key::Enter => {
            log::info!("Resetting camera");
            next.reset_camera()?;
        }
        Key::Digit1 => next.toggles.select_scene(0)?,
        Key::Digit2 => next.toggles.select_scene(1)?,
        Key::Digit3 => next.toggles.select_scene(2)?,
        Key::W => {
            next.toggles.toggle_wireframe();
        }
        Key::S => {
            next.toggles.toggle_solid();
        }
        Key::Escape => {}
    }
    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::Camera;
    use crate::core::orbit_input::OrbitInput;
    use crate::state::{CameraPose, ToggleState};
    use std::cell::Cell;
    use std::rc::Rc;

    fn viewer_state() -> ViewerState {
        ViewerState::new(
            Camera::new(1.0).unwrap(),
            ToggleState::new(3).unwrap(),
            OrbitInput::default(),
            CameraPose::default(),
        )
        .unwrap()
    }

    #[test]
    fn test_empty_dispatcher_keeps_state() {
        let dispatcher = EventDispatcher::new();
        let state = viewer_state();
        let next = dispatcher
            .dispatch(&InputEvent::Key(KeyEvent::press(Key::W)), state)
            .unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_handlers_run_in_registration_order() {
        let calls = Rc::new(Cell::new(0u32));
        let mut dispatcher = EventDispatcher::new();
        let first = calls.clone();
        dispatcher.on_key_event(move |_, state| {
            assert_eq!(first.get(), 0);
            first.set(1);
            Ok(*state)
        });
        let second = calls.clone();
        dispatcher.on_key_event(move |_, state| {
            assert_eq!(second.get(), 1);
            second.set(2);
            Ok(*state)
        });

        dispatcher
            .dispatch(&InputEvent::Key(KeyEvent::press(Key::S)), viewer_state())
            .unwrap();
        assert_eq!(calls.get(), 2);
    }

    #[test]
    fn test_key_release_is_ignored() {
        let state = viewer_state();
        let next = handle_key(&KeyEvent::release(Key::W), &state).unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_scene_keys_select_slots() {
        let state = viewer_state();
        let next = handle_key(&KeyEvent::press(Key::Digit3), &state).unwrap();
        assert_eq!(next.toggles.active_scene(), 2);
        let next = handle_key(&KeyEvent::press(Key::Digit2), &next).unwrap();
        assert_eq!(next.toggles.active_scene(), 1);
        let next = handle_key(&KeyEvent::press(Key::Digit1), &next).unwrap();
        assert_eq!(next.toggles.active_scene(), 0);
    }

    #[test]
    fn test_scene_key_beyond_scene_count_fails() {
        let mut state = viewer_state();
        state.toggles = ToggleState::new(2).unwrap();
        let err = handle_key(&KeyEvent::press(Key::Digit3), &state).unwrap_err();
        assert!(matches!(err, ViewerError::State(_)));
    }

    #[test]
    fn test_zero_sized_resize_is_ignored() {
        let state = viewer_state();
        let next = resize_camera(&ResizeEvent { width: 800, height: 0 }, &state).unwrap();
        assert_eq!(next.camera.aspect_ratio(), state.camera.aspect_ratio());
    }

    #[test]
    fn test_pointer_without_trigger_only_moves_baseline() {
        let dispatcher = EventDispatcher::with_default_bindings();
        let state = viewer_state();
        let events = [
            InputEvent::Pointer(PointerSample {
                position: Vec2::new(10.0, 10.0),
                trigger_held: false,
            }),
            InputEvent::Pointer(PointerSample {
                position: Vec2::new(90.0, 40.0),
                trigger_held: false,
            }),
        ];

        let next = dispatcher.advance(state, &events).unwrap();

        assert_eq!(next.camera, state.camera);
        assert_eq!(next.orbit.last_position(), Some(Vec2::new(90.0, 40.0)));
    }
}
