use glam::Vec3;

use crate::camera::Camera;
use crate::core::orbit_input::OrbitInput;
use crate::core::pass::PassKind;
use crate::error::{CameraError, StateError};

/// Active scene slot and pass visibility flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    active_scene: usize,
    scene_count: usize,
    pub show_solid: bool,
    pub show_wireframe: bool,
}

impl ToggleState {
    /// Starts on scene 0 with the solid pass only
    pub fn new(scene_count: usize) -> Result<Self, StateError> {
        if scene_count == 0 {
            return Err(StateError::NoScenes);
        }
        Ok(Self {
            active_scene: 0,
            scene_count,
            show_solid: true,
            show_wireframe: false,
        })
    }

    pub fn active_scene(&self) -> usize {
        self.active_scene
    }

    pub fn scene_count(&self) -> usize {
        self.scene_count
    }

    pub fn select_scene(&mut self, index: usize) -> Result<(), StateError> {
        if index >= self.scene_count {
            return Err(StateError::SceneOutOfRange {
                index,
                count: self.scene_count,
            });
        }
        if index != self.active_scene {
            log::info!("Switching to scene {}", index + 1);
        }
        self.active_scene = index;
        Ok(())
    }

    /// Flips the solid flag and returns the new value
    pub fn toggle_solid(&mut self) -> bool {
        self.show_solid = !self.show_solid;
        log::info!("Show solid: {}", on_off(self.show_solid));
        self.show_solid
    }

    /// Flips the wireframe flag and returns the new value
    pub fn toggle_wireframe(&mut self) -> bool {
        self.show_wireframe = !self.show_wireframe;
        log::info!("Show wireframe: {}", on_off(self.show_wireframe));
        self.show_wireframe
    }

    /// Passes to run this frame, solid before wireframe
    pub fn passes(&self) -> impl Iterator<Item = PassKind> {
        let solid = self.show_solid.then_some(PassKind::Solid);
        let wireframe = self.show_wireframe.then_some(PassKind::Wireframe);
        solid.into_iter().chain(wireframe)
    }
}

fn on_off(value: bool) -> &'static str {
    if value {
        "ON"
    } else {
        "OFF"
    }
}

/// Camera position and aim restored by the reset key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub position: Vec3,
    pub target: Vec3,
}

impl CameraPose {
    pub fn apply(&self, camera: &mut Camera) -> Result<(), CameraError> {
        let before = *camera;
        let result = camera
            .set_position(self.position)
            .and_then(|()| camera.look_at(self.target));
        if result.is_err() {
            *camera = before;
        }
        result
    }
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, -3.0),
            target: Vec3::ZERO,
        }
    }
}

/// Everything the input handlers read and replace each frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewerState {
    pub camera: Camera,
    pub toggles: ToggleState,
    pub orbit: OrbitInput,
    pub home: CameraPose,
}

impl ViewerState {
    /// Places `camera` at `home` and wraps it with the given toggles and orbit input
    pub fn new(
        mut camera: Camera,
        toggles: ToggleState,
        orbit: OrbitInput,
        home: CameraPose,
    ) -> Result<Self, CameraError> {
        home.apply(&mut camera)?;
        Ok(Self {
            camera,
            toggles,
            orbit,
            home,
        })
    }

    pub fn reset_camera(&mut self) -> Result<(), CameraError> {
        self.home.apply(&mut self.camera)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_requires_scenes() {
        assert_eq!(ToggleState::new(0), Err(StateError::NoScenes));
    }

    #[test]
    fn test_default_toggles_show_solid_only() {
        let toggles = ToggleState::new(3).unwrap();
        assert_eq!(toggles.active_scene(), 0);
        assert_eq!(toggles.passes().collect::<Vec<_>>(), vec![PassKind::Solid]);
    }

    #[test]
    fn test_select_scene_bounds() {
        let mut toggles = ToggleState::new(3).unwrap();
        toggles.select_scene(2).unwrap();
        assert_eq!(toggles.active_scene(), 2);

        let err = toggles.select_scene(3).unwrap_err();
        assert_eq!(err, StateError::SceneOutOfRange { index: 3, count: 3 });
        assert_eq!(toggles.active_scene(), 2);
    }

    #[test]
    fn test_pass_sets_for_every_flag_combination() {
        let mut toggles = ToggleState::new(1).unwrap();
        let cases = [
            (false, false, vec![]),
            (true, false, vec![PassKind::Solid]),
            (false, true, vec![PassKind::Wireframe]),
            (true, true, vec![PassKind::Solid, PassKind::Wireframe]),
        ];

        for (solid, wireframe, expected) in cases {
            toggles.show_solid = solid;
            toggles.show_wireframe = wireframe;
            assert_eq!(toggles.passes().collect::<Vec<_>>(), expected);
        }
    }

    #[test]
    fn test_toggle_returns_new_value() {
        let mut toggles = ToggleState::new(1).unwrap();
        assert!(!toggles.toggle_solid());
        assert!(toggles.toggle_wireframe());
    }

    #[test]
    fn test_reset_camera_restores_home_pose() {
        let camera = Camera::new(1.0).unwrap();
        let mut state = ViewerState::new(
            camera,
            ToggleState::new(3).unwrap(),
            OrbitInput::default(),
            CameraPose::default(),
        )
        .unwrap();
        let home = state.camera;

        state.camera.orbit(glam::Vec2::new(33.0, -12.0), Vec3::ZERO).unwrap();
        assert_ne!(state.camera, home);

        state.reset_camera().unwrap();
        assert!(state.camera.position().abs_diff_eq(home.position(), 1e-6));
        assert!(state.camera.forward().abs_diff_eq(home.forward(), 1e-6));
    }
}
