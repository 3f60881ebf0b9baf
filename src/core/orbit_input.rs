use glam::{Vec2, Vec3};

/// Degrees of orbit per pixel of pointer travel
pub const DEFAULT_ORBIT_SENSITIVITY: f32 = -0.4;

/// Turns per-frame pointer samples into orbit angles.
///
/// The baseline is refreshed on every sample, engaged or not, so pressing the
/// trigger after moving the pointer around does not produce a jump.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitInput {
    sensitivity: f32,
    pivot: Vec3,
    last_position: Option<Vec2>,
}

impl OrbitInput {
    pub fn new(sensitivity: f32, pivot: Vec3) -> Self {
        Self {
            sensitivity,
            pivot,
            last_position: None,
        }
    }

    pub fn sensitivity(&self) -> f32 {
        self.sensitivity
    }

    /// Point the camera orbits around
    pub fn pivot(&self) -> Vec3 {
        self.pivot
    }

    pub fn last_position(&self) -> Option<Vec2> {
        self.last_position
    }

    /// Records `position` and returns the scaled delta when `engaged`
    pub fn sample(&mut self, position: Vec2, engaged: bool) -> Option<Vec2> {
        let previous = self.last_position.replace(position)?;
        if !engaged {
            return None;
        }

        let delta = position - previous;
        (delta != Vec2::ZERO).then(|| delta * self.sensitivity)
    }
}

impl Default for OrbitInput {
    fn default() -> Self {
        Self::new(DEFAULT_ORBIT_SENSITIVITY, Vec3::ZERO)
    }
}
