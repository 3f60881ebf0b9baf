use glam::{Mat4, Quat, Vec3};

/// Position and orientation of anything placed in the scene.
///
/// The rotation is kept unit length: every setter and composition renormalizes it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    position: Vec3,
    rotation: Quat,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
    };

    pub fn new(position: Vec3, rotation: Quat) -> Self {
        Self {
            position,
            rotation: normalize_rotation(rotation),
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn rotation(&self) -> Quat {
        self.rotation
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn set_rotation(&mut self, rotation: Quat) {
        self.rotation = normalize_rotation(rotation);
    }

    /// Applies `delta` on top of the current orientation (world space)
    pub fn rotate(&mut self, delta: Quat) {
        self.rotation = normalize_rotation(delta * self.rotation);
    }

    /// Local +Z in world space
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::Z
    }

    /// Local +Y in world space
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Local +X in world space
    pub fn right(&self) -> Vec3 {
        self.rotation * Vec3::X
    }

    /// Local-to-world matrix
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

fn normalize_rotation(rotation: Quat) -> Quat {
    let length_squared = rotation.length_squared();
    if !rotation.is_finite() || length_squared <= f32::EPSILON {
        return Quat::IDENTITY;
    }
    rotation * length_squared.sqrt().recip()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_axes() {
        let transform = Transform::default();
        assert_eq!(transform.forward(), Vec3::Z);
        assert_eq!(transform.up(), Vec3::Y);
        assert_eq!(transform.right(), Vec3::X);
    }

    #[test]
    fn test_rotation_is_normalized_on_set() {
        let mut transform = Transform::default();
        transform.set_rotation(Quat::from_xyzw(0.0, 2.0, 0.0, 2.0));
        assert!(transform.rotation().is_normalized());
    }

    #[test]
    fn test_degenerate_rotation_falls_back_to_identity() {
        let transform = Transform::new(Vec3::ONE, Quat::from_xyzw(0.0, 0.0, 0.0, 0.0));
        assert_eq!(transform.rotation(), Quat::IDENTITY);
    }

    #[test]
    fn test_repeated_composition_stays_normalized() {
        let mut transform = Transform::default();
        let step = Quat::from_axis_angle(Vec3::new(1.0, 1.0, 0.0).normalize(), 0.013);
        for _ in 0..10_000 {
            transform.rotate(step);
        }
        assert!((transform.rotation().length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_matrix_applies_rotation_then_translation() {
        let transform = Transform::new(
            Vec3::new(1.0, 2.0, 3.0),
            Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
        );
        let point = transform.matrix().transform_point3(Vec3::Z);
        assert!(point.abs_diff_eq(Vec3::new(2.0, 2.0, 3.0), 1e-5));
    }
}
