use glam::{Mat3, Mat4, Quat, Vec2, Vec3};

use crate::error::CameraError;
use crate::transform::Transform;

pub const WORLD_UP: Vec3 = Vec3::Y;
pub const DEFAULT_FIELD_OF_VIEW: f32 = 45.0;
pub const DEFAULT_NEAR_PLANE: f32 = 0.01;
pub const DEFAULT_FAR_PLANE: f32 = 1000.0;

/// Squared distance below which camera and target count as coincident
const COINCIDENT_EPSILON: f32 = 1e-12;
/// Squared sine below which an up vector counts as parallel to the view direction
const PARALLEL_EPSILON: f32 = 1e-6;

/// Perspective camera placed in the scene by a [`Transform`].
///
/// View and projection matrices are derived from the current fields on every
/// call, so they can never go stale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    transform: Transform,
    field_of_view: f32,
    aspect_ratio: f32,
    near_plane: f32,
    far_plane: f32,
}

impl Camera {
    /// Camera at the origin with the default 45° field of view and clip planes
    pub fn new(aspect_ratio: f32) -> Result<Self, CameraError> {
        Self::with_projection(
            aspect_ratio,
            DEFAULT_FIELD_OF_VIEW,
            DEFAULT_NEAR_PLANE,
            DEFAULT_FAR_PLANE,
        )
    }

    pub fn with_projection(
        aspect_ratio: f32,
        field_of_view: f32,
        near_plane: f32,
        far_plane: f32,
    ) -> Result<Self, CameraError> {
        validate_aspect_ratio(aspect_ratio)?;
        validate_field_of_view(field_of_view)?;
        if !(near_plane.is_finite() && far_plane.is_finite() && 0.0 < near_plane && near_plane < far_plane) {
            return Err(CameraError::InvalidClipPlanes {
                near: near_plane,
                far: far_plane,
            });
        }

        Ok(Self {
            transform: Transform::IDENTITY,
            field_of_view,
            aspect_ratio,
            near_plane,
            far_plane,
        })
    }

    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    pub fn position(&self) -> Vec3 {
        self.transform.position()
    }

    pub fn rotation(&self) -> Quat {
        self.transform.rotation()
    }

    pub fn forward(&self) -> Vec3 {
        self.transform.forward()
    }

    pub fn up(&self) -> Vec3 {
        self.transform.up()
    }

    pub fn right(&self) -> Vec3 {
        self.transform.right()
    }

    pub fn field_of_view(&self) -> f32 {
        self.field_of_view
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.aspect_ratio
    }

    pub fn near_plane(&self) -> f32 {
        self.near_plane
    }

    pub fn far_plane(&self) -> f32 {
        self.far_plane
    }

    pub fn set_position(&mut self, position: Vec3) -> Result<(), CameraError> {
        if !position.is_finite() {
            return Err(CameraError::NonFinitePosition(position));
        }
        self.transform.set_position(position);
        Ok(())
    }

    pub fn set_aspect_ratio(&mut self, aspect_ratio: f32) -> Result<(), CameraError> {
        validate_aspect_ratio(aspect_ratio)?;
        self.aspect_ratio = aspect_ratio;
        Ok(())
    }

    pub fn set_field_of_view(&mut self, field_of_view: f32) -> Result<(), CameraError> {
        validate_field_of_view(field_of_view)?;
        self.field_of_view = field_of_view;
        Ok(())
    }

    /// Aims the camera at `target` using the world up axis
    pub fn look_at(&mut self, target: Vec3) -> Result<(), CameraError> {
        self.look_at_with_up(target, WORLD_UP)
    }

    /// Rebuilds the orientation so that the forward axis points at `target`.
    ///
    /// The basis is right-handed: `z` runs from the camera to the target,
    /// `x = up × z`, `y = z × x`. When `up` is parallel to the view direction
    /// the current forward, the current up and finally the world axes are
    /// tried in turn.
    pub fn look_at_with_up(&mut self, target: Vec3, up: Vec3) -> Result<(), CameraError> {
        let offset = self.position() - target;
        if !target.is_finite() || offset.length_squared() <= COINCIDENT_EPSILON {
            return Err(CameraError::DegenerateLookAt { target });
        }

        let direction = offset.normalize();
        let z = -direction;
        let candidates = [up, self.forward(), self.up(), Vec3::X, Vec3::Z];
        let Some(x) = candidates.into_iter().find_map(|candidate| {
            let right = candidate.cross(z);
            (right.length_squared() > PARALLEL_EPSILON).then(|| right.normalize())
        }) else {
            return Err(CameraError::DegenerateLookAt { target });
        };
        let y = z.cross(x);

        self.transform
            .set_rotation(Quat::from_mat3(&Mat3::from_cols(x, y, z)));
        Ok(())
    }

    /// Orbits around `origin`: `angles.x` degrees about the current up axis,
    /// then `angles.y` degrees about the right axis of the re-aimed camera.
    ///
    /// The camera is re-aimed at `origin` after each of the two steps, so the
    /// steps do not commute. The distance to `origin` is preserved. On error
    /// the camera is left as it was before the call.
    pub fn orbit(&mut self, angles: Vec2, origin: Vec3) -> Result<(), CameraError> {
        let before = *self;
        let result = self
            .rotate_about(origin, self.up(), angles.x)
            .and_then(|()| self.rotate_about(origin, self.right(), angles.y));
        if result.is_err() {
            *self = before;
        }
        result
    }

    fn rotate_about(&mut self, origin: Vec3, axis: Vec3, degrees: f32) -> Result<(), CameraError> {
        let rotation = Quat::from_axis_angle(axis.normalize(), degrees.to_radians());
        let position = origin + rotation * (self.position() - origin);
        self.set_position(position)?;
        let up = self.up();
        self.look_at_with_up(origin, up)
    }

    /// World-to-camera transform: translate by the camera position, then apply
    /// the inverse orientation.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_quat(self.rotation().inverse()) * Mat4::from_translation(self.position())
    }

    /// Symmetric right-handed perspective with a `[0, 1]` depth range
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.field_of_view.to_radians(),
            self.aspect_ratio,
            self.near_plane,
            self.far_plane,
        )
    }
}

fn validate_aspect_ratio(aspect_ratio: f32) -> Result<(), CameraError> {
    if aspect_ratio.is_finite() && aspect_ratio > 0.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidAspectRatio(aspect_ratio))
    }
}

fn validate_field_of_view(field_of_view: f32) -> Result<(), CameraError> {
    if field_of_view.is_finite() && field_of_view > 0.0 && field_of_view < 180.0 {
        Ok(())
    } else {
        Err(CameraError::InvalidFieldOfView(field_of_view))
    }
}
