use glam::{Vec2, Vec3};
use orbit_viewer::camera::{Camera, DEFAULT_FIELD_OF_VIEW};
use orbit_viewer::CameraError;

const EPSILON: f32 = 1e-4;

fn home_camera() -> Camera {
    let mut camera = Camera::new(4.0 / 3.0).unwrap();
    camera.set_position(Vec3::new(0.0, 0.0, -3.0)).unwrap();
    camera.look_at(Vec3::ZERO).unwrap();
    camera
}

#[cfg(test)]
mod look_at_tests {
    use super::*;

    #[test]
    fn test_home_pose_faces_positive_z() {
        let camera = home_camera();
        assert!(camera.forward().abs_diff_eq(Vec3::new(0.0, 0.0, 1.0), EPSILON));
    }

    #[test]
    fn test_forward_points_at_target_from_many_positions() {
        let targets = [Vec3::ZERO, Vec3::new(1.0, -2.0, 0.5), Vec3::new(-4.0, 0.0, 3.0)];
        let positions = [
            Vec3::new(5.0, 0.0, 0.0),
            Vec3::new(-1.0, 3.0, 2.0),
            Vec3::new(0.3, -7.0, 0.1),
            Vec3::new(2.0, 2.0, -9.0),
        ];

        for target in targets {
            for position in positions {
                let mut camera = Camera::new(1.0).unwrap();
                camera.set_position(position).unwrap();
                camera.look_at(target).unwrap();

                let expected = (target - position).normalize();
                assert!(
                    camera.forward().abs_diff_eq(expected, EPSILON),
                    "forward {:?} expected {:?}",
                    camera.forward(),
                    expected
                );
                assert!(camera.rotation().is_normalized());
            }
        }
    }

    #[test]
    fn test_look_at_keeps_basis_orthonormal() {
        let mut camera = Camera::new(1.0).unwrap();
        camera.set_position(Vec3::new(2.0, 5.0, -1.0)).unwrap();
        camera.look_at_with_up(Vec3::ZERO, Vec3::new(0.2, 1.0, 0.1)).unwrap();

        let (f, u, r) = (camera.forward(), camera.up(), camera.right());
        assert!(f.dot(u).abs() < EPSILON);
        assert!(f.dot(r).abs() < EPSILON);
        assert!(u.dot(r).abs() < EPSILON);
        assert!(r.cross(u).abs_diff_eq(f, EPSILON), "basis must be right-handed");
    }

    #[test]
    fn test_look_at_self_is_rejected() {
        let mut camera = home_camera();
        let err = camera.look_at(Vec3::new(0.0, 0.0, -3.0)).unwrap_err();
        assert!(matches!(err, CameraError::DegenerateLookAt { .. }));
        assert!(camera.forward().abs_diff_eq(Vec3::Z, EPSILON));
    }
}

#[cfg(test)]
mod projection_tests {
    use super::*;

    fn assert_closed_form(camera: &Camera) {
        let f = 1.0 / (camera.field_of_view().to_radians() / 2.0).tan();
        let (near, far) = (camera.near_plane(), camera.far_plane());
        let m = camera.projection_matrix().to_cols_array_2d();

        let expected = [
            [f / camera.aspect_ratio(), 0.0, 0.0, 0.0],
            [0.0, f, 0.0, 0.0],
            [0.0, 0.0, far / (near - far), -1.0],
            [0.0, 0.0, near * far / (near - far), 0.0],
        ];
        for col in 0..4 {
            for row in 0..4 {
                let tolerance = EPSILON * expected[col][row].abs().max(1.0);
                assert!(
                    (m[col][row] - expected[col][row]).abs() < tolerance,
                    "m[{}][{}] = {}, expected {}",
                    col,
                    row,
                    m[col][row],
                    expected[col][row]
                );
            }
        }
    }

    #[test]
    fn test_projection_matches_closed_form() {
        assert_closed_form(&Camera::new(16.0 / 9.0).unwrap());
        assert_closed_form(&Camera::with_projection(1.0, 90.0, 0.5, 50.0).unwrap());
        assert_closed_form(&Camera::with_projection(0.5, 20.0, 0.01, 1000.0).unwrap());
    }

    #[test]
    fn test_projection_maps_near_and_far_to_unit_depth() {
        let camera = Camera::with_projection(1.0, DEFAULT_FIELD_OF_VIEW, 1.0, 10.0).unwrap();
        let projection = camera.projection_matrix();

        let near = projection.project_point3(Vec3::new(0.0, 0.0, -1.0));
        let far = projection.project_point3(Vec3::new(0.0, 0.0, -10.0));
        assert!(near.z.abs() < EPSILON);
        assert!((far.z - 1.0).abs() < EPSILON);
    }

    #[test]
    fn test_resize_updates_aspect_and_projection() {
        for (width, height) in [(800u32, 600u32), (1920, 1080), (300, 900), (1, 1)] {
            let mut camera = home_camera();
            camera.set_aspect_ratio(width as f32 / height as f32).unwrap();

            assert_eq!(camera.aspect_ratio(), width as f32 / height as f32);
            assert_closed_form(&camera);
        }
    }

    #[test]
    fn test_invalid_aspect_leaves_camera_unchanged() {
        let mut camera = home_camera();
        let before = camera;
        for aspect in [0.0, -1.0, f32::NAN, f32::INFINITY] {
            assert!(camera.set_aspect_ratio(aspect).is_err());
        }
        assert_eq!(camera, before);
    }

    #[test]
    fn test_field_of_view_setter_validates() {
        let mut camera = home_camera();
        camera.set_field_of_view(70.0).unwrap();
        assert_eq!(camera.field_of_view(), 70.0);
        assert!(matches!(
            camera.set_field_of_view(0.0),
            Err(CameraError::InvalidFieldOfView(_))
        ));
        assert_eq!(camera.field_of_view(), 70.0);
    }
}

#[cfg(test)]
mod orbit_radius_tests {
    use super::*;

    const ANGLES: [f32; 12] = [0.0, 1.0, 15.0, 30.0, 45.0, 89.0, 90.0, 135.0, 180.0, 270.0, 360.0, -90.0];

    #[test]
    fn test_orbit_preserves_radius_across_angle_grid() {
        for yaw in ANGLES {
            for pitch in ANGLES {
                let mut camera = home_camera();
                camera.orbit(Vec2::new(yaw, pitch), Vec3::ZERO).unwrap();

                let radius = camera.position().length();
                assert!(
                    (radius - 3.0).abs() < 1e-3,
                    "radius {} after orbit ({}, {})",
                    radius,
                    yaw,
                    pitch
                );
                assert!(camera.rotation().is_normalized());
                let to_origin = -camera.position().normalize();
                assert!(camera.forward().abs_diff_eq(to_origin, 1e-3));
            }
        }
    }

    #[test]
    fn test_repeated_small_orbits_do_not_drift() {
        let mut camera = home_camera();
        for _ in 0..1000 {
            camera.orbit(Vec2::new(0.7, -0.3), Vec3::ZERO).unwrap();
        }
        assert!((camera.position().length() - 3.0).abs() < 1e-2);
        assert!(camera.rotation().is_normalized());
    }

    #[test]
    fn test_full_yaw_returns_home() {
        let mut camera = home_camera();
        camera.orbit(Vec2::new(360.0, 0.0), Vec3::ZERO).unwrap();
        assert!(camera.position().abs_diff_eq(Vec3::new(0.0, 0.0, -3.0), 1e-3));
    }
}
