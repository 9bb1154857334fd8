//! Rigid bodies and their interpolated placements
//!
//! A body advances on the fixed simulation clock but is drawn at frame rate.
//! Each body keeps its previous step's pose so the frame loop can blend the
//! two by the scheduler's leftover-time fraction, giving smooth motion at any
//! frame rate without touching the simulation state.

use std::fmt;

use glam::{Mat3, Mat4, Vec3};

/// Anything the renderer can place in the world on a body's behalf.
///
/// The simulation never inspects the handle; it only forwards the blended
/// placement matrix once per frame.
pub trait Drawable {
    fn draw(&self, placement: Mat4);
}

/// Pose captured at the start of the most recent step, kept for blending.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot {
    pub center: Vec3,
    pub orientation: Mat3,
}

/// A body under simple Euler integration with a single spin axis.
pub struct RigidBody {
    pub center: Vec3,
    pub orientation: Mat3,
    previous: Snapshot,
    pub linear_velocity: Vec3,
    /// Radians per second about `spin_axis`
    pub angular_velocity: f32,
    /// World-frame rotation axis, unit length
    pub spin_axis: Vec3,
    /// Per-axis scale folded into the drawn placement
    pub size: Vec3,
    drawn_location: Mat4,
    drawable: Option<Box<dyn Drawable>>,
}

impl RigidBody {
    pub fn new() -> Self {
        Self {
            center: Vec3::ZERO,
            orientation: Mat3::IDENTITY,
            previous: Snapshot {
                center: Vec3::ZERO,
                orientation: Mat3::IDENTITY,
            },
            linear_velocity: Vec3::ZERO,
            angular_velocity: 0.0,
            spin_axis: Vec3::Z,
            size: Vec3::ONE,
            drawn_location: Mat4::IDENTITY,
            drawable: None,
        }
    }

    /// Teleport the body to a placement and motion state. The previous pose
    /// snaps along so the next blend does not sweep across the jump.
    pub fn place(
        &mut self,
        transform: Mat4,
        linear_velocity: Vec3,
        angular_velocity: f32,
        spin_axis: Vec3,
    ) {
        self.center = transform.w_axis.truncate();
        self.orientation = Mat3::from_mat4(transform);
        self.previous = Snapshot {
            center: self.center,
            orientation: self.orientation,
        };
        self.linear_velocity = linear_velocity;
        self.angular_velocity = angular_velocity;
        self.spin_axis = spin_axis;
    }

    /// One fixed step of integration. Position is explicit Euler; the
    /// orientation is pre-multiplied by a world-frame axis-angle increment so
    /// the spin axis stays fixed in the world, not in the body.
    pub fn advance(&mut self, dt: f32) {
        debug_assert!(dt > 0.0);
        self.previous = Snapshot {
            center: self.center,
            orientation: self.orientation,
        };
        self.center += self.linear_velocity * dt;
        self.orientation =
            Mat3::from_axis_angle(self.spin_axis, self.angular_velocity * dt) * self.orientation;
    }

    /// Rebuild the drawn placement from the previous and current poses.
    ///
    /// The orientation blend is a plain per-component matrix lerp: between
    /// steps the drawn basis is not orthonormal and shrinks slightly toward
    /// the rotation midpoint.
    pub fn blend(&mut self, alpha: f32) {
        let center = self.previous.center.lerp(self.center, alpha);
        let orientation = self.previous.orientation * (1.0 - alpha) + self.orientation * alpha;
        self.drawn_location = Mat4::from_translation(center)
            * Mat4::from_mat3(orientation)
            * Mat4::from_scale(self.size);
    }

    pub fn drawn_location(&self) -> Mat4 {
        self.drawn_location
    }

    pub fn previous(&self) -> Snapshot {
        self.previous
    }

    pub fn set_drawable(&mut self, drawable: Box<dyn Drawable>) {
        self.drawable = Some(drawable);
    }

    /// Forward the current blended placement to the attached drawable, if any.
    pub fn draw(&self) {
        if let Some(drawable) = &self.drawable {
            drawable.draw(self.drawn_location);
        }
    }
}

impl Default for RigidBody {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RigidBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RigidBody")
            .field("center", &self.center)
            .field("orientation", &self.orientation)
            .field("linear_velocity", &self.linear_velocity)
            .field("angular_velocity", &self.angular_velocity)
            .field("spin_axis", &self.spin_axis)
            .field("size", &self.size)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_moves_center_and_trails_previous() {
        let mut body = RigidBody::new();
        body.linear_velocity = Vec3::new(2.0, -1.0, 0.0);

        body.advance(0.5);
        assert_eq!(body.center, Vec3::new(1.0, -0.5, 0.0));
        assert_eq!(body.previous().center, Vec3::ZERO);

        body.advance(0.5);
        assert_eq!(body.center, Vec3::new(2.0, -1.0, 0.0));
        assert_eq!(body.previous().center, Vec3::new(1.0, -0.5, 0.0));
    }

    #[test]
    fn advance_premultiplies_world_frame_rotation() {
        let mut body = RigidBody::new();
        body.orientation = Mat3::from_axis_angle(Vec3::Y, 0.7);
        body.spin_axis = Vec3::X;
        body.angular_velocity = 1.0;

        body.advance(0.1);

        let expected = Mat3::from_axis_angle(Vec3::X, 0.1) * Mat3::from_axis_angle(Vec3::Y, 0.7);
        assert!(body.orientation.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn blend_endpoints_match_previous_and_current_pose() {
        let mut body = RigidBody::new();
        body.linear_velocity = Vec3::new(4.0, 0.0, 0.0);
        body.angular_velocity = 2.0;
        body.size = Vec3::new(1.0, 2.0, 1.0);
        body.advance(0.25);

        body.blend(0.0);
        let at_prev = Mat4::from_translation(body.previous().center)
            * Mat4::from_mat3(body.previous().orientation)
            * Mat4::from_scale(body.size);
        assert!(body.drawn_location().abs_diff_eq(at_prev, 1e-6));

        body.blend(0.999_999);
        let at_current = Mat4::from_translation(body.center)
            * Mat4::from_mat3(body.orientation)
            * Mat4::from_scale(body.size);
        assert!(body.drawn_location().abs_diff_eq(at_current, 1e-4));
    }

    #[test]
    fn place_snaps_previous_pose() {
        let mut body = RigidBody::new();
        body.advance(1.0);
        body.place(
            Mat4::from_translation(Vec3::new(3.0, 4.0, 0.0)),
            Vec3::new(1.0, 0.0, 0.0),
            0.5,
            Vec3::Z,
        );

        assert_eq!(body.center, Vec3::new(3.0, 4.0, 0.0));
        assert_eq!(body.previous().center, body.center);
        assert_eq!(body.linear_velocity, Vec3::new(1.0, 0.0, 0.0));
    }
}
