//! Table obstacle geometry
//!
//! Descriptors for everything bolted to the playfield: round bumpers,
//! quarter-circle arc banks, rotated rectangular panels, and the flippers
//! (which are just panels on a pivot). Geometry only; the per-step contact
//! logic lives in `tick`.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

use glam::{Mat2, Vec2};
use serde::{Deserialize, Serialize};

use crate::consts::{
    BANK_SWITCH_STEP, BLACK_HOLE_BASE_SIZE, BLACK_HOLE_SWELL, MIN_EDGE_TRIG, SWING_STEPS,
};

/// Round bumper: a circle that kicks the ball radially and scores.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Bumper {
    pub center: Vec2,
    pub radius: f32,
}

pub const BUMPERS: [Bumper; 3] = [
    Bumper {
        center: Vec2::new(-2.5, 4.5),
        radius: 0.9,
    },
    Bumper {
        center: Vec2::new(2.5, 4.5),
        radius: 0.9,
    },
    Bumper {
        center: Vec2::new(0.0, 6.0),
        radius: 0.8,
    },
];

/// Quarter-circle bank. The active quadrant is the first quadrant of the
/// bank's local frame (rotation measured counter-clockwise from world axes);
/// the wall occupies the annulus of thickness 2 centred on `radius`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ArcBank {
    pub center: Vec2,
    pub radius: f32,
    pub rotation: f32,
}

const BANKS_EARLY: [ArcBank; 2] = [
    ArcBank {
        center: Vec2::new(-3.5, 6.5),
        radius: 2.0,
        rotation: FRAC_PI_2,
    },
    ArcBank {
        center: Vec2::new(3.5, 6.5),
        radius: 2.0,
        rotation: 0.0,
    },
];

const BANKS_LATE: [ArcBank; 3] = [
    ArcBank {
        center: Vec2::new(-3.5, 6.5),
        radius: 2.0,
        rotation: FRAC_PI_2,
    },
    ArcBank {
        center: Vec2::new(3.5, 6.5),
        radius: 2.0,
        rotation: 0.0,
    },
    ArcBank {
        center: Vec2::new(0.0, 7.5),
        radius: 1.5,
        rotation: FRAC_PI_4,
    },
];

/// The bank arrangement opens up after enough uninterrupted play.
pub fn bank_layout(steps: u64) -> &'static [ArcBank] {
    if steps < BANK_SWITCH_STEP {
        &BANKS_EARLY
    } else {
        &BANKS_LATE
    }
}

/// Portal capture radius, breathing with the step counter.
pub fn black_hole_size(steps: u64) -> f32 {
    BLACK_HOLE_BASE_SIZE + BLACK_HOLE_SWELL * (steps as f32 / 20.0).sin()
}

/// One side of a rotated rectangle in slope/intercept form, with its outward
/// normal. Only usable for rotations safely away from the axes, where both
/// sin and cos are nonzero.
#[derive(Debug, Clone, Copy)]
pub struct PanelEdge {
    pub slope: f32,
    pub intercept: f32,
    pub normal: Vec2,
}

impl PanelEdge {
    pub fn y_at(&self, x: f32) -> f32 {
        self.slope * x + self.intercept
    }
}

/// Rotated rectangle tested edge-by-edge as four slope/intercept lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct RectPanel {
    pub center: Vec2,
    pub rotation: f32,
    pub half_width: f32,
    pub half_length: f32,
}

impl RectPanel {
    /// The four edges as lines: first the pair parallel to the long axis
    /// (normals sideways), then the two end caps (normals along the axis).
    /// Returns `None` when the rotation is too close to an axis for the
    /// slope form to hold; the caller skips the panel for that step.
    pub fn edges(&self) -> Option<[PanelEdge; 4]> {
        let (sin, cos) = self.rotation.sin_cos();
        if sin.abs() < MIN_EDGE_TRIG || cos.abs() < MIN_EDGE_TRIG {
            return None;
        }
        let slope = sin / cos;
        let cross_slope = -cos / sin;
        let axis = Vec2::new(cos, sin);
        let side = Vec2::new(-sin, cos);

        let edge = |slope: f32, through: Vec2, normal: Vec2| PanelEdge {
            slope,
            intercept: through.y - slope * through.x,
            normal,
        };

        Some([
            edge(slope, self.center + side * self.half_width, side),
            edge(slope, self.center - side * self.half_width, -side),
            edge(cross_slope, self.center + axis * self.half_length, axis),
            edge(cross_slope, self.center - axis * self.half_length, -axis),
        ])
    }

    /// Point-in-rectangle via the edge lines: inside means vertically between
    /// both parallel pairs.
    pub fn contains(point: Vec2, edges: &[PanelEdge; 4]) -> bool {
        let long_a = edges[0].y_at(point.x);
        let long_b = edges[1].y_at(point.x);
        let cap_a = edges[2].y_at(point.x);
        let cap_b = edges[3].y_at(point.x);
        point.y >= long_a.min(long_b)
            && point.y <= long_a.max(long_b)
            && point.y >= cap_a.min(cap_b)
            && point.y <= cap_a.max(cap_b)
    }
}

/// Left outlane deflector. Scores on every accepted hit.
pub fn left_panel() -> RectPanel {
    RectPanel {
        center: Vec2::new(-4.8, -2.0),
        rotation: 3.0 * FRAC_PI_4,
        half_width: 0.3,
        half_length: 1.8,
    }
}

/// Right outlane deflector, mirror of the left; no score attached.
pub fn right_panel() -> RectPanel {
    RectPanel {
        center: Vec2::new(4.8, -2.0),
        rotation: FRAC_PI_4,
        half_width: 0.3,
        half_length: 1.8,
    }
}

/// A flipper is a rectangular paddle hinged at `pivot`; its collision
/// rectangle is recomputed from the current pose each time the player (or
/// the swing profile) moves it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Flipper {
    pub pivot: Vec2,
    pub rest_angle: f32,
    pub flick_angle: f32,
    pub half_width: f32,
    pub half_length: f32,
    /// +1 when the paddle extends toward +x from the pivot, -1 mirrored
    reach: f32,
    pub rotation: f32,
    pub center: Vec2,
    /// Mid-swing flippers strike harder
    pub active: bool,
    /// Step count when the current swing was triggered
    pub triggered_at: Option<u64>,
}

impl Flipper {
    fn new(pivot: Vec2, rest_angle: f32, flick_angle: f32, reach: f32) -> Self {
        let mut flipper = Self {
            pivot,
            rest_angle,
            flick_angle,
            half_width: 0.25,
            half_length: 1.4,
            reach,
            rotation: rest_angle,
            center: Vec2::ZERO,
            active: false,
            triggered_at: None,
        };
        flipper.set_pose(rest_angle);
        flipper
    }

    pub fn left() -> Self {
        Self::new(Vec2::new(-3.2, -8.5), -0.45, 0.55, 1.0)
    }

    pub fn right() -> Self {
        Self::new(Vec2::new(3.2, -8.5), 0.45, -0.55, -1.0)
    }

    /// Rotate the paddle about its pivot; the rectangle centre swings with it.
    pub fn set_pose(&mut self, angle: f32) {
        self.rotation = angle;
        self.center =
            self.pivot + Mat2::from_angle(angle) * Vec2::new(self.reach * self.half_length, 0.0);
    }

    /// Current collision rectangle.
    pub fn panel(&self) -> RectPanel {
        RectPanel {
            center: self.center,
            rotation: self.rotation,
            half_width: self.half_width,
            half_length: self.half_length,
        }
    }

    /// Swing profile: a half-sine from rest to flick and back over
    /// [`SWING_STEPS`] fixed steps.
    pub fn swing_angle(&self, steps_since: u64) -> f32 {
        if steps_since >= SWING_STEPS {
            return self.rest_angle;
        }
        let t = steps_since as f32 / SWING_STEPS as f32;
        self.rest_angle + (self.flick_angle - self.rest_angle) * (std::f32::consts::PI * t).sin()
    }
}
