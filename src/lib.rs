//! Tilt Core - the physics heart of a pinball table
//!
//! Core modules:
//! - `sim`: deterministic simulation (rigid bodies, fixed timestep, table
//!   collision resolution, session state)
//!
//! Rendering, shaders, asset loading and input wiring are external
//! collaborators: the core consumes an opaque drawable handle per body and
//! exposes one interpolated placement transform per body in return.

pub mod sim;

pub use sim::Session;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Fixed simulation timestep (20 Hz table physics)
    pub const SIM_DT: f32 = 1.0 / 20.0;
    /// Largest slice of frame time a single tick may ingest; bounds the
    /// catch-up work after a stall
    pub const FRAME_TIME_CAP: f32 = 0.1;

    /// Downward acceleration applied to every body each step
    pub const GRAVITY_Y: f32 = -1.0;
    /// Mild vertical energy bleed per step
    pub const VERTICAL_DAMPING: f32 = 0.999;
    /// Per-axis velocity clamp applied after every resolver pass
    pub const SPEED_LIMIT: f32 = 8.0;

    /// Field extents. Bounce thresholds sit one wall inset inside the
    /// nominal edges; the inset folds wall thickness and ball radius.
    pub const FIELD_TOP: f32 = 11.0;
    pub const FIELD_HALF_WIDTH: f32 = 7.0;
    pub const WALL_INSET: f32 = 2.0;
    /// A ball below this line is lost
    pub const FLOOR_Y: f32 = -12.0;

    /// Fresh balls appear here, drifting down toward the flippers
    pub const BALL_SPAWN: Vec2 = Vec2::new(0.0, 8.0);
    pub const BALL_SPAWN_VELOCITY: Vec2 = Vec2::new(1.2, -1.0);
    pub const START_LIVES: u8 = 3;

    /// Bounce strengths (impulse scale along the contact normal)
    pub const BUMPER_BOUNCE: f32 = 2.0;
    pub const ARC_FACE_BOUNCE: f32 = 1.0;
    pub const ARC_TIP_BOUNCE: f32 = 1.7;
    pub const PANEL_BOUNCE: f32 = 1.7;
    pub const FLIPPER_BOUNCE: f32 = 1.7;
    /// A flipper mid-swing hits much harder than one at rest
    pub const FLIPPER_STRIKE_BOUNCE: f32 = 3.5;

    /// Scoring
    pub const BUMPER_SCORE: u64 = 100;
    pub const PANEL_SCORE: u64 = 20;

    /// Steps a fired panel stays latched before it can fire again
    pub const PANEL_COOLDOWN_STEPS: u8 = 6;
    /// Half-width of the edge band that counts as contact
    pub const EDGE_CONTACT_BAND: f32 = 0.5;
    /// Rotations whose sine or cosine fall below this have no usable
    /// slope/intercept form and the panel test is skipped for that step
    pub const MIN_EDGE_TRIG: f32 = 1e-3;

    /// The bank layout rearranges at this step count
    pub const BANK_SWITCH_STEP: u64 = 130;

    /// Portal ("black hole") capture and respawn
    pub const BLACK_HOLE_CENTER: Vec2 = Vec2::new(0.0, 3.0);
    pub const BLACK_HOLE_BASE_SIZE: f32 = 1.0;
    pub const BLACK_HOLE_SWELL: f32 = 0.75;
    pub const RESPAWN_POINT: Vec2 = Vec2::new(-5.0, 5.0);
    pub const RESPAWN_SPEED: f32 = 3.0;

    /// Flipper swing duration in fixed steps
    pub const SWING_STEPS: u64 = 8;
}
