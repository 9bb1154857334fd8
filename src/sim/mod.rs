//! Deterministic pinball simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - No rendering or platform dependencies
//!
//! Rendering attaches from the outside via [`Drawable`] handles on bodies and
//! reads back one interpolated placement matrix per body after each frame.

pub mod body;
pub mod clock;
pub mod collision;
pub mod session;
pub mod state;
pub mod table;
pub mod tick;

pub use body::{Drawable, RigidBody};
pub use clock::{StepHook, Stepper};
pub use collision::{check_colliding, deflect, intersect_unit_cube, intersect_unit_sphere};
pub use session::Session;
pub use state::{PanelId, PanelLatch, Phase, TableState};
pub use table::{
    bank_layout, black_hole_size, left_panel, right_panel, ArcBank, Bumper, Flipper, RectPanel,
    BUMPERS,
};
pub use tick::{flipper_bounce, resolve_table};
