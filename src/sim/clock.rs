//! Fixed-timestep scheduler
//!
//! Frame time arrives at whatever rate the host runs; simulation consumes it
//! in fixed 1/20 s steps through an accumulator. Leftover time below one step
//! becomes the blend fraction handed to every body, so rendering interpolates
//! between the last two simulated poses.
//!
//! `time_scale` may be negative: the drain loop walks the accumulator toward
//! zero in signed steps, so rewinding time replays steps with `t` and the
//! accumulator both running backwards. Step callbacks still receive a
//! positive `dt`; reversal is the scheduler's concern, not the hook's.

use serde::{Deserialize, Serialize};

use crate::consts::{FRAME_TIME_CAP, SIM_DT};
use crate::sim::body::RigidBody;

/// Per-step simulation callback, run once per fixed step before bodies
/// integrate. This is the seam where game rules plug into the clock; there is
/// no default because a scheduler without rules is meaningless.
pub trait StepHook {
    fn on_step(&mut self, dt: f32, bodies: &mut Vec<RigidBody>);
}

/// Accumulator clock driving fixed steps out of variable frame times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stepper {
    /// Unconsumed frame time, always strictly inside (-dt, dt) after a tick
    pub accumulator: f32,
    /// Fixed step size in seconds
    pub dt: f32,
    /// Frame-time multiplier; negative runs the simulation backwards
    pub time_scale: f32,
    /// Signed simulated time
    pub t: f32,
    /// Total steps executed, forward or backward
    pub steps: u64,
}

impl Default for Stepper {
    fn default() -> Self {
        Self {
            accumulator: 0.0,
            dt: SIM_DT,
            time_scale: 1.0,
            t: 0.0,
            steps: 0,
        }
    }
}

impl Stepper {
    /// Ingest one frame of wall time, run as many fixed steps as it covers,
    /// then blend every body by the leftover fraction. Returns that fraction.
    ///
    /// Frame time is capped at [`FRAME_TIME_CAP`] so a stall (debugger,
    /// tab switch) does not trigger a catch-up avalanche.
    pub fn tick(
        &mut self,
        frame_time: f32,
        bodies: &mut Vec<RigidBody>,
        hook: &mut dyn StepHook,
    ) -> f32 {
        let frame = frame_time * self.time_scale;
        self.accumulator += frame.min(FRAME_TIME_CAP);
        let dir = if frame < 0.0 { -1.0 } else { 1.0 };

        while self.accumulator.abs() >= self.dt {
            hook.on_step(self.dt, bodies);
            for body in bodies.iter_mut() {
                body.advance(self.dt);
            }
            self.t += dir * self.dt;
            self.accumulator -= dir * self.dt;
            self.steps += 1;
        }

        let alpha = self.accumulator / self.dt;
        for body in bodies.iter_mut() {
            body.blend(alpha);
        }
        alpha
    }
}
