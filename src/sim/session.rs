//! Game session composition root
//!
//! Ties the scheduler, the table state and the body list together behind the
//! small surface the host loop needs: feed frame time in, read score, lives
//! and drawn placements out, trigger flippers.

use glam::{Mat4, Vec3};

use crate::consts::{BALL_SPAWN, BALL_SPAWN_VELOCITY, SWING_STEPS};
use crate::sim::body::RigidBody;
use crate::sim::clock::Stepper;
use crate::sim::state::{Phase, TableState};

#[derive(Debug)]
pub struct Session {
    pub clock: Stepper,
    pub table: TableState,
    pub bodies: Vec<RigidBody>,
}

impl Session {
    pub fn new(seed: u64) -> Self {
        let mut session = Self {
            clock: Stepper::default(),
            table: TableState::new(seed),
            bodies: Vec::new(),
        };
        session.spawn_ball();
        session
    }

    /// Feed one frame of wall time into the simulation. Does nothing once
    /// the game is over; respawns a ball first if the last one drained.
    pub fn step(&mut self, frame_time: f32) {
        if self.table.phase == Phase::GameOver {
            return;
        }
        if self.bodies.is_empty() {
            self.spawn_ball();
        }
        self.clock.tick(frame_time, &mut self.bodies, &mut self.table);
    }

    fn spawn_ball(&mut self) {
        let mut ball = RigidBody::new();
        ball.place(
            Mat4::from_translation(BALL_SPAWN.extend(0.0)),
            BALL_SPAWN_VELOCITY.extend(0.0),
            0.0,
            Vec3::Z,
        );
        self.bodies.push(ball);
    }

    pub fn score(&self) -> u64 {
        self.table.score
    }

    pub fn lives(&self) -> u8 {
        self.table.lives
    }

    pub fn game_over(&self) -> bool {
        self.table.phase == Phase::GameOver
    }

    /// Start a left-flipper swing. Retriggering mid-swing restarts it.
    pub fn trigger_left(&mut self) {
        self.table.left_flipper.active = true;
        self.table.left_flipper.triggered_at = Some(self.table.steps);
    }

    pub fn trigger_right(&mut self) {
        self.table.right_flipper.active = true;
        self.table.right_flipper.triggered_at = Some(self.table.steps);
    }

    /// Apply the sinusoidal swing profile to both flippers based on how many
    /// steps have passed since each was triggered. Call once per frame,
    /// before `step`; a host with its own actuation model can skip this and
    /// drive the flipper poses directly.
    pub fn drive_flippers(&mut self) {
        let steps = self.table.steps;
        for flipper in [&mut self.table.left_flipper, &mut self.table.right_flipper] {
            match flipper.triggered_at {
                Some(start) => {
                    let since = steps.saturating_sub(start);
                    if since >= SWING_STEPS {
                        flipper.active = false;
                        flipper.triggered_at = None;
                        let rest = flipper.rest_angle;
                        flipper.set_pose(rest);
                    } else {
                        let angle = flipper.swing_angle(since);
                        flipper.set_pose(angle);
                    }
                }
                None => {
                    let rest = flipper.rest_angle;
                    flipper.set_pose(rest);
                }
            }
        }
    }

    /// One blended placement per body, in body order.
    pub fn drawn_locations(&self) -> impl Iterator<Item = Mat4> + '_ {
        self.bodies.iter().map(|body| body.drawn_location())
    }

    /// Forward placements to every attached drawable.
    pub fn draw_all(&self) {
        for body in &self.bodies {
            body.draw();
        }
    }

    /// Full restart with a fresh seed.
    pub fn reset(&mut self, seed: u64) {
        *self = Session::new(seed);
    }
}
