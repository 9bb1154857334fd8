//! Session state
//!
//! Everything the table resolver reads and mutates across steps: score,
//! lives, the gameplay step counter, the flipper poses, and the cooldown
//! latches that keep a panel from machine-gunning points while the ball
//! grazes along it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::consts::{PANEL_COOLDOWN_STEPS, START_LIVES};
use crate::sim::table::Flipper;

/// Whether the session is still accepting simulation steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    Active,
    GameOver,
}

/// Identity of each latch-carrying obstacle. BTreeMap keys: ordered so
/// serialization and iteration stay deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PanelId {
    LeftPanel,
    RightPanel,
    LeftFlipper,
    RightFlipper,
}

/// Cooldown record for one obstacle. `ticks` counts the steps since the
/// latch fired.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PanelLatch {
    pub colliding: bool,
    pub ticks: u8,
}

/// The mutable heart of a game session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableState {
    pub seed: u64,
    pub score: u64,
    pub lives: u8,
    /// Gameplay steps since the current ball entered play; resets on loss
    pub steps: u64,
    pub phase: Phase,
    latches: BTreeMap<PanelId, PanelLatch>,
    pub left_flipper: Flipper,
    pub right_flipper: Flipper,
}

impl TableState {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            score: 0,
            lives: START_LIVES,
            steps: 0,
            phase: Phase::Active,
            latches: BTreeMap::new(),
            left_flipper: Flipper::left(),
            right_flipper: Flipper::right(),
        }
    }

    /// Advance the latch for `id` by one step and report whether the
    /// obstacle may fire. A latched obstacle stays suppressed for
    /// [`PANEL_COOLDOWN_STEPS`] steps after firing, then rearms.
    pub fn latch_open(&mut self, id: PanelId) -> bool {
        let latch = self.latches.entry(id).or_default();
        if latch.colliding {
            latch.ticks += 1;
            if latch.ticks > PANEL_COOLDOWN_STEPS {
                *latch = PanelLatch::default();
                true
            } else {
                false
            }
        } else {
            true
        }
    }

    /// Record that `id` just fired, starting its cooldown.
    pub fn latch_fire(&mut self, id: PanelId) {
        self.latches.insert(
            id,
            PanelLatch {
                colliding: true,
                ticks: 0,
            },
        );
    }
}
