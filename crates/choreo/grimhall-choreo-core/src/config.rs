#![allow(dead_code)]
//! Core configuration for grimhall-choreo-core.

use serde::{Deserialize, Serialize};

/// Configuration for engine sizing.
/// Keep this minimal; expand as needed without breaking API.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    /// Initial capacity hints for live shots and per-tick changes.
    pub shot_capacity: usize,
    pub change_capacity: usize,

    /// Maximum events to retain per tick; extras are dropped with a warning.
    pub max_events_per_tick: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shot_capacity: 16,
            change_capacity: 128,
            max_events_per_tick: 1024,
        }
    }
}
