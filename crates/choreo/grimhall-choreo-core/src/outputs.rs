#![allow(dead_code)]
//! Output contracts from the core engine.
//!
//! Outputs carry only the value changes for this tick, keyed by stable
//! string TargetHandle, and a separate list of semantic events. Hosts apply
//! changes to the scene; the battle layer consumes events.

use serde::{Deserialize, Serialize};

use crate::binding::TargetHandle;
use crate::ids::{ClipId, EventTag, ShotId};
use crate::value::Value;

/// One changed target value for a given shot this tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Change {
    pub shot: ShotId,
    pub key: TargetHandle,
    pub value: Value,
}

/// Discrete semantic signals emitted during stepping.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum CoreEvent {
    /// A registered (clip, frame) slot was crossed by a live shot.
    /// Fires exactly once per pass, in frame order along the playback
    /// direction; once per iteration for looping shots.
    FrameEvent {
        shot: ShotId,
        clip: ClipId,
        frame: u32,
        tag: EventTag,
    },
    /// A looping shot's clock wrapped back to the start.
    LoopBoundary { shot: ShotId },
    /// A one-shot (or reverse) playback reached its end. Emitted exactly
    /// once; stopped shots never emit it.
    ShotCompleted { shot: ShotId },
}

/// Outputs returned by Engine::update().
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Outputs {
    #[serde(default)]
    pub changes: Vec<Change>,
    #[serde(default)]
    pub events: Vec<CoreEvent>,
}

impl Outputs {
    #[inline]
    pub fn clear(&mut self) {
        self.changes.clear();
        self.events.clear();
    }

    #[inline]
    pub fn push_change(&mut self, change: Change) {
        self.changes.push(change);
    }

    #[inline]
    pub fn push_event(&mut self, event: CoreEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.changes.is_empty() && self.events.is_empty()
    }
}
