#![allow(dead_code)]
//! Binding table and resolver trait.
//!
//! Clips carry canonical target paths; hosts resolve those to opaque handles
//! (bones/nodes) in prebind(). The table maps ClipId to the resolved handle,
//! and shots snapshot the handle when they start.

use serde::{Deserialize, Serialize};

use crate::ids::ClipId;

/// Opaque target handle (small string key).
pub type TargetHandle = String;

/// Trait for resolving canonical target paths to opaque handles.
/// Hosts (scene adapters) implement this and pass into Engine::prebind().
pub trait TargetResolver {
    fn resolve(&mut self, path: &str) -> Option<TargetHandle>;
}

/// One row in the global binding table.
#[derive(Clone, Debug)]
pub struct BindingRow {
    pub clip: ClipId,
    pub handle: TargetHandle,
}

/// Global binding table shared across shots.
#[derive(Default, Debug)]
pub struct BindingTable {
    pub rows: Vec<BindingRow>,
}

impl BindingTable {
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Look up an existing row by clip id.
    pub fn get(&self, clip: ClipId) -> Option<&BindingRow> {
        self.rows.iter().find(|r| r.clip == clip)
    }

    /// Insert or update a binding row for a clip.
    pub fn upsert(&mut self, clip: ClipId, handle: TargetHandle) {
        if let Some(row) = self.rows.iter_mut().find(|r| r.clip == clip) {
            row.handle = handle;
        } else {
            self.rows.push(BindingRow { clip, handle });
        }
    }
}

/// One (clip, target) pairing inside a shot, optionally time-shifted so that
/// sub-parts of an action desynchronize while sharing one clock.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ShotBinding {
    pub clip: ClipId,
    /// Offset in frames added to this clip's local window within the shot.
    #[serde(default)]
    pub start_offset: f32,
}

impl ShotBinding {
    pub fn new(clip: ClipId) -> Self {
        Self {
            clip,
            start_offset: 0.0,
        }
    }

    pub fn offset(clip: ClipId, start_offset: f32) -> Self {
        Self { clip, start_offset }
    }
}
