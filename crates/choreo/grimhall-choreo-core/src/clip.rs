#![allow(dead_code)]
//! Canonical clip data model: one named keyframe track over a single
//! animatable property.

use serde::{Deserialize, Serialize};

use crate::ids::ClipId;
use crate::interp::Easing;
use crate::value::Value;

/// A single keyframe at an integer frame index.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Keyframe {
    pub frame: u32,
    pub value: Value,
}

/// A named keyframe track targeting one animatable property path
/// (e.g. "hero/ArmR.rotation"). Immutable once loaded into the engine.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Clip {
    /// Internal id assigned when loaded into the engine.
    #[serde(skip)]
    pub id: Option<ClipId>,
    pub name: String,
    /// Canonical target path resolved to an opaque handle at prebind time.
    #[serde(rename = "target")]
    pub target_path: String,
    pub keys: Vec<Keyframe>,
    #[serde(default)]
    pub easing: Easing,
}

impl Clip {
    pub fn new(name: &str, target_path: &str, keys: Vec<Keyframe>, easing: Easing) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            target_path: target_path.to_string(),
            keys,
            easing,
        }
    }

    /// Derived length in frames: the highest keyframe index.
    #[inline]
    pub fn length(&self) -> u32 {
        self.keys.last().map(|k| k.frame).unwrap_or(0)
    }

    /// Validate basic invariants (non-empty, strictly increasing frames).
    pub fn validate_basic(&self) -> Result<(), String> {
        if self.keys.is_empty() {
            return Err(format!("Clip '{}' has no keyframes", self.name));
        }
        let mut last: Option<u32> = None;
        for k in &self.keys {
            if let Some(prev) = last {
                if k.frame <= prev {
                    return Err(format!(
                        "Keyframe frames must be strictly increasing for '{}'",
                        self.name
                    ));
                }
            }
            last = Some(k.frame);
        }
        Ok(())
    }
}
