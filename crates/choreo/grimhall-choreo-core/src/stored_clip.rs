#![allow(dead_code)]
//! Stored-clip JSON loader.
//!
//! Parses an authored clip document into the canonical Clip (clip.rs).
//! Values are converted from untagged raw shapes into the core Value enum;
//! easing defaults to linear when omitted.

use serde::Deserialize;
use thiserror::Error;

use crate::clip::{Clip, Keyframe};
use crate::ids::ClipId;
use crate::interp::Easing;
use crate::value::Value;

/// Errors produced while loading stored clip JSON.
#[derive(Debug, Error)]
pub enum StoredClipError {
    #[error("clip json parse error: {0}")]
    Parse(String),
    #[error("invalid clip: {0}")]
    Invalid(String),
}

/// Parse stored-clip JSON into a canonical Clip.
pub fn parse_stored_clip_json(s: &str) -> Result<Clip, StoredClipError> {
    let sc: StoredClip = serde_json::from_str(s).map_err(|e| StoredClipError::Parse(e.to_string()))?;

    let mut keys: Vec<Keyframe> = Vec::with_capacity(sc.keys.len());
    for k in sc.keys {
        keys.push(Keyframe {
            frame: k.frame,
            value: to_core_value(&k.value),
        });
    }

    let clip = Clip {
        id: None::<ClipId>,
        name: sc.name,
        target_path: sc.target,
        keys,
        easing: sc.easing.unwrap_or_default(),
    };
    // Basic validation (non-empty, strictly increasing frames)
    clip.validate_basic().map_err(StoredClipError::Invalid)?;
    Ok(clip)
}

fn to_core_value(v: &RawValue) -> Value {
    match v {
        RawValue::Boolean(b) => Value::Bool(*b),
        RawValue::Number(n) => Value::Float(*n as f32),
        RawValue::Vector3 { x, y, z } => Value::Vec3([*x as f32, *y as f32, *z as f32]),
        RawValue::Quaternion { x, y, z, w } => {
            Value::Quat([*x as f32, *y as f32, *z as f32, *w as f32])
        }
    }
}

#[derive(Deserialize)]
struct StoredClip {
    name: String,
    target: String,
    #[serde(default)]
    easing: Option<Easing>,
    keys: Vec<StoredKey>,
}

#[derive(Deserialize)]
struct StoredKey {
    frame: u32,
    value: RawValue,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawValue {
    Boolean(bool),
    Number(f64),
    // Quaternion first: untagged matching ignores unknown fields, so a
    // {x,y,z,w} object would otherwise match Vector3.
    Quaternion { x: f64, y: f64, z: f64, w: f64 },
    Vector3 { x: f64, y: f64, z: f64 },
}
