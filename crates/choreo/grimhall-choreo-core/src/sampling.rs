#![allow(dead_code)]
//! Clip sampling.
//!
//! Model:
//! - Each Clip has ordered Keyframes at integer frame indices.
//! - Segment [Ki -> K(i+1)] timing applies the clip's easing curve to the
//!   normalized local time, then blends values linearly (quat NLERP).
//! - Bool value kinds use true step behavior (hold left) regardless of easing.
//! - Outside the keyed range the clip holds its boundary value, so shorter
//!   tracks in a multi-clip shot simply hold their last pose.
//!
//! Sampling is a pure function of (clip, frame position): reverse playback
//! visits the same values with the same eased shape between adjacent keys.

use crate::clip::{Clip, Keyframe};
use crate::interp::linear_value;
use crate::value::{Value, ValueKind};

/// Find the segment [i, i+1] that contains frame position f, and return
/// (i, i+1, local_t), where local_t is normalized to [0, 1] between
/// keys[i].frame .. keys[i+1].frame.
/// Edge cases:
/// - If f <= first.frame, returns (0, 0, 0) and caller should pick keys[0].
/// - If f >= last.frame, returns (last, last, 0) and caller should pick keys[last].
fn find_segment(keys: &[Keyframe], f: f32) -> (usize, usize, f32) {
    let n = keys.len();
    if n == 0 {
        return (0, 0, 0.0);
    }
    if n == 1 || f <= keys[0].frame as f32 {
        return (0, 0, 0.0);
    }
    if f >= keys[n - 1].frame as f32 {
        return (n - 1, n - 1, 0.0);
    }
    for i in 0..(n - 1) {
        let f0 = keys[i].frame as f32;
        let f1 = keys[i + 1].frame as f32;
        if f >= f0 && f <= f1 {
            let denom = (f1 - f0).max(f32::EPSILON);
            let lt = (f - f0) / denom;
            return (i, i + 1, lt.clamp(0.0, 1.0));
        }
    }
    (n - 1, n - 1, 0.0)
}

/// Sample a single clip at frame position f (clip-local frames).
pub fn sample_clip(clip: &Clip, f: f32) -> Value {
    let keys = &clip.keys;
    match keys.len() {
        0 => {
            // No keys: return a neutral scalar 0.0 (fail-soft).
            Value::Float(0.0)
        }
        1 => keys[0].value.clone(),
        _ => {
            let (i0, i1, lt) = find_segment(keys, f);
            if i0 == i1 {
                return keys[i0].value.clone();
            }
            let left = &keys[i0];
            let right = &keys[i1];

            // Step behavior for Bool tracks regardless of easing.
            if left.value.kind() == ValueKind::Bool {
                return left.value.clone();
            }

            let eased = clip.easing.apply(lt);
            linear_value(&left.value, &right.value, eased)
        }
    }
}
