#![allow(dead_code)]
//! Grimhall Choreography Core (engine-agnostic)
//!
//! The playback machinery under the dungeon crawler's combat scenes: clips
//! (named keyframe tracks), a playback engine advancing many clips against
//! many targets on one shared virtual clock (one-shot, looping, reverse),
//! and a frame event scheduler that reports exact-frame crossings exactly
//! once per pass. The crate never touches a scene graph: hosts resolve
//! target paths to opaque handles and apply the emitted changes.

pub mod binding;
pub mod clip;
pub mod config;
pub mod engine;
pub mod events;
pub mod ids;
pub mod interp;
pub mod outputs;
pub mod sampling;
pub mod stored_clip;
pub mod value;

// Re-exports for consumers (battle layer, adapters)
pub use binding::{BindingTable, ShotBinding, TargetHandle, TargetResolver};
pub use clip::{Clip, Keyframe};
pub use config::Config;
pub use engine::{Engine, PlayMode, Shot};
pub use events::FrameEventScheduler;
pub use ids::{ClipId, EventTag, ShotId};
pub use interp::Easing;
pub use outputs::{Change, CoreEvent, Outputs};
pub use sampling::sample_clip;
pub use stored_clip::parse_stored_clip_json;
pub use value::{Value, ValueKind};
