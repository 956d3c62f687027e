#![allow(dead_code)]
//! Engine: data ownership and public API with time math + sampling + frame
//! event firing.
//!
//! Methods:
//! - new, load_clip, prebind (resolver), attach_event/detach_event,
//!   play_once / play_loop / play_reverse, stop, update
//!
//! Scheduling is single-threaded and cooperative: all advancement, sampling
//! and event firing happens synchronously inside update(), driven by the
//! host's per-frame tick. Stopping a shot detaches it; it does not roll back
//! values already written.

use log::warn;

use crate::binding::{BindingTable, ShotBinding, TargetHandle, TargetResolver};
use crate::clip::Clip;
use crate::config::Config;
use crate::events::FrameEventScheduler;
use crate::ids::{ClipId, EventTag, IdAllocator, ShotId};
use crate::outputs::{Change, CoreEvent, Outputs};
use crate::sampling::sample_clip;

/// Playback mode of one shot.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PlayMode {
    /// Clock runs 0..=duration once, then the shot completes.
    Once,
    /// Clock wraps at duration; a LoopBoundary event fires per wrap.
    Loop,
    /// Clock runs duration..=0 once, then the shot completes.
    Reverse,
}

/// A binding with its handle snapshot taken when the shot started.
#[derive(Clone, Debug)]
struct ResolvedBinding {
    clip: ClipId,
    start_offset: f32,
    length: u32,
    handle: Option<TargetHandle>,
}

/// One live playback: a set of bindings advanced by a shared virtual clock
/// over [0, duration] where duration = max(start_offset + clip length).
#[derive(Debug)]
pub struct Shot {
    pub id: ShotId,
    mode: PlayMode,
    speed: f32,
    clock: f32,
    duration: f32,
    bindings: Vec<ResolvedBinding>,
    /// The next fire window includes its starting edge (shot start and loop
    /// restarts), so frame 0 (or the last frame, in reverse) fires too.
    include_edge: bool,
    done: bool,
}

impl Shot {
    #[inline]
    pub fn clock(&self) -> f32 {
        self.clock
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }
}

/// Minimal clip library storage.
#[derive(Default, Debug)]
struct ClipLib {
    items: Vec<(ClipId, Clip)>,
}

impl ClipLib {
    fn insert(&mut self, id: ClipId, clip: Clip) {
        self.items.push((id, clip));
    }
    fn get(&self, id: ClipId) -> Option<&Clip> {
        self.items
            .iter()
            .find_map(|(c, d)| if *c == id { Some(d) } else { None })
    }
    fn iter(&self) -> impl Iterator<Item = &(ClipId, Clip)> {
        self.items.iter()
    }
}

/// Engine (core) with engine-agnostic handle type fixed to String.
#[derive(Debug)]
pub struct Engine {
    // Owned data
    cfg: Config,
    ids: IdAllocator,
    clips: ClipLib,
    shots: Vec<Shot>,

    // Systems
    binds: BindingTable,
    events: FrameEventScheduler,

    // Per-tick outputs
    outputs: Outputs,
}

/// A frame event crossing collected while stepping one shot, positioned on
/// the shot's global clock so multi-clip shots fire in clock order.
struct Crossing {
    at: f32,
    clip: ClipId,
    frame: u32,
    tag: EventTag,
}

/// Collect registered frames crossed by an ascending window over one
/// binding's local domain. Window is (lo, hi], or [lo, hi] when
/// `include_lo` (first tick / loop restart).
fn collect_ascending(
    sched: &FrameEventScheduler,
    bindings: &[ResolvedBinding],
    lo: f32,
    hi: f32,
    include_lo: bool,
    out: &mut Vec<Crossing>,
) {
    for b in bindings {
        let llo = lo - b.start_offset;
        let lhi = hi - b.start_offset;
        let start = if include_lo {
            llo.ceil() as i64
        } else {
            llo.floor() as i64 + 1
        };
        let start = start.max(0);
        let end = (lhi.floor() as i64).min(b.length as i64);
        let mut f = start;
        while f <= end {
            if let Some(tag) = sched.get(b.clip, f as u32) {
                out.push(Crossing {
                    at: f as f32 + b.start_offset,
                    clip: b.clip,
                    frame: f as u32,
                    tag,
                });
            }
            f += 1;
        }
    }
    out.sort_by(|a, b| a.at.total_cmp(&b.at));
}

/// Descending counterpart: window [lo, hi), or [lo, hi] when `include_hi`.
fn collect_descending(
    sched: &FrameEventScheduler,
    bindings: &[ResolvedBinding],
    lo: f32,
    hi: f32,
    include_hi: bool,
    out: &mut Vec<Crossing>,
) {
    for b in bindings {
        let llo = lo - b.start_offset;
        let lhi = hi - b.start_offset;
        let start = if include_hi {
            lhi.floor() as i64
        } else {
            lhi.ceil() as i64 - 1
        };
        let start = start.min(b.length as i64);
        let end = (llo.ceil() as i64).max(0);
        let mut f = start;
        while f >= end {
            if let Some(tag) = sched.get(b.clip, f as u32) {
                out.push(Crossing {
                    at: f as f32 + b.start_offset,
                    clip: b.clip,
                    frame: f as u32,
                    tag,
                });
            }
            f -= 1;
        }
    }
    out.sort_by(|a, b| b.at.total_cmp(&a.at));
}

impl Engine {
    /// Create a new engine with the given config.
    pub fn new(cfg: Config) -> Self {
        Self {
            shots: Vec::with_capacity(cfg.shot_capacity),
            cfg,
            ids: IdAllocator::new(),
            clips: ClipLib::default(),
            binds: BindingTable::new(),
            events: FrameEventScheduler::new(),
            outputs: Outputs::default(),
        }
    }

    /// Load a clip into the engine, returning a ClipId. Invalid clips are
    /// logged and still loaded; the affected property simply animates wrong
    /// or not at all rather than failing the battle.
    pub fn load_clip(&mut self, mut clip: Clip) -> ClipId {
        if let Err(e) = clip.validate_basic() {
            warn!("clip '{}' failed validation: {e}", clip.name);
        }
        let id = self.ids.alloc_clip();
        clip.id = Some(id);
        self.clips.insert(id, clip);
        id
    }

    pub fn clip(&self, id: ClipId) -> Option<&Clip> {
        self.clips.get(id)
    }

    /// One-time binding against a provided resolver.
    /// Resolves each clip's canonical target path into an opaque handle.
    /// Unresolved paths are logged; those clips do not animate.
    pub fn prebind(&mut self, resolver: &mut dyn TargetResolver) {
        for (id, clip) in self.clips.iter() {
            match resolver.resolve(&clip.target_path) {
                Some(handle) => self.binds.upsert(*id, handle),
                None => warn!(
                    "no target for clip '{}' (path '{}'); it will not animate",
                    clip.name, clip.target_path
                ),
            }
        }
    }

    /// Register `tag` at (clip, frame), replacing any prior registration.
    pub fn attach_event(&mut self, clip: ClipId, frame: u32, tag: EventTag) -> Option<EventTag> {
        self.events.attach(clip, frame, tag)
    }

    pub fn detach_event(&mut self, clip: ClipId, frame: u32) -> Option<EventTag> {
        self.events.detach(clip, frame)
    }

    /// Start a one-shot playback. Completion is emitted exactly once when
    /// the shared clock reaches the longest bound track's end.
    pub fn play_once(&mut self, bindings: &[ShotBinding], speed: f32) -> ShotId {
        self.start(bindings, PlayMode::Once, speed)
    }

    /// Start a looping playback. LoopBoundary is emitted once per wrap;
    /// stopping the loop does not emit a boundary.
    pub fn play_loop(&mut self, bindings: &[ShotBinding], speed: f32) -> ShotId {
        self.start(bindings, PlayMode::Loop, speed)
    }

    /// Start a reversed one-shot playback: the clock runs from the end down
    /// to 0. Sampling is a pure function of clock position, so the motion
    /// reverses while each segment keeps its eased shape.
    pub fn play_reverse(&mut self, bindings: &[ShotBinding], speed: f32) -> ShotId {
        self.start(bindings, PlayMode::Reverse, speed)
    }

    fn start(&mut self, bindings: &[ShotBinding], mode: PlayMode, speed: f32) -> ShotId {
        let mut resolved: Vec<ResolvedBinding> = Vec::with_capacity(bindings.len());
        for b in bindings {
            let Some(clip) = self.clips.get(b.clip) else {
                warn!("unknown clip {:?} in shot binding; skipped", b.clip);
                continue;
            };
            resolved.push(ResolvedBinding {
                clip: b.clip,
                start_offset: b.start_offset.max(0.0),
                length: clip.length(),
                handle: self.binds.get(b.clip).map(|r| r.handle.clone()),
            });
        }
        let duration = resolved
            .iter()
            .map(|b| b.start_offset + b.length as f32)
            .fold(0.0f32, f32::max);

        // A newer shot supersedes any live shot writing the same targets, so
        // no orphan writer keeps mutating a target after this one claims it.
        let claimed: Vec<&TargetHandle> = resolved.iter().filter_map(|b| b.handle.as_ref()).collect();
        if !claimed.is_empty() {
            self.shots.retain(|s| {
                let overlap = s
                    .bindings
                    .iter()
                    .any(|b| b.handle.as_ref().is_some_and(|h| claimed.contains(&h)));
                !overlap
            });
        }

        let id = self.ids.alloc_shot();
        self.shots.push(Shot {
            id,
            mode,
            speed: speed.max(0.0),
            clock: if mode == PlayMode::Reverse { duration } else { 0.0 },
            duration,
            bindings: resolved,
            include_edge: true,
            done: false,
        });
        id
    }

    /// Detach a shot from tick participation. No completion or boundary
    /// event fires for a stopped shot.
    pub fn stop(&mut self, shot: ShotId) -> bool {
        let before = self.shots.len();
        self.shots.retain(|s| s.id != shot);
        self.shots.len() != before
    }

    /// Whether a shot is still participating in ticks.
    pub fn is_live(&self, shot: ShotId) -> bool {
        self.shots.iter().any(|s| s.id == shot)
    }

    pub fn shot(&self, shot: ShotId) -> Option<&Shot> {
        self.shots.iter().find(|s| s.id == shot)
    }

    /// Read access to the frame event registry.
    pub fn events(&self) -> &FrameEventScheduler {
        &self.events
    }

    fn push_event(outputs: &mut Outputs, cap: usize, ev: CoreEvent) {
        if outputs.events.len() >= cap {
            warn!("event dropped, max_events_per_tick={cap} reached");
            return;
        }
        outputs.push_event(ev);
    }

    /// Step all live shots by `step` frames (scaled per shot by its speed),
    /// producing changes and events for this tick.
    pub fn update(&mut self, step: f32) -> &Outputs {
        self.outputs.clear();
        let cap = self.cfg.max_events_per_tick;
        let mut crossings: Vec<Crossing> = Vec::new();

        for shot in &mut self.shots {
            // Zero-duration shots (no bindings, or only zero-length clips)
            // are a no-op: they never advance and never complete.
            if shot.duration <= 0.0 {
                continue;
            }
            let advance = step * shot.speed;
            if advance <= 0.0 {
                continue;
            }
            crossings.clear();

            match shot.mode {
                PlayMode::Once => {
                    let prev = shot.clock;
                    let curr = (prev + advance).min(shot.duration);
                    collect_ascending(
                        &self.events,
                        &shot.bindings,
                        prev,
                        curr,
                        shot.include_edge,
                        &mut crossings,
                    );
                    shot.include_edge = false;
                    shot.clock = curr;
                }
                PlayMode::Loop => {
                    let mut remaining = advance;
                    loop {
                        let target = shot.clock + remaining;
                        if target < shot.duration {
                            collect_ascending(
                                &self.events,
                                &shot.bindings,
                                shot.clock,
                                target,
                                shot.include_edge,
                                &mut crossings,
                            );
                            shot.include_edge = false;
                            shot.clock = target;
                            break;
                        }
                        collect_ascending(
                            &self.events,
                            &shot.bindings,
                            shot.clock,
                            shot.duration,
                            shot.include_edge,
                            &mut crossings,
                        );
                        for c in crossings.drain(..) {
                            Self::push_event(
                                &mut self.outputs,
                                cap,
                                CoreEvent::FrameEvent {
                                    shot: shot.id,
                                    clip: c.clip,
                                    frame: c.frame,
                                    tag: c.tag,
                                },
                            );
                        }
                        Self::push_event(
                            &mut self.outputs,
                            cap,
                            CoreEvent::LoopBoundary { shot: shot.id },
                        );
                        remaining = target - shot.duration;
                        shot.clock = 0.0;
                        shot.include_edge = true;
                        if remaining <= 0.0 {
                            break;
                        }
                    }
                }
                PlayMode::Reverse => {
                    let prev = shot.clock;
                    let curr = (prev - advance).max(0.0);
                    collect_descending(
                        &self.events,
                        &shot.bindings,
                        curr,
                        prev,
                        shot.include_edge,
                        &mut crossings,
                    );
                    shot.include_edge = false;
                    shot.clock = curr;
                }
            }

            for c in crossings.drain(..) {
                Self::push_event(
                    &mut self.outputs,
                    cap,
                    CoreEvent::FrameEvent {
                        shot: shot.id,
                        clip: c.clip,
                        frame: c.frame,
                        tag: c.tag,
                    },
                );
            }

            // Sample every bound clip at the new clock; shorter tracks hold
            // their boundary value.
            for b in &shot.bindings {
                let Some(handle) = &b.handle else { continue };
                let Some(clip) = self.clips.get(b.clip) else { continue };
                let local = (shot.clock - b.start_offset).clamp(0.0, b.length as f32);
                self.outputs.push_change(Change {
                    shot: shot.id,
                    key: handle.clone(),
                    value: sample_clip(clip, local),
                });
            }

            let finished = match shot.mode {
                PlayMode::Once => shot.clock >= shot.duration,
                PlayMode::Reverse => shot.clock <= 0.0,
                PlayMode::Loop => false,
            };
            if finished && !shot.done {
                shot.done = true;
                Self::push_event(&mut self.outputs, cap, CoreEvent::ShotCompleted { shot: shot.id });
            }
        }

        self.shots.retain(|s| !s.done);
        &self.outputs
    }
}
