#![allow(dead_code)]
//! Frame event scheduler.
//!
//! Registrations are keyed by (clip, frame): at most one tag is live per
//! slot, and re-attaching replaces the prior registration rather than
//! duplicating it. The engine queries the scheduler while stepping shots
//! and emits CoreEvent::FrameEvent for each crossed frame; dispatching the
//! tag to a callback happens in the layer above.

use hashbrown::HashMap;

use crate::ids::{ClipId, EventTag};

#[derive(Default, Debug)]
pub struct FrameEventScheduler {
    slots: HashMap<(ClipId, u32), EventTag>,
}

impl FrameEventScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `tag` at (clip, frame), replacing any existing registration.
    /// Returns the replaced tag, if any.
    pub fn attach(&mut self, clip: ClipId, frame: u32, tag: EventTag) -> Option<EventTag> {
        self.slots.insert((clip, frame), tag)
    }

    /// Remove the registration at (clip, frame), if any.
    pub fn detach(&mut self, clip: ClipId, frame: u32) -> Option<EventTag> {
        self.slots.remove(&(clip, frame))
    }

    #[inline]
    pub fn get(&self, clip: ClipId, frame: u32) -> Option<EventTag> {
        self.slots.get(&(clip, frame)).copied()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reattach_replaces() {
        let mut sched = FrameEventScheduler::new();
        assert_eq!(sched.attach(ClipId(0), 4, EventTag(1)), None);
        assert_eq!(sched.attach(ClipId(0), 4, EventTag(2)), Some(EventTag(1)));
        assert_eq!(sched.len(), 1);
        assert_eq!(sched.get(ClipId(0), 4), Some(EventTag(2)));
    }

    #[test]
    fn detach_clears_slot() {
        let mut sched = FrameEventScheduler::new();
        sched.attach(ClipId(3), 0, EventTag(7));
        assert_eq!(sched.detach(ClipId(3), 0), Some(EventTag(7)));
        assert_eq!(sched.get(ClipId(3), 0), None);
    }
}
