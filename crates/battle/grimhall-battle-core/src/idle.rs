//! Idle loop bookkeeping.
//!
//! Each character has at most one live idle loop. A move that wants to
//! replace the idle queues a continuation for the loop's next boundary, so
//! the swap happens at a pop-free seam. If no loop is live (the character is
//! already down), the continuation resolves immediately instead of hanging.

use grimhall_choreo_core::ShotId;

use crate::character::Side;

/// A continuation waiting on a loop boundary. Kept as data so the ordering
/// "graceful end, then start" stays visible.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Pending {
    StartAction { side: Side, action: usize },
}

#[derive(Debug)]
struct Waiter {
    shot: ShotId,
    pending: Pending,
}

#[derive(Debug, Default)]
pub struct IdleController {
    handles: [Option<ShotId>; 2],
    waiters: Vec<Waiter>,
}

impl IdleController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a freshly started idle loop, replacing any prior handle.
    pub fn set(&mut self, side: Side, shot: ShotId) {
        self.handles[side.index()] = Some(shot);
    }

    pub fn handle(&self, side: Side) -> Option<ShotId> {
        self.handles[side.index()]
    }

    /// Queue `pending` for the next boundary of the side's idle loop.
    /// Returns it immediately when no loop is live (safety valve: a downed
    /// character's idle is gone, and the caller must not hang forever).
    #[must_use]
    pub fn end_gracefully(&mut self, side: Side, pending: Pending) -> Option<Pending> {
        match self.handles[side.index()] {
            Some(shot) => {
                self.waiters.push(Waiter { shot, pending });
                None
            }
            None => Some(pending),
        }
    }

    /// Drain continuations waiting on this shot's boundary. A non-empty
    /// result means the caller should stop the loop before running them.
    pub fn on_boundary(&mut self, shot: ShotId) -> Vec<Pending> {
        let hit: Vec<Pending> = self
            .waiters
            .iter()
            .filter(|w| w.shot == shot)
            .map(|w| w.pending)
            .collect();
        if !hit.is_empty() {
            self.waiters.retain(|w| w.shot != shot);
            for h in &mut self.handles {
                if *h == Some(shot) {
                    *h = None;
                }
            }
        }
        hit
    }

    /// Forcibly drop a side's idle (hit reactions interrupt immediately).
    /// Any waiters on it are returned so they still resolve.
    pub fn stop(&mut self, side: Side) -> (Option<ShotId>, Vec<Pending>) {
        let handle = self.handles[side.index()].take();
        let mut resolved = Vec::new();
        if let Some(shot) = handle {
            resolved = self
                .waiters
                .iter()
                .filter(|w| w.shot == shot)
                .map(|w| w.pending)
                .collect();
            self.waiters.retain(|w| w.shot != shot);
        }
        (handle, resolved)
    }
}
