//! Frame-event effects: the game-logic side of a frame crossing.
//!
//! Effects are plain data wired to (clip, frame) slots by make_events and
//! dispatched by the Battle when the engine reports the crossing. Keeping
//! them as data (rather than nested callbacks) makes "what runs when"
//! visible and lets re-wiring replace rather than duplicate.

use serde::{Deserialize, Serialize};

use crate::character::Side;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub enum EventEffect {
    /// Roll the owning action's damage formula against the opponent.
    Damage,
    /// Roll the owning action's healing formula on the actor.
    Healing,
    SetCharged(bool),
    SetGuarding(bool),
    Particles { name: String, on: bool },
    Light { name: String, on: bool },
    ShowText(String),
}

/// One wired effect: which side's action registered it and which action it
/// belongs to (formulas are looked up on the action at fire time).
#[derive(Clone, Debug)]
pub struct RegisteredEffect {
    pub actor: Side,
    pub action: usize,
    pub effect: EventEffect,
}
