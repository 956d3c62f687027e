//! Action templates: a combat move as a bundle of clip bindings, frame
//! events and a dice formula.
//!
//! Specs are stateless and reusable across turns. A live invocation is
//! tracked as an ActiveRun: Running until its shot completes (Completed) or
//! a newer action takes over (Interrupted). An interrupted run fires none of
//! its remaining frame events because stopping its shot detaches it from the
//! tick.

use log::warn;
use rand::Rng;
use serde::{Deserialize, Serialize};

use grimhall_choreo_core::{ClipId, ShotBinding, ShotId};

use crate::character::ActionKind;
use crate::dice::DiceFormula;
use crate::effects::EventEffect;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum ActionCategory {
    Basic,
    Special,
    Defend,
    Idle,
    Flinch,
    Death,
}

impl ActionCategory {
    /// Whether the player may pick this from the command menu.
    #[inline]
    pub fn selectable(self) -> bool {
        matches!(self, ActionCategory::Basic | ActionCategory::Special | ActionCategory::Defend)
    }

    /// How this move is remembered for the opponent's selection odds.
    #[inline]
    pub fn as_action_kind(self) -> ActionKind {
        match self {
            ActionCategory::Basic => ActionKind::Basic,
            ActionCategory::Special => ActionKind::Special,
            _ => ActionKind::None,
        }
    }
}

/// One (clip, target) pairing within the action, optionally time-shifted so
/// sub-parts desynchronize (a cloak settling after an arm) while sharing one
/// clock and a common implicit end at the longest track.
#[derive(Copy, Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionBinding {
    pub clip: ClipId,
    #[serde(default)]
    pub start_offset: f32,
}

/// A game-logic effect anchored to an exact frame of one bound clip.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ActionEvent {
    pub clip: ClipId,
    pub frame: u32,
    pub effect: EventEffect,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ActionSpec {
    pub name: String,
    pub category: ActionCategory,
    pub bindings: Vec<ActionBinding>,
    /// The clip whose playback reports completion to the turn controller.
    pub primary: ClipId,
    pub events: Vec<ActionEvent>,
    pub damage: Option<DiceFormula>,
    pub healing: Option<DiceFormula>,
    pub speed: f32,
    /// Whether finishing this move passes control to the opponent.
    pub yields_turn: bool,
    /// Whether selecting this move requires (and consumes) a charge.
    pub requires_charge: bool,
}

impl ActionSpec {
    pub fn new(name: &str, category: ActionCategory, bindings: Vec<ActionBinding>, primary: ClipId) -> Self {
        Self {
            name: name.to_string(),
            category,
            bindings,
            primary,
            events: Vec::new(),
            damage: None,
            healing: None,
            speed: 1.0,
            yields_turn: true,
            requires_charge: false,
        }
    }

    pub fn with_event(mut self, clip: ClipId, frame: u32, effect: EventEffect) -> Self {
        self.events.push(ActionEvent { clip, frame, effect });
        self
    }

    pub fn with_damage(mut self, formula: DiceFormula) -> Self {
        self.damage = Some(formula);
        self
    }

    pub fn with_healing(mut self, formula: DiceFormula) -> Self {
        self.healing = Some(formula);
        self
    }

    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed;
        self
    }

    pub fn keeps_turn(mut self) -> Self {
        self.yields_turn = false;
        self
    }

    pub fn charged(mut self) -> Self {
        self.requires_charge = true;
        self
    }

    /// Validate the primary-clip designation: it must appear exactly once
    /// among the bindings. Misconfiguration is non-fatal; the battle plays
    /// on with a visibly broken move rather than crashing.
    pub fn validate(&self) -> Result<(), String> {
        let n = self.bindings.iter().filter(|b| b.clip == self.primary).count();
        match n {
            1 => Ok(()),
            0 => Err(format!("primary clip {:?} is not bound", self.primary)),
            _ => Err(format!("primary clip {:?} bound {n} times", self.primary)),
        }
    }

    pub fn shot_bindings(&self) -> Vec<ShotBinding> {
        self.bindings
            .iter()
            .map(|b| ShotBinding::offset(b.clip, b.start_offset))
            .collect()
    }

    /// Roll this action's damage formula. Pure of battle state; called only
    /// from within a frame-event effect.
    pub fn roll_damage(&self, rng: &mut impl Rng) -> Option<i32> {
        self.damage.map(|f| f.roll(rng))
    }

    pub fn roll_healing(&self, rng: &mut impl Rng) -> Option<i32> {
        self.healing.map(|f| f.roll(rng))
    }
}

/// A character's move set for one battle.
#[derive(Clone, Debug, Default)]
pub struct ActionLibrary {
    pub actions: Vec<ActionSpec>,
}

impl ActionLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, spec: ActionSpec) -> usize {
        if let Err(e) = spec.validate() {
            warn!("action '{}' misconfigured: {e}", spec.name);
        }
        self.actions.push(spec);
        self.actions.len() - 1
    }

    pub fn with(mut self, spec: ActionSpec) -> Self {
        self.push(spec);
        self
    }

    pub fn get(&self, idx: usize) -> Option<&ActionSpec> {
        self.actions.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.actions.iter().position(|a| a.name == name)
    }

    pub fn first_of(&self, category: ActionCategory) -> Option<usize> {
        self.actions.iter().position(|a| a.category == category)
    }
}

/// State of one action invocation.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RunState {
    Running,
    Completed,
    Interrupted,
}

/// A started action: the shot carrying its bindings and where it stands.
#[derive(Clone, Debug)]
pub struct ActiveRun {
    pub action: usize,
    pub shot: ShotId,
    pub state: RunState,
    pub category: ActionCategory,
}
