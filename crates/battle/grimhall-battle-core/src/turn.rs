//! Turn state machine.
//!
//! The controller is the single writer of the selection gate: whose turn it
//! is never gets decided inside an action. Actions only report completion;
//! the Battle routes that here.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::character::ActionKind;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum Outcome {
    Victory,
    Defeat,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum TurnState {
    PlayerSelecting,
    PlayerActing,
    EnemyActing,
    Resolved(Outcome),
}

#[derive(Debug)]
pub struct TurnController {
    state: TurnState,
}

impl Default for TurnController {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnController {
    pub fn new() -> Self {
        Self {
            state: TurnState::PlayerSelecting,
        }
    }

    #[inline]
    pub fn state(&self) -> TurnState {
        self.state
    }

    #[inline]
    pub fn player_can_select(&self) -> bool {
        self.state == TurnState::PlayerSelecting
    }

    #[inline]
    pub fn is_resolved(&self) -> bool {
        matches!(self.state, TurnState::Resolved(_))
    }

    /// Admit a player command: selection is disabled the moment this
    /// succeeds, so a second submission in the same state is rejected.
    pub fn begin_player_action(&mut self) -> bool {
        if self.state != TurnState::PlayerSelecting {
            debug!("select rejected in {:?}", self.state);
            return false;
        }
        self.state = TurnState::PlayerActing;
        true
    }

    /// Pass control to the opponent after the player's move completed.
    pub fn begin_enemy_action(&mut self) -> bool {
        if self.state != TurnState::PlayerActing {
            debug!("enemy turn rejected in {:?}", self.state);
            return false;
        }
        self.state = TurnState::EnemyActing;
        true
    }

    /// Re-open the command menu for the next round.
    pub fn begin_selection(&mut self) -> bool {
        if self.is_resolved() {
            return false;
        }
        self.state = TurnState::PlayerSelecting;
        true
    }

    /// Terminal: no transition leaves Resolved.
    pub fn resolve(&mut self, outcome: Outcome) {
        if self.is_resolved() {
            return;
        }
        debug!("battle resolved: {outcome:?}");
        self.state = TurnState::Resolved(outcome);
    }
}

/// Probability that the enemy answers with its special attack, keyed on the
/// player's previous move: passive turns invite little escalation, specials
/// a lot.
pub fn special_odds(last: ActionKind) -> f64 {
    match last {
        ActionKind::None => 0.15,
        ActionKind::Basic => 0.45,
        ActionKind::Special => 0.75,
    }
}
