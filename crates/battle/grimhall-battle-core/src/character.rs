//! Combatant entities and their combat state.
//!
//! Characters are explicit values owned by the Battle (no long-lived
//! singletons), so multiple battles can coexist in tests. Combat state is
//! mutated only by frame-event effects and by the turn controller (guard
//! reset at turn start).

use serde::{Deserialize, Serialize};

/// Which seat a combatant occupies in a battle.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    #[inline]
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

/// Kind of the most recent turn-owning move, used to key the opponent's
/// move-selection odds.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub enum ActionKind {
    #[default]
    None,
    Basic,
    Special,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub hp: i32,
    pub max_hp: i32,
    pub charged: bool,
    pub guarding: bool,
    pub last_action: ActionKind,
}

impl Character {
    pub fn new(name: &str, max_hp: i32) -> Self {
        Self {
            name: name.to_string(),
            hp: max_hp,
            max_hp,
            charged: false,
            guarding: false,
            last_action: ActionKind::None,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Apply incoming damage, halved (floor) while guarding, clamped so hp
    /// never drops below 0. A downed character takes no further damage.
    /// Returns the hp actually removed.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        if !self.is_alive() || amount <= 0 {
            return 0;
        }
        let effective = if self.guarding { amount / 2 } else { amount };
        let applied = effective.min(self.hp);
        self.hp -= applied;
        applied
    }

    /// Apply healing, clamped to max_hp. A downed character cannot be
    /// healed mid-action. Returns the hp actually restored.
    pub fn apply_healing(&mut self, amount: i32) -> i32 {
        if !self.is_alive() || amount <= 0 {
            return 0;
        }
        let applied = amount.min(self.max_hp - self.hp);
        self.hp += applied;
        applied
    }
}
