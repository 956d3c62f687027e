//! Host callbacks invoked by the battle core.
//!
//! The core never constructs UI, particles or lights; it calls out through
//! this trait and the host wires the scene. All methods default to no-ops
//! so hosts implement only what they present.

pub trait BattleHooks {
    /// Combat text (damage numbers, battle-over lines).
    fn show_text(&mut self, _text: &str) {}
    /// Enable or disable the player's command buttons.
    fn set_commands_enabled(&mut self, _enabled: bool) {}
    /// Light up the charge indicator.
    fn set_charge_indicator(&mut self, _on: bool) {}
    /// Start or stop a named particle system.
    fn particles(&mut self, _name: &str, _on: bool) {}
    /// Enable or disable a named light.
    fn light(&mut self, _name: &str, _on: bool) {}
}

/// Hook sink for tests and headless runs.
#[derive(Debug, Default)]
pub struct NullHooks;

impl BattleHooks for NullHooks {}
