//! grimhall-battle-core
//!
//! Turn-based combat layer over grimhall-choreo-core. The Battle owns the
//! playback engine, both combatants and their move sets; each host tick it
//! pumps the engine, dispatches fired frame events to combat effects,
//! resolves loop-boundary continuations, and routes shot completions into
//! the turn state machine. Scene writes come back as Changes for the host
//! to apply; UI/particle/light side effects go out through BattleHooks.

pub mod action;
pub mod character;
pub mod dice;
pub mod effects;
pub mod hooks;
pub mod idle;
pub mod turn;

use log::{debug, warn};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256PlusPlus;

use grimhall_choreo_core::{Change, CoreEvent, Engine, EventTag, ShotId, TargetResolver};

pub use crate::action::{
    ActionBinding, ActionCategory, ActionEvent, ActionLibrary, ActionSpec, ActiveRun, RunState,
};
pub use crate::character::{ActionKind, Character, Side};
pub use crate::dice::{DiceError, DiceFormula};
pub use crate::effects::{EventEffect, RegisteredEffect};
pub use crate::hooks::{BattleHooks, NullHooks};
pub use crate::idle::{IdleController, Pending};
pub use crate::turn::{special_odds, Outcome, TurnController, TurnState};

/// One battle: two combatants, their move sets, and the choreography engine
/// driving every animation and frame event in it.
#[derive(Debug)]
pub struct Battle {
    engine: Engine,
    rng: Xoshiro256PlusPlus,
    chars: [Character; 2],
    libs: [ActionLibrary; 2],
    idles: IdleController,
    turn: TurnController,
    effects: Vec<RegisteredEffect>,
    runs: [Option<ActiveRun>; 2],
}

impl Battle {
    /// Build a battle over an engine that already has all clips loaded.
    pub fn new(
        engine: Engine,
        player: Character,
        player_lib: ActionLibrary,
        enemy: Character,
        enemy_lib: ActionLibrary,
        seed: u64,
    ) -> Self {
        Self {
            engine,
            rng: Xoshiro256PlusPlus::seed_from_u64(seed),
            chars: [player, enemy],
            libs: [player_lib, enemy_lib],
            idles: IdleController::new(),
            turn: TurnController::new(),
            effects: Vec::new(),
            runs: [None, None],
        }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    pub fn character(&self, side: Side) -> &Character {
        &self.chars[side.index()]
    }

    pub fn turn_state(&self) -> TurnState {
        self.turn.state()
    }

    /// Resolve clip target paths against the host scene.
    pub fn prebind(&mut self, resolver: &mut dyn TargetResolver) {
        self.engine.prebind(resolver);
    }

    /// Wire every action's frame events through the scheduler. Idempotent:
    /// re-running replaces each (clip, frame) registration instead of
    /// duplicating it, so setting up a fresh round over the same engine is
    /// safe.
    pub fn make_events(&mut self) {
        self.effects.clear();
        let mut wired = Vec::new();
        for side in [Side::Player, Side::Enemy] {
            for (idx, spec) in self.libs[side.index()].actions.iter().enumerate() {
                if let Err(e) = spec.validate() {
                    warn!("action '{}' misconfigured: {e}", spec.name);
                }
                for ev in &spec.events {
                    wired.push((
                        ev.clip,
                        ev.frame,
                        RegisteredEffect {
                            actor: side,
                            action: idx,
                            effect: ev.effect.clone(),
                        },
                    ));
                }
            }
        }
        for (clip, frame, reg) in wired {
            let tag = EventTag(self.effects.len() as u32);
            self.effects.push(reg);
            self.engine.attach_event(clip, frame, tag);
        }
    }

    /// Begin the battle: events wired, both idles looping, command menu open.
    pub fn start(&mut self, hooks: &mut dyn BattleHooks) {
        self.make_events();
        self.start_idle(Side::Player);
        self.start_idle(Side::Enemy);
        self.enter_player_select(hooks);
    }

    /// Player command input. Returns false when the turn gate is closed or
    /// the pick is unusable; the UI should already have its buttons
    /// disabled in those states.
    pub fn player_select(&mut self, name: &str, hooks: &mut dyn BattleHooks) -> bool {
        if !self.turn.player_can_select() {
            debug!("'{name}' rejected: selection gate closed");
            return false;
        }
        let Some(idx) = self.libs[Side::Player.index()].index_of(name) else {
            warn!("unknown player action '{name}'");
            return false;
        };
        let spec = &self.libs[Side::Player.index()].actions[idx];
        if !spec.category.selectable() {
            warn!("action '{name}' is not a command");
            return false;
        }
        if spec.requires_charge && !self.chars[Side::Player.index()].charged {
            debug!("'{name}' needs a charge");
            return false;
        }
        let kind = spec.category.as_action_kind();

        self.turn.begin_player_action();
        hooks.set_commands_enabled(false);
        self.chars[Side::Player.index()].last_action = kind;
        self.request_action(Side::Player, idx);
        true
    }

    /// Advance the battle by `step` frames and return this tick's scene
    /// writes for the host to apply.
    pub fn tick(&mut self, step: f32, hooks: &mut dyn BattleHooks) -> Vec<Change> {
        let (changes, events) = {
            let out = self.engine.update(step);
            (out.changes.clone(), out.events.clone())
        };
        for ev in events {
            self.dispatch(ev, hooks);
        }
        changes
    }

    // ---- internals ----

    fn dispatch(&mut self, ev: CoreEvent, hooks: &mut dyn BattleHooks) {
        match ev {
            CoreEvent::FrameEvent { shot, tag, .. } => {
                let Some(reg) = self.effects.get(tag.0 as usize).cloned() else {
                    warn!("fired unknown event tag {tag:?}");
                    return;
                };
                // Liveness: the shot must still be the actor's current run
                // or idle. Events queued by a shot superseded earlier in
                // this same tick are dropped here.
                if !self.shot_is_live(reg.actor, shot) {
                    debug!("stale frame event from {shot:?} ignored");
                    return;
                }
                self.apply_effect(reg, hooks);
            }
            CoreEvent::LoopBoundary { shot } => {
                let pendings = self.idles.on_boundary(shot);
                if !pendings.is_empty() {
                    // Pop-free seam reached: swap the idle for the move.
                    self.engine.stop(shot);
                    for p in pendings {
                        self.run_pending(p);
                    }
                }
            }
            CoreEvent::ShotCompleted { shot } => self.on_completed(shot, hooks),
        }
    }

    fn shot_is_live(&self, actor: Side, shot: ShotId) -> bool {
        let run_live = self.runs[actor.index()]
            .as_ref()
            .is_some_and(|r| r.state == RunState::Running && r.shot == shot);
        run_live || self.idles.handle(actor) == Some(shot)
    }

    fn apply_effect(&mut self, reg: RegisteredEffect, hooks: &mut dyn BattleHooks) {
        let actor = reg.actor;
        match reg.effect {
            EventEffect::Damage => {
                let victim = actor.opponent();
                if !self.chars[victim.index()].is_alive() {
                    // Already down; a later hit in the same combo must not
                    // push hp below zero or restart the death throes.
                    debug!("{} is already down; damage skipped", self.chars[victim.index()].name);
                    return;
                }
                let Some(amount) =
                    self.libs[actor.index()].actions[reg.action].roll_damage(&mut self.rng)
                else {
                    warn!(
                        "damage event on '{}' without a formula",
                        self.libs[actor.index()].actions[reg.action].name
                    );
                    return;
                };
                let applied = self.chars[victim.index()].apply_damage(amount);
                debug!(
                    "{} hits {} for {applied}",
                    self.chars[actor.index()].name,
                    self.chars[victim.index()].name
                );
                hooks.show_text(&format!(
                    "{} takes {applied} damage",
                    self.chars[victim.index()].name
                ));
                let reaction = if self.chars[victim.index()].is_alive() {
                    ActionCategory::Flinch
                } else {
                    ActionCategory::Death
                };
                self.start_reaction(victim, reaction);
            }
            EventEffect::Healing => {
                if !self.chars[actor.index()].is_alive() {
                    return;
                }
                let Some(amount) =
                    self.libs[actor.index()].actions[reg.action].roll_healing(&mut self.rng)
                else {
                    warn!(
                        "healing event on '{}' without a formula",
                        self.libs[actor.index()].actions[reg.action].name
                    );
                    return;
                };
                let applied = self.chars[actor.index()].apply_healing(amount);
                hooks.show_text(&format!(
                    "{} recovers {applied} hp",
                    self.chars[actor.index()].name
                ));
            }
            EventEffect::SetCharged(on) => {
                self.chars[actor.index()].charged = on;
                if actor == Side::Player {
                    hooks.set_charge_indicator(on);
                }
            }
            EventEffect::SetGuarding(on) => {
                self.chars[actor.index()].guarding = on;
            }
            EventEffect::Particles { name, on } => hooks.particles(&name, on),
            EventEffect::Light { name, on } => hooks.light(&name, on),
            EventEffect::ShowText(text) => hooks.show_text(&text),
        }
    }

    fn run_pending(&mut self, pending: Pending) {
        match pending {
            Pending::StartAction { side, action } => self.start_action(side, action),
        }
    }

    fn request_action(&mut self, side: Side, action: usize) {
        // Wait for the idle loop's seam; resolve immediately if none runs.
        if let Some(p) = self
            .idles
            .end_gracefully(side, Pending::StartAction { side, action })
        {
            self.run_pending(p);
        }
    }

    fn start_action(&mut self, side: Side, action: usize) {
        // One non-idle action per character: a newer one supersedes.
        if let Some(mut run) = self.runs[side.index()].take() {
            if run.state == RunState::Running {
                run.state = RunState::Interrupted;
                self.engine.stop(run.shot);
                debug!(
                    "{}'s '{}' interrupted",
                    self.chars[side.index()].name,
                    self.libs[side.index()].actions[run.action].name
                );
            }
        }
        let spec = &self.libs[side.index()].actions[action];
        let bindings = spec.shot_bindings();
        let speed = spec.speed;
        let category = spec.category;
        if spec.requires_charge {
            self.chars[side.index()].charged = false;
        }
        let shot = self.engine.play_once(&bindings, speed);
        self.runs[side.index()] = Some(ActiveRun {
            action,
            shot,
            state: RunState::Running,
            category,
        });
    }

    fn start_idle(&mut self, side: Side) {
        let Some(idx) = self.libs[side.index()].first_of(ActionCategory::Idle) else {
            warn!("{} has no idle action", self.chars[side.index()].name);
            return;
        };
        let spec = &self.libs[side.index()].actions[idx];
        let bindings = spec.shot_bindings();
        let speed = spec.speed;
        let shot = self.engine.play_loop(&bindings, speed);
        self.idles.set(side, shot);
    }

    fn start_reaction(&mut self, victim: Side, category: ActionCategory) {
        // A hit reaction cannot wait for the idle seam; stop the loop now.
        let (handle, pendings) = self.idles.stop(victim);
        if let Some(shot) = handle {
            self.engine.stop(shot);
        }
        let Some(idx) = self.libs[victim.index()].first_of(category) else {
            warn!(
                "{} has no {category:?} action",
                self.chars[victim.index()].name
            );
            return;
        };
        self.start_action(victim, idx);
        // Continuations that were waiting on the stopped idle still resolve
        // (safety valve), though they will supersede the reaction.
        for p in pendings {
            self.run_pending(p);
        }
    }

    fn on_completed(&mut self, shot: ShotId, hooks: &mut dyn BattleHooks) {
        let mut found = None;
        for side in [Side::Player, Side::Enemy] {
            let live = self.runs[side.index()]
                .as_ref()
                .is_some_and(|r| r.state == RunState::Running && r.shot == shot);
            if live {
                if let Some(mut run) = self.runs[side.index()].take() {
                    run.state = RunState::Completed;
                    found = Some((side, run));
                }
                break;
            }
        }
        let Some((side, run)) = found else {
            debug!("completion from stale {shot:?} ignored");
            return;
        };

        match run.category {
            ActionCategory::Flinch => {
                if self.chars[side.index()].is_alive() {
                    self.start_idle(side);
                }
            }
            ActionCategory::Death => {}
            ActionCategory::Idle => {}
            ActionCategory::Basic | ActionCategory::Special | ActionCategory::Defend => {
                self.finish_turn_action(side, &run, hooks);
            }
        }
    }

    /// A turn-owning move finished; only now does the turn controller look
    /// at hp and decide who goes next.
    fn finish_turn_action(&mut self, actor: Side, run: &ActiveRun, hooks: &mut dyn BattleHooks) {
        let victim = actor.opponent();
        if !self.chars[victim.index()].is_alive() {
            let outcome = match actor {
                Side::Player => Outcome::Victory,
                Side::Enemy => Outcome::Defeat,
            };
            self.turn.resolve(outcome);
            hooks.set_commands_enabled(false);
            hooks.show_text(match outcome {
                Outcome::Victory => "Victory!",
                Outcome::Defeat => "You have fallen...",
            });
            return;
        }
        if !self.chars[actor.index()].is_alive() {
            let outcome = match actor {
                Side::Player => Outcome::Defeat,
                Side::Enemy => Outcome::Victory,
            };
            self.turn.resolve(outcome);
            hooks.set_commands_enabled(false);
            return;
        }

        self.start_idle(actor);
        match actor {
            Side::Player => {
                let yields = self.libs[Side::Player.index()].actions[run.action].yields_turn;
                if yields {
                    self.begin_enemy_turn(hooks);
                } else {
                    self.enter_player_select(hooks);
                }
            }
            Side::Enemy => self.enter_player_select(hooks),
        }
    }

    fn enter_player_select(&mut self, hooks: &mut dyn BattleHooks) {
        if !self.turn.begin_selection() {
            return;
        }
        // Guard never outlives the character's own turn.
        self.chars[Side::Player.index()].guarding = false;
        hooks.set_commands_enabled(true);
        hooks.set_charge_indicator(self.chars[Side::Player.index()].charged);
    }

    fn begin_enemy_turn(&mut self, hooks: &mut dyn BattleHooks) {
        if !self.turn.begin_enemy_action() {
            return;
        }
        self.chars[Side::Enemy.index()].guarding = false;

        // Escalation table keyed on the player's previous move.
        let odds = special_odds(self.chars[Side::Player.index()].last_action);
        let lib = &self.libs[Side::Enemy.index()];
        let pick = if self.rng.gen_bool(odds) {
            lib.first_of(ActionCategory::Special)
                .or_else(|| lib.first_of(ActionCategory::Basic))
        } else {
            lib.first_of(ActionCategory::Basic)
        };
        let Some(idx) = pick else {
            warn!("{} has no usable move", self.chars[Side::Enemy.index()].name);
            self.enter_player_select(hooks);
            return;
        };
        self.chars[Side::Enemy.index()].last_action =
            self.libs[Side::Enemy.index()].actions[idx].category.as_action_kind();
        self.request_action(Side::Enemy, idx);
    }
}
