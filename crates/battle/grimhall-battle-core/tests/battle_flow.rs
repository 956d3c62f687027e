//! End-to-end battle flow over a real choreography engine: idle seams,
//! frame-event damage, guard, charge gating, and resolution ordering.

use grimhall_battle_core::{
    ActionBinding, ActionCategory, ActionLibrary, ActionSpec, Battle, BattleHooks, Character,
    EventEffect, NullHooks, Outcome, Side, TurnState,
};
use grimhall_choreo_core::{Clip, ClipId, Config, Easing, Engine, Keyframe, TargetResolver, Value};

struct PassThrough;

impl TargetResolver for PassThrough {
    fn resolve(&mut self, path: &str) -> Option<String> {
        Some(path.to_string())
    }
}

fn float_clip(name: &str, target: &str, length: u32) -> Clip {
    Clip::new(
        name,
        target,
        vec![
            Keyframe {
                frame: 0,
                value: Value::Float(0.0),
            },
            Keyframe {
                frame: length,
                value: Value::Float(1.0),
            },
        ],
        Easing::Linear,
    )
}

/// Ids of one side's loaded clips.
struct Rig {
    idle: ClipId,
    attack: ClipId,
    guard: ClipId,
    special: ClipId,
    flinch: ClipId,
    death: ClipId,
}

fn load_rig(engine: &mut Engine, who: &str) -> Rig {
    let mut load = |part: &str, len: u32| {
        engine.load_clip(float_clip(
            &format!("{who}_{part}"),
            &format!("{who}/{part}"),
            len,
        ))
    };
    Rig {
        idle: load("idle", 6),
        attack: load("attack", 10),
        guard: load("guard", 8),
        special: load("special", 12),
        flinch: load("flinch", 4),
        death: load("death", 8),
    }
}

fn one(clip: ClipId) -> Vec<ActionBinding> {
    vec![ActionBinding {
        clip,
        start_offset: 0.0,
    }]
}

fn reaction_set(lib: ActionLibrary, rig: &Rig) -> ActionLibrary {
    lib.with(ActionSpec::new(
        "idle",
        ActionCategory::Idle,
        one(rig.idle),
        rig.idle,
    ))
    .with(ActionSpec::new(
        "flinch",
        ActionCategory::Flinch,
        one(rig.flinch),
        rig.flinch,
    ))
    .with(ActionSpec::new(
        "death",
        ActionCategory::Death,
        one(rig.death),
        rig.death,
    ))
}

/// A battle where both sides have idle/flinch/death plus a basic attack that
/// lands one damage event at attack frame 5.
fn fixture(player_hp: i32, enemy_hp: i32, player_dmg: &str, enemy_dmg: &str, seed: u64) -> Battle {
    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);

    let player_lib = reaction_set(ActionLibrary::new(), &hero)
        .with(
            ActionSpec::new("attack", ActionCategory::Basic, one(hero.attack), hero.attack)
                .with_event(hero.attack, 5, EventEffect::Damage)
                .with_damage(player_dmg.parse().unwrap()),
        )
        .with(
            ActionSpec::new("guard", ActionCategory::Defend, one(hero.guard), hero.guard)
                .with_event(hero.guard, 1, EventEffect::SetGuarding(true)),
        )
        .with(
            ActionSpec::new("power", ActionCategory::Special, one(hero.special), hero.special)
                .with_event(hero.special, 6, EventEffect::Damage)
                .with_damage(player_dmg.parse().unwrap())
                .charged(),
        );

    let enemy_lib = reaction_set(ActionLibrary::new(), &ogre).with(
        ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
            .with_event(ogre.attack, 5, EventEffect::Damage)
            .with_damage(enemy_dmg.parse().unwrap()),
    );

    Battle::new(
        engine,
        Character::new("Hero", player_hp),
        player_lib,
        Character::new("Ogre", enemy_hp),
        enemy_lib,
        seed,
    )
}

#[test]
fn basic_attack_round_trip() {
    let mut hooks = NullHooks;
    let mut battle = fixture(30, 35, "1d6+1", "1d6+1", 42);
    battle.start(&mut hooks);
    assert_eq!(battle.turn_state(), TurnState::PlayerSelecting);

    assert!(battle.player_select("attack", &mut hooks));
    assert_eq!(battle.turn_state(), TurnState::PlayerActing);

    let mut saw_enemy_turn = false;
    for _ in 0..120 {
        battle.tick(1.0, &mut hooks);
        if battle.turn_state() == TurnState::EnemyActing {
            saw_enemy_turn = true;
        }
        if saw_enemy_turn && battle.turn_state() == TurnState::PlayerSelecting {
            break;
        }
    }
    assert!(saw_enemy_turn, "the turn never passed to the enemy");
    assert_eq!(battle.turn_state(), TurnState::PlayerSelecting);

    // 1d6+1 lands 2..=7 on each side.
    let enemy_hp = battle.character(Side::Enemy).hp;
    assert!((28..=33).contains(&enemy_hp), "enemy hp {enemy_hp}");
    let player_hp = battle.character(Side::Player).hp;
    assert!((23..=28).contains(&player_hp), "player hp {player_hp}");
}

#[test]
fn guard_halves_incoming_damage_and_expires() {
    let mut hooks = NullHooks;
    // Deterministic 10 damage from the enemy; guarded it lands as 5.
    let mut battle = fixture(30, 35, "1d6+1", "0d6+10", 7);
    battle.start(&mut hooks);
    assert!(battle.player_select("guard", &mut hooks));

    for _ in 0..120 {
        battle.tick(1.0, &mut hooks);
        if battle.turn_state() == TurnState::PlayerSelecting {
            break;
        }
    }
    assert_eq!(battle.turn_state(), TurnState::PlayerSelecting);
    assert_eq!(battle.character(Side::Player).hp, 25);
    // Guard never outlives the enemy's turn.
    assert!(!battle.character(Side::Player).guarding);
}

#[test]
fn selection_gate_rejects_double_submission() {
    let mut hooks = NullHooks;
    let mut battle = fixture(30, 35, "1d6+1", "1d6+1", 1);
    battle.start(&mut hooks);
    assert!(battle.player_select("attack", &mut hooks));
    assert!(!battle.player_select("attack", &mut hooks));
    assert!(!battle.player_select("guard", &mut hooks));
}

#[test]
fn charged_action_is_gated_and_consumes_the_charge() {
    let mut hooks = NullHooks;
    let mut battle = fixture(30, 35, "0d6+3", "1d6+1", 5);
    battle.start(&mut hooks);
    // Not charged: the pick is refused and the gate stays open.
    assert!(!battle.player_select("power", &mut hooks));
    assert_eq!(battle.turn_state(), TurnState::PlayerSelecting);

    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);
    let player_lib = reaction_set(ActionLibrary::new(), &hero).with(
        ActionSpec::new("power", ActionCategory::Special, one(hero.special), hero.special)
            .with_event(hero.special, 6, EventEffect::Damage)
            .with_damage("0d6+3".parse().unwrap())
            .charged(),
    );
    let enemy_lib = reaction_set(ActionLibrary::new(), &ogre).with(
        ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
            .with_event(ogre.attack, 5, EventEffect::Damage)
            .with_damage("1d6+1".parse().unwrap()),
    );
    let mut player = Character::new("Hero", 30);
    player.charged = true;
    let mut battle = Battle::new(engine, player, player_lib, Character::new("Ogre", 35), enemy_lib, 5);
    battle.start(&mut hooks);

    assert!(battle.player_select("power", &mut hooks));
    // The action starts at the idle loop's next seam; the charge is spent
    // when it starts, not when it is picked.
    for _ in 0..10 {
        battle.tick(1.0, &mut hooks);
    }
    assert!(!battle.character(Side::Player).charged);
    for _ in 0..30 {
        battle.tick(1.0, &mut hooks);
    }
    assert_eq!(battle.character(Side::Enemy).hp, 32);
}

#[test]
fn overkill_does_not_double_down_and_victory_waits_for_completion() {
    let mut hooks = NullHooks;
    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);

    // Two damage events inside one swing against a 1 hp target: the first
    // downs it, the second must be skipped.
    let player_lib = reaction_set(ActionLibrary::new(), &hero).with(
        ActionSpec::new("flurry", ActionCategory::Basic, one(hero.attack), hero.attack)
            .with_event(hero.attack, 3, EventEffect::Damage)
            .with_event(hero.attack, 6, EventEffect::Damage)
            .with_damage("0d6+10".parse().unwrap()),
    );
    let enemy_lib = reaction_set(ActionLibrary::new(), &ogre).with(
        ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
            .with_event(ogre.attack, 5, EventEffect::Damage)
            .with_damage("1d6+1".parse().unwrap()),
    );
    let mut battle = Battle::new(
        engine,
        Character::new("Hero", 30),
        player_lib,
        Character::new("Ogre", 1),
        enemy_lib,
        9,
    );
    battle.start(&mut hooks);
    assert!(battle.player_select("flurry", &mut hooks));

    let mut downed_at = None;
    let mut resolved_at = None;
    for t in 0..120 {
        battle.tick(1.0, &mut hooks);
        if downed_at.is_none() && battle.character(Side::Enemy).hp == 0 {
            downed_at = Some(t);
        }
        if resolved_at.is_none() && matches!(battle.turn_state(), TurnState::Resolved(_)) {
            resolved_at = Some(t);
            break;
        }
    }
    let downed_at = downed_at.expect("enemy was never downed");
    let resolved_at = resolved_at.expect("battle never resolved");
    // The outcome waits for the swing to finish playing out.
    assert!(resolved_at > downed_at);
    assert_eq!(battle.turn_state(), TurnState::Resolved(Outcome::Victory));
    assert_eq!(battle.character(Side::Enemy).hp, 0);

    // Terminal: further input is refused and ticking changes nothing.
    assert!(!battle.player_select("flurry", &mut hooks));
    for _ in 0..20 {
        battle.tick(1.0, &mut hooks);
    }
    assert_eq!(battle.turn_state(), TurnState::Resolved(Outcome::Victory));
}

#[derive(Default)]
struct TextLog(Vec<String>);

impl BattleHooks for TextLog {
    fn show_text(&mut self, text: &str) {
        self.0.push(text.to_string());
    }
}

#[test]
fn interrupted_flinch_drops_its_remaining_events() {
    let mut hooks = TextLog::default();
    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);

    // Two hits one frame apart: the second lands while the first flinch is
    // still playing and preempts it before its decoration frame.
    let player_lib = reaction_set(ActionLibrary::new(), &hero).with(
        ActionSpec::new("flurry", ActionCategory::Basic, one(hero.attack), hero.attack)
            .with_event(hero.attack, 1, EventEffect::Damage)
            .with_event(hero.attack, 2, EventEffect::Damage)
            .with_damage("0d6+3".parse().unwrap()),
    );
    let enemy_lib = ActionLibrary::new()
        .with(ActionSpec::new("idle", ActionCategory::Idle, one(ogre.idle), ogre.idle))
        .with(
            ActionSpec::new("flinch", ActionCategory::Flinch, one(ogre.flinch), ogre.flinch)
                .with_event(ogre.flinch, 3, EventEffect::ShowText("flinch-fx".to_string())),
        )
        .with(ActionSpec::new("death", ActionCategory::Death, one(ogre.death), ogre.death))
        .with(
            ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
                .with_event(ogre.attack, 5, EventEffect::Damage)
                .with_damage("1d6+1".parse().unwrap()),
        );
    let mut battle = Battle::new(
        engine,
        Character::new("Hero", 30),
        player_lib,
        Character::new("Ogre", 35),
        enemy_lib,
        21,
    );
    battle.start(&mut hooks);
    assert!(battle.player_select("flurry", &mut hooks));

    for _ in 0..40 {
        battle.tick(1.0, &mut hooks);
    }
    assert_eq!(battle.character(Side::Enemy).hp, 29);
    // Only the second flinch survives to its decoration frame; the
    // interrupted one must leak nothing.
    let fx = hooks.0.iter().filter(|t| t.as_str() == "flinch-fx").count();
    assert_eq!(fx, 1, "texts seen: {:?}", hooks.0);
}

/// Start a one-round battle where the player opens with `player_move`, and
/// report whether the enemy answered with its special attack.
fn enemy_answers_with_special(player_move: &str, seed: u64) -> bool {
    let mut hooks = NullHooks;
    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);

    let player_lib = reaction_set(ActionLibrary::new(), &hero)
        .with(
            ActionSpec::new("attack", ActionCategory::Basic, one(hero.attack), hero.attack)
                .with_event(hero.attack, 5, EventEffect::Damage)
                .with_damage("0d6+1".parse().unwrap()),
        )
        .with(
            ActionSpec::new("power", ActionCategory::Special, one(hero.special), hero.special)
                .with_event(hero.special, 6, EventEffect::Damage)
                .with_damage("0d6+1".parse().unwrap()),
        );
    let enemy_lib = reaction_set(ActionLibrary::new(), &ogre)
        .with(
            ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
                .with_event(ogre.attack, 5, EventEffect::Damage)
                .with_damage("0d6+1".parse().unwrap()),
        )
        .with(
            ActionSpec::new("rampage", ActionCategory::Special, one(ogre.special), ogre.special)
                .with_event(ogre.special, 6, EventEffect::Damage)
                .with_damage("0d6+1".parse().unwrap()),
        );
    let mut battle = Battle::new(
        engine,
        Character::new("Hero", 30),
        player_lib,
        Character::new("Ogre", 35),
        enemy_lib,
        seed,
    );
    battle.start(&mut hooks);
    assert!(battle.player_select(player_move, &mut hooks));

    // The pick shows up as writes to the chosen attack clip's target.
    for _ in 0..200 {
        let changes = battle.tick(1.0, &mut hooks);
        if changes.iter().any(|c| c.key == "ogre/special") {
            return true;
        }
        if changes.iter().any(|c| c.key == "ogre/attack") {
            return false;
        }
    }
    panic!("the enemy never attacked");
}

#[test]
fn enemy_escalation_tracks_player_aggression() {
    // Seeded sample over the escalation odds (0.45 after a basic, 0.75
    // after a special): with 60 draws per bucket the expected counts are 27
    // and 45; the bounds sit more than three standard deviations out.
    let mut after_special = 0u32;
    let mut after_basic = 0u32;
    for seed in 0..60 {
        if enemy_answers_with_special("power", seed) {
            after_special += 1;
        }
        if enemy_answers_with_special("attack", seed) {
            after_basic += 1;
        }
    }
    assert!(after_special > after_basic, "{after_special} vs {after_basic}");
    assert!(after_special >= 34, "special bucket too low: {after_special}");
    assert!(after_basic <= 40, "basic bucket too high: {after_basic}");
}

#[test]
fn event_wiring_is_idempotent() {
    let mut battle = fixture(30, 35, "1d6+1", "1d6+1", 2);
    battle.make_events();
    let wired = battle.engine().events().len();
    assert!(wired > 0);
    battle.make_events();
    assert_eq!(battle.engine().events().len(), wired);
}

#[test]
fn battle_runs_to_a_resolution() {
    let mut hooks = NullHooks;
    let mut engine = Engine::new(Config::default());
    let hero = load_rig(&mut engine, "hero");
    let ogre = load_rig(&mut engine, "ogre");
    engine.prebind(&mut PassThrough);

    let player_lib = reaction_set(ActionLibrary::new(), &hero).with(
        ActionSpec::new("attack", ActionCategory::Basic, one(hero.attack), hero.attack)
            .with_event(hero.attack, 5, EventEffect::Damage)
            .with_damage("1d6+1".parse().unwrap()),
    );
    // The enemy escalates to its special more often after player attacks.
    let enemy_lib = reaction_set(ActionLibrary::new(), &ogre)
        .with(
            ActionSpec::new("smash", ActionCategory::Basic, one(ogre.attack), ogre.attack)
                .with_event(ogre.attack, 5, EventEffect::Damage)
                .with_damage("1d6+1".parse().unwrap()),
        )
        .with(
            ActionSpec::new("rampage", ActionCategory::Special, one(ogre.special), ogre.special)
                .with_event(ogre.special, 6, EventEffect::Damage)
                .with_damage("2d6+2".parse().unwrap()),
        );

    let mut battle = Battle::new(
        engine,
        Character::new("Hero", 30),
        player_lib,
        Character::new("Ogre", 35),
        enemy_lib,
        1234,
    );
    battle.start(&mut hooks);

    let mut resolved = false;
    for _ in 0..5000 {
        if battle.turn_state() == TurnState::PlayerSelecting {
            assert!(battle.player_select("attack", &mut hooks));
        }
        battle.tick(1.0, &mut hooks);
        if matches!(battle.turn_state(), TurnState::Resolved(_)) {
            resolved = true;
            break;
        }
    }
    assert!(resolved, "battle never resolved");
    let loser = match battle.turn_state() {
        TurnState::Resolved(Outcome::Victory) => Side::Enemy,
        TurnState::Resolved(Outcome::Defeat) => Side::Player,
        other => panic!("unexpected terminal state {other:?}"),
    };
    assert_eq!(battle.character(loser).hp, 0);
    assert!(battle.character(loser.opponent()).hp > 0);
}
