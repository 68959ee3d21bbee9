//! Combat integration tests
//!
//! Weapons, the damage pipeline and status effects running against an Arena.

use element_core::effect::VisualCue;
use element_core::*;

fn make_test_rng() -> rand::rngs::StdRng {
    use rand::SeedableRng;
    rand::rngs::StdRng::seed_from_u64(42)
}

fn spawn_enemy(arena: &mut Arena, name: &str, base_armor: f64, position: Position) -> EntityId {
    arena.spawn(
        name,
        CombatantProfile {
            base_armor,
            ..Default::default()
        },
        100_000.0,
        position,
    )
}

fn spawn_player(arena: &mut Arena) -> EntityId {
    arena.spawn(
        "player",
        CombatantProfile {
            is_player: true,
            ..Default::default()
        },
        100.0,
        Position::new(50.0, 0.0, 0.0),
    )
}

fn health(arena: &Arena, id: EntityId) -> f64 {
    arena.get(id).map(|c| c.current_health).unwrap_or(0.0)
}

#[test]
fn test_heat_cold_weapon_forms_blast() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let player = spawn_player(&mut arena);
    let target = spawn_enemy(&mut arena, "lancer", 0.0, Position::default());

    let mut weapon = WeaponElementData::new()
        .with_basic("heat", 2.0)
        .with_basic("cold", 1.0)
        .with_correction("heat", Correction::add(1.0));

    let usage = weapon.usage(&ctx.elements).clone();
    assert!((usage.get("blast") - 4.0).abs() < 1e-9);
    assert!(!usage.contains("heat"));
    assert!(!usage.contains("cold"));

    let mut rng = make_test_rng();
    let outcome = attack(&mut ctx, &mut arena, Some(player), target, &mut weapon, 10.0, &mut rng)
        .unwrap();

    assert!((outcome.final_damage() - 40.0).abs() < 1e-9);
    assert!((health(&arena, target) - (100_000.0 - 40.0)).abs() < 1e-9);
    // 4 -> amplifier 3
    assert_eq!(outcome.requested.len(), 1);
    assert_eq!(outcome.requested[0].family, TriggerFamily::Blast);
    assert_eq!(outcome.requested[0].amplifier, 3);
}

#[test]
fn test_priority_tie_break_through_weapon() {
    let table = ElementTable::with_defaults();
    let mut weapon = WeaponElementData::new()
        .with_basic("electricity", 1.0)
        .with_basic("cold", 1.0)
        .with_basic("heat", 1.0);

    let usage = weapon.usage(&table);
    assert!((usage.get("blast") - 2.0).abs() < 1e-9);
    assert!((usage.get("electricity") - 1.0).abs() < 1e-9);
    assert!(!usage.contains("radiation"));
    assert!(!usage.contains("magnetic"));
}

#[test]
fn test_usage_recomputed_after_mutation() {
    let table = ElementTable::with_defaults();
    let mut weapon = WeaponElementData::new().with_basic("heat", 1.0);
    assert!(weapon.usage(&table).contains("heat"));

    weapon.set_basic("toxin", 1.0);
    assert!(weapon.cached_usage().is_none());
    assert!((weapon.usage(&table).get("gas") - 2.0).abs() < 1e-9);
}

#[test]
fn test_critical_tiers_at_150_percent() {
    let pipeline = DamagePipeline::default();
    let usage = UsageLayer::from_values([
        ("slash", 1.0),
        ("critical_chance", 1.5),
        ("critical_damage", 2.0),
    ]);
    let extra = weapon::ExtraLayer::new();

    // Draw inside the extra 50% reaches tier 2
    let high = pipeline.compute_with_draw(10.0, &usage, &extra, None, 10.0);
    assert_eq!(high.critical_tier, 2);
    assert!((high.final_damage - 30.0).abs() < 1e-9);

    let low = pipeline.compute_with_draw(10.0, &usage, &extra, None, 75.0);
    assert_eq!(low.critical_tier, 1);
    assert!((low.final_damage - 20.0).abs() < 1e-9);
}

#[test]
fn test_weapon_clamps_critical_chance() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());

    let mut weapon = WeaponElementData::new()
        .with_basic("slash", 1.0)
        .with_basic("critical_chance", 1.5)
        .with_basic("critical_damage", 2.0);

    // Authored chance is capped at 100%, so every hit is exactly tier 1
    let outcome = attack_with_draw(&mut ctx, &mut arena, None, target, &mut weapon, 10.0, 10.0)
        .unwrap();
    assert_eq!(outcome.breakdown.critical_tier, 1);
    assert!((outcome.final_damage() - 20.0).abs() < 1e-9);
}

#[test]
fn test_armor_cap_mitigation() {
    let constants = GameConstants::default();
    let factor = defense::armor_reduction_factor(2700.0, &constants.armor);
    assert!((factor - 0.1).abs() < 1e-9);
    assert!((defense::armor_reduction_factor(0.0, &constants.armor) - 1.0).abs() < 1e-9);
}

#[test]
fn test_corrosive_stacks_cap_at_ten() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let player = spawn_player(&mut arena);
    let target = spawn_enemy(&mut arena, "bulwark", 1000.0, Position::default());

    let mut weapon = WeaponElementData::new()
        .with_basic("electricity", 0.5)
        .with_basic("toxin", 0.5);

    let mut accepted = 0;
    for _ in 0..12 {
        let outcome =
            attack_with_draw(&mut ctx, &mut arena, Some(player), target, &mut weapon, 5.0, 99.0)
                .unwrap();
        accepted += outcome.triggers_applied;
    }

    assert_eq!(accepted, 10);
    assert_eq!(ctx.effects.corrosive().stacks(target), 10);
    // Ten stacks of -26% floor the armor at zero
    assert!(arena.armor(target).unwrap().abs() < 1e-9);
}

#[test]
fn test_corrosive_stacks_expire_independently() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "bulwark", 1000.0, Position::default());

    let trigger = |ctx: &mut CombatContext, arena: &mut Arena| {
        let tc = effect::TriggerContext {
            target,
            amplifier: 0,
            hit_damage: 10.0,
            attacker: None,
        };
        ctx.effects.trigger(arena, TriggerFamily::Corrosive, &tc)
    };

    assert!(trigger(&mut ctx, &mut arena));
    for _ in 0..80 {
        ctx.effects.tick(&mut arena);
    }
    assert!(trigger(&mut ctx, &mut arena));
    assert!((arena.armor(target).unwrap() - 480.0).abs() < 1e-9);

    // First stack expires at tick 160, the second 80 ticks later
    for _ in 0..80 {
        ctx.effects.tick(&mut arena);
    }
    assert_eq!(ctx.effects.corrosive().stacks(target), 1);
    assert!((arena.armor(target).unwrap() - 740.0).abs() < 1e-9);

    for _ in 0..80 {
        ctx.effects.tick(&mut arena);
    }
    assert_eq!(ctx.effects.corrosive().stacks(target), 0);
    assert!((arena.armor(target).unwrap() - 1000.0).abs() < 1e-9);
}

#[test]
fn test_heat_retrigger_replaces_entry() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 800.0, Position::default());

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };

    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Heat, &tc));
    for _ in 0..100 {
        ctx.effects.tick(&mut arena);
    }
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Heat, &tc));

    // Only one modifier is ever active
    assert!((arena.armor(target).unwrap() - 400.0).abs() < 1e-9);
    assert_eq!(
        ctx.effects.heat().entry(target).map(|e| e.ticks_remaining),
        Some(120)
    );

    for _ in 0..120 {
        ctx.effects.tick(&mut arena);
    }
    assert!(!ctx.effects.has_family(target, EffectFamily::Heat));
    assert!((arena.armor(target).unwrap() - 800.0).abs() < 1e-9);
}

#[test]
fn test_gas_cloud_poisons_everyone_nearby() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());
    let near = spawn_enemy(&mut arena, "near", 0.0, Position::new(2.0, 0.0, 0.0));
    let far = spawn_enemy(&mut arena, "far", 0.0, Position::new(20.0, 0.0, 0.0));

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Gas, &tc));

    let report = ctx.effects.tick(&mut arena);
    assert!(ctx.effects.dot().has_entries(target));
    assert!(ctx.effects.dot().has_entries(near));
    assert!(!ctx.effects.dot().has_entries(far));
    assert!(report.cues.is_empty());

    // Active for 100 ticks, then lingering until 120
    let mut lingering = 0;
    for _ in 1..120 {
        let report = ctx.effects.tick(&mut arena);
        lingering += report
            .cues
            .iter()
            .filter(|cue| matches!(cue, VisualCue::CloudLingering { .. }))
            .count();
    }
    assert_eq!(lingering, 20);
    assert!(ctx.effects.gas().is_empty());
    assert!(health(&arena, near) < 100_000.0);
    assert!((health(&arena, far) - 100_000.0).abs() < 1e-9);
}

#[test]
fn test_gas_cloud_survives_its_origin() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());
    let near = spawn_enemy(&mut arena, "near", 0.0, Position::new(1.0, 0.0, 0.0));

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Gas, &tc));

    // The host drops the origin the way it does after a kill
    ctx.effects.clear_entity(&mut arena, target);
    arena.despawn(target);

    for _ in 0..40 {
        ctx.effects.tick(&mut arena);
    }
    assert!(ctx.effects.dot().has_entries(near));
    assert!(health(&arena, near) < 100_000.0);
    assert_eq!(ctx.effects.gas().len(), 1);
}

#[test]
fn test_blast_burst_at_max_charges() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let player = spawn_player(&mut arena);
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());
    let near = spawn_enemy(&mut arena, "near", 0.0, Position::new(4.0, 0.0, 0.0));

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: Some(player),
    };
    for _ in 0..10 {
        assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Blast, &tc));
    }
    assert!(!ctx.effects.trigger(&mut arena, TriggerFamily::Blast, &tc));

    let mut detonations = Vec::new();
    for _ in 0..30 {
        detonations.extend(ctx.effects.tick(&mut arena).detonations);
    }

    assert_eq!(detonations.len(), 1);
    let burst = &detonations[0];
    assert!(burst.burst);
    assert!((burst.radius - 5.0).abs() < 1e-9);
    // 10 charges of 0.3 * 10
    assert!((burst.damage - 30.0).abs() < 1e-9);
    assert_eq!(burst.victims, vec![target, near]);
    assert!(!ctx.effects.blast().has_entries(target));
    // Players are never caught by another combatant's blast
    assert!((health(&arena, player) - 100.0).abs() < 1e-9);
}

#[test]
fn test_single_detonation_radius() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());
    let near = spawn_enemy(&mut arena, "near", 0.0, Position::new(1.5, 0.0, 0.0));
    let mid = spawn_enemy(&mut arena, "mid", 0.0, Position::new(4.0, 0.0, 0.0));

    let tc = effect::TriggerContext {
        target,
        amplifier: 1,
        hit_damage: 10.0,
        attacker: None,
    };
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Blast, &tc));

    let mut detonations = Vec::new();
    for _ in 0..30 {
        detonations.extend(ctx.effects.tick(&mut arena).detonations);
    }

    assert_eq!(detonations.len(), 1);
    assert!(!detonations[0].burst);
    assert_eq!(detonations[0].victims, vec![target, near]);
    assert!((health(&arena, mid) - 100_000.0).abs() < 1e-9);
    // 0.3 * 2 * 10
    assert!((health(&arena, near) - (100_000.0 - 6.0)).abs() < 1e-9);
}

#[test]
fn test_effect_damage_never_triggers() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());

    let requests = vec![TriggerRequest {
        family: TriggerFamily::Heat,
        element: "heat".to_string(),
        amplifier: 0,
    }];
    let guarded = DamageSource::effect(DamageKind::Bleed, None);
    assert!(guarded.is_guarded());
    assert_eq!(
        ctx.effects
            .dispatch(&mut arena, target, &requests, 10.0, &guarded),
        0
    );
    assert!(!ctx.effects.has_effects(target));

    let unguarded = DamageSource::attack(None);
    assert_eq!(
        ctx.effects
            .dispatch(&mut arena, target, &requests, 10.0, &unguarded),
        1
    );
}

#[test]
fn test_dot_pulses_over_duration() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 100.0,
        attacker: None,
    };
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Bleed, &tc));

    let mut total = 0.0;
    for _ in 0..200 {
        let report = ctx.effects.tick(&mut arena);
        total += report.damage_of_kind(DamageKind::Bleed);
    }

    // Six pulses of 35
    assert!((total - 210.0).abs() < 1e-9);
    assert!(!ctx.effects.dot().has_entries(target));
}

#[test]
fn test_clear_entity_removes_everything() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let player = spawn_player(&mut arena);
    let target = spawn_enemy(&mut arena, "target", 600.0, Position::default());

    let mut weapon = WeaponElementData::new()
        .with_basic("heat", 1.0)
        .with_basic("toxin", 1.0)
        .with_basic("electricity", 1.0)
        .with_basic("slash", 1.0);
    attack_with_draw(&mut ctx, &mut arena, Some(player), target, &mut weapon, 10.0, 99.0)
        .unwrap();
    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };
    ctx.effects.trigger(&mut arena, TriggerFamily::Corrosive, &tc);
    ctx.effects.trigger(&mut arena, TriggerFamily::Heat, &tc);
    assert!(ctx.effects.has_effects(target));
    ctx.effects.take_replication_events();

    ctx.effects.clear_entity(&mut arena, target);
    assert!(!ctx.effects.has_effects(target));
    assert!((arena.armor(target).unwrap() - 600.0).abs() < 1e-9);

    let events = ctx.effects.take_replication_events();
    assert!(!events.is_empty());

    ctx.effects.clear_entity(&mut arena, target);
    assert!(ctx.effects.take_replication_events().is_empty());
}

#[test]
fn test_magnetic_interrupts_shield_regen() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = arena.spawn(
        "eximus",
        CombatantProfile {
            base_shield: 200.0,
            ..Default::default()
        },
        500.0,
        Position::default(),
    );

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };
    assert!(ctx.effects.trigger(&mut arena, TriggerFamily::Magnetic, &tc));
    let combatant = arena.get(target).unwrap();
    assert!(combatant.shield.regen_cooldown() > 0);
    // No lasting entry
    assert!(!ctx.effects.has_effects(target));
}

#[test]
fn test_dead_targets_purged_on_tick() {
    let mut ctx = CombatContext::default();
    let mut arena = Arena::new();
    let target = spawn_enemy(&mut arena, "target", 0.0, Position::default());

    let tc = effect::TriggerContext {
        target,
        amplifier: 0,
        hit_damage: 10.0,
        attacker: None,
    };
    ctx.effects.trigger(&mut arena, TriggerFamily::Poison, &tc);
    ctx.effects.trigger(&mut arena, TriggerFamily::Blast, &tc);

    arena.despawn(target);
    ctx.effects.tick(&mut arena);
    assert!(!ctx.effects.dot().has_entries(target));
    assert!(!ctx.effects.blast().has_entries(target));

    // Triggers on missing targets are rejected
    assert!(!ctx.effects.trigger(&mut arena, TriggerFamily::Heat, &tc));
}
